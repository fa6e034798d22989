mod common;

use anyhow::Result;
use plan_runtime::{SavedProfile, FALLBACK_COUNTRY};
use plan_schema::{MomentCode, PlanLevel, ScenarioCode};

#[test]
fn legacy_profile_restores_and_compiles() -> Result<()> {
    let profile = SavedProfile::from_json_str(&common::read_fixture("legacy_profile.json")?)?;

    assert_eq!(profile.input.scenarios, vec![ScenarioCode::Eqk]);
    assert_eq!(profile.input.country, FALLBACK_COUNTRY);
    assert_eq!(profile.input.moment, MomentCode::Pre);
    assert_eq!(profile.input.level, PlanLevel::Basic);
    assert!(!profile.input.preferences.avoid_underground);

    let plan = common::fixed_compiler().generate_plan(&profile.input);
    assert_eq!(plan.meta.id, "BCN-EQK-PRE-BASIC");
    assert_eq!(plan.scenario_cards[0].id, "BCN–ACT–EQK–PRE");
    Ok(())
}

#[test]
fn saved_profile_reproduces_the_same_plan() -> Result<()> {
    let compiler = common::fixed_compiler();
    let input = common::load_input("lis_multi_pre.json")?;
    let saved = SavedProfile::new(input.clone(), Some("2025-01-01T12:00:00.000Z".to_string()));

    let restored = SavedProfile::from_json_str(&saved.to_json_string()?)?;
    assert_eq!(restored.input, input);
    assert_eq!(
        compiler.generate_plan(&restored.input),
        compiler.generate_plan(&input)
    );
    Ok(())
}
