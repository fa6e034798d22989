mod common;

use anyhow::Result;
use plan_schema::{MomentCode, PlanInput, ScenarioCode, StageKey};

fn input_for(scenarios: Vec<ScenarioCode>, moment: MomentCode) -> Result<PlanInput> {
    let mut input = common::load_input("lis_multi_pre.json")?;
    input.scenarios = scenarios;
    input.moment = moment;
    Ok(input)
}

#[test]
fn every_scenario_and_moment_compiles_a_full_card() -> Result<()> {
    let compiler = common::fixed_compiler();

    for scenario in ScenarioCode::ALL {
        for moment in [MomentCode::Pre, MomentCode::Post] {
            let plan = compiler.generate_plan(&input_for(vec![scenario], moment)?);
            assert_eq!(plan.scenario_cards.len(), 1);

            let card = &plan.scenario_cards[0];
            assert_eq!(card.scenario, scenario);
            assert!(!card.label.is_empty(), "{scenario} has no label");
            assert_eq!(card.stages.len(), StageKey::ALL.len());
            assert_eq!(card.mode, card.stages[0].mode);
            for stage in &card.stages {
                assert!(
                    (1..=3).contains(&stage.actions.len()),
                    "{scenario}/{moment}/{} has {} actions",
                    stage.stage,
                    stage.actions.len()
                );
            }
            assert!(!card.dos.is_empty() && card.dos.len() <= 3);
            assert!(!card.donts.is_empty() && card.donts.len() <= 3);
            assert!(!card.resource_priority.is_empty());
            assert!(card.node_summary.starts_with("2 nodes · Priority "));
        }
    }
    Ok(())
}

#[test]
fn cards_follow_input_order_and_share_one_route() -> Result<()> {
    let plan = common::fixed_compiler().generate_plan(&common::load_input("lis_multi_pre.json")?);

    assert_eq!(plan.meta.id, "LIS-AIR+EQK+MEM-PRE-ADVANCED");
    let ids: Vec<&str> = plan
        .scenario_cards
        .iter()
        .map(|card| card.id.as_str())
        .collect();
    assert_eq!(ids, vec!["LIS–ACT–AIR–PRE", "LIS–ACT–EQK–PRE", "LIS–ACT–MEM–PRE"]);
    for card in &plan.scenario_cards {
        assert_eq!(card.route_id, plan.map_card.route_id);
        assert_eq!(card.node_set_id, plan.map_card.node_set_id);
        assert_eq!(card.route_summary, plan.map_card.route_summary);
    }
    Ok(())
}

#[test]
fn unknown_city_uses_heuristic_corridor() -> Result<()> {
    let plan = common::fixed_compiler().generate_plan(&common::load_input("lis_multi_pre.json")?);
    let map = &plan.map_card.map;

    assert_eq!(map.corridor.len(), 4);
    assert_eq!(map.decision_points.len(), 3);
    assert!(map.alts.is_empty());
    assert_eq!(map.intent, "base heuristic corridor");
    assert_eq!(map.objective, "DP3");
    assert_eq!(plan.map_card.route_summary, "Baixa → DP1 → DP2 → DP3");
    Ok(())
}

#[test]
fn legend_lists_node_types_in_first_seen_order() -> Result<()> {
    let plan = common::fixed_compiler().generate_plan(&common::load_input("lis_multi_pre.json")?);
    let labels: Vec<&str> = plan
        .map_card
        .resource_legend
        .iter()
        .map(|entry| entry.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Medical", "Hydration", "Warmth / shelter", "Power"]);
    assert_eq!(plan.map_card.resource_nodes.len(), 2);
    Ok(())
}

#[test]
fn empty_scenarios_compile_as_unknown() -> Result<()> {
    let plan = common::fixed_compiler().generate_plan(&input_for(Vec::new(), MomentCode::Post)?);
    assert_eq!(plan.meta.id, "LIS-UNK-POST-ADVANCED");
    assert_eq!(plan.scenario_cards.len(), 1);
    assert_eq!(plan.scenario_cards[0].scenario, ScenarioCode::Unk);
    Ok(())
}

#[test]
fn duplicate_scenarios_are_kept() -> Result<()> {
    let plan = common::fixed_compiler().generate_plan(&input_for(
        vec![ScenarioCode::Civ, ScenarioCode::Civ],
        MomentCode::Pre,
    )?);
    assert_eq!(plan.scenario_cards.len(), 2);
    assert_eq!(plan.scenario_cards[0], plan.scenario_cards[1]);
    Ok(())
}
