mod common;

use anyhow::Result;
use plan_schema::{Mode, ResourceType, ScenarioCode, StageKey};

#[test]
fn barcelona_nuclear_post_plan() -> Result<()> {
    let input = common::load_input("bcn_nuk_post.json")?;
    let plan = common::fixed_compiler().generate_plan(&input);

    assert_eq!(plan.meta.id, "BCN-NUK-POST-STANDARD");
    assert_eq!(plan.meta.generated_at, "2025-01-01T12:00:00.000Z");

    let map = &plan.map_card;
    assert_eq!(map.id, "BCN–MAP");
    assert_eq!(map.route_id, "BCN–RTE–BASE");
    assert_eq!(map.node_set_id, "BCN–NODES");
    assert_eq!(map.map.corridor.len(), 5);
    assert_eq!(map.map.corridor[0].label.as_deref(), Some("Forum"));
    assert_eq!(map.map.corridor[0].lat, 41.41);
    assert_eq!(
        map.map.corridor[4].label.as_deref(),
        Some("Collserola (green high ground)")
    );
    assert_eq!(map.map.objective, "Collserola (green high ground)");
    assert_eq!(map.map.alts.len(), 2);
    assert_eq!(map.decision_points.len(), 3);
    assert_eq!(map.decision_points, map.map.decision_points);
    assert_eq!(
        map.route_summary,
        "Forum → Poblenou → Glòries → Gràcia → Collserola (green high ground)"
    );
    assert_eq!(map.resource_nodes, input.resource_nodes);
    let legend: Vec<ResourceType> = map.resource_legend.iter().map(|entry| entry.kind).collect();
    assert_eq!(legend, vec![ResourceType::A, ResourceType::C, ResourceType::E]);
    assert!(map.estimate.distance_label.starts_with('~'));
    assert!(map.estimate.eta_label.ends_with("on foot"));

    assert_eq!(plan.scenario_cards.len(), 1);
    let card = &plan.scenario_cards[0];
    assert_eq!(card.id, "BCN–ACT–NUK–POST");
    assert_eq!(card.scenario, ScenarioCode::Nuk);
    assert_eq!(card.label, "Radiological release");
    assert_eq!(card.mode, Mode::Shelter);
    assert_eq!(card.route_id, map.route_id);
    assert_eq!(card.route_summary, map.route_summary);
    assert_eq!(card.node_summary, "1 nodes · Priority A → C → E → B");
    assert_eq!(
        card.resource_priority,
        vec![ResourceType::A, ResourceType::C, ResourceType::E, ResourceType::B]
    );

    let modes: Vec<Mode> = card.stages.iter().map(|stage| stage.mode).collect();
    assert_eq!(modes, vec![Mode::Shelter, Mode::Shelter, Mode::Move, Mode::Move]);
    let stages: Vec<StageKey> = card.stages.iter().map(|stage| stage.stage).collect();
    assert_eq!(stages, StageKey::ALL.to_vec());
    assert_eq!(card.stages[3].window, "24–72 h");
    Ok(())
}

#[test]
fn barcelona_plan_serializes_with_wire_names() -> Result<()> {
    let input = common::load_input("bcn_nuk_post.json")?;
    let plan = common::fixed_compiler().generate_plan(&input);
    let json = serde_json::to_value(&plan).expect("serialize");

    assert_eq!(json["meta"]["generatedAt"], "2025-01-01T12:00:00.000Z");
    assert_eq!(json["mapCard"]["routeSummary"], plan.map_card.route_summary);
    let card = &json["scenarioCards"][0];
    assert_eq!(card["scenario"], "NUK");
    assert_eq!(card["mode"], "SHELTER");
    assert_eq!(card["stages"][0]["stage"], "STG0");
    assert_eq!(card["do"].as_array().map(Vec::len), Some(3));
    assert_eq!(card["dont"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["mapCard"]["resourceLegend"][0]["type"], "A");
    Ok(())
}
