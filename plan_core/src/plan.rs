//! Plan assembly: composes the corridor, rule tables and legend into the
//! printable protocol.

use std::sync::{Arc, OnceLock};

use plan_schema::{
    MapCard, MomentCode, PlanInput, PlanMeta, PlanOutput, ResourceType, RouteMap, ScenarioCard,
    ScenarioCode, StageKey, StagePlan,
};

use crate::city_templates::{load_city_templates_from_env, CityTemplates};
use crate::clock::{format_timestamp, Clock, SystemClock};
use crate::corridor::{build_corridor, Corridor};
use crate::estimate::estimate_route;
use crate::legend::derive_legend;
use crate::mode::mode_for;
use crate::scenario_rules::{load_scenario_rules_from_env, ScenarioRules};

const CARD_ID_SEPARATOR: &str = "–";
const PRIORITY_SEPARATOR: &str = " → ";

/// Parts of the plan shared by every scenario card.
struct SharedRoute {
    route_id: String,
    node_set_id: String,
    route_summary: String,
}

/// Compiler bound to one set of preloaded tables.
///
/// Holds no mutable state; a single instance may serve concurrent callers.
#[derive(Clone)]
pub struct PlanCompiler {
    templates: Arc<CityTemplates>,
    rules: Arc<ScenarioRules>,
    clock: Arc<dyn Clock>,
}

impl PlanCompiler {
    pub fn new(
        templates: Arc<CityTemplates>,
        rules: Arc<ScenarioRules>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            templates,
            rules,
            clock,
        }
    }

    /// Compiled-in tables and the system clock.
    pub fn builtin() -> Self {
        Self::new(
            CityTemplates::builtin(),
            ScenarioRules::builtin(),
            Arc::new(SystemClock::new()),
        )
    }

    /// Tables resolved through the `PLAN72_*_PATH` overrides.
    pub fn from_env() -> Self {
        let (templates, _) = load_city_templates_from_env();
        let (rules, _) = load_scenario_rules_from_env();
        Self::new(templates, rules, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn templates(&self) -> &CityTemplates {
        &self.templates
    }

    pub fn rules(&self) -> &ScenarioRules {
        &self.rules
    }

    /// Compile `input` into a protocol. Total: never fails.
    pub fn generate_plan(&self, input: &PlanInput) -> PlanOutput {
        let scenarios = normalized_scenarios(&input.scenarios);
        let corridor = build_corridor(&self.templates, input);

        let shared = SharedRoute {
            route_id: format!("{}{CARD_ID_SEPARATOR}RTE{CARD_ID_SEPARATOR}BASE", input.city),
            node_set_id: format!("{}{CARD_ID_SEPARATOR}NODES", input.city),
            route_summary: corridor.summary(),
        };

        let scenario_cards: Vec<ScenarioCard> = scenarios
            .iter()
            .map(|scenario| self.scenario_card(input, *scenario, &shared))
            .collect();
        let map_card = map_card(input, corridor, &shared);
        let meta = PlanMeta {
            id: plan_id(input, &scenarios),
            generated_at: format_timestamp(self.clock.now()),
        };

        tracing::debug!(
            target: "plan72::compiler",
            plan = %meta.id,
            cards = scenario_cards.len(),
            corridor = map_card.map.corridor.len(),
            "plan.compiled"
        );

        PlanOutput {
            meta,
            map_card,
            scenario_cards,
        }
    }

    fn scenario_card(
        &self,
        input: &PlanInput,
        scenario: ScenarioCode,
        shared: &SharedRoute,
    ) -> ScenarioCard {
        let rule = self.rules.rule(scenario);
        let stages: Vec<StagePlan> = StageKey::ALL
            .into_iter()
            .map(|stage| StagePlan {
                stage,
                window: stage.window().to_string(),
                mode: mode_for(scenario, input.moment, stage),
                actions: rule.stage_actions(stage),
            })
            .collect();
        let lists = rule.base_do_dont();
        let priority = rule.priority_for(input.moment).to_vec();

        ScenarioCard {
            id: scenario_card_id(&input.city, scenario, input.moment),
            scenario,
            label: rule.label.clone(),
            mode: mode_for(scenario, input.moment, StageKey::Stg0),
            route_id: shared.route_id.clone(),
            route_summary: shared.route_summary.clone(),
            node_set_id: shared.node_set_id.clone(),
            node_summary: node_summary(input.resource_nodes.len(), &priority),
            stages,
            dos: lists.dos,
            donts: lists.donts,
            resource_priority: priority,
        }
    }
}

impl Default for PlanCompiler {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for PlanCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanCompiler")
            .field("templates", &self.templates.len())
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Compile with the process-wide builtin tables.
pub fn generate_plan(input: &PlanInput) -> PlanOutput {
    static COMPILER: OnceLock<PlanCompiler> = OnceLock::new();
    COMPILER.get_or_init(PlanCompiler::builtin).generate_plan(input)
}

fn normalized_scenarios(scenarios: &[ScenarioCode]) -> Vec<ScenarioCode> {
    if scenarios.is_empty() {
        vec![ScenarioCode::Unk]
    } else {
        scenarios.to_vec()
    }
}

fn plan_id(input: &PlanInput, scenarios: &[ScenarioCode]) -> String {
    let joined = scenarios
        .iter()
        .map(ScenarioCode::as_str)
        .collect::<Vec<_>>()
        .join("+");
    format!("{}-{}-{}-{}", input.city, joined, input.moment, input.level)
}

fn scenario_card_id(city: &str, scenario: ScenarioCode, moment: MomentCode) -> String {
    format!("{city}{CARD_ID_SEPARATOR}ACT{CARD_ID_SEPARATOR}{scenario}{CARD_ID_SEPARATOR}{moment}")
}

fn node_summary(node_count: usize, priority: &[ResourceType]) -> String {
    let codes = priority
        .iter()
        .map(ResourceType::as_str)
        .collect::<Vec<_>>()
        .join(PRIORITY_SEPARATOR);
    if node_count == 0 {
        format!("No nodes · Priority {codes}")
    } else {
        format!("{node_count} nodes · Priority {codes}")
    }
}

fn map_card(input: &PlanInput, corridor: Corridor, shared: &SharedRoute) -> MapCard {
    let estimate = estimate_route(&corridor.points);
    let objective = corridor.objective();
    let Corridor {
        points,
        decision_points,
        alts,
        intent,
    } = corridor;

    MapCard {
        id: format!("{}{CARD_ID_SEPARATOR}MAP", input.city),
        route_id: shared.route_id.clone(),
        node_set_id: shared.node_set_id.clone(),
        route_summary: shared.route_summary.clone(),
        map: RouteMap {
            corridor: points,
            decision_points: decision_points.clone(),
            alts,
            intent,
            objective,
        },
        decision_points,
        resource_nodes: input.resource_nodes.clone(),
        resource_legend: derive_legend(&input.resource_nodes),
        estimate,
    }
}
