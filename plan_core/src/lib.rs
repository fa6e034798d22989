//! Protocol plan compiler for Plan72.
//!
//! Turns a [`PlanInput`](plan_schema::PlanInput) into a deterministic
//! [`PlanOutput`](plan_schema::PlanOutput) when [`generate_plan`] is invoked:
//! one shared map card with the route corridor plus one card per scenario
//! with four time-boxed stages, do/don't lists and resource priorities.

pub mod city_templates;
pub mod clock;
pub mod corridor;
pub mod estimate;
mod hashing;
pub mod legend;
pub mod mode;
mod plan;
pub mod scenario_rules;

pub use city_templates::{
    load_city_templates_from_env, CityTemplate, CityTemplates, CityTemplatesError,
    CityTemplatesMetadata, PlanInputOverrides,
};
pub use clock::{format_timestamp, Clock, FixedClock, SystemClock};
pub use corridor::{build_corridor, Corridor, CorridorStrategy, HeuristicCorridor, TemplateCorridor};
pub use hashing::{plan_digest, FnvHasher};
pub use legend::derive_legend;
pub use mode::mode_for;
pub use plan::{generate_plan, PlanCompiler};
pub use scenario_rules::{
    load_scenario_rules_from_env, DoDont, ScenarioRule, ScenarioRules, ScenarioRulesError,
    ScenarioRulesMetadata,
};
