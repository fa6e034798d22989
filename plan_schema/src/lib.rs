//! Data contracts shared by the Plan72 protocol compiler and its callers.
//!
//! Every type here serializes to the camelCase JSON consumed by rendering and
//! export surfaces. Codes (scenarios, moments, stages, resource types) travel as
//! their upper-case identifiers, e.g. `"NUK"`, `"POST"`, `"STG0"`, `"A"`.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Hazard scenario a protocol card is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScenarioCode {
    Air,
    Nuk,
    Civ,
    Eqk,
    Unk,
    /// Wildcard scenario (zombies, invasions and other "meme" hazards).
    Mem,
}

impl ScenarioCode {
    pub const ALL: [ScenarioCode; 6] = [
        ScenarioCode::Air,
        ScenarioCode::Nuk,
        ScenarioCode::Civ,
        ScenarioCode::Eqk,
        ScenarioCode::Unk,
        ScenarioCode::Mem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioCode::Air => "AIR",
            ScenarioCode::Nuk => "NUK",
            ScenarioCode::Civ => "CIV",
            ScenarioCode::Eqk => "EQK",
            ScenarioCode::Unk => "UNK",
            ScenarioCode::Mem => "MEM",
        }
    }

    /// Case-insensitive lookup of a scenario by its code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.as_str().eq_ignore_ascii_case(code.trim()))
    }

    /// Dense position of the code inside [`ScenarioCode::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScenarioCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the plan is prepared before or after the hazard begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum MomentCode {
    Pre,
    Post,
}

impl MomentCode {
    pub const ALL: [MomentCode; 2] = [MomentCode::Pre, MomentCode::Post];

    pub fn as_str(&self) -> &'static str {
        match self {
            MomentCode::Pre => "PRE",
            MomentCode::Post => "POST",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|moment| moment.as_str().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for MomentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Readiness tier of the person or team the plan is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanLevel {
    #[default]
    Basic,
    Standard,
    Advanced,
}

impl PlanLevel {
    pub const ALL: [PlanLevel; 3] = [PlanLevel::Basic, PlanLevel::Standard, PlanLevel::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanLevel::Basic => "BASIC",
            PlanLevel::Standard => "STANDARD",
            PlanLevel::Advanced => "ADVANCED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for PlanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four fixed windows covering the 72 hour horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum StageKey {
    Stg0,
    Stg1,
    Stg2,
    Stg3,
}

impl StageKey {
    /// Stages in presentation order.
    pub const ALL: [StageKey; 4] = [StageKey::Stg0, StageKey::Stg1, StageKey::Stg2, StageKey::Stg3];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKey::Stg0 => "STG0",
            StageKey::Stg1 => "STG1",
            StageKey::Stg2 => "STG2",
            StageKey::Stg3 => "STG3",
        }
    }

    /// Human time-window label printed on the card.
    pub fn window(&self) -> &'static str {
        match self {
            StageKey::Stg0 => "0–60 min",
            StageKey::Stg1 => "1–6 h",
            StageKey::Stg2 => "6–24 h",
            StageKey::Stg3 => "24–72 h",
        }
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommended posture for a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Move,
    Shelter,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Move => "MOVE",
            Mode::Shelter => "SHELTER",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supply category carried by a resource node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum ResourceType {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl ResourceType {
    pub const ALL: [ResourceType; 6] = [
        ResourceType::A,
        ResourceType::B,
        ResourceType::C,
        ResourceType::D,
        ResourceType::E,
        ResourceType::F,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::A => "A",
            ResourceType::B => "B",
            ResourceType::C => "C",
            ResourceType::D => "D",
            ResourceType::E => "E",
            ResourceType::F => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::A => "Hydration",
            ResourceType::B => "Calories",
            ResourceType::C => "Warmth / shelter",
            ResourceType::D => "Medical",
            ResourceType::E => "Power",
            ResourceType::F => "Comms",
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        let upper = code.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().starts_with(upper))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point in decimal degrees. Labels are display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            label: None,
        }
    }

    pub fn labelled(lat: f64, lng: f64, label: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            label: Some(label.into()),
        }
    }

    /// Label with blank values treated as absent.
    pub fn display_label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

/// Caller-supplied point of interest tagged with supply categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceNode {
    pub id: String,
    pub label: String,
    pub lat: f64,
    pub lng: f64,
    pub types: Vec<ResourceType>,
}

impl ResourceNode {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::labelled(self.lat, self.lng, self.label.clone())
    }
}

/// Named alternate route. Carries no geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RouteAlternative {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub avoid_avenues: bool,
    pub avoid_underground: bool,
    pub avoid_tourist: bool,
    pub avoid_critical_infra: bool,
}

impl Preferences {
    pub fn all() -> Self {
        Self {
            avoid_avenues: true,
            avoid_underground: true,
            avoid_tourist: true,
            avoid_critical_infra: true,
        }
    }
}

/// Country recorded when neither the caller nor a city template supplies one.
pub const FALLBACK_COUNTRY: &str = "Unknown";

/// Validated description of a person's situation handed to the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    #[serde(default)]
    pub country: String,
    pub city: String,
    pub start: Coordinate,
    pub people_count: u32,
    #[serde(default)]
    pub scenarios: Vec<ScenarioCode>,
    pub moment: MomentCode,
    pub level: PlanLevel,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub resource_nodes: Vec<ResourceNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StagePlan {
    pub stage: StageKey,
    pub window: String,
    pub mode: Mode,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioCard {
    pub id: String,
    pub scenario: ScenarioCode,
    pub label: String,
    pub mode: Mode,
    pub route_id: String,
    pub route_summary: String,
    pub node_set_id: String,
    pub node_summary: String,
    pub stages: Vec<StagePlan>,
    #[serde(rename = "do")]
    pub dos: Vec<String>,
    #[serde(rename = "dont")]
    pub donts: Vec<String>,
    pub resource_priority: Vec<ResourceType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LegendEntry {
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub label: String,
}

impl LegendEntry {
    pub fn for_type(kind: ResourceType) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteMap {
    pub corridor: Vec<Coordinate>,
    pub decision_points: Vec<Coordinate>,
    pub alts: Vec<RouteAlternative>,
    pub intent: String,
    pub objective: String,
}

/// Straight-line walking estimate over the corridor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub distance_label: String,
    pub eta_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapCard {
    pub id: String,
    pub route_id: String,
    pub node_set_id: String,
    pub route_summary: String,
    pub map: RouteMap,
    pub decision_points: Vec<Coordinate>,
    pub resource_nodes: Vec<ResourceNode>,
    pub resource_legend: Vec<LegendEntry>,
    pub estimate: RouteEstimate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanMeta {
    pub id: String,
    pub generated_at: String,
}

/// Printable protocol: one shared map card plus one card per scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    pub meta: PlanMeta,
    pub map_card: MapCard,
    pub scenario_cards: Vec<ScenarioCard>,
}

pub fn plan_input_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(PlanInput)
}

pub fn plan_output_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(PlanOutput)
}
