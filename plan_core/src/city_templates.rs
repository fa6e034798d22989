//! Authored city geography used to override the generic corridor.
//!
//! Loaded from `city_templates.json` with support for environment variable overrides.

use std::{
    collections::HashMap,
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use plan_schema::{
    Coordinate, MomentCode, PlanInput, PlanLevel, Preferences, ResourceNode, RouteAlternative,
    ScenarioCode, FALLBACK_COUNTRY,
};
use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_CITY_TEMPLATES: &str = include_str!("data/city_templates.json");

#[derive(Debug, Clone, Deserialize)]
struct CityTemplatesData {
    templates: Vec<CityTemplate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefaults {
    pub start: Coordinate,
    pub level: PlanLevel,
    pub people_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateObjectives {
    pub primary: Coordinate,
    #[serde(default)]
    pub secondary: Option<Coordinate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDecisionPoint {
    pub id: String,
    #[serde(flatten)]
    pub point: Coordinate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateCorridor {
    pub intent: String,
    #[serde(default)]
    pub alts: Vec<RouteAlternative>,
}

/// Default avoidance flags. Unset flags count as `true`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvoidRules {
    #[serde(default)]
    pub avoid_critical_infra: Option<bool>,
    #[serde(default)]
    pub avoid_tourist_clusters: Option<bool>,
    #[serde(default)]
    pub avoid_underground: Option<bool>,
    #[serde(default)]
    pub avoid_avenues: Option<bool>,
}

impl AvoidRules {
    pub fn preferences(&self) -> Preferences {
        Preferences {
            avoid_avenues: self.avoid_avenues.unwrap_or(true),
            avoid_underground: self.avoid_underground.unwrap_or(true),
            avoid_tourist: self.avoid_tourist_clusters.unwrap_or(true),
            avoid_critical_infra: self.avoid_critical_infra.unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityTemplate {
    pub city: String,
    pub label: String,
    #[serde(default)]
    pub country: Option<String>,
    pub defaults: TemplateDefaults,
    pub objectives: TemplateObjectives,
    #[serde(default)]
    pub decision_points: Vec<TemplateDecisionPoint>,
    pub corridor: TemplateCorridor,
    #[serde(default)]
    pub avoid_rules: Option<AvoidRules>,
}

impl CityTemplate {
    pub fn default_preferences(&self) -> Preferences {
        self.avoid_rules.unwrap_or_default().preferences()
    }
}

/// Caller-chosen fields layered over a city preset.
#[derive(Debug, Clone, Default)]
pub struct PlanInputOverrides {
    pub country: Option<String>,
    pub start: Option<Coordinate>,
    pub people_count: Option<u32>,
    pub scenarios: Option<Vec<ScenarioCode>>,
    pub moment: Option<MomentCode>,
    pub level: Option<PlanLevel>,
    pub avoid_avenues: Option<bool>,
    pub avoid_underground: Option<bool>,
    pub avoid_tourist: Option<bool>,
    pub avoid_critical_infra: Option<bool>,
    pub resource_nodes: Option<Vec<ResourceNode>>,
}

impl PlanInputOverrides {
    fn merge_preferences(&self, base: Preferences) -> Preferences {
        Preferences {
            avoid_avenues: self.avoid_avenues.unwrap_or(base.avoid_avenues),
            avoid_underground: self.avoid_underground.unwrap_or(base.avoid_underground),
            avoid_tourist: self.avoid_tourist.unwrap_or(base.avoid_tourist),
            avoid_critical_infra: self.avoid_critical_infra.unwrap_or(base.avoid_critical_infra),
        }
    }
}

/// Immutable registry of city templates keyed by exact city id.
#[derive(Debug, Clone)]
pub struct CityTemplates {
    templates: Vec<CityTemplate>,
    index: HashMap<String, usize>,
}

impl CityTemplates {
    pub fn builtin() -> Arc<Self> {
        Self::from_json_str(BUILTIN_CITY_TEMPLATES)
            .map(Arc::new)
            .expect("builtin city templates should parse")
    }

    pub fn empty() -> Self {
        Self {
            templates: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self, CityTemplatesError> {
        let data: CityTemplatesData = serde_json::from_str(input)?;
        Self::from_data(data)
    }

    pub fn from_file(path: &Path) -> Result<Self, CityTemplatesError> {
        let contents =
            fs::read_to_string(path).map_err(|source| CityTemplatesError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&contents)
    }

    fn from_data(data: CityTemplatesData) -> Result<Self, CityTemplatesError> {
        let mut index = HashMap::new();
        for (idx, template) in data.templates.iter().enumerate() {
            if template.city.trim().is_empty() {
                return Err(CityTemplatesError::MissingCityId { position: idx });
            }
            if index.insert(template.city.clone(), idx).is_some() {
                return Err(CityTemplatesError::DuplicateCity(template.city.clone()));
            }
        }

        Ok(Self {
            templates: data.templates,
            index,
        })
    }

    /// Exact-match lookup. `None` means the generic corridor applies.
    pub fn lookup(&self, city: &str) -> Option<&CityTemplate> {
        self.index.get(city).and_then(|idx| self.templates.get(*idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CityTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Build a complete input for `city`, seeded from its template when one exists.
    pub fn preset_input(&self, city: &str, overrides: PlanInputOverrides) -> PlanInput {
        match self.lookup(city) {
            Some(template) => PlanInput {
                country: overrides
                    .country
                    .clone()
                    .or_else(|| template.country.clone())
                    .unwrap_or_else(|| FALLBACK_COUNTRY.to_string()),
                city: template.city.clone(),
                start: overrides
                    .start
                    .clone()
                    .unwrap_or_else(|| template.defaults.start.clone()),
                people_count: overrides
                    .people_count
                    .unwrap_or(template.defaults.people_count),
                scenarios: overrides
                    .scenarios
                    .clone()
                    .unwrap_or_else(|| vec![ScenarioCode::Nuk]),
                moment: overrides.moment.unwrap_or(MomentCode::Post),
                level: overrides.level.unwrap_or(template.defaults.level),
                preferences: overrides.merge_preferences(template.default_preferences()),
                resource_nodes: overrides.resource_nodes.clone().unwrap_or_default(),
            },
            None => PlanInput {
                country: overrides
                    .country
                    .clone()
                    .unwrap_or_else(|| FALLBACK_COUNTRY.to_string()),
                city: city.to_string(),
                start: overrides
                    .start
                    .clone()
                    .unwrap_or_else(|| Coordinate::labelled(0.0, 0.0, "Start")),
                people_count: overrides.people_count.unwrap_or(1),
                scenarios: overrides
                    .scenarios
                    .clone()
                    .unwrap_or_else(|| vec![ScenarioCode::Unk]),
                moment: overrides.moment.unwrap_or(MomentCode::Pre),
                level: overrides.level.unwrap_or(PlanLevel::Basic),
                preferences: overrides.merge_preferences(Preferences::all()),
                resource_nodes: overrides.resource_nodes.clone().unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum CityTemplatesError {
    #[error("failed to parse city templates: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read city templates from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("duplicate city template `{0}`")]
    DuplicateCity(String),
    #[error("city template at position {position} has an empty city id")]
    MissingCityId { position: usize },
}

/// Metadata about where the active templates were loaded from.
#[derive(Debug, Clone)]
pub struct CityTemplatesMetadata {
    path: Option<PathBuf>,
}

impl CityTemplatesMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

pub fn load_city_templates_from_env() -> (Arc<CityTemplates>, CityTemplatesMetadata) {
    let override_path = env::var("PLAN72_CITY_TEMPLATES_PATH")
        .ok()
        .map(PathBuf::from);
    let default_path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/data/city_templates.json");

    let candidates: Vec<PathBuf> = match override_path {
        Some(ref path) => vec![path.clone()],
        None => vec![default_path.clone()],
    };

    for path in candidates {
        match CityTemplates::from_file(&path) {
            Ok(templates) => {
                tracing::info!(
                    target: "plan72::config",
                    path = %path.display(),
                    templates = templates.len(),
                    "city_templates.loaded=file"
                );
                return (Arc::new(templates), CityTemplatesMetadata::new(Some(path)));
            }
            Err(err) => {
                tracing::warn!(
                    target: "plan72::config",
                    path = %path.display(),
                    error = %err,
                    "city_templates.load_failed"
                );
            }
        }
    }

    let templates = CityTemplates::builtin();
    tracing::info!(target: "plan72::config", "city_templates.loaded=builtin");
    (templates, CityTemplatesMetadata::new(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_templates_parse() {
        let templates = CityTemplates::builtin();
        assert_eq!(templates.len(), 1);
        let bcn = templates.lookup("BCN").expect("BCN template");
        assert_eq!(bcn.decision_points.len(), 3);
        assert_eq!(bcn.corridor.alts.len(), 2);
        assert_eq!(
            bcn.objectives.primary.display_label(),
            Some("Collserola (green high ground)")
        );
    }

    #[test]
    fn lookup_is_exact_match() {
        let templates = CityTemplates::builtin();
        assert!(templates.lookup("bcn").is_none());
        assert!(templates.lookup(" BCN").is_none());
        assert!(templates.lookup("MAD").is_none());
    }

    #[test]
    fn duplicate_city_ids_are_rejected() {
        let json = r#"{
            "templates": [
                {
                    "city": "XYZ", "label": "One",
                    "defaults": { "start": { "lat": 0, "lng": 0 }, "level": "BASIC", "peopleCount": 1 },
                    "objectives": { "primary": { "lat": 1, "lng": 1 } },
                    "corridor": { "intent": "north" }
                },
                {
                    "city": "XYZ", "label": "Two",
                    "defaults": { "start": { "lat": 0, "lng": 0 }, "level": "BASIC", "peopleCount": 1 },
                    "objectives": { "primary": { "lat": 1, "lng": 1 } },
                    "corridor": { "intent": "south" }
                }
            ]
        }"#;
        let err = CityTemplates::from_json_str(json).expect_err("duplicate should fail");
        assert!(matches!(err, CityTemplatesError::DuplicateCity(ref city) if city == "XYZ"));
    }

    #[test]
    fn missing_avoid_rules_default_to_avoiding_everything() {
        let rules = AvoidRules {
            avoid_avenues: Some(false),
            ..AvoidRules::default()
        };
        let prefs = rules.preferences();
        assert!(!prefs.avoid_avenues);
        assert!(prefs.avoid_underground);
        assert!(prefs.avoid_tourist);
        assert!(prefs.avoid_critical_infra);
    }

    #[test]
    fn preset_for_template_city_uses_template_defaults() {
        let templates = CityTemplates::builtin();
        let input = templates.preset_input("BCN", PlanInputOverrides::default());
        assert_eq!(input.country, "Spain");
        assert_eq!(input.start.display_label(), Some("Forum"));
        assert_eq!(input.people_count, 2);
        assert_eq!(input.scenarios, vec![ScenarioCode::Nuk]);
        assert_eq!(input.moment, MomentCode::Post);
        assert_eq!(input.level, PlanLevel::Standard);
        assert_eq!(input.preferences, Preferences::all());
        assert!(input.resource_nodes.is_empty());
    }

    #[test]
    fn preset_overrides_replace_fields_and_merge_preferences() {
        let templates = CityTemplates::builtin();
        let input = templates.preset_input(
            "BCN",
            PlanInputOverrides {
                scenarios: Some(vec![ScenarioCode::Air, ScenarioCode::Eqk]),
                moment: Some(MomentCode::Pre),
                avoid_tourist: Some(false),
                ..PlanInputOverrides::default()
            },
        );
        assert_eq!(input.scenarios, vec![ScenarioCode::Air, ScenarioCode::Eqk]);
        assert_eq!(input.moment, MomentCode::Pre);
        assert!(!input.preferences.avoid_tourist);
        assert!(input.preferences.avoid_avenues);
    }

    #[test]
    fn preset_for_unknown_city_uses_generic_defaults() {
        let templates = CityTemplates::builtin();
        let input = templates.preset_input("LIS", PlanInputOverrides::default());
        assert_eq!(input.city, "LIS");
        assert_eq!(input.country, FALLBACK_COUNTRY);
        assert_eq!(input.start, Coordinate::labelled(0.0, 0.0, "Start"));
        assert_eq!(input.people_count, 1);
        assert_eq!(input.scenarios, vec![ScenarioCode::Unk]);
        assert_eq!(input.moment, MomentCode::Pre);
        assert_eq!(input.level, PlanLevel::Basic);
    }
}
