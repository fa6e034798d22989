//! Stored profile codec.
//!
//! Profiles persist the *input* of a plan, never its output; re-running the
//! compiler on a restored input reproduces the plan. Older profiles carried a
//! single `scenario` field and no `country`; both are normalized on read.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    Coordinate, MomentCode, PlanInput, PlanLevel, Preferences, ResourceNode, ScenarioCode,
    FALLBACK_COUNTRY,
};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to parse stored profile: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to encode stored profile: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedProfile {
    pub input: PlanInput,
    pub saved_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredProfile {
    input: StoredInput,
    #[serde(default)]
    saved_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredInput {
    #[serde(default)]
    country: Option<String>,
    city: String,
    start: Coordinate,
    people_count: u32,
    #[serde(default)]
    scenarios: Option<Vec<ScenarioCode>>,
    #[serde(default)]
    scenario: Option<ScenarioCode>,
    moment: MomentCode,
    level: PlanLevel,
    #[serde(default)]
    preferences: Preferences,
    #[serde(default)]
    resource_nodes: Vec<ResourceNode>,
}

impl StoredInput {
    fn into_plan_input(self) -> PlanInput {
        let scenarios = self
            .scenarios
            .or_else(|| self.scenario.map(|scenario| vec![scenario]))
            .unwrap_or_else(|| vec![ScenarioCode::Unk]);
        let country = self
            .country
            .filter(|country| !country.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_COUNTRY.to_string());

        PlanInput {
            country,
            city: self.city,
            start: self.start,
            people_count: self.people_count,
            scenarios,
            moment: self.moment,
            level: self.level,
            preferences: self.preferences,
            resource_nodes: self.resource_nodes,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredProfileRef<'a> {
    input: &'a PlanInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_at: Option<&'a str>,
}

impl SavedProfile {
    pub fn new(input: PlanInput, saved_at: Option<String>) -> Self {
        Self { input, saved_at }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ProfileError> {
        let stored: StoredProfile = serde_json::from_str(json).map_err(ProfileError::Parse)?;
        Ok(Self {
            input: stored.input.into_plan_input(),
            saved_at: stored.saved_at,
        })
    }

    pub fn to_json_string(&self) -> Result<String, ProfileError> {
        let stored = StoredProfileRef {
            input: &self.input,
            saved_at: self.saved_at.as_deref(),
        };
        serde_json::to_string_pretty(&stored).map_err(ProfileError::Encode)
    }
}
