//! Scenario rule table and resource priority table.
//!
//! Both tables live in `scenario_rules.json`. Loading checks that every
//! scenario code carries a label, general do/don't lists, all four stages and
//! a priority list for each moment, so lookups after construction are total.

use std::{
    collections::HashMap,
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use plan_schema::{MomentCode, ResourceType, ScenarioCode, StageKey};
use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_SCENARIO_RULES: &str = include_str!("data/scenario_rules.json");

/// Upper bound on actions, do and don't entries printed per block.
pub const MAX_CARD_ENTRIES: usize = 3;

#[derive(Debug, Clone, Deserialize)]
struct ScenarioRulesData {
    scenarios: HashMap<ScenarioCode, ScenarioRuleRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScenarioRuleRecord {
    label: String,
    #[serde(rename = "do")]
    dos: Vec<String>,
    #[serde(rename = "dont")]
    donts: Vec<String>,
    stages: HashMap<StageKey, Vec<String>>,
    priority: HashMap<MomentCode, Vec<ResourceType>>,
}

/// Fully resolved rules for one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRule {
    pub scenario: ScenarioCode,
    pub label: String,
    pub dos: Vec<String>,
    pub donts: Vec<String>,
    stage_actions: [Vec<String>; 4],
    priority_pre: Vec<ResourceType>,
    priority_post: Vec<ResourceType>,
}

impl ScenarioRule {
    fn from_record(
        scenario: ScenarioCode,
        mut record: ScenarioRuleRecord,
    ) -> Result<Self, ScenarioRulesError> {
        if record.label.trim().is_empty() {
            return Err(ScenarioRulesError::EmptyList {
                scenario,
                field: "label",
            });
        }
        if record.dos.is_empty() {
            return Err(ScenarioRulesError::EmptyList {
                scenario,
                field: "do",
            });
        }
        if record.donts.is_empty() {
            return Err(ScenarioRulesError::EmptyList {
                scenario,
                field: "dont",
            });
        }

        let mut take_stage = |stage: StageKey| match record.stages.remove(&stage) {
            Some(actions) if !actions.is_empty() => Ok(actions),
            _ => Err(ScenarioRulesError::MissingStage { scenario, stage }),
        };
        let stage_actions = [
            take_stage(StageKey::Stg0)?,
            take_stage(StageKey::Stg1)?,
            take_stage(StageKey::Stg2)?,
            take_stage(StageKey::Stg3)?,
        ];

        let mut take_priority = |moment: MomentCode| match record.priority.remove(&moment) {
            Some(list) if !list.is_empty() => Ok(list),
            _ => Err(ScenarioRulesError::MissingPriority { scenario, moment }),
        };
        let priority_pre = take_priority(MomentCode::Pre)?;
        let priority_post = take_priority(MomentCode::Post)?;

        Ok(Self {
            scenario,
            label: record.label,
            dos: record.dos,
            donts: record.donts,
            stage_actions,
            priority_pre,
            priority_post,
        })
    }

    /// Stage-specific statements only.
    pub fn actions_for(&self, stage: StageKey) -> &[String] {
        let slot = match stage {
            StageKey::Stg0 => 0,
            StageKey::Stg1 => 1,
            StageKey::Stg2 => 2,
            StageKey::Stg3 => 3,
        };
        &self.stage_actions[slot]
    }

    /// Stage statements followed by the general do list, capped at three.
    pub fn stage_actions(&self, stage: StageKey) -> Vec<String> {
        self.actions_for(stage)
            .iter()
            .chain(self.dos.iter())
            .take(MAX_CARD_ENTRIES)
            .cloned()
            .collect()
    }

    pub fn base_do_dont(&self) -> DoDont {
        DoDont {
            dos: self.dos.iter().take(MAX_CARD_ENTRIES).cloned().collect(),
            donts: self.donts.iter().take(MAX_CARD_ENTRIES).cloned().collect(),
        }
    }

    /// Ordered supply categories. Repeated codes are kept as authored.
    pub fn priority_for(&self, moment: MomentCode) -> &[ResourceType] {
        match moment {
            MomentCode::Pre => &self.priority_pre,
            MomentCode::Post => &self.priority_post,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoDont {
    pub dos: Vec<String>,
    pub donts: Vec<String>,
}

/// Immutable rule table covering every [`ScenarioCode`].
#[derive(Debug, Clone)]
pub struct ScenarioRules {
    rules: Vec<ScenarioRule>,
}

impl ScenarioRules {
    pub fn builtin() -> Arc<Self> {
        Self::from_json_str(BUILTIN_SCENARIO_RULES)
            .map(Arc::new)
            .expect("builtin scenario rules should parse")
    }

    pub fn from_json_str(input: &str) -> Result<Self, ScenarioRulesError> {
        let data: ScenarioRulesData = serde_json::from_str(input)?;
        Self::from_data(data)
    }

    pub fn from_file(path: &Path) -> Result<Self, ScenarioRulesError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ScenarioRulesError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&contents)
    }

    fn from_data(mut data: ScenarioRulesData) -> Result<Self, ScenarioRulesError> {
        let mut rules = Vec::with_capacity(ScenarioCode::ALL.len());
        for scenario in ScenarioCode::ALL {
            let record = data
                .scenarios
                .remove(&scenario)
                .ok_or(ScenarioRulesError::MissingScenario(scenario))?;
            rules.push(ScenarioRule::from_record(scenario, record)?);
        }
        Ok(Self { rules })
    }

    pub fn rule(&self, scenario: ScenarioCode) -> &ScenarioRule {
        &self.rules[scenario.index()]
    }

    pub fn actions_for(&self, scenario: ScenarioCode, stage: StageKey) -> &[String] {
        self.rule(scenario).actions_for(stage)
    }

    pub fn base_do_dont(&self, scenario: ScenarioCode) -> DoDont {
        self.rule(scenario).base_do_dont()
    }

    pub fn priority_for(&self, scenario: ScenarioCode, moment: MomentCode) -> &[ResourceType] {
        self.rule(scenario).priority_for(moment)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum ScenarioRulesError {
    #[error("failed to parse scenario rules: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read scenario rules from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("scenario rules missing entry for {0}")]
    MissingScenario(ScenarioCode),
    #[error("scenario {scenario} has no actions for stage {stage}")]
    MissingStage {
        scenario: ScenarioCode,
        stage: StageKey,
    },
    #[error("scenario {scenario} has no resource priority for moment {moment}")]
    MissingPriority {
        scenario: ScenarioCode,
        moment: MomentCode,
    },
    #[error("scenario {scenario} has an empty `{field}`")]
    EmptyList {
        scenario: ScenarioCode,
        field: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct ScenarioRulesMetadata {
    path: Option<PathBuf>,
}

impl ScenarioRulesMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

pub fn load_scenario_rules_from_env() -> (Arc<ScenarioRules>, ScenarioRulesMetadata) {
    let override_path = env::var("PLAN72_SCENARIO_RULES_PATH")
        .ok()
        .map(PathBuf::from);
    let default_path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/data/scenario_rules.json");

    let candidates: Vec<PathBuf> = match override_path {
        Some(ref path) => vec![path.clone()],
        None => vec![default_path.clone()],
    };

    for path in candidates {
        match ScenarioRules::from_file(&path) {
            Ok(rules) => {
                tracing::info!(
                    target: "plan72::config",
                    path = %path.display(),
                    scenarios = rules.len(),
                    "scenario_rules.loaded=file"
                );
                return (Arc::new(rules), ScenarioRulesMetadata::new(Some(path)));
            }
            Err(err) => {
                tracing::warn!(
                    target: "plan72::config",
                    path = %path.display(),
                    error = %err,
                    "scenario_rules.load_failed"
                );
            }
        }
    }

    let rules = ScenarioRules::builtin();
    tracing::info!(target: "plan72::config", "scenario_rules.loaded=builtin");
    (rules, ScenarioRulesMetadata::new(None))
}
