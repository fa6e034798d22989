use plan_schema::{Mode, MomentCode, ScenarioCode, StageKey};

/// Posture for one stage of one scenario.
///
/// Stateless decision table: each stage is evaluated on its own, there are no
/// transitions between stages.
pub fn mode_for(scenario: ScenarioCode, moment: MomentCode, stage: StageKey) -> Mode {
    match (scenario, stage, moment) {
        (ScenarioCode::Air | ScenarioCode::Civ, _, _) => Mode::Move,
        (ScenarioCode::Eqk, StageKey::Stg0, MomentCode::Pre) => Mode::Shelter,
        (ScenarioCode::Eqk, _, _) => Mode::Move,
        (
            ScenarioCode::Nuk | ScenarioCode::Unk | ScenarioCode::Mem,
            StageKey::Stg0 | StageKey::Stg1,
            _,
        ) => Mode::Shelter,
        (ScenarioCode::Nuk | ScenarioCode::Unk | ScenarioCode::Mem, _, _) => Mode::Move,
    }
}
