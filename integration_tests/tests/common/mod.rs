#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Once};

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use plan_core::{FixedClock, PlanCompiler};
use plan_schema::PlanInput;

static INIT: Once = Once::new();

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn read_fixture(name: &str) -> Result<String> {
    let path = fixture_path(name);
    std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read fixture {}", path.display()))
}

pub fn load_input(name: &str) -> Result<PlanInput> {
    let json = read_fixture(name)?;
    serde_json::from_str(&json).with_context(|| format!("Fixture {name} is not a PlanInput"))
}

/// Builtin tables with the clock pinned to 2025-01-01T12:00:00Z.
pub fn fixed_compiler() -> PlanCompiler {
    let instant = Utc
        .with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
        .single()
        .expect("valid instant");
    PlanCompiler::builtin().with_clock(Arc::new(FixedClock(instant)))
}

/// Point the city template loader at the LIS override fixture.
pub fn ensure_override_templates() {
    INIT.call_once(|| {
        let templates_path = fixture_path("city_templates_override.json");

        debug_assert!(
            templates_path.exists(),
            "missing override templates at {}",
            templates_path.display()
        );

        std::env::set_var("PLAN72_CITY_TEMPLATES_PATH", &templates_path);
    });
}
