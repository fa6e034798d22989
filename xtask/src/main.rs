use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use serde_json::Value as JsonValue;

const SCHEMA_DIR: &str = "schemas";
const FIXTURE_GLOB: &str = "integration_tests/tests/fixtures/*.json";

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("export-schemas") => export_schemas(),
        Some("check-fixtures") => check_fixtures(),
        Some("help") | None => {
            print_usage();
            Ok(())
        }
        Some(cmd) => {
            eprintln!("Unknown xtask '{cmd}'.");
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: cargo xtask export-schemas");
    eprintln!("       cargo xtask check-fixtures");
    eprintln!("       cargo xtask help");
}

fn schemas() -> Result<Vec<(&'static str, JsonValue)>, Box<dyn Error>> {
    Ok(vec![
        (
            "plan_input.schema.json",
            serde_json::to_value(plan_schema::plan_input_schema())?,
        ),
        (
            "plan_output.schema.json",
            serde_json::to_value(plan_schema::plan_output_schema())?,
        ),
    ])
}

fn export_schemas() -> Result<(), Box<dyn Error>> {
    let dir = Path::new(SCHEMA_DIR);
    fs::create_dir_all(dir)?;

    for (file_name, schema) in schemas()? {
        let dest = dir.join(file_name);
        fs::write(&dest, serde_json::to_string_pretty(&schema)?)?;
        println!("Wrote {}", dest.display());
    }
    Ok(())
}

/// Validate every PlanInput fixture. Stored profiles are validated on their
/// `input` member; other JSON documents (override tables) are skipped.
fn check_fixtures() -> Result<(), Box<dyn Error>> {
    let input_schema = serde_json::to_value(plan_schema::plan_input_schema())?;
    let compiled = JSONSchema::compile(&input_schema)
        .map_err(|err| format!("plan input schema failed to compile: {err}"))?;

    let mut failures = 0usize;
    let mut checked = 0usize;
    for entry in glob::glob(FIXTURE_GLOB)? {
        let path: PathBuf = entry?;
        let document: JsonValue = serde_json::from_str(&fs::read_to_string(&path)?)?;

        let Some(candidate) = plan_input_candidate(&document) else {
            continue;
        };
        // Legacy profiles predate `scenarios`; normalize before validating.
        let candidate = lift_legacy_scenario(candidate.clone());

        checked += 1;
        if let Err(errors) = compiled.validate(&candidate) {
            failures += 1;
            for error in errors {
                eprintln!("{}: {} at {}", path.display(), error, error.instance_path);
            }
        };
    }

    if failures > 0 {
        return Err(format!("{failures} fixture(s) failed schema validation").into());
    }
    println!("Validated {checked} fixture(s)");
    Ok(())
}

fn plan_input_candidate(document: &JsonValue) -> Option<&JsonValue> {
    if document.get("city").is_some() {
        Some(document)
    } else {
        document.get("input").filter(|input| input.get("city").is_some())
    }
}

fn lift_legacy_scenario(mut input: JsonValue) -> JsonValue {
    if let Some(object) = input.as_object_mut() {
        if !object.contains_key("scenarios") {
            let scenarios = match object.remove("scenario") {
                Some(single) => JsonValue::Array(vec![single]),
                None => JsonValue::Array(vec![JsonValue::String("UNK".to_string())]),
            };
            object.insert("scenarios".to_string(), scenarios);
        }
        object
            .entry("country")
            .or_insert_with(|| JsonValue::String("Unknown".to_string()));
    }
    input
}
