use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use plan_core::{format_timestamp, plan_digest, Clock, PlanCompiler, PlanInputOverrides, SystemClock};
use plan_runtime::{
    parse_coordinate, parse_level, parse_moment, parse_resource_node, parse_scenarios, PlanInput,
    PlanOutput, SavedProfile, FALLBACK_COUNTRY,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compile Plan72 emergency protocols", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a plan input read from a JSON file (or stdin when omitted)
    Compile {
        /// Path to a PlanInput JSON document
        #[arg(long, conflicts_with = "profile")]
        input: Option<PathBuf>,

        /// Path to a stored profile ({ input, savedAt }); legacy profiles accepted
        #[arg(long)]
        profile: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Compile a plan seeded from a city preset
    Preset {
        /// City id, e.g. BCN
        city: String,

        /// Scenario codes (e.g. "nuk,air")
        #[arg(long)]
        scenarios: Option<String>,

        /// PRE or POST
        #[arg(long)]
        moment: Option<String>,

        /// BASIC, STANDARD or ADVANCED
        #[arg(long)]
        level: Option<String>,

        #[arg(long)]
        people: Option<u32>,

        #[arg(long)]
        country: Option<String>,

        /// Start point (format: lat,lng[,label])
        #[arg(long)]
        start: Option<String>,

        /// Resource node (format: label@lat,lng:TYPES); repeatable
        #[arg(long = "node")]
        nodes: Vec<String>,

        /// Write the resolved input as a stored profile before compiling
        #[arg(long)]
        save_profile: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the city presets available to the compiler
    Cities,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write the plan here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the plan content digest to stderr
    #[arg(long)]
    digest: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let compiler = PlanCompiler::from_env();

    match cli.command {
        Command::Compile {
            input,
            profile,
            output,
        } => {
            let plan_input = match (input, profile) {
                (_, Some(path)) => read_profile(&compiler, &path)?,
                (Some(path), None) => {
                    let json = fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read input at {}", path.display()))?;
                    parse_input(&json)
                        .with_context(|| format!("Failed to parse input at {}", path.display()))?
                }
                (None, None) => {
                    let mut json = String::new();
                    io::stdin()
                        .read_to_string(&mut json)
                        .with_context(|| "Failed to read input from stdin")?;
                    parse_input(&json).with_context(|| "Failed to parse input from stdin")?
                }
            };
            emit(&compiler, &plan_input, &output)
        }
        Command::Preset {
            city,
            scenarios,
            moment,
            level,
            people,
            country,
            start,
            nodes,
            save_profile,
            output,
        } => {
            let overrides = PlanInputOverrides {
                country,
                start: start
                    .as_deref()
                    .map(parse_coordinate)
                    .transpose()
                    .with_context(|| "Invalid --start")?,
                people_count: people,
                scenarios: scenarios
                    .as_deref()
                    .map(parse_scenarios)
                    .transpose()
                    .with_context(|| "Invalid --scenarios")?,
                moment: moment
                    .as_deref()
                    .map(parse_moment)
                    .transpose()
                    .with_context(|| "Invalid --moment")?,
                level: level
                    .as_deref()
                    .map(parse_level)
                    .transpose()
                    .with_context(|| "Invalid --level")?,
                resource_nodes: parse_nodes(&nodes)?,
                ..PlanInputOverrides::default()
            };
            let plan_input = compiler.templates().preset_input(&city, overrides);

            if let Some(path) = save_profile {
                let saved_at = format_timestamp(SystemClock::new().now());
                let profile = SavedProfile::new(plan_input.clone(), Some(saved_at));
                fs::write(&path, profile.to_json_string()?)
                    .with_context(|| format!("Failed to write profile to {}", path.display()))?;
                info!(path = %path.display(), "profile saved");
            }

            emit(&compiler, &plan_input, &output)
        }
        Command::Cities => {
            for template in compiler.templates().iter() {
                println!(
                    "{}\t{}\t{}",
                    template.city,
                    template.label,
                    template.country.as_deref().unwrap_or(FALLBACK_COUNTRY)
                );
            }
            Ok(())
        }
    }
}

fn parse_input(json: &str) -> Result<PlanInput> {
    Ok(serde_json::from_str(json)?)
}

fn read_profile(compiler: &PlanCompiler, path: &Path) -> Result<PlanInput> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile at {}", path.display()))?;
    let profile = SavedProfile::from_json_str(&json)
        .with_context(|| format!("Failed to parse profile at {}", path.display()))?;
    let mut input = profile.input;

    // Legacy profiles carry no country; prefer the preset's over the placeholder.
    if input.country == FALLBACK_COUNTRY {
        if let Some(country) = compiler
            .templates()
            .lookup(&input.city)
            .and_then(|template| template.country.clone())
        {
            input.country = country;
        }
    }
    Ok(input)
}

fn parse_nodes(raw_nodes: &[String]) -> Result<Option<Vec<plan_runtime::ResourceNode>>> {
    if raw_nodes.is_empty() {
        return Ok(None);
    }
    raw_nodes
        .iter()
        .enumerate()
        .map(|(position, raw)| {
            parse_resource_node(raw, position)
                .with_context(|| format!("Invalid --node '{}'", raw))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn emit(compiler: &PlanCompiler, input: &PlanInput, output: &OutputArgs) -> Result<()> {
    let plan: PlanOutput = compiler.generate_plan(input);
    let json = serde_json::to_string_pretty(&plan)?;

    if output.digest {
        eprintln!("digest: {:016x}", plan_digest(&plan)?);
    }

    match &output.out {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write plan to {}", path.display()))?;
            info!(
                plan_id = %plan.meta.id,
                cards = plan.scenario_cards.len(),
                path = %path.display(),
                "plan written"
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
