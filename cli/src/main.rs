use std::{fs, path::PathBuf};

use anyhow::Context;
use armory::api::Armory;
use armory::config::ForgeConfig;
use armory::{BatchRequest, WeaponRecord};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Subcommand)]
enum Cmd {
    /// Generate a batch of weapons for two personalities
    Generate {
        #[arg(long, default_value = "aggressive_warrior")]
        player1: String,
        #[arg(long, default_value = "defensive_guardian")]
        player2: String,
        /// Arena theme (medieval, volcanic, ice, forest, desert, shadow)
        #[arg(long, default_value = "medieval")]
        arena: String,
        /// RNG seed for determinism (overrides config)
        #[arg(long)]
        seed: Option<u64>,
        /// Also write a mesh for every weapon
        #[arg(long, default_value_t = false)]
        models: bool,
    },
    /// Write a mesh for a single description
    CreateModel {
        #[arg(long)]
        description: String,
        /// Output path (defaults to the output directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write meshes for weapons listed in a JSON file
    BatchCreate {
        /// JSON array of weapons, or an object with a `weapons` array
        #[arg(long)]
        file: PathBuf,
    },
    /// List generated mesh files, newest first
    List,
    /// Generation, file and system stats
    Stats,
    /// Delete a generated weapon by id (file name without extension)
    Delete { weapon_id: String },
    /// Zip every generated mesh
    Bundle,
    /// List personality presets
    Personalities,
    /// Show the component lists of a personality
    Components { personality: String },
    /// Remove every cached mesh
    ClearCache,
    /// Report backend health
    Health,
    /// Submit and run a tracked job, then print its final status
    Job {
        #[arg(long, default_value = "aggressive_warrior")]
        player1: String,
        #[arg(long, default_value = "defensive_guardian")]
        player2: String,
        #[arg(long, default_value = "medieval")]
        arena: String,
        /// Delete the job's files after reporting
        #[arg(long, default_value_t = false)]
        cleanup: bool,
    },
}

#[derive(Parser)]
#[command(name = "armory")]
#[command(about = "Personality-driven weapon generator")]
struct Cli {
    /// YAML or JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeaponFile {
    List(Vec<WeaponRecord>),
    Wrapped { weapons: Vec<WeaponRecord> },
}

impl WeaponFile {
    fn into_weapons(self) -> Vec<WeaponRecord> {
        match self {
            WeaponFile::List(w) | WeaponFile::Wrapped { weapons: w } => w,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ForgeConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Cmd::Generate { seed: Some(seed), .. } = &cli.cmd {
        config.seed = Some(*seed);
    }
    let mut armory = Armory::from_config(config)?;

    match cli.cmd {
        Cmd::Generate {
            player1,
            player2,
            arena,
            models,
            ..
        } => {
            let request = BatchRequest::new(&player1, &player2, &arena);
            let report = if models {
                armory.generate_with_models(&request)?
            } else {
                armory.generate(&request)?
            };
            print_json(&report)?;
        }
        Cmd::CreateModel { description, output } => {
            print_json(&armory.create_model(&description, output.as_deref())?)?;
        }
        Cmd::BatchCreate { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let weapons = serde_json::from_str::<WeaponFile>(&text)
                .with_context(|| format!("failed to parse weapons in {}", file.display()))?
                .into_weapons();
            if weapons.is_empty() {
                anyhow::bail!("no weapons provided");
            }
            print_json(&armory.batch_create(&weapons))?;
        }
        Cmd::List => {
            let weapons = armory.list()?;
            print_json(&serde_json::json!({ "count": weapons.len(), "weapons": weapons }))?;
        }
        Cmd::Stats => print_json(&armory.stats_report()?)?,
        Cmd::Delete { weapon_id } => {
            let path = armory.delete(&weapon_id)?;
            print_json(&serde_json::json!({
                "message": format!("Weapon {} deleted successfully", weapon_id),
                "path": path,
            }))?;
        }
        Cmd::Bundle => {
            let path = armory.bundle()?;
            print_json(&serde_json::json!({ "bundle": path }))?;
        }
        Cmd::Personalities => print_json(&armory.personalities())?,
        Cmd::Components { personality } => print_json(&armory.components(&personality))?,
        Cmd::ClearCache => {
            let removed = armory.clear_cache()?;
            print_json(&serde_json::json!({ "removed": removed }))?;
        }
        Cmd::Health => print_json(&armory.health())?,
        Cmd::Job {
            player1,
            player2,
            arena,
            cleanup,
        } => {
            let job_id = armory.submit_job(BatchRequest::new(&player1, &player2, &arena));
            let status = armory.run_job(&job_id)?;
            print_json(&status)?;
            if cleanup {
                print_json(&armory.cleanup_job(&job_id)?)?;
            }
        }
    }
    Ok(())
}
