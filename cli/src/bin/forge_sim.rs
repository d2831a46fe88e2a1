use std::collections::BTreeMap;
use std::{fs, path::Path, path::PathBuf};

use anyhow::Context;
use armory::describe::TemplateWriter;
use armory::{BatchRequest, PresetTable, Rarity, Roller, WeaponForge};
use chrono::Utc;
use clap::Parser;
use encoding_rs::Encoding;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "forge-sim")]
#[command(about = "Monte Carlo sim: stat spread of many batches for a personality pair")]
struct Args {
    #[arg(long, default_value = "aggressive_warrior")]
    player1: String,

    #[arg(long, default_value = "defensive_guardian")]
    player2: String,

    #[arg(long, default_value = "medieval")]
    arena: String,

    /// Number of batches to forge
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// Weapons per batch
    #[arg(long, default_value_t = 4)]
    batch_size: usize,

    /// RNG seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Optional personality presets (JSON, or YAML by extension) merged over the builtins
    #[arg(long)]
    personalities: Option<PathBuf>,
}

#[derive(Default)]
struct Tally {
    weapons: u32,
    damage_total: i64,
    speed_total: i64,
    damage_min: Option<i32>,
    damage_max: Option<i32>,
    rarities: BTreeMap<Rarity, u32>,
    types: BTreeMap<String, u32>,
}

impl Tally {
    fn add(&mut self, damage: i32, speed: i32, rarity: Option<Rarity>, weapon_type: &str) {
        self.weapons += 1;
        self.damage_total += damage as i64;
        self.speed_total += speed as i64;
        self.damage_min = Some(self.damage_min.map_or(damage, |d| d.min(damage)));
        self.damage_max = Some(self.damage_max.map_or(damage, |d| d.max(damage)));
        if let Some(r) = rarity {
            *self.rarities.entry(r).or_default() += 1;
        }
        *self.types.entry(weapon_type.to_string()).or_default() += 1;
    }

    fn mean(total: i64, n: u32) -> f64 {
        if n == 0 { 0.0 } else { total as f64 / n as f64 }
    }

    fn print(&self, label: &str, personality: &str) {
        println!("{} ({})", label, personality);
        println!("  weapons:          {}", self.weapons);
        println!(
            "  avg damage:       {:.2} (min {}, max {})",
            Self::mean(self.damage_total, self.weapons),
            self.damage_min.unwrap_or(0),
            self.damage_max.unwrap_or(0)
        );
        println!("  avg speed:        {:.2}", Self::mean(self.speed_total, self.weapons));
        for rarity in [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary] {
            let n = self.rarities.get(&rarity).copied().unwrap_or(0);
            let pct = if self.weapons == 0 {
                0.0
            } else {
                n as f64 * 100.0 / self.weapons as f64
            };
            println!("  {:<17} {:.1}%", format!("{}:", rarity.name()), pct);
        }
        if let Some((kind, n)) = self.types.iter().max_by_key(|(_, n)| **n) {
            println!("  favourite type:   {} ({})", kind, n);
        }
    }
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn load_presets(path: Option<&Path>) -> anyhow::Result<PresetTable> {
    let mut presets = PresetTable::builtin()?;
    if let Some(path) = path {
        let text = read_text_auto(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let extra = if is_yaml {
            PresetTable::from_yaml(&text)
        } else {
            PresetTable::from_json(&text)
        }
        .with_context(|| format!("failed to parse presets in {}", path.display()))?;
        presets.merge(extra);
    }
    Ok(presets)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.batch_size == 0 {
        anyhow::bail!("--batch-size must be at least 1");
    }

    let presets = load_presets(args.personalities.as_deref())?;
    let writer = TemplateWriter::builtin()?;
    let mut forge = WeaponForge::new(presets, Box::new(writer), Roller::from_seed(args.seed))
        .with_batch_size(args.batch_size);
    let request = BatchRequest::new(&args.player1, &args.player2, &args.arena);

    let mut p1 = Tally::default();
    let mut p2 = Tally::default();
    let stamp = Utc::now();
    for _ in 0..args.trials {
        for weapon in forge.forge_batch(&request, stamp)? {
            let tally = if weapon.player == 1 { &mut p1 } else { &mut p2 };
            tally.add(weapon.damage, weapon.speed, weapon.rarity, &weapon.weapon_type);
        }
    }

    println!("forge-sim results");
    println!("-----------------");
    println!("trials:             {}", args.trials);
    println!("batch size:         {}", args.batch_size);
    println!("arena:              {}", args.arena);
    println!();
    p1.print("player 1", &args.player1);
    println!();
    p2.print("player 2", &args.player2);

    Ok(())
}
