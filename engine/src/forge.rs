//! The weapon-generation request flow: resolve each player's preset, sample
//! components, name and describe the weapon, roll stats, and assign the mesh
//! file it will be written to.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::arena::DEFAULT_ARENA;
use crate::describe::DescriptionWriter;
use crate::naming::weapon_name;
use crate::personality::{PersonalityPreset, PresetTable};
use crate::stats::{roll_stats, Rarity};
use crate::{ForgeError, Result, Roller};

pub const DEFAULT_BATCH_SIZE: usize = 4;
pub const DOWNLOAD_PREFIX: &str = "/download/weapon";

fn default_arena() -> String {
    DEFAULT_ARENA.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub player1_personality: String,
    pub player2_personality: String,
    #[serde(default = "default_arena")]
    pub arena_theme: String,
}

impl BatchRequest {
    pub fn new(p1: &str, p2: &str, arena_theme: &str) -> Self {
        Self {
            player1_personality: p1.to_string(),
            player2_personality: p2.to_string(),
            arena_theme: arena_theme.to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.player1_personality.trim().is_empty() {
            return Err(ForgeError::InvalidRequest(
                "missing required field: player1_personality".to_string(),
            ));
        }
        if self.player2_personality.trim().is_empty() {
            return Err(ForgeError::InvalidRequest(
                "missing required field: player2_personality".to_string(),
            ));
        }
        Ok(())
    }
}

/// One sampled value from each component list of a preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponParts {
    pub weapon_type: String,
    pub material: String,
    pub effect: String,
    pub descriptor: String,
}

impl WeaponParts {
    pub fn sample(roller: &mut Roller, name: &str, preset: &PersonalityPreset) -> Result<Self> {
        Ok(Self {
            weapon_type: pick(roller, name, &preset.weapon_types, "weapon types")?,
            material: pick(roller, name, &preset.materials, "materials")?,
            effect: pick(roller, name, &preset.effects, "effects")?,
            descriptor: pick(roller, name, &preset.descriptors, "descriptors")?,
        })
    }
}

fn pick(roller: &mut Roller, name: &str, list: &[String], label: &'static str) -> Result<String> {
    roller
        .pick(list)
        .cloned()
        .ok_or_else(|| ForgeError::EmptyComponent(name.to_string(), label))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponRecord {
    #[serde(rename = "weaponName", default)]
    pub weapon_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "fileLocation", default)]
    pub file_location: String,
    #[serde(rename = "webPath", default)]
    pub web_path: String,
    #[serde(rename = "generatedAt", default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub speed: i32,
    #[serde(default)]
    pub player: u8,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub arena_theme: String,
    #[serde(default)]
    pub weapon_type: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub descriptor: String,
    #[serde(default)]
    pub rarity: Option<Rarity>,
}

impl WeaponRecord {
    pub fn file_name(&self) -> Option<String> {
        Path::new(&self.file_location)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }
}

pub fn weapon_file_name(timestamp: i64, index: usize, format: &str) -> String {
    format!("weapon_{}_{}.{}", timestamp, index, format)
}

pub fn web_path_for(file_name: &str) -> String {
    format!("{}/{}", DOWNLOAD_PREFIX, file_name)
}

pub struct WeaponForge {
    presets: PresetTable,
    writer: Box<dyn DescriptionWriter>,
    roller: Roller,
    output_dir: PathBuf,
    format: String,
    batch_size: usize,
}

impl WeaponForge {
    pub fn new(presets: PresetTable, writer: Box<dyn DescriptionWriter>, roller: Roller) -> Self {
        Self {
            presets,
            writer,
            roller,
            output_dir: PathBuf::from("generated_weapons"),
            format: "obj".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_output(mut self, output_dir: impl Into<PathBuf>, format: &str) -> Self {
        self.output_dir = output_dir.into();
        self.format = format.to_string();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    pub fn presets_mut(&mut self) -> &mut PresetTable {
        &mut self.presets
    }

    pub fn writer_backend(&self) -> &'static str {
        self.writer.backend()
    }

    pub fn writer_available(&self) -> bool {
        self.writer.is_available()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Generate a single weapon for `player` from the named personality.
    pub fn forge_one(&mut self, personality: &str, arena_theme: &str, player: u8) -> Result<WeaponRecord> {
        let preset = self.presets.resolve(personality)?;
        let parts = WeaponParts::sample(&mut self.roller, personality, preset)?;
        let stats = roll_stats(&mut self.roller, preset);
        let weapon_name = weapon_name(&mut self.roller, &parts);
        let description = self.writer.describe(&mut self.roller, &parts, arena_theme);
        debug!(%weapon_name, player, personality, "forged weapon");

        Ok(WeaponRecord {
            weapon_name,
            description,
            file_location: String::new(),
            web_path: String::new(),
            generated_at: None,
            damage: stats.damage,
            speed: stats.speed,
            player,
            personality: personality.to_string(),
            arena_theme: arena_theme.to_string(),
            weapon_type: parts.weapon_type,
            material: parts.material,
            effect: parts.effect,
            descriptor: parts.descriptor,
            rarity: Some(stats.rarity),
        })
    }

    /// Player 1 gets the larger half of an odd batch and always comes first.
    pub fn forge_batch(&mut self, request: &BatchRequest, stamp: DateTime<Utc>) -> Result<Vec<WeaponRecord>> {
        request.validate()?;
        if self.batch_size == 0 {
            return Err(ForgeError::InvalidRequest("batch size must be at least 1".to_string()));
        }
        let first_half = self.batch_size.div_ceil(2);
        let timestamp = stamp.timestamp();

        let mut weapons = Vec::with_capacity(self.batch_size);
        for index in 0..self.batch_size {
            let (player, personality) = if index < first_half {
                (1, request.player1_personality.as_str())
            } else {
                (2, request.player2_personality.as_str())
            };
            let mut weapon = self.forge_one(personality, &request.arena_theme, player)?;
            let file_name = weapon_file_name(timestamp, index, &self.format);
            weapon.file_location = self.output_dir.join(&file_name).to_string_lossy().into_owned();
            weapon.web_path = web_path_for(&file_name);
            weapon.generated_at = Some(stamp);
            weapons.push(weapon);
        }

        info!(
            count = weapons.len(),
            p1 = %request.player1_personality,
            p2 = %request.player2_personality,
            arena = %request.arena_theme,
            "forged weapon batch"
        );
        Ok(weapons)
    }
}
