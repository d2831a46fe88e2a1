//! Personality presets: the configuration bundles that bias weapon sampling.
//!
//! The builtin table ships with the crate; deployments can layer a JSON or
//! YAML file on top of it. Lookups for unknown names fall back to
//! [`DEFAULT_PERSONALITY`].

use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::content::builtin_personalities;
use crate::{ForgeError, Result};

pub const DEFAULT_PERSONALITY: &str = "aggressive_warrior";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityPreset {
    pub weapon_types: Vec<String>,
    pub materials: Vec<String>,
    pub effects: Vec<String>,
    pub descriptors: Vec<String>,
    pub damage_modifier: f64,
    pub speed_modifier: f64,
}

impl PersonalityPreset {
    pub fn validate(&self, name: &str) -> Result<()> {
        let lists = [
            ("weapon_types", &self.weapon_types),
            ("materials", &self.materials),
            ("effects", &self.effects),
            ("descriptors", &self.descriptors),
        ];
        for (label, list) in lists {
            if list.is_empty() {
                return Err(ForgeError::InvalidPreset {
                    name: name.to_string(),
                    reason: format!("{} is empty", label),
                });
            }
        }
        for (label, value) in [
            ("damage_modifier", self.damage_modifier),
            ("speed_modifier", self.speed_modifier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ForgeError::InvalidPreset {
                    name: name.to_string(),
                    reason: format!("{} must be positive, got {}", label, value),
                });
            }
        }
        Ok(())
    }

    pub fn components(&self) -> WeaponComponents {
        WeaponComponents {
            weapon_types: self.weapon_types.clone(),
            materials: self.materials.clone(),
            effects: self.effects.clone(),
            descriptors: self.descriptors.clone(),
        }
    }
}

/// The sampleable lists of a preset, without its modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeaponComponents {
    pub weapon_types: Vec<String>,
    pub materials: Vec<String>,
    pub effects: Vec<String>,
    pub descriptors: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PresetTable {
    presets: IndexMap<String, PersonalityPreset>,
}

impl PresetTable {
    pub fn builtin() -> Result<Self> {
        Self::from_json(builtin_personalities())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let presets: IndexMap<String, PersonalityPreset> = serde_json::from_str(text)?;
        Self::from_map(presets)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let presets: IndexMap<String, PersonalityPreset> = serde_yaml::from_str(text)?;
        Self::from_map(presets)
    }

    fn from_map(presets: IndexMap<String, PersonalityPreset>) -> Result<Self> {
        for (name, preset) in &presets {
            preset.validate(name)?;
        }
        Ok(Self { presets })
    }

    /// Merge a preset file over this table. Same-named presets are replaced,
    /// new ones are appended. A missing file merges nothing.
    pub fn load_overrides(&mut self, path: &Path) -> Result<usize> {
        if !path.exists() {
            return Ok(0);
        }
        let text = fs::read_to_string(path)?;
        let overrides = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text)?,
            _ => Self::from_json(&text)?,
        };
        let count = overrides.presets.len();
        self.merge(overrides);
        info!(path = %path.display(), count, "loaded personality overrides");
        Ok(count)
    }

    pub fn merge(&mut self, other: PresetTable) {
        for (name, preset) in other.presets {
            self.presets.insert(name, preset);
        }
    }

    pub fn insert(&mut self, name: &str, preset: PersonalityPreset) -> Result<()> {
        preset.validate(name)?;
        self.presets.insert(name.to_string(), preset);
        info!(personality = name, "added personality preset");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PersonalityPreset> {
        self.presets.get(name)
    }

    /// The named preset, or the default preset for unknown names.
    pub fn resolve(&self, name: &str) -> Result<&PersonalityPreset> {
        if let Some(preset) = self.presets.get(name) {
            return Ok(preset);
        }
        warn!(personality = name, fallback = DEFAULT_PERSONALITY, "unknown personality");
        self.presets
            .get(DEFAULT_PERSONALITY)
            .ok_or_else(|| ForgeError::InvalidPreset {
                name: DEFAULT_PERSONALITY.to_string(),
                reason: "default preset missing from table".to_string(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    /// Component lists for `name`; all lists are empty when it is unknown.
    pub fn components(&self, name: &str) -> WeaponComponents {
        self.presets
            .get(name)
            .map(PersonalityPreset::components)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
