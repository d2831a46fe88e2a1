use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::forge::DEFAULT_BATCH_SIZE;
use crate::llm::LlmConfig;
use crate::mesh::MeshSettings;
use crate::{ForgeError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ForgeConfig {
    pub output_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub max_weapons_per_request: usize,
    pub personalities_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub mesh: MeshSettings,
    pub llm: Option<LlmConfig>,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./generated_weapons"),
            cache_dir: PathBuf::from("./model_cache"),
            max_weapons_per_request: DEFAULT_BATCH_SIZE,
            personalities_path: Some(PathBuf::from("config/personalities.json")),
            seed: None,
            mesh: MeshSettings::default(),
            llm: None,
        }
    }
}

impl ForgeConfig {
    /// Read a YAML (or JSON, which YAML accepts) config file, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => {
                let text = fs::read_to_string(p)?;
                serde_yaml::from_str(&text)?
            }
            None => ForgeConfig::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup("WEAPON_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("ARMORY_CACHE_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("ARMORY_PERSONALITIES") {
            self.personalities_path = Some(PathBuf::from(path));
        }
        if let Some(seed) = lookup("ARMORY_SEED") {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| ForgeError::InvalidConfig(format!("ARMORY_SEED is not a u64: {}", seed)))?;
            self.seed = Some(seed);
        }
        if let Some(url) = lookup("ARMORY_LLM_URL") {
            self.llm.get_or_insert_with(LlmConfig::default).base_url = url;
        }
        if let Some(model) = lookup("ARMORY_LLM_MODEL") {
            self.llm.get_or_insert_with(LlmConfig::default).model = Some(model);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_weapons_per_request == 0 {
            return Err(ForgeError::InvalidConfig(
                "max_weapons_per_request must be at least 1".to_string(),
            ));
        }
        if self.mesh.output_format != "obj" {
            return Err(ForgeError::InvalidConfig(format!(
                "unsupported mesh output format '{}'",
                self.mesh.output_format
            )));
        }
        if self.mesh.resolution == 0 || self.mesh.num_inference_steps == 0 {
            return Err(ForgeError::InvalidConfig(
                "mesh resolution and inference steps must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
