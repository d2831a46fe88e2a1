use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ForgeConfig;
use crate::describe::{DescriptionWriter, TemplateWriter};
use crate::forge::{web_path_for, BatchRequest, WeaponForge, WeaponRecord};
use crate::jobs::{CleanupReport, JobBoard, JobStatus};
use crate::library::{FileStats, WeaponFile, WeaponLibrary};
use crate::llm::{LlmClient, LlmWriter};
use crate::mesh::{CachedMesher, MeshGenerator, MeshKind, MeshSettings, ProceduralMesher};
use crate::personality::{PersonalityPreset, PresetTable, WeaponComponents};
use crate::tracker::GenerationStats;
use crate::Roller;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerateConfig {
    pub player1_personality: String,
    pub player2_personality: String,
    #[serde(default)]
    pub arena_theme: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub with_models: bool,
    #[serde(default)]
    pub config: Option<ForgeConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub weapons: Vec<WeaponRecord>,
    pub generation_time: f64,
    pub arena_theme: String,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<BatchReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub status: String,
    pub model_path: String,
    pub web_path: String,
    pub generation_time: f64,
    pub kind: MeshKind,
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub weapon_name: String,
    pub status: String,
    pub model_path: Option<String>,
    pub web_path: Option<String>,
    pub generation_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_time: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: Vec<BatchItem>,
    pub summary: BatchSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub models_loaded: bool,
    pub text_backend: String,
    pub mesh_backend: String,
    pub timestamp: DateTime<Utc>,
    pub stats: GenerationStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemStats {
    pub text_backend: String,
    pub mesh_backend: String,
    pub mesh_settings: MeshSettings,
    pub cache_dir: String,
    pub personalities: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub generation_stats: GenerationStats,
    pub file_stats: FileStats,
    pub system_stats: SystemStats,
}

/// Owns everything one deployment needs: presets, writer, mesher, the
/// output library, running stats and the job board.
pub struct Armory {
    config: ForgeConfig,
    forge: WeaponForge,
    mesher: CachedMesher<ProceduralMesher>,
    library: WeaponLibrary,
    stats: GenerationStats,
    jobs: JobBoard,
}

impl Armory {
    pub fn from_config(config: ForgeConfig) -> Result<Self> {
        config.validate().context("invalid armory configuration")?;

        let mut presets = PresetTable::builtin().context("failed to parse builtin personalities")?;
        if let Some(path) = &config.personalities_path {
            if let Err(e) = presets.load_overrides(path) {
                warn!(path = %path.display(), error = %e, "ignoring personality overrides");
            }
        }

        let templates = TemplateWriter::builtin().context("failed to parse builtin arenas")?;
        let writer: Box<dyn DescriptionWriter> = match &config.llm {
            Some(llm) => {
                let client = LlmClient::new(llm.clone()).context("failed to build text model client")?;
                Box::new(LlmWriter::new(client, templates))
            }
            None => Box::new(templates),
        };

        let roller = match config.seed {
            Some(seed) => Roller::from_seed(seed),
            None => Roller::from_entropy(),
        };
        let format = config.mesh.output_format.clone();
        let forge = WeaponForge::new(presets, writer, roller)
            .with_output(&config.output_dir, &format)
            .with_batch_size(config.max_weapons_per_request);
        let mesher = CachedMesher::new(ProceduralMesher::new(config.mesh.clone()), &config.cache_dir);
        let library = WeaponLibrary::new(&config.output_dir, &format);

        info!(
            output = %config.output_dir.display(),
            text = forge.writer_backend(),
            mesh = mesher.backend(),
            "armory ready"
        );
        Ok(Self {
            config,
            forge,
            mesher,
            library,
            stats: GenerationStats::default(),
            jobs: JobBoard::default(),
        })
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    pub fn generate(&mut self, request: &BatchRequest) -> Result<GenerateReport> {
        let start = Instant::now();
        let stamp = Utc::now();
        let weapons = match self.forge.forge_batch(request, stamp) {
            Ok(w) => w,
            Err(e) => {
                self.stats.record_failure(stamp);
                return Err(e).context("failed to generate weapons");
            }
        };
        let elapsed = start.elapsed();
        self.stats.record_batch(&weapons, elapsed, &request.arena_theme, stamp);
        info!(
            count = weapons.len(),
            secs = elapsed.as_secs_f64(),
            "generated weapon scenarios"
        );
        Ok(GenerateReport {
            weapons,
            generation_time: elapsed.as_secs_f64(),
            arena_theme: request.arena_theme.clone(),
            timestamp: stamp.timestamp(),
            models: None,
        })
    }

    /// Generate a batch and immediately write a mesh for every weapon.
    pub fn generate_with_models(&mut self, request: &BatchRequest) -> Result<GenerateReport> {
        let mut report = self.generate(request)?;
        report.models = Some(self.batch_create(&report.weapons));
        Ok(report)
    }

    pub fn create_model(&mut self, description: &str, output_path: Option<&Path>) -> Result<ModelReport> {
        if description.trim().is_empty() {
            bail!("missing required field: description");
        }
        let path = match output_path.filter(|p| !p.as_os_str().is_empty()) {
            Some(p) => p.to_path_buf(),
            None => self.default_model_path(Utc::now()),
        };
        let start = Instant::now();
        let outcome = self
            .mesher
            .generate(description, &path)
            .with_context(|| format!("failed to generate model at {}", path.display()))?;
        Ok(ModelReport {
            status: "completed".to_string(),
            model_path: path.to_string_lossy().into_owned(),
            web_path: web_path_for(&file_name_of(&path)),
            generation_time: start.elapsed().as_secs_f64(),
            kind: outcome.kind,
            cached: outcome.cached,
        })
    }

    /// Mesh every weapon in order. A failed weapon is reported, not fatal.
    pub fn batch_create(&mut self, weapons: &[WeaponRecord]) -> BatchReport {
        let start = Instant::now();
        let mut results = Vec::with_capacity(weapons.len());
        for (i, weapon) in weapons.iter().enumerate() {
            let weapon_name = if weapon.weapon_name.is_empty() {
                format!("Weapon_{}", i)
            } else {
                weapon.weapon_name.clone()
            };
            info!(n = i + 1, total = weapons.len(), weapon = %weapon_name, "meshing weapon");
            let item_start = Instant::now();
            let outcome = if weapon.file_location.is_empty() {
                Err(anyhow::anyhow!("weapon has no fileLocation"))
            } else {
                self.mesher
                    .generate(&weapon.description, Path::new(&weapon.file_location))
                    .map_err(anyhow::Error::from)
            };
            let generation_time = item_start.elapsed().as_secs_f64();
            results.push(match outcome {
                Ok(_) => BatchItem {
                    weapon_name,
                    status: "completed".to_string(),
                    model_path: Some(weapon.file_location.clone()),
                    web_path: (!weapon.web_path.is_empty()).then(|| weapon.web_path.clone()),
                    generation_time,
                    error: None,
                },
                Err(e) => {
                    warn!(weapon = %weapon_name, error = %e, "mesh generation failed");
                    BatchItem {
                        weapon_name,
                        status: "failed".to_string(),
                        model_path: None,
                        web_path: None,
                        generation_time,
                        error: Some(e.to_string()),
                    }
                }
            });
        }

        let successful = results.iter().filter(|r| r.status == "completed").count();
        let summary = BatchSummary {
            total: weapons.len(),
            successful,
            failed: weapons.len() - successful,
            total_time: start.elapsed().as_secs_f64(),
        };
        info!(successful, total = summary.total, "batch meshing finished");
        BatchReport { results, summary }
    }

    pub fn health(&self) -> HealthReport {
        let models_loaded = self.forge.writer_available();
        if !models_loaded {
            warn!(backend = self.forge.writer_backend(), "text model unreachable");
        }
        HealthReport {
            status: if models_loaded { "healthy" } else { "initializing" }.to_string(),
            models_loaded,
            text_backend: self.forge.writer_backend().to_string(),
            mesh_backend: self.mesher.backend().to_string(),
            timestamp: Utc::now(),
            stats: self.stats.clone(),
        }
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    pub fn stats_report(&self) -> Result<StatsReport> {
        let file_stats = self.library.file_stats().context("failed to scan weapon files")?;
        Ok(StatsReport {
            generation_stats: self.stats.clone(),
            file_stats,
            system_stats: SystemStats {
                text_backend: self.forge.writer_backend().to_string(),
                mesh_backend: self.mesher.backend().to_string(),
                mesh_settings: self.mesher.settings().clone(),
                cache_dir: self.mesher.cache_dir().to_string_lossy().into_owned(),
                personalities: self.forge.presets().len(),
            },
        })
    }

    pub fn list(&self) -> Result<Vec<WeaponFile>> {
        self.library.list().context("failed to list weapons")
    }

    pub fn delete(&self, weapon_id: &str) -> Result<PathBuf> {
        Ok(self.library.delete(weapon_id)?)
    }

    pub fn resolve_download(&self, filename: &str) -> Result<PathBuf> {
        Ok(self.library.resolve_download(filename)?)
    }

    pub fn bundle(&self) -> Result<PathBuf> {
        self.library.bundle(Utc::now()).context("failed to build weapon bundle")
    }

    pub fn clear_cache(&self) -> Result<usize> {
        self.mesher.clear().context("failed to clear mesh cache")
    }

    pub fn personalities(&self) -> Vec<String> {
        self.forge.presets().names()
    }

    pub fn personality(&self, name: &str) -> Option<&PersonalityPreset> {
        self.forge.presets().get(name)
    }

    pub fn components(&self, name: &str) -> WeaponComponents {
        self.forge.presets().components(name)
    }

    pub fn add_personality(&mut self, name: &str, preset: PersonalityPreset) -> Result<()> {
        Ok(self.forge.presets_mut().insert(name, preset)?)
    }

    pub fn submit_job(&mut self, request: BatchRequest) -> String {
        self.jobs.submit(request)
    }

    pub fn run_job(&mut self, job_id: &str) -> Result<JobStatus> {
        Ok(self.jobs.run(job_id, &mut self.forge, &mut self.mesher)?)
    }

    pub fn job_status(&self, job_id: &str) -> Result<JobStatus> {
        Ok(self.jobs.status(job_id)?)
    }

    pub fn cleanup_job(&mut self, job_id: &str) -> Result<CleanupReport> {
        Ok(self.jobs.cleanup(job_id)?)
    }

    fn default_model_path(&self, stamp: DateTime<Utc>) -> PathBuf {
        self.config.output_dir.join(format!(
            "weapon_{}.{}",
            stamp.timestamp(),
            self.config.mesh.output_format
        ))
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One-shot generation from a self-contained config, for callers that do
/// not keep an [`Armory`] alive between requests.
pub fn generate_weapons(cfg: GenerateConfig) -> Result<GenerateReport> {
    let mut config = cfg.config.unwrap_or_default();
    if cfg.seed.is_some() {
        config.seed = cfg.seed;
    }
    let mut armory = Armory::from_config(config)?;
    let request = BatchRequest {
        player1_personality: cfg.player1_personality,
        player2_personality: cfg.player2_personality,
        arena_theme: cfg
            .arena_theme
            .unwrap_or_else(|| crate::arena::DEFAULT_ARENA.to_string()),
    };
    if cfg.with_models {
        armory.generate_with_models(&request)
    } else {
        armory.generate(&request)
    }
}
