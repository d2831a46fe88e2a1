//! Mesh generation behind the [`MeshGenerator`] seam.
//!
//! The crate ships [`ProceduralMesher`], which writes a kind-specific
//! Wavefront OBJ template. A text-to-3D backend plugs in by implementing
//! the same trait. [`CachedMesher`] wraps any generator with a
//! description-keyed file cache.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::content::builtin_meshes;
use crate::{ForgeError, Result};

const BASE_KEYWORDS: [&str; 5] = [
    "3D model",
    "detailed geometry",
    "game asset",
    "high poly mesh",
    "textured surface",
];
const WEAPON_WORDS: [&str; 5] = ["sword", "axe", "staff", "dagger", "hammer"];
const MATERIAL_WORDS: [&str; 4] = ["steel", "iron", "crystal", "wood"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    pub resolution: u32,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub output_format: String,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            resolution: 512,
            num_inference_steps: 50,
            guidance_scale: 7.5,
            output_format: "obj".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshKind {
    Sword,
    Axe,
    Staff,
    Dagger,
    Mace,
    Shield,
    Orb,
    Wand,
}

impl MeshKind {
    /// Detection order matters: "warhammer" is a mace, "crystal blade" a sword.
    const KEYWORDS: [(MeshKind, &'static [&'static str]); 8] = [
        (MeshKind::Sword, &["sword", "blade", "claymore"]),
        (MeshKind::Axe, &["axe", "hatchet"]),
        (MeshKind::Staff, &["staff", "rod"]),
        (MeshKind::Dagger, &["dagger", "knife"]),
        (MeshKind::Mace, &["mace", "hammer", "warhammer"]),
        (MeshKind::Shield, &["shield"]),
        (MeshKind::Orb, &["orb", "crystal", "sphere"]),
        (MeshKind::Wand, &["wand", "scepter"]),
    ];

    pub fn detect(prompt: &str) -> Self {
        let lowered = prompt.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
            .map(|(kind, _)| *kind)
            .unwrap_or(MeshKind::Sword)
    }

    pub fn name(self) -> &'static str {
        match self {
            MeshKind::Sword => "sword",
            MeshKind::Axe => "axe",
            MeshKind::Staff => "staff",
            MeshKind::Dagger => "dagger",
            MeshKind::Mace => "mace",
            MeshKind::Shield => "shield",
            MeshKind::Orb => "orb",
            MeshKind::Wand => "wand",
        }
    }
}

/// Append 3D-oriented keywords to a weapon description.
pub fn enhance_prompt(description: &str) -> String {
    let lowered = description.to_lowercase();
    let mut keywords: Vec<&str> = BASE_KEYWORDS.to_vec();
    if WEAPON_WORDS.iter().any(|w| lowered.contains(w)) {
        keywords.extend(["weapon model", "combat ready", "medieval weapon"]);
    }
    if MATERIAL_WORDS.iter().any(|w| lowered.contains(w)) {
        keywords.push("realistic materials");
    }
    format!(
        "{}. High quality {} suitable for game engine.",
        description,
        keywords.join(", ")
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshOutcome {
    pub path: PathBuf,
    pub kind: MeshKind,
    pub bytes: u64,
    pub cached: bool,
}

pub trait MeshGenerator: Send {
    fn generate(&mut self, description: &str, output_path: &Path) -> Result<MeshOutcome>;

    fn backend(&self) -> &'static str;

    fn settings(&self) -> &MeshSettings;
}

pub struct ProceduralMesher {
    settings: MeshSettings,
    templates: HashMap<&'static str, &'static str>,
}

impl ProceduralMesher {
    pub fn new(settings: MeshSettings) -> Self {
        Self { settings, templates: builtin_meshes() }
    }

    pub fn render_obj(&self, prompt: &str, kind: MeshKind, stamp: DateTime<Utc>) -> String {
        let body = self
            .templates
            .get(kind.name())
            .or_else(|| self.templates.get(MeshKind::Sword.name()))
            .copied()
            .unwrap_or_default();
        let prompt = prompt.replace(['\r', '\n'], " ");
        format!(
            "# Armory Weapon Model\n# Description: {}\n# Weapon Type: {}\n# Generated: {}\n# Generator: procedural ({}x{}, {} steps)\n\n{}",
            prompt,
            kind.name(),
            stamp.format("%Y-%m-%d %H:%M:%S"),
            self.settings.resolution,
            self.settings.resolution,
            self.settings.num_inference_steps,
            body
        )
    }
}

impl MeshGenerator for ProceduralMesher {
    fn generate(&mut self, description: &str, output_path: &Path) -> Result<MeshOutcome> {
        let prompt = enhance_prompt(description);
        let kind = MeshKind::detect(&prompt);
        let obj = self.render_obj(&prompt, kind, Utc::now());
        fs::write(output_path, &obj).map_err(|e| ForgeError::MeshGeneration {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(path = %output_path.display(), kind = kind.name(), "wrote procedural mesh");
        Ok(MeshOutcome {
            path: output_path.to_path_buf(),
            kind,
            bytes: obj.len() as u64,
            cached: false,
        })
    }

    fn backend(&self) -> &'static str {
        "procedural"
    }

    fn settings(&self) -> &MeshSettings {
        &self.settings
    }
}

pub fn cache_key(description: &str) -> String {
    Sha256::digest(description.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

pub struct CachedMesher<G> {
    inner: G,
    cache_dir: PathBuf,
}

impl<G: MeshGenerator> CachedMesher<G> {
    pub fn new(inner: G, cache_dir: impl Into<PathBuf>) -> Self {
        Self { inner, cache_dir: cache_dir.into() }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, description: &str) -> PathBuf {
        self.cache_dir.join(format!(
            "{}.{}",
            cache_key(description),
            self.inner.settings().output_format
        ))
    }

    fn store(&self, cache_path: &Path, output_path: &Path) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        fs::copy(output_path, cache_path)?;
        Ok(())
    }

    /// Remove every cached mesh. Returns how many files were deleted.
    pub fn clear(&self) -> Result<usize> {
        if !self.cache_dir.exists() {
            return Ok(0);
        }
        let ext = self.inner.settings().output_format.as_str();
        let mut removed = 0;
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(ext) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        info!(removed, "cleared mesh cache");
        Ok(removed)
    }
}

impl<G: MeshGenerator> MeshGenerator for CachedMesher<G> {
    fn generate(&mut self, description: &str, output_path: &Path) -> Result<MeshOutcome> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let cache_path = self.cache_path(description);
        if cache_path.is_file() {
            let bytes = if same_file(&cache_path, output_path) {
                fs::metadata(&cache_path)?.len()
            } else {
                fs::copy(&cache_path, output_path)?
            };
            debug!(path = %output_path.display(), "mesh cache hit");
            return Ok(MeshOutcome {
                path: output_path.to_path_buf(),
                kind: MeshKind::detect(&enhance_prompt(description)),
                bytes,
                cached: true,
            });
        }

        let outcome = self.inner.generate(description, output_path)?;
        if !output_path.is_file() {
            return Err(ForgeError::MeshGeneration {
                path: output_path.to_path_buf(),
                reason: "generator reported success but wrote no file".to_string(),
            });
        }
        if let Err(e) = self.store(&cache_path, output_path) {
            warn!(error = %e, "failed to cache mesh");
        }
        Ok(outcome)
    }

    fn backend(&self) -> &'static str {
        self.inner.backend()
    }

    fn settings(&self) -> &MeshSettings {
        self.inner.settings()
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_follows_keyword_order() {
        assert_eq!(MeshKind::detect("a crystal blade"), MeshKind::Sword);
        assert_eq!(MeshKind::detect("an iron warhammer"), MeshKind::Mace);
        assert_eq!(MeshKind::detect("a focus crystal"), MeshKind::Orb);
        assert_eq!(MeshKind::detect("storm rod"), MeshKind::Staff);
        assert_eq!(MeshKind::detect("a tome of secrets"), MeshKind::Sword);
    }

    #[test]
    fn enhanced_prompt_adds_context_keywords() {
        let p = enhance_prompt("A steel sword");
        assert!(p.starts_with("A steel sword. High quality 3D model"));
        assert!(p.contains("combat ready"));
        assert!(p.contains("realistic materials"));

        let plain = enhance_prompt("A glowing tome");
        assert!(!plain.contains("combat ready"));
        assert!(!plain.contains("realistic materials"));
    }

    #[test]
    fn cache_key_is_hex_sha256() {
        let key = cache_key("abc");
        assert_eq!(key.len(), 64);
        assert!(key.starts_with("ba7816bf"));
    }
}
