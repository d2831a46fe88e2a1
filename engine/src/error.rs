use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("invalid personality preset '{name}': {reason}")]
    InvalidPreset { name: String, reason: String },

    #[error("personality '{0}' has no {1} to choose from")]
    EmptyComponent(String, &'static str),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid weapon id '{0}'")]
    InvalidWeaponId(String),

    #[error("weapon '{0}' not found")]
    WeaponNotFound(String),

    #[error("job '{0}' not found")]
    JobNotFound(String),

    #[error("text model error: {0}")]
    TextModel(String),

    #[error("mesh generation failed for {path}: {reason}")]
    MeshGeneration { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
