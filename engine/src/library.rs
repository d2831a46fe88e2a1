//! The generated-weapon gallery: listing, stats, deletion, download
//! resolution and zip bundles over the output directory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use zip::write::SimpleFileOptions;

use crate::forge::web_path_for;
use crate::{ForgeError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponFile {
    pub filename: String,
    pub file_path: String,
    pub web_path: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileStats {
    pub total_files: usize,
    pub total_size: u64,
    pub oldest_file: Option<String>,
    pub newest_file: Option<String>,
}

pub struct WeaponLibrary {
    root: PathBuf,
    format: String,
}

impl WeaponLibrary {
    pub fn new(root: impl Into<PathBuf>, format: &str) -> Self {
        Self { root: root.into(), format: format.to_string() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Mesh files in the output directory, newest first.
    pub fn list(&self) -> Result<Vec<WeaponFile>> {
        let mut weapons = Vec::new();
        if !self.root.is_dir() {
            return Ok(weapons);
        }
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !self.is_mesh(&path) {
                continue;
            }
            let meta = fs::metadata(&path)?;
            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            let created = meta.created().unwrap_or(modified);
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            weapons.push(WeaponFile {
                web_path: web_path_for(&filename),
                file_path: path.to_string_lossy().into_owned(),
                filename,
                size: meta.len(),
                created_at: created.into(),
                modified_at: modified.into(),
            });
        }
        weapons.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.filename.cmp(&a.filename))
        });
        Ok(weapons)
    }

    pub fn file_stats(&self) -> Result<FileStats> {
        let weapons = self.list()?;
        Ok(FileStats {
            total_files: weapons.len(),
            total_size: weapons.iter().map(|w| w.size).sum(),
            oldest_file: weapons.last().map(|w| w.filename.clone()),
            newest_file: weapons.first().map(|w| w.filename.clone()),
        })
    }

    /// Delete `{weapon_id}.{format}`.
    pub fn delete(&self, weapon_id: &str) -> Result<PathBuf> {
        if !is_plain_name(weapon_id) {
            return Err(ForgeError::InvalidWeaponId(weapon_id.to_string()));
        }
        let path = self.root.join(format!("{}.{}", weapon_id, self.format));
        if !path.is_file() {
            return Err(ForgeError::WeaponNotFound(weapon_id.to_string()));
        }
        fs::remove_file(&path)?;
        info!(weapon = weapon_id, "deleted weapon");
        Ok(path)
    }

    /// Path of an existing file inside the output directory.
    pub fn resolve_download(&self, filename: &str) -> Result<PathBuf> {
        if !is_plain_name(filename) {
            return Err(ForgeError::InvalidWeaponId(filename.to_string()));
        }
        let path = self.root.join(filename);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ForgeError::WeaponNotFound(filename.to_string()))
        }
    }

    /// Zip every mesh file into `armory_weapons_{unix}.zip` in the output
    /// directory.
    pub fn bundle(&self, stamp: DateTime<Utc>) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let zip_path = self
            .root
            .join(format!("armory_weapons_{}.zip", stamp.timestamp()));
        let weapons = self.list()?;

        let file = File::create(&zip_path)?;
        let mut zip = zip::ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default();
        for weapon in &weapons {
            zip.start_file(weapon.filename.as_str(), options)?;
            zip.write_all(&fs::read(&weapon.file_path)?)?;
        }
        zip.finish()?.flush()?;

        info!(path = %zip_path.display(), files = weapons.len(), "bundled weapons");
        Ok(zip_path)
    }

    fn is_mesh(&self, path: &Path) -> bool {
        path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(self.format.as_str())
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && !name.contains("..")
}
