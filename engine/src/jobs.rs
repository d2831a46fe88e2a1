//! Tracked generation jobs: a batch plus its meshes, with coarse progress
//! reporting so a game client can poll while meshes are written.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::forge::{BatchRequest, WeaponForge, WeaponRecord};
use crate::mesh::MeshGenerator;
use crate::{ForgeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Queued,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobStatus {
    pub job_id: String,
    pub status: JobState,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapons: Option<Vec<WeaponRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

struct Job {
    status: JobStatus,
    request: BatchRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub deleted_files: Vec<String>,
    pub job_removed: bool,
}

#[derive(Default)]
pub struct JobBoard {
    jobs: IndexMap<String, Job>,
}

impl JobBoard {
    pub fn submit(&mut self, request: BatchRequest) -> String {
        let job_id = Uuid::new_v4().to_string();
        let status = JobStatus {
            job_id: job_id.clone(),
            status: JobState::Queued,
            progress: 0,
            created_at: Utc::now(),
            weapons: None,
            error: None,
        };
        self.jobs.insert(job_id.clone(), Job { status, request });
        info!(job = %job_id, "job queued");
        job_id
    }

    /// Run a queued job to completion. Generation failures end the job in
    /// the failed state; only an unknown id is an error.
    pub fn run(
        &mut self,
        job_id: &str,
        forge: &mut WeaponForge,
        mesher: &mut dyn MeshGenerator,
    ) -> Result<JobStatus> {
        let job = self
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| ForgeError::JobNotFound(job_id.to_string()))?;
        job.status.status = JobState::Processing;
        job.status.progress = 10;
        job.status.weapons = None;
        job.status.error = None;

        match produce(&mut job.status, &job.request, forge, mesher) {
            Ok(weapons) => {
                job.status.status = JobState::Completed;
                job.status.progress = 100;
                job.status.weapons = Some(weapons);
                info!(job = job_id, "job completed");
            }
            Err(e) => {
                job.status.status = JobState::Failed;
                job.status.error = Some(e.to_string());
                error!(job = job_id, error = %e, "job failed");
            }
        }
        Ok(job.status.clone())
    }

    pub fn status(&self, job_id: &str) -> Result<JobStatus> {
        self.jobs
            .get(job_id)
            .map(|j| j.status.clone())
            .ok_or_else(|| ForgeError::JobNotFound(job_id.to_string()))
    }

    /// Delete the job's mesh files and forget the job.
    pub fn cleanup(&mut self, job_id: &str) -> Result<CleanupReport> {
        let job = self
            .jobs
            .shift_remove(job_id)
            .ok_or_else(|| ForgeError::JobNotFound(job_id.to_string()))?;

        let mut deleted_files = Vec::new();
        for weapon in job.status.weapons.iter().flatten() {
            let path = Path::new(&weapon.file_location);
            if path.is_file() {
                fs::remove_file(path)?;
                if let Some(name) = weapon.file_name() {
                    deleted_files.push(name);
                }
            }
        }
        info!(job = job_id, deleted = deleted_files.len(), "job cleaned up");
        Ok(CleanupReport { deleted_files, job_removed: true })
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

fn produce(
    status: &mut JobStatus,
    request: &BatchRequest,
    forge: &mut WeaponForge,
    mesher: &mut dyn MeshGenerator,
) -> Result<Vec<WeaponRecord>> {
    let weapons = forge.forge_batch(request, Utc::now())?;
    for (i, weapon) in weapons.iter().enumerate() {
        status.progress = progress_step(10 + 20 * i);
        mesher.generate(&weapon.description, Path::new(&weapon.file_location))?;
        status.progress = progress_step(30 + 17 * i);
    }
    Ok(weapons)
}

fn progress_step(value: usize) -> u8 {
    value.min(99) as u8
}
