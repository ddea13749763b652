use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{DashError, Result};
use crate::synthesis::JobParameters;

/// Local mirror of a job created through jenkins-dash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_name: String,
    pub git_repo: String,
    pub git_user: String,
    pub branch: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn from_params(params: &JobParameters, created_at: DateTime<Utc>) -> Self {
        Self {
            job_name: params.job_name(),
            git_repo: params.repo_url.clone(),
            git_user: params.repo_user.clone(),
            branch: params.branch_name.clone(),
            email: params.notify_email.clone(),
            created_at,
        }
    }
}

/// Job records keyed by job name, persisted as a JSON file.
///
/// Default locations:
/// - Linux: `~/.local/share/jenkins-dash/jobs.json`
/// - macOS: `~/Library/Application Support/jenkins-dash/jobs.json`
///
/// A disabled registry accepts every call and stores nothing.
pub struct JobRegistry {
    file: PathBuf,
    jobs: IndexMap<String, JobRecord>,
    enabled: bool,
}

impl JobRegistry {
    /// Opens the registry at `path`, or at the platform default location.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory can be determined or the parent
    /// directory cannot be created.
    pub fn new(path: Option<PathBuf>, enabled: bool) -> Result<Self> {
        if !enabled {
            debug!("Job registry disabled");
            return Ok(Self {
                file: PathBuf::new(),
                jobs: IndexMap::new(),
                enabled: false,
            });
        }

        let file = match path {
            Some(path) => path,
            None => dirs::data_dir()
                .ok_or_else(|| DashError::Registry("No data directory found".into()))?
                .join("jenkins-dash")
                .join("jobs.json"),
        };

        Self::open(file)
    }

    fn open(file: PathBuf) -> Result<Self> {
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }

        let jobs = if file.exists() {
            fs::read_to_string(&file)
                .ok()
                .and_then(|content| serde_json::from_str(&content).ok())
                .inspect(|_| debug!("Loaded job registry from: {}", file.display()))
                .unwrap_or_else(|| {
                    warn!("Failed to load job registry, starting empty");
                    IndexMap::new()
                })
        } else {
            IndexMap::new()
        };

        info!("Job registry at: {}", file.display());

        Ok(Self {
            file,
            jobs,
            enabled: true,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.enabled.then_some(self.file.as_path())
    }

    pub fn get(&self, job_name: &str) -> Option<&JobRecord> {
        self.jobs.get(job_name)
    }

    /// Records in insertion order.
    pub fn list(&self) -> Vec<&JobRecord> {
        self.jobs.values().collect()
    }

    /// Inserts or updates a record. An existing record keeps its original
    /// creation time.
    pub fn upsert(&mut self, mut record: JobRecord) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if let Some(existing) = self.get(&record.job_name) {
            debug!("Updating job record {}", record.job_name);
            record.created_at = existing.created_at;
        }

        self.jobs.insert(record.job_name.clone(), record);
        self.save()
    }

    pub fn remove(&mut self, job_name: &str) -> Result<Option<JobRecord>> {
        if !self.enabled {
            return Ok(None);
        }

        let removed = self.jobs.shift_remove(job_name);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.jobs)?;
        fs::write(&self.file, content)?;

        debug!(
            "Saved {} job records to: {}",
            self.jobs.len(),
            self.file.display()
        );

        Ok(())
    }
}
