use std::path::PathBuf;

use chrono::Utc;
use indexmap::IndexMap;
use log::{info, warn};

use crate::auth::Token;
use crate::error::{DashError, Result};
use crate::normalize::{
    to_build_detail, to_build_list, to_build_summary, to_console_output, BuildDetail, BuildId,
    BuildRef, BuildSelector, BuildSummary, ConsoleOutput,
};
use crate::providers::github::GitHubClient;
use crate::synthesis::{install_test_step, synthesize, JobConfigDocument, JobParameters, TestSpec};

use super::client::JenkinsClient;
use super::registry::{JobRecord, JobRegistry};

/// Outcome of [`JenkinsProvider::create_job`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobAction {
    Created,
    Reconfigured,
}

/// Jenkins job operations.
///
/// Derives job parameters, synthesizes configurations, talks to Jenkins and
/// keeps the local [`JobRegistry`] in step with the server.
pub struct JenkinsProvider {
    client: JenkinsClient,
    github: Option<GitHubClient>,
    registry: JobRegistry,
    job_template: PathBuf,
}

impl JenkinsProvider {
    /// # Arguments
    ///
    /// * `client` - Jenkins API client
    /// * `github` - GitHub client for user validation, `None` to skip it
    /// * `registry` - Local job record store
    /// * `job_template` - Path to the `config.xml` template
    pub fn new(
        client: JenkinsClient,
        github: Option<GitHubClient>,
        registry: JobRegistry,
        job_template: PathBuf,
    ) -> Self {
        Self {
            client,
            github,
            registry,
            job_template,
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Creates (or reconfigures) the job for `params`, triggers its first
    /// build and records it locally.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the git user does not exist on GitHub (when validation is enabled)
    /// - the template cannot be read or synthesized
    /// - any Jenkins request fails
    pub async fn create_job(
        &mut self,
        params: &JobParameters,
        git_token: &Token,
    ) -> Result<(JobRecord, JobAction)> {
        let job_name = params.job_name();
        info!("Creating job {job_name} for {}", params.repo_url);

        if let Some(github) = &self.github {
            if !github.user_exists(&params.repo_user).await? {
                return Err(DashError::GitHubUserNotFound(params.repo_user.clone()));
            }
            info!("GitHub user {} exists", params.repo_user);
        }

        self.client
            .create_credentials(&params.credential_id, &params.repo_user, git_token)
            .await?;

        let template = std::fs::read_to_string(&self.job_template)?;
        let config = synthesize(&template, params)?;

        let action = if self.client.job_exists(&job_name).await? {
            self.client.reconfigure_job(&job_name, &config).await?;
            JobAction::Reconfigured
        } else {
            self.client.create_job(&job_name, &config).await?;
            JobAction::Created
        };

        self.client.trigger_build(&job_name).await?;

        let record = JobRecord::from_params(params, Utc::now());
        self.registry.upsert(record.clone())?;

        Ok((record, action))
    }

    /// Summaries of every named build alias the job currently has.
    ///
    /// Aliases Jenkins does not resolve (e.g. no failed build yet) are
    /// omitted. Entries keep the order of [`BuildSelector::ALL`].
    pub async fn job_info(&self, job: &str) -> Result<IndexMap<BuildSelector, BuildSummary>> {
        let fetches = BuildSelector::ALL.map(|selector| async move {
            let raw = self
                .client
                .fetch_build(job, BuildId::Selector(selector))
                .await?;
            raw.map(|raw| to_build_summary(&raw).map(|summary| (selector, summary)))
                .transpose()
        });

        let results = futures::future::join_all(fetches).await;

        results
            .into_iter()
            .filter_map(Result::transpose)
            .collect::<Result<_>>()
    }

    pub async fn build_detail(&self, job: &str, build: BuildId) -> Result<BuildDetail> {
        let raw = self
            .client
            .fetch_build(job, build)
            .await?
            .ok_or_else(|| DashError::JobNotFound(format!("{job} {build}")))?;
        to_build_detail(&raw)
    }

    /// Console text of a build. Failures are reported inside the
    /// [`ConsoleOutput`] rather than as an error.
    pub async fn console(&self, job: &str, build: BuildId) -> ConsoleOutput {
        to_console_output(self.client.fetch_console(job, build).await)
    }

    pub async fn builds(&self, job: &str) -> Result<Vec<BuildRef>> {
        let raw = self.client.fetch_builds(job).await?;
        to_build_list(&raw)
    }

    /// Replaces the job's build steps with a test-runner step.
    pub async fn configure_tests(
        &self,
        job: &str,
        spec: &TestSpec,
        trigger: bool,
    ) -> Result<JobConfigDocument> {
        let current = self.client.fetch_job_config(job).await?;
        let config = install_test_step(&current, spec)?;
        self.client.reconfigure_job(job, &config).await?;

        if trigger {
            self.client.trigger_build(job).await?;
        }

        Ok(config)
    }

    pub async fn trigger(&self, job: &str) -> Result<()> {
        self.client.trigger_build(job).await
    }

    /// Deletes the job on Jenkins and drops its local record. A job already
    /// gone from Jenkins is still removed locally.
    pub async fn delete_job(&mut self, job: &str) -> Result<Option<JobRecord>> {
        match self.client.delete_job(job).await {
            Ok(()) => {}
            Err(DashError::JobNotFound(_)) => warn!("Job {job} not found on Jenkins"),
            Err(e) => return Err(e),
        }
        self.registry.remove(job)
    }
}
