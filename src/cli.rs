use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::auth::{Credentials, Token};
use crate::config::Config;
use crate::normalize::BuildId;
use crate::output::{self, StepProgress};
use crate::providers::jenkins::JobAction;
use crate::providers::{GitHubClient, JenkinsClient, JenkinsProvider, JobRegistry};
use crate::synthesis::{JobParameters, TestSpec, TestType};

#[derive(Parser)]
#[command(name = "jenkins-dash")]
#[command(author, version, about = "Jenkins job dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./jenkins-dash.{toml,json,yaml,yml})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Print normalized results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    #[arg(long, global = true, env = "JENKINS_URL")]
    url: Option<String>,

    #[arg(short, long, global = true, env = "JENKINS_USERNAME")]
    user: Option<String>,

    /// Jenkins API token (a password also works, the crumb session cookie is kept)
    #[arg(short, long, global = true, env = "JENKINS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, global = true, env = "GITHUB_API_URL")]
    github_api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create (or reconfigure) a job for a repository branch and trigger it
    CreateJob {
        /// Repository clone URL
        #[arg(short, long)]
        repo: String,

        /// Git user owning the repository credentials
        #[arg(short = 'g', long)]
        git_user: String,

        #[arg(long, env = "GIT_TOKEN", hide_env_values = true)]
        git_token: String,

        #[arg(short, long, default_value = "main")]
        branch: String,

        /// Notification recipients, comma separated
        #[arg(short, long)]
        email: String,

        /// Shell command installed as the job's build step
        #[arg(long)]
        test_command: Option<String>,

        /// Skip the GitHub user check
        #[arg(long, default_value_t = false)]
        no_validate: bool,
    },

    /// List locally recorded jobs
    List,

    /// Summaries of the job's named builds
    Info { job: String },

    /// Details of one build
    Build {
        job: String,

        /// Build number or selector (latest, latest-failed, ...)
        #[arg(short, long, default_value = "latest")]
        build: BuildId,
    },

    /// All builds of a job, newest first
    Builds { job: String },

    /// Console text of one build
    Console {
        job: String,

        #[arg(short, long, default_value = "latest")]
        build: BuildId,
    },

    /// Replace the job's build steps with a test runner
    ConfigureTests {
        job: String,

        #[arg(long, value_enum)]
        test_type: TestType,

        /// Test file or directory passed to the runner
        #[arg(short, long)]
        location: String,

        /// Do not trigger a build after reconfiguring
        #[arg(long, default_value_t = false)]
        no_trigger: bool,
    },

    /// Trigger a build
    Trigger { job: String },

    /// Delete a job on Jenkins and its local record
    Delete { job: String },
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let config = Config::load(self.config.as_deref()).context("Failed to load configuration")?;
        Ok(config.with_overrides(
            self.url.clone(),
            self.user.clone(),
            self.token.clone(),
            self.github_api_url.clone(),
        ))
    }

    fn build_provider(&self, config: &Config, validate_users: bool) -> Result<JenkinsProvider> {
        let credentials = match (&config.jenkins.username, &config.jenkins.token) {
            (Some(username), Some(token)) => {
                Some(Credentials::new(username.as_str(), Token::from(token.as_str())))
            }
            _ => None,
        };

        let client = JenkinsClient::new(&config.jenkins.url, credentials)
            .with_context(|| format!("Invalid Jenkins URL: {}", config.jenkins.url))?;

        let github = if validate_users && config.github.validate_users {
            Some(GitHubClient::new(&config.github.api_url)?)
        } else {
            None
        };

        let registry = JobRegistry::new(config.registry.path.clone(), config.registry.enabled)
            .context("Failed to open job registry")?;

        Ok(JenkinsProvider::new(
            client,
            github,
            registry,
            config.templates.job_template.clone(),
        ))
    }

    /// Prints `value` as JSON when `--json` is set, otherwise the rendered text.
    fn emit<T: Serialize>(&self, value: &T, render: impl FnOnce() -> String) -> Result<()> {
        let text = if self.json {
            output::to_json(value, self.pretty)?
        } else {
            render()
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, text)?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{}", text.trim_end_matches('\n'));
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn execute_create_job(
        &self,
        config: &Config,
        repo: &str,
        git_user: &str,
        git_token: &str,
        branch: &str,
        email: &str,
        test_command: Option<&str>,
        no_validate: bool,
    ) -> Result<()> {
        let mut provider = self.build_provider(config, !no_validate)?;

        let mut params = JobParameters::new(repo, git_user, branch, email);
        if let Some(command) = test_command {
            params = params.with_test_command(command);
        }

        let progress = StepProgress::start(&format!("Creating {}", params.job_name()));
        let (record, action) = match provider.create_job(&params, &Token::from(git_token)).await {
            Ok(created) => created,
            Err(e) => {
                progress.fail("Job creation failed");
                return Err(e.into());
            }
        };
        progress.finish("Job ready");

        let reconfigured = action == JobAction::Reconfigured;
        self.emit(&record, || {
            output::render_created(&record, reconfigured, &config.jenkins.url)
        })
    }

    async fn execute_configure_tests(
        &self,
        provider: &JenkinsProvider,
        job: &str,
        test_type: TestType,
        location: &str,
        no_trigger: bool,
    ) -> Result<()> {
        let spec = TestSpec::new(test_type, location);
        let progress = StepProgress::start(&format!("Configuring tests for {job}"));
        match provider.configure_tests(job, &spec, !no_trigger).await {
            Ok(_) => progress.finish("Tests configured"),
            Err(e) => {
                progress.fail("Test configuration failed");
                return Err(e.into());
            }
        }

        self.emit(&spec, || {
            format!(
                "{} {}",
                output::muted("Build step:"),
                spec.command().lines().last().unwrap_or_default()
            )
        })
    }

    pub async fn execute(&self) -> Result<()> {
        let config = self.load_config()?;
        let now = Utc::now();

        match &self.command {
            Commands::CreateJob {
                repo,
                git_user,
                git_token,
                branch,
                email,
                test_command,
                no_validate,
            } => {
                self.execute_create_job(
                    &config,
                    repo,
                    git_user,
                    git_token,
                    branch,
                    email,
                    test_command.as_deref(),
                    *no_validate,
                )
                .await
            }
            Commands::List => {
                let provider = self.build_provider(&config, false)?;
                if let Some(path) = provider.registry().path() {
                    info!("Listing jobs recorded in: {}", path.display());
                }
                let records = provider.registry().list();
                self.emit(&records, || {
                    output::render_jobs(&records, &config.jenkins.url, now)
                })
            }
            Commands::Info { job } => {
                let provider = self.build_provider(&config, false)?;
                info!("Fetching build summaries for job: {job}");
                let summaries = provider.job_info(job).await?;
                self.emit(&summaries, || output::render_job_info(job, &summaries, now))
            }
            Commands::Build { job, build } => {
                let provider = self.build_provider(&config, false)?;
                let detail = provider.build_detail(job, *build).await?;
                self.emit(&detail, || {
                    output::render_build_detail(job, *build, &detail, &config.jenkins.url, now)
                })
            }
            Commands::Builds { job } => {
                let provider = self.build_provider(&config, false)?;
                let builds = provider.builds(job).await?;
                self.emit(&builds, || output::render_builds(job, &builds))
            }
            Commands::Console { job, build } => {
                let provider = self.build_provider(&config, false)?;
                let console = provider.console(job, *build).await;
                self.emit(&console, || output::render_console(&console))
            }
            Commands::ConfigureTests {
                job,
                test_type,
                location,
                no_trigger,
            } => {
                let provider = self.build_provider(&config, false)?;
                self.execute_configure_tests(&provider, job, *test_type, location, *no_trigger)
                    .await
            }
            Commands::Trigger { job } => {
                let provider = self.build_provider(&config, false)?;
                provider.trigger(job).await?;
                info!("Triggered build for job: {job}");
                self.emit(&serde_json::json!({ "job": job, "triggered": true }), || {
                    format!("{} {job}", output::muted("Build triggered for"))
                })
            }
            Commands::Delete { job } => {
                let mut provider = self.build_provider(&config, false)?;
                let removed = provider.delete_job(job).await?;
                self.emit(&removed, || match &removed {
                    Some(record) => format!("{} {}", output::muted("Deleted"), record.job_name),
                    None => format!("{} {job} (no local record)", output::muted("Deleted")),
                })
            }
        }
    }
}
