use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file structure for jenkins-dash.
///
/// Holds the Jenkins connection, GitHub validation settings, template
/// location and registry settings. Loaded once at startup and passed to the
/// components that need it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub jenkins: JenkinsConfig,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub templates: TemplateConfig,

    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JenkinsConfig {
    /// Jenkins base URL
    #[serde(default = "default_jenkins_url")]
    pub url: String,

    /// User the API token belongs to
    pub username: Option<String>,

    /// Jenkins API token
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// GitHub API base URL used for user validation
    #[serde(default = "default_github_api_url")]
    pub api_url: String,

    /// Check that the git user exists on GitHub before creating a job
    #[serde(default = "default_true")]
    pub validate_users: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TemplateConfig {
    /// Path to the job `config.xml` template
    #[serde(default = "default_job_template")]
    pub job_template: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryConfig {
    /// Mirror job records locally
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Registry file, defaults to the platform data directory
    pub path: Option<PathBuf>,
}

impl Default for JenkinsConfig {
    fn default() -> Self {
        Self {
            url: default_jenkins_url(),
            username: None,
            token: None,
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            validate_users: true,
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            job_template: default_job_template(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

fn default_jenkins_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_job_template() -> PathBuf {
    PathBuf::from("job_template.xml")
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./jenkins-dash.toml
    /// 3. ./jenkins-dash.json
    /// 4. ./jenkins-dash.yaml
    /// 5. ./jenkins-dash.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = [
            "jenkins-dash.toml",
            "jenkins-dash.json",
            "jenkins-dash.yaml",
            "jenkins-dash.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Applies command-line and environment overrides on top of the file.
    pub fn with_overrides(
        mut self,
        url: Option<String>,
        username: Option<String>,
        token: Option<String>,
        github_api_url: Option<String>,
    ) -> Self {
        if let Some(url) = url {
            self.jenkins.url = url;
        }
        if username.is_some() {
            self.jenkins.username = username;
        }
        if token.is_some() {
            self.jenkins.token = token;
        }
        if let Some(api_url) = github_api_url {
            self.github.api_url = api_url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.jenkins.url, "http://localhost:8080");
        assert!(config.jenkins.token.is_none());
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert!(config.github.validate_users);
        assert_eq!(config.templates.job_template, PathBuf::from("job_template.xml"));
        assert!(config.registry.enabled);
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[jenkins]
url = "https://ci.example.com"
username = "admin"
token = "11aa22bb"

[github]
validate-users = false

[templates]
job-template = "/etc/jenkins-dash/job.xml"

[registry]
path = "/tmp/jobs.json"
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.jenkins.url, "https://ci.example.com");
        assert_eq!(config.jenkins.username.as_deref(), Some("admin"));
        assert_eq!(config.jenkins.token.as_deref(), Some("11aa22bb"));
        assert!(!config.github.validate_users);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(
            config.templates.job_template,
            PathBuf::from("/etc/jenkins-dash/job.xml")
        );
        assert_eq!(config.registry.path, Some(PathBuf::from("/tmp/jobs.json")));
        assert!(config.registry.enabled);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "jenkins": {
    "url": "https://jenkins.json.com",
    "username": "bot"
  },
  "registry": {
    "enabled": false
  }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.jenkins.url, "https://jenkins.json.com");
        assert_eq!(config.jenkins.username.as_deref(), Some("bot"));
        assert!(!config.registry.enabled);
    }

    #[test]
    fn test_load_yaml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".yaml").unwrap();
        write!(temp_file, "github:\n  api-url: https://ghe.example.com/api/v3\n").unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.jenkins.url, "http://localhost:8080");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = Config::load(Some(Path::new("does-not-exist.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config::default().with_overrides(
            Some("https://override".to_string()),
            None,
            Some("tok".to_string()),
            None,
        );
        assert_eq!(config.jenkins.url, "https://override");
        assert!(config.jenkins.username.is_none());
        assert_eq!(config.jenkins.token.as_deref(), Some("tok"));
    }
}
