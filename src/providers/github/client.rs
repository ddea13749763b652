use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{DashError, Result};

/// GitHub REST client used to validate git users before a job is created.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL (e.g., "https://api.github.com")
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .user_agent(concat!("jenkins-dash/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| DashError::Config(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(base_url)
            .map_err(|e| DashError::Config(format!("Invalid GitHub API URL: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Whether `user` is an existing GitHub account.
    pub async fn user_exists(&self, user: &str) -> Result<bool> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| DashError::Config(format!("Invalid GitHub API URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["users", user]);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("GitHub user lookup for {user}: {status}");

        match status {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(DashError::Api {
                status: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string()),
            }),
        }
    }
}
