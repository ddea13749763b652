use log::{debug, info};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::auth::{Credentials, Token};
use crate::error::{DashError, Result};
use crate::normalize::BuildId;
use crate::synthesis::JobConfigDocument;

const CREDENTIALS_CLASS: &str =
    "com.cloudbees.plugins.credentials.impl.UsernamePasswordCredentialsImpl";

/// CSRF token issued by `/crumbIssuer`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Crumb {
    crumb_request_field: String,
    crumb: String,
}

/// Thin client over the Jenkins REST API.
///
/// Returns raw payloads; turning them into summaries is left to
/// [`crate::normalize`].
pub struct JenkinsClient {
    client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl JenkinsClient {
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("jenkins-dash/", env!("CARGO_PKG_VERSION")))
            .redirect(redirect::Policy::none())
            .cookie_store(true)
            .build()
            .map_err(|e| DashError::Config(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(base_url)
            .map_err(|e| DashError::Config(format!("Invalid Jenkins URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DashError::Config(format!(
                "Invalid Jenkins URL: {base_url} cannot carry a path"
            )));
        }

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Helper to build authenticated requests
    pub fn auth_request(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(creds) => request.basic_auth(&creds.username, Some(creds.token.as_str())),
            None => request,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| DashError::Config(format!("Invalid Jenkins URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn job_endpoint(&self, job: &str, rest: &[&str]) -> Result<Url> {
        let mut segments = vec!["job", job];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    /// Fetches a CSRF crumb; `None` when the server has CSRF protection off.
    async fn crumb(&self) -> Result<Option<Crumb>> {
        let url = self.endpoint(&["crumbIssuer", "api", "json"])?;
        let response = self.auth_request(self.client.get(url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Crumb issuer not available, sending requests without crumb");
            return Ok(None);
        }

        let body = expect_success(response, None, false).await?.text().await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|_| DashError::malformed(&body))
    }

    /// Sends a POST carrying the crumb, if any. `accept_redirect` is for the
    /// endpoints Jenkins answers with a redirect on success.
    async fn post(
        &self,
        url: Url,
        job: Option<&str>,
        body: Option<PostBody>,
        accept_redirect: bool,
    ) -> Result<Response> {
        let mut request = self.auth_request(self.client.post(url));

        if let Some(crumb) = self.crumb().await? {
            request = request.header(crumb.crumb_request_field, crumb.crumb);
        }

        request = match body {
            Some(PostBody::Xml(xml)) => request.header(CONTENT_TYPE, "application/xml").body(xml),
            Some(PostBody::Form(fields)) => request.form(&fields),
            None => request,
        };

        expect_success(request.send().await?, job, accept_redirect).await
    }

    async fn get(&self, url: Url, job: &str) -> Result<Response> {
        let response = self.auth_request(self.client.get(url)).send().await?;
        expect_success(response, Some(job), false).await
    }

    /// Stores a username/password credential in the global system domain.
    pub async fn create_credentials(&self, id: &str, username: &str, secret: &Token) -> Result<()> {
        let url = self.endpoint(&[
            "credentials",
            "store",
            "system",
            "domain",
            "_",
            "createCredentials",
        ])?;

        let payload = json!({
            "": "0",
            "credentials": {
                "scope": "GLOBAL",
                "id": id,
                "username": username,
                "password": secret.as_str(),
                "description": format!("Auto-created for {username}"),
                "$class": CREDENTIALS_CLASS,
            }
        });

        self.post(
            url,
            None,
            Some(PostBody::Form(vec![("json", payload.to_string())])),
            false,
        )
        .await?;

        info!("Created Jenkins credentials {id}");
        Ok(())
    }

    pub async fn job_exists(&self, job: &str) -> Result<bool> {
        let url = self.job_endpoint(job, &["api", "json"])?;
        let response = self.auth_request(self.client.get(url)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            _ => expect_success(response, Some(job), false).await.map(|_| true),
        }
    }

    pub async fn create_job(&self, job: &str, config: &JobConfigDocument) -> Result<()> {
        let mut url = self.endpoint(&["createItem"])?;
        url.query_pairs_mut().append_pair("name", job);

        self.post(url, None, Some(PostBody::Xml(config.as_str().to_owned())), false)
            .await?;
        info!("Created job {job}");
        Ok(())
    }

    pub async fn reconfigure_job(&self, job: &str, config: &JobConfigDocument) -> Result<()> {
        let url = self.job_endpoint(job, &["config.xml"])?;
        self.post(url, Some(job), Some(PostBody::Xml(config.as_str().to_owned())), false)
            .await?;
        info!("Reconfigured job {job}");
        Ok(())
    }

    pub async fn fetch_job_config(&self, job: &str) -> Result<String> {
        let url = self.job_endpoint(job, &["config.xml"])?;
        Ok(self.get(url, job).await?.text().await?)
    }

    pub async fn trigger_build(&self, job: &str) -> Result<()> {
        let url = self.job_endpoint(job, &["build"])?;
        self.post(url, Some(job), None, true).await?;
        info!("Triggered build of {job}");
        Ok(())
    }

    pub async fn delete_job(&self, job: &str) -> Result<()> {
        let url = self.job_endpoint(job, &["doDelete"])?;
        self.post(url, Some(job), None, true).await?;
        info!("Deleted job {job}");
        Ok(())
    }

    /// Raw build JSON, or `None` when the build (or alias) does not exist.
    pub async fn fetch_build(&self, job: &str, build: BuildId) -> Result<Option<String>> {
        let path = build.api_path();
        let url = self.job_endpoint(job, &[path.as_str(), "api", "json"])?;
        let response = self.auth_request(self.client.get(url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No {build} build for {job}");
            return Ok(None);
        }

        Ok(Some(
            expect_success(response, Some(job), false)
                .await?
                .text()
                .await?,
        ))
    }

    /// Raw job JSON restricted to the build list.
    pub async fn fetch_builds(&self, job: &str) -> Result<String> {
        let mut url = self.job_endpoint(job, &["api", "json"])?;
        url.query_pairs_mut().append_pair("tree", "builds[number,url]");
        Ok(self.get(url, job).await?.text().await?)
    }

    pub async fn fetch_console(&self, job: &str, build: BuildId) -> Result<String> {
        let path = build.api_path();
        let url = self.job_endpoint(job, &[path.as_str(), "consoleText"])?;
        Ok(self.get(url, job).await?.text().await?)
    }
}

enum PostBody {
    Xml(String),
    Form(Vec<(&'static str, String)>),
}

/// Passes 2xx responses through, and 3xx ones when `accept_redirect` is set.
/// Jenkins answers `doDelete` and `build` (on older versions) with a
/// redirect; anywhere else a redirect means the request was bounced, usually
/// to `/login`.
async fn expect_success(
    response: Response,
    job: Option<&str>,
    accept_redirect: bool,
) -> Result<Response> {
    let status = response.status();
    if status.is_success() || (accept_redirect && status.is_redirection()) {
        return Ok(response);
    }

    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("an unknown location");
        return Err(DashError::Api {
            status: status.as_u16(),
            message: format!("Redirected to {location}, check the Jenkins URL and credentials"),
        });
    }

    if let (StatusCode::NOT_FOUND, Some(job)) = (status, job) {
        return Err(DashError::JobNotFound(job.to_string()));
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    Err(DashError::Api {
        status: status.as_u16(),
        message,
    })
}
