pub mod github;
pub mod jenkins;

pub use github::GitHubClient;
pub use jenkins::{JenkinsClient, JenkinsProvider, JobRegistry};
