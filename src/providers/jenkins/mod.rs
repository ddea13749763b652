mod client;
pub mod links;
mod provider;
mod registry;

pub use client::JenkinsClient;
pub use provider::{JenkinsProvider, JobAction};
pub use registry::{JobRecord, JobRegistry};
