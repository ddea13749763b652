//! Lenient mirror of the Jenkins build and job JSON.
//!
//! Every field is optional: absent and `null` values both fall back to the
//! default, so a sparse payload still deserializes.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `GET /job/{name}/{build}/api/json`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct RawBuild {
    pub number: Option<u64>,
    pub timestamp: Option<i64>,
    pub result: Option<String>,
    pub duration: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub actions: Vec<Option<RawAction>>,
    pub change_set: Option<RawChangeSet>,
}

/// One entry of a build's `actions` list. Jenkins mixes cause, git and
/// parameter actions (and empty objects) in the same list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct RawAction {
    #[serde(deserialize_with = "null_as_default")]
    pub causes: Vec<Option<RawCause>>,
    pub last_built_revision: Option<RawRevision>,
    #[serde(deserialize_with = "null_as_default")]
    pub remote_urls: Vec<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct RawCause {
    pub user_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawRevision {
    #[serde(rename = "SHA1")]
    pub sha1: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawChangeSet {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<Value>,
}

/// `GET /job/{name}/api/json?tree=builds[number,url]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawJob {
    #[serde(deserialize_with = "null_as_default")]
    pub builds: Vec<Option<RawBuildRef>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawBuildRef {
    pub number: Option<u64>,
    pub url: Option<String>,
}
