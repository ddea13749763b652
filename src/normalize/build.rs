use std::fmt;

use log::debug;
use serde::Serialize;

use crate::error::Result;

use super::humanize::format_duration;
use super::parse_object;
use super::schema::{RawAction, RawBuild, RawJob};

const UNKNOWN_USER: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildStatus {
    Success,
    Failure,
    Unstable,
    Aborted,
    Unknown,
}

impl BuildStatus {
    /// Maps a Jenkins `result` value. Running builds report `null`, and
    /// `NOT_BUILT` has no counterpart, so both become `Unknown`.
    fn from_result(result: Option<&str>) -> Self {
        match result {
            Some("SUCCESS") => Self::Success,
            Some("FAILURE") => Self::Failure,
            Some("UNSTABLE") => Self::Unstable,
            Some("ABORTED") => Self::Aborted,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
            Self::Unstable => "Unstable",
            Self::Aborted => "Aborted",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub build_number: Option<u64>,
    pub timestamp_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDetail {
    pub build_number: Option<u64>,
    pub status: BuildStatus,
    pub timestamp_ms: Option<i64>,
    pub duration_ms: Option<u64>,
    pub started_by: String,
    pub revision: String,
    pub repository_url: String,
    pub has_changes: bool,
}

impl BuildDetail {
    pub fn duration_display(&self) -> Option<String> {
        self.duration_ms.map(format_duration)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRef {
    pub build_number: Option<u64>,
    pub url: Option<String>,
}

/// Console log of a build, or why it could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum ConsoleOutput {
    Text(String),
    Unavailable(String),
}

impl ConsoleOutput {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) | Self::Unavailable(text) => text,
        }
    }
}

/// # Errors
///
/// Returns [`crate::error::DashError::MalformedResponse`] if `raw` is not a
/// JSON object.
pub fn to_build_summary(raw: &str) -> Result<BuildSummary> {
    let build: RawBuild = parse_object(raw)?;
    Ok(BuildSummary {
        build_number: build.number,
        timestamp_ms: build.timestamp,
    })
}

/// Normalizes a build payload.
///
/// Cause, revision and remote URL are each taken from the first action that
/// exposes them, wherever it sits in the list.
///
/// # Errors
///
/// Returns [`crate::error::DashError::MalformedResponse`] if `raw` is not a
/// JSON object.
pub fn to_build_detail(raw: &str) -> Result<BuildDetail> {
    let build: RawBuild = parse_object(raw)?;
    let actions: Vec<&RawAction> = build.actions.iter().flatten().collect();
    debug!("Scanning {} build actions", actions.len());

    let started_by = actions
        .iter()
        .copied()
        .flat_map(|action| action.causes.iter().flatten())
        .find_map(|cause| cause.user_name.clone())
        .unwrap_or_else(|| UNKNOWN_USER.to_string());

    let revision = actions
        .iter()
        .copied()
        .find_map(|action| {
            action
                .last_built_revision
                .as_ref()
                .and_then(|revision| revision.sha1.clone())
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let repository_url = actions
        .iter()
        .copied()
        .find_map(|action| action.remote_urls.iter().flatten().next().cloned())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let has_changes = build
        .change_set
        .as_ref()
        .is_some_and(|change_set| !change_set.items.is_empty());

    Ok(BuildDetail {
        build_number: build.number,
        status: BuildStatus::from_result(build.result.as_deref()),
        timestamp_ms: build.timestamp,
        duration_ms: build.duration,
        started_by,
        revision,
        repository_url,
        has_changes,
    })
}

/// Lists a job's builds in the order Jenkins returned them.
///
/// # Errors
///
/// Returns [`crate::error::DashError::MalformedResponse`] if `raw` is not a
/// JSON object.
pub fn to_build_list(raw: &str) -> Result<Vec<BuildRef>> {
    let job: RawJob = parse_object(raw)?;
    Ok(job
        .builds
        .into_iter()
        .map(|build| {
            let build = build.unwrap_or_default();
            BuildRef {
                build_number: build.number,
                url: build.url,
            }
        })
        .collect())
}

/// Folds a console fetch into [`ConsoleOutput`]; failures become a
/// description instead of an error.
pub fn to_console_output<E: fmt::Display>(
    fetched: std::result::Result<String, E>,
) -> ConsoleOutput {
    match fetched {
        Ok(text) => ConsoleOutput::Text(text),
        Err(e) => ConsoleOutput::Unavailable(format!("Failed to fetch console output: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashError;

    const FULL_BUILD: &str = r#"{
        "_class": "hudson.model.FreeStyleBuild",
        "number": 17,
        "result": "SUCCESS",
        "timestamp": 1717243200000,
        "duration": 125000,
        "actions": [
            {"_class": "hudson.model.ParametersAction", "parameters": []},
            {},
            {
                "_class": "hudson.model.CauseAction",
                "causes": [
                    {"shortDescription": "Started by GitHub push"},
                    {"shortDescription": "Started by user Ada", "userName": "Ada"}
                ]
            },
            {
                "_class": "hudson.plugins.git.util.BuildData",
                "lastBuiltRevision": {"SHA1": "0123abcd", "branch": []},
                "remoteUrls": ["https://github.com/org/app.git"]
            }
        ],
        "changeSet": {"items": [{"msg": "fix"}], "kind": "git"}
    }"#;

    #[test]
    fn test_build_detail_scans_actions() {
        let detail = to_build_detail(FULL_BUILD).unwrap();
        assert_eq!(detail.build_number, Some(17));
        assert_eq!(detail.status, BuildStatus::Success);
        assert_eq!(detail.timestamp_ms, Some(1_717_243_200_000));
        assert_eq!(detail.duration_ms, Some(125_000));
        assert_eq!(detail.duration_display().as_deref(), Some("2 min 5 sec"));
        assert_eq!(detail.started_by, "Ada");
        assert_eq!(detail.revision, "0123abcd");
        assert_eq!(detail.repository_url, "https://github.com/org/app.git");
        assert!(detail.has_changes);
    }

    #[test]
    fn test_build_detail_without_actions_uses_defaults() {
        let detail = to_build_detail(r#"{"number": 3, "result": null}"#).unwrap();
        assert_eq!(detail.started_by, "Unknown");
        assert_eq!(detail.revision, "N/A");
        assert_eq!(detail.repository_url, "N/A");
        assert_eq!(detail.status, BuildStatus::Unknown);
        assert!(!detail.has_changes);
        assert_eq!(detail.duration_display(), None);
    }

    #[test]
    fn test_build_detail_tolerates_null_collections() {
        let raw = r#"{"actions": [null, {"causes": null, "remoteUrls": []}], "changeSet": {"items": null}}"#;
        let detail = to_build_detail(raw).unwrap();
        assert_eq!(detail.started_by, "Unknown");
        assert_eq!(detail.repository_url, "N/A");
        assert!(!detail.has_changes);
    }

    #[test]
    fn test_build_detail_skips_empty_remote_url_lists() {
        let raw = r#"{"actions": [
            {"remoteUrls": []},
            {"remoteUrls": ["git@host:first.git", "git@host:second.git"]}
        ]}"#;
        let detail = to_build_detail(raw).unwrap();
        assert_eq!(detail.repository_url, "git@host:first.git");
    }

    #[test]
    fn test_status_mapping() {
        for (result, expected) in [
            ("FAILURE", BuildStatus::Failure),
            ("UNSTABLE", BuildStatus::Unstable),
            ("ABORTED", BuildStatus::Aborted),
            ("NOT_BUILT", BuildStatus::Unknown),
        ] {
            let raw = format!(r#"{{"result": "{result}"}}"#);
            assert_eq!(to_build_detail(&raw).unwrap().status, expected, "{result}");
        }
    }

    #[test]
    fn test_empty_change_set_has_no_changes() {
        let detail = to_build_detail(r#"{"changeSet": {"items": []}}"#).unwrap();
        assert!(!detail.has_changes);
    }

    #[test]
    fn test_build_summary_fields_optional() {
        let summary = to_build_summary(FULL_BUILD).unwrap();
        assert_eq!(summary.build_number, Some(17));
        assert_eq!(summary.timestamp_ms, Some(1_717_243_200_000));

        let empty = to_build_summary("{}").unwrap();
        assert_eq!(empty.build_number, None);
        assert_eq!(empty.timestamp_ms, None);
    }

    #[test]
    fn test_plain_text_is_malformed() {
        let raw = "<html>Jenkins is restarting</html>";
        assert!(matches!(
            to_build_detail(raw),
            Err(DashError::MalformedResponse { size, .. }) if size == raw.len()
        ));
        assert!(matches!(
            to_build_summary(raw),
            Err(DashError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_non_object_json_is_malformed() {
        assert!(matches!(
            to_build_summary("[1, 2, 3]"),
            Err(DashError::MalformedResponse { .. })
        ));
        assert!(matches!(
            to_build_detail("\"ok\""),
            Err(DashError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_build_list_preserves_order_and_count() {
        let raw = r#"{"_class": "hudson.model.FreeStyleProject", "builds": [
            {"number": 9, "url": "https://ci/job/a/9/"},
            {"number": 8, "url": "https://ci/job/a/8/"},
            {"number": 12, "url": "https://ci/job/a/12/"}
        ]}"#;
        let builds = to_build_list(raw).unwrap();
        let numbers: Vec<_> = builds.iter().map(|b| b.build_number).collect();
        assert_eq!(numbers, vec![Some(9), Some(8), Some(12)]);
        assert_eq!(builds[2].url.as_deref(), Some("https://ci/job/a/12/"));
    }

    #[test]
    fn test_build_list_missing_builds_is_empty() {
        assert!(to_build_list("{}").unwrap().is_empty());
    }

    #[test]
    fn test_console_output_never_fails() {
        assert_eq!(
            to_console_output::<DashError>(Ok("Started\nFinished: SUCCESS".to_string())),
            ConsoleOutput::Text("Started\nFinished: SUCCESS".to_string())
        );

        let failed = to_console_output(Err(DashError::JobNotFound("app".to_string())));
        assert!(matches!(failed, ConsoleOutput::Unavailable(_)));
        assert!(failed.as_str().contains("Job not found: app"));
    }
}
