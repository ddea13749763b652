use std::sync::OnceLock;

use clap::ValueEnum;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{DashError, Result};

use super::{ensure_xml, escape_xml, JobConfigDocument};

const PYTEST_VERSION: &str = "8.2.2";

/// Test runner a job should invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Pytest,
    Unittest,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSpec {
    pub test_type: TestType,
    /// Path handed to the runner, relative to the workspace
    pub test_location: String,
}

impl TestSpec {
    pub fn new(test_type: TestType, test_location: impl Into<String>) -> Self {
        Self {
            test_type,
            test_location: test_location.into(),
        }
    }

    /// Shell text of the build step for this runner.
    pub fn command(&self) -> String {
        let location = &self.test_location;
        match self.test_type {
            TestType::Pytest => format!(
                "if [ ! -d venv ]; then\n  python3 -m venv venv\nfi\n\
                 . venv/bin/activate\n\
                 pip show pytest > /dev/null 2>&1 || pip install pytest=={PYTEST_VERSION}\n\
                 pytest {location}"
            ),
            TestType::Unittest => format!("python -m unittest {location}"),
            TestType::Other => {
                format!("echo \"No supported test type configured for {location}\"")
            }
        }
    }
}

fn builders_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<builders\s*/>|<builders>.*?</builders>").expect("builders pattern is valid")
    })
}

/// Rewrites an existing job configuration so that its only build step runs
/// the tests described by `spec`.
///
/// # Errors
///
/// Returns [`DashError::ConfigSynthesis`] if `config` is not XML or has no
/// `builders` element.
pub fn install_test_step(config: &str, spec: &TestSpec) -> Result<JobConfigDocument> {
    install_shell_step(config, &spec.command()).map(JobConfigDocument::new)
}

pub(super) fn install_shell_step(config: &str, command: &str) -> Result<String> {
    ensure_xml(config, "config")?;

    let pattern = builders_pattern();
    if !pattern.is_match(config) {
        return Err(DashError::synthesis("builders", "element not found"));
    }

    let step = format!(
        "<builders>\n    <hudson.tasks.Shell>\n      <command>{}</command>\n    </hudson.tasks.Shell>\n  </builders>",
        escape_xml(command)
    );

    Ok(pattern.replacen(config, 1, NoExpand(&step)).into_owned())
}
