//! Job configuration synthesis.
//!
//! Turns a Jenkins `config.xml` template plus [`JobParameters`] into a
//! document that can be posted verbatim to `createItem` or `config.xml`,
//! and rewrites the build steps of an existing configuration for the
//! test-runner flow. Everything here is pure text transformation.

mod params;
mod template;
mod test_step;

use std::borrow::Cow;
use std::fmt;

use crate::error::{DashError, Result};

pub use params::JobParameters;
pub use template::synthesize;
pub use test_step::{install_test_step, TestSpec, TestType};

/// A job configuration ready to be sent to Jenkins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfigDocument(String);

impl JobConfigDocument {
    pub fn new(xml: impl Into<String>) -> Self {
        Self(xml.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for JobConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn ensure_xml(document: &str, section: &str) -> Result<()> {
    let trimmed = document.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('<') && trimmed.ends_with('>') {
        Ok(())
    } else {
        Err(DashError::synthesis(section, "document is not XML"))
    }
}

fn escape_xml(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
