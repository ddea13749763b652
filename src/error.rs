use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Config synthesis failed in {section}: {reason}")]
    ConfigSynthesis { section: String, reason: String },

    #[error("Malformed response ({size} bytes): {snippet}")]
    MalformedResponse { size: usize, snippet: String },

    #[error("Jenkins API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("GitHub user '{0}' not found")]
    GitHubUserNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Job registry error: {0}")]
    Registry(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashError {
    pub fn synthesis(section: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigSynthesis {
            section: section.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`DashError::MalformedResponse`] from the raw payload, keeping
    /// only a short prefix of it.
    pub fn malformed(raw: &str) -> Self {
        const SNIPPET_CHARS: usize = 80;

        let mut snippet: String = raw.chars().take(SNIPPET_CHARS).collect();
        if raw.chars().count() > SNIPPET_CHARS {
            snippet.push('…');
        }

        Self::MalformedResponse {
            size: raw.len(),
            snippet,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_keeps_size_and_short_snippet() {
        let raw = "x".repeat(500);
        match DashError::malformed(&raw) {
            DashError::MalformedResponse { size, snippet } => {
                assert_eq!(size, 500);
                assert_eq!(snippet.chars().count(), 81);
                assert!(snippet.ends_with('…'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_synthesis_error_names_section() {
        let err = DashError::synthesis("builders", "element not found");
        assert_eq!(
            err.to_string(),
            "Config synthesis failed in builders: element not found"
        );
    }
}
