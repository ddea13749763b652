use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;
use regex::{Captures, NoExpand, Regex};

use crate::error::{DashError, Result};

use super::params::JobParameters;
use super::test_step::install_shell_step;
use super::{ensure_xml, escape_xml, JobConfigDocument};

pub const GIT_URL: &str = "__GIT_URL__";
pub const GIT_USER: &str = "__GIT_USER__";
pub const REPO_NAME: &str = "__REPO_NAME__";
pub const BRANCH_NAME: &str = "__BRANCH_NAME__";
pub const GIT_CRED_ID: &str = "__GIT_CRED_ID__";
pub const EMAIL: &str = "__EMAIL__";

/// Every token understood by [`synthesize`]. Legacy templates only carry
/// the git URL, branch and credential tokens.
pub const PLACEHOLDERS: [&str; 6] = [GIT_URL, GIT_USER, REPO_NAME, BRANCH_NAME, GIT_CRED_ID, EMAIL];

const PUSH_TRIGGER: &str = r#"<triggers>
    <com.cloudbees.jenkins.GitHubPushTrigger plugin="github">
      <spec></spec>
    </com.cloudbees.jenkins.GitHubPushTrigger>
  </triggers>"#;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"__[A-Z](?:[A-Z0-9]|_[A-Z0-9])*__").expect("placeholder pattern is valid")
    })
}

fn empty_triggers_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<triggers(?:\s+[^/>]*)?\s*/>|<triggers(?:\s+[^>]*)?>\s*</triggers>")
            .expect("triggers pattern is valid")
    })
}

/// Produces a concrete job configuration from `template`.
///
/// Recognized placeholders are replaced with XML-escaped values from
/// `params` in a single pass, so a value that happens to look like a token is
/// never substituted again. Tokens absent from the template are skipped and
/// unrecognized `__TOKEN__` markers are left as they are. An empty triggers
/// element gains a GitHub push trigger, and a test command, if any, becomes
/// the only build step.
///
/// # Errors
///
/// Returns [`DashError::ConfigSynthesis`] when the template is not an XML
/// document or a recognized token occurs more than once.
pub fn synthesize(template: &str, params: &JobParameters) -> Result<JobConfigDocument> {
    ensure_xml(template, "template")?;
    check_placeholder_counts(template)?;

    let values = placeholder_values(params);
    let substituted = placeholder_pattern().replace_all(template, |caps: &Captures| {
        let token = &caps[0];
        match values.get(token) {
            Some(value) => escape_xml(value).into_owned(),
            None => {
                debug!("Leaving unrecognized placeholder {token} untouched");
                token.to_string()
            }
        }
    });

    let mut config = inject_push_trigger(&substituted);

    if let Some(command) = &params.test_command {
        config = install_shell_step(&config, command)?;
    }

    Ok(JobConfigDocument::new(config))
}

/// Replaces an empty triggers element with one holding a push trigger.
///
/// A triggers element that already has children is left alone, which keeps
/// repeated synthesis from stacking triggers.
pub fn inject_push_trigger(config: &str) -> String {
    empty_triggers_pattern()
        .replacen(config, 1, NoExpand(PUSH_TRIGGER))
        .into_owned()
}

fn check_placeholder_counts(template: &str) -> Result<()> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for found in placeholder_pattern().find_iter(template) {
        *counts.entry(found.as_str()).or_default() += 1;
    }

    for token in PLACEHOLDERS {
        match counts.get(token).copied().unwrap_or(0) {
            0 => debug!("Template has no {token} placeholder"),
            1 => {}
            n => {
                return Err(DashError::synthesis(
                    token,
                    format!("placeholder occurs {n} times, expected once"),
                ))
            }
        }
    }

    Ok(())
}

fn placeholder_values(params: &JobParameters) -> HashMap<&'static str, String> {
    HashMap::from([
        (GIT_URL, params.repo_url.clone()),
        (GIT_USER, params.repo_user.clone()),
        (REPO_NAME, params.repo_name()),
        (BRANCH_NAME, params.branch_name.clone()),
        (GIT_CRED_ID, params.credential_id.clone()),
        (EMAIL, params.recipients()),
    ])
}
