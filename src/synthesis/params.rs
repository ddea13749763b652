use serde::{Deserialize, Serialize};

const CREDENTIAL_PREFIX: &str = "git-creds-";

/// User-supplied inputs for a job, plus the values derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParameters {
    /// Repository clone URL (https or scp-like)
    pub repo_url: String,
    /// Git user owning the credentials
    pub repo_user: String,
    /// Branch Jenkins should build
    pub branch_name: String,
    /// Jenkins credential id, always derived from `repo_user`
    pub credential_id: String,
    /// Comma or whitespace separated notification recipients
    pub notify_email: String,
    /// Optional shell command installed as the job's only build step
    pub test_command: Option<String>,
}

impl JobParameters {
    pub fn new(
        repo_url: impl Into<String>,
        repo_user: impl Into<String>,
        branch_name: impl Into<String>,
        notify_email: impl Into<String>,
    ) -> Self {
        let repo_user = repo_user.into();
        Self {
            repo_url: repo_url.into(),
            credential_id: credential_id_for(&repo_user),
            repo_user,
            branch_name: branch_name.into(),
            notify_email: notify_email.into(),
            test_command: None,
        }
    }

    pub fn with_test_command(mut self, command: impl Into<String>) -> Self {
        self.test_command = Some(command.into());
        self
    }

    pub fn repo_name(&self) -> String {
        repo_name_from_url(&self.repo_url)
    }

    pub fn job_name(&self) -> String {
        job_name_for(&self.repo_user, &self.branch_name)
    }

    /// Recipients in the space separated form the Jenkins mailer expects.
    pub fn recipients(&self) -> String {
        self.notify_email
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|address| !address.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Derives the Jenkins credential id for a git user.
///
/// Characters Jenkins rejects in ids are replaced by `_`, so
/// `a@b.com` becomes `git-creds-a_b.com`.
pub fn credential_id_for(user: &str) -> String {
    let sanitized: String = user
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{CREDENTIAL_PREFIX}{sanitized}")
}

/// Extracts the repository name from a clone URL.
///
/// Trailing slashes and a trailing `.git` are dropped before taking the last
/// path segment.
pub fn repo_name_from_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

pub fn job_name_for(user: &str, branch: &str) -> String {
    format!("job-{user}-{branch}").replace('/', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_id_replaces_at_sign() {
        assert_eq!(credential_id_for("a@b.com"), "git-creds-a_b.com");
    }

    #[test]
    fn test_credential_id_replaces_other_disallowed_characters() {
        assert_eq!(credential_id_for("john doe/ci"), "git-creds-john_doe_ci");
        assert_eq!(credential_id_for("octo-cat_1.2"), "git-creds-octo-cat_1.2");
    }

    #[test]
    fn test_repo_name_strips_trailing_slash_and_git_suffix() {
        assert_eq!(repo_name_from_url("https://host/org/myrepo.git/"), "myrepo");
        assert_eq!(repo_name_from_url("https://host/org/myrepo"), "myrepo");
        assert_eq!(repo_name_from_url("https://host/org/myrepo.git"), "myrepo");
    }

    #[test]
    fn test_repo_name_from_scp_like_url() {
        assert_eq!(repo_name_from_url("git@github.com:org/tool.git"), "tool");
        assert_eq!(repo_name_from_url("git@host:solo.git"), "solo");
    }

    #[test]
    fn test_job_name_flattens_branch_slashes() {
        assert_eq!(job_name_for("octocat", "feature/login"), "job-octocat-feature-login");
    }

    #[test]
    fn test_new_derives_credential_id() {
        let params = JobParameters::new("https://host/org/r.git", "a@b.com", "main", "x@y.z");
        assert_eq!(params.credential_id, "git-creds-a_b.com");
        assert_eq!(params.repo_name(), "r");
        assert_eq!(params.job_name(), "job-a@b.com-main");
        assert!(params.test_command.is_none());
    }

    #[test]
    fn test_recipients_normalizes_separators() {
        let params = JobParameters::new("u", "user", "main", "a@x.io, b@y.io  c@z.io,");
        assert_eq!(params.recipients(), "a@x.io b@y.io c@z.io");
    }
}
