mod progress;
mod report;
mod styling;
mod tables;

use anyhow::Result;
use serde::Serialize;

pub use progress::StepProgress;
pub use report::{
    render_build_detail, render_builds, render_console, render_created, render_job_info,
    render_jobs,
};
pub use styling::muted;
use styling::banner;

/// Prints the jenkins-dash banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        banner("🛠️ jenkins-dash"),
        muted(env!("CARGO_PKG_VERSION")),
        muted("Jenkins job dashboard")
    );
}

/// Serializes a normalized shape for `--json` output.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
