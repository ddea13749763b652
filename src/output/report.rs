use std::fmt::Write;

use chrono::{DateTime, Utc};
use comfy_table::Cell;
use indexmap::IndexMap;

use crate::normalize::{
    to_relative_time, BuildDetail, BuildId, BuildRef, BuildSelector, BuildSummary, ConsoleOutput,
};
use crate::providers::jenkins::links::{build_url, job_url};
use crate::providers::jenkins::JobRecord;

use super::styling::{failure, heading, highlight, link, muted, success};
use super::tables::{create_table, header, optional_cell, status_cell};

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{emoji} {}", heading(title));
}

fn relative(timestamp_ms: Option<i64>, now: DateTime<Utc>) -> Option<String> {
    timestamp_ms.map(|ts| to_relative_time(ts, now))
}

pub fn render_jobs(records: &[&JobRecord], base_url: &str, now: DateTime<Utc>) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "📋", "Jobs");

    if records.is_empty() {
        let _ = writeln!(output, "  {}", muted("No jobs recorded yet"));
        return output;
    }

    let mut table = create_table();
    table.set_header(header(&["Job", "Repository", "Branch", "User", "Notify", "Created"]));
    for record in records {
        table.add_row(vec![
            Cell::new(&record.job_name),
            Cell::new(&record.git_repo),
            Cell::new(&record.branch),
            Cell::new(&record.git_user),
            Cell::new(&record.email),
            Cell::new(to_relative_time(record.created_at.timestamp_millis(), now)),
        ]);
    }
    let _ = writeln!(output, "{table}");

    if let [only] = records {
        let _ = writeln!(
            output,
            "  {} {}",
            muted("Open:"),
            link(job_url(base_url, &only.job_name))
        );
    }

    output
}

pub fn render_job_info(
    job: &str,
    summaries: &IndexMap<BuildSelector, BuildSummary>,
    now: DateTime<Utc>,
) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "🔧", &format!("Job {job}"));

    if summaries.is_empty() {
        let _ = writeln!(output, "  {}", muted("No builds yet"));
        return output;
    }

    let mut table = create_table();
    table.set_header(header(&["Build", "Number", "Started"]));
    for (selector, summary) in summaries {
        table.add_row(vec![
            Cell::new(selector.name()),
            optional_cell(summary.build_number.map(|n| format!("#{n}"))),
            optional_cell(relative(summary.timestamp_ms, now)),
        ]);
    }
    let _ = writeln!(output, "{table}");
    output
}

pub fn render_build_detail(
    job: &str,
    build: BuildId,
    detail: &BuildDetail,
    base_url: &str,
    now: DateTime<Utc>,
) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "🏗️", &format!("{job} {build}"));

    let mut table = create_table();
    table.add_row(vec![
        Cell::new("Number"),
        optional_cell(detail.build_number.map(|n| format!("#{n}"))),
    ]);
    table.add_row(vec![Cell::new("Status"), status_cell(detail.status)]);
    table.add_row(vec![
        Cell::new("Started"),
        optional_cell(relative(detail.timestamp_ms, now)),
    ]);
    table.add_row(vec![Cell::new("Duration"), optional_cell(detail.duration_display())]);
    table.add_row(vec![Cell::new("Started by"), Cell::new(&detail.started_by)]);
    table.add_row(vec![Cell::new("Revision"), Cell::new(&detail.revision)]);
    table.add_row(vec![Cell::new("Repository"), Cell::new(&detail.repository_url)]);
    table.add_row(vec![
        Cell::new("Changes"),
        Cell::new(if detail.has_changes {
            "Changes detected"
        } else {
            "No changes"
        }),
    ]);

    let _ = writeln!(output, "{table}");

    if let Some(number) = detail.build_number {
        let _ = writeln!(
            output,
            "  {} {}",
            muted("Open:"),
            link(build_url(base_url, job, number))
        );
    }

    output
}

pub fn render_builds(job: &str, builds: &[BuildRef]) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "📜", &format!("Builds of {job}"));

    if builds.is_empty() {
        let _ = writeln!(output, "  {}", muted("No builds yet"));
        return output;
    }

    let mut table = create_table();
    table.set_header(header(&["Number", "URL"]));
    for build in builds {
        table.add_row(vec![
            optional_cell(build.build_number.map(|n| format!("#{n}"))),
            optional_cell(build.url.as_deref()),
        ]);
    }
    let _ = writeln!(output, "{table}");
    output
}

pub fn render_console(console: &ConsoleOutput) -> String {
    match console {
        ConsoleOutput::Text(_) => console.as_str().to_string(),
        ConsoleOutput::Unavailable(_) => format!("{}\n", failure(console.as_str())),
    }
}

pub fn render_created(record: &JobRecord, reconfigured: bool, base_url: &str) -> String {
    let verb = if reconfigured {
        "reconfigured"
    } else {
        "created"
    };
    format!(
        "{} {} {}\n  {} {}\n",
        success("✓"),
        highlight(&record.job_name),
        success(format!("{verb} and triggered")),
        muted("Open:"),
        link(job_url(base_url, &record.job_name))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::BuildStatus;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn record(name: &str) -> JobRecord {
        JobRecord {
            job_name: name.to_string(),
            git_repo: "https://github.com/org/app.git".to_string(),
            git_user: "octocat".to_string(),
            branch: "main".to_string(),
            email: "dev@example.com".to_string(),
            created_at: now() - Duration::hours(2),
        }
    }

    #[test]
    fn test_render_jobs_empty() {
        let output = render_jobs(&[], "https://ci", now());
        assert!(output.contains("No jobs recorded yet"));
    }

    #[test]
    fn test_render_jobs_lists_records() {
        let record = record("job-octocat-main");
        let output = render_jobs(&[&record], "https://ci", now());
        assert!(output.contains("job-octocat-main"));
        assert!(output.contains("2 hours ago"));
        assert!(output.contains("https://ci/job/job-octocat-main/"));
    }

    #[test]
    fn test_render_job_info() {
        let mut summaries = IndexMap::new();
        summaries.insert(
            BuildSelector::Latest,
            BuildSummary {
                build_number: Some(12),
                timestamp_ms: Some((now() - Duration::minutes(5)).timestamp_millis()),
            },
        );
        summaries.insert(
            BuildSelector::LatestStable,
            BuildSummary {
                build_number: None,
                timestamp_ms: None,
            },
        );

        let output = render_job_info("app", &summaries, now());
        assert!(output.contains("latest-stable"));
        assert!(output.contains("#12"));
        assert!(output.contains("5 minutes ago"));
    }

    #[test]
    fn test_render_build_detail() {
        let detail = BuildDetail {
            build_number: Some(3),
            status: BuildStatus::Failure,
            timestamp_ms: None,
            duration_ms: Some(3_725_000),
            started_by: "Unknown".to_string(),
            revision: "N/A".to_string(),
            repository_url: "N/A".to_string(),
            has_changes: false,
        };

        let output = render_build_detail("app", BuildId::Number(3), &detail, "https://ci", now());
        assert!(output.contains("Failure"));
        assert!(output.contains("https://ci/job/app/3/"));
        assert!(output.contains("1 hr 2 min"));
        assert!(output.contains("No changes"));
    }

    #[test]
    fn test_render_builds_keeps_order() {
        let builds = vec![
            BuildRef {
                build_number: Some(9),
                url: Some("https://ci/job/app/9/".to_string()),
            },
            BuildRef {
                build_number: Some(8),
                url: None,
            },
        ];
        let output = render_builds("app", &builds);
        let first = output.find("#9").unwrap();
        let second = output.find("#8").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_console_unavailable() {
        let console = ConsoleOutput::Unavailable("Failed to fetch console output: boom".to_string());
        assert!(render_console(&console).contains("boom"));
    }

    #[test]
    fn test_render_created() {
        let output = render_created(&record("job-octocat-main"), true, "https://ci");
        assert!(output.contains("reconfigured and triggered"));
    }
}
