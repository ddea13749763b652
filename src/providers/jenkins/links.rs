/// Browser URL of a job.
///
/// # Arguments
///
/// * `base_url` - Jenkins base URL (e.g., <https://ci.example.com/jenkins>)
/// * `job` - Job name
///
/// # Returns
///
/// Clickable URL to the job page (e.g., <https://ci.example.com/jenkins/job/app/>)
pub fn job_url(base_url: &str, job: &str) -> String {
    format!("{}/job/{}/", base_url.trim_end_matches('/'), encode_segment(job))
}

/// Browser URL of a single build of a job.
pub fn build_url(base_url: &str, job: &str, number: u64) -> String {
    format!("{}{number}/", job_url(base_url, job))
}

fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
