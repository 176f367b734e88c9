//! Job filtering and text search.
//!
//! Filtering is a pure function over a borrowed job slice: it never mutates
//! its input and preserves the relative order of the jobs it keeps.

use crate::models::{Job, JobFilter};

/// Check if text contains a search term (ASCII case-insensitive).
pub fn text_contains(text: &str, term: &str) -> bool {
    let text_chars: Vec<char> = text.chars().collect();
    let term_chars: Vec<char> = term.chars().collect();

    if term_chars.is_empty() {
        return true;
    }

    if text_chars.len() < term_chars.len() {
        return false;
    }

    for start_idx in 0..=(text_chars.len() - term_chars.len()) {
        let matches = term_chars.iter().enumerate().all(|(i, tc)| {
            text_chars
                .get(start_idx + i)
                .is_some_and(|c| c.eq_ignore_ascii_case(tc))
        });
        if matches {
            return true;
        }
    }
    false
}

/// True when the job satisfies every provided criterion in the filter.
pub fn job_matches(job: &Job, filter: &JobFilter) -> bool {
    if let Some(status) = filter.status {
        if job.status != status {
            return false;
        }
    }

    // Estimator matching is exact on the stored display value. Unassigned
    // jobs only match when no estimator filter is set.
    if let Some(estimator) = &filter.estimator {
        if job.estimator.as_deref() != Some(estimator.as_str()) {
            return false;
        }
    }

    if let Some(text) = &filter.search_text {
        let term = text.trim();
        if !term.is_empty() {
            let found = text_contains(&job.title, term)
                || text_contains(&job.client, term)
                || job
                    .location
                    .as_deref()
                    .is_some_and(|loc| text_contains(loc, term));
            if !found {
                return false;
            }
        }
    }

    true
}

/// Apply a filter to a job list, returning the matching subsequence.
pub fn filter_jobs(jobs: &[Job], filter: &JobFilter) -> Vec<Job> {
    jobs.iter()
        .filter(|job| job_matches(job, filter))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStatus;
    use serde_json::json;

    fn job(title: &str, client: &str, location: &str, estimator: &str, status: &str) -> Job {
        Job::from_document(
            title,
            &json!({
                "projectName": title,
                "client": client,
                "location": location,
                "estimator": estimator,
                "status": status,
                "company": "mhc",
            }),
        )
        .unwrap()
    }

    fn sample() -> Vec<Job> {
        vec![
            job("Downtown Office", "Metro Development", "Phoenix, AZ", "John Smith", "in-progress"),
            job("Bridge Repair", "ADOT", "Tempe, AZ", "Mike Wilson", "submitted"),
            job("Warehouse Build", "Desert Logistics", "Mesa, AZ", "John Smith", "won"),
        ]
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let jobs = sample();
        let filtered = filter_jobs(&jobs, &JobFilter::new());
        assert_eq!(filtered, jobs);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let jobs = sample();
        let filter = JobFilter::new().with_estimator("John Smith");
        let once = filter_jobs(&jobs, &filter);
        let twice = filter_jobs(&once, &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let jobs = sample();
        let filtered = filter_jobs(&jobs, &JobFilter::new().with_search("OFFICE"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Downtown Office");
    }

    #[test]
    fn test_search_covers_client_and_location() {
        let jobs = sample();
        assert_eq!(filter_jobs(&jobs, &JobFilter::new().with_search("adot")).len(), 1);
        assert_eq!(filter_jobs(&jobs, &JobFilter::new().with_search("mesa")).len(), 1);
        assert_eq!(filter_jobs(&jobs, &JobFilter::new().with_search("az")).len(), 3);
    }

    #[test]
    fn test_whitespace_search_matches_everything() {
        let jobs = sample();
        assert_eq!(filter_jobs(&jobs, &JobFilter::new().with_search("   ")).len(), 3);
        assert_eq!(filter_jobs(&jobs, &JobFilter::new().with_search("")).len(), 3);
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let jobs = sample();
        let filter = JobFilter::new()
            .with_estimator("John Smith")
            .with_status(JobStatus::Won);
        let filtered = filter_jobs(&jobs, &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Warehouse Build");
    }

    #[test]
    fn test_estimator_match_is_case_sensitive() {
        let jobs = sample();
        assert!(filter_jobs(&jobs, &JobFilter::new().with_estimator("john smith")).is_empty());
        assert_eq!(
            filter_jobs(&jobs, &JobFilter::new().with_estimator("John Smith")).len(),
            2
        );
    }

    #[test]
    fn test_unassigned_job_never_matches_estimator_filter() {
        let mut jobs = sample();
        jobs[0].estimator = None;
        let filtered = filter_jobs(&jobs, &JobFilter::new().with_estimator("John Smith"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Warehouse Build");
    }

    #[test]
    fn test_order_is_preserved() {
        let jobs = sample();
        let filter = JobFilter::new().with_estimator("John Smith");
        let filtered = filter_jobs(&jobs, &filter);
        let titles: Vec<&str> = filtered.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Downtown Office", "Warehouse Build"]);
    }

    #[test]
    fn test_text_contains() {
        assert!(text_contains("Hello World", "lo Wo"));
        assert!(text_contains("Hello World", "WORLD"));
        assert!(!text_contains("Hello World", "xyz"));
        assert!(text_contains("Hi", ""));
        assert!(!text_contains("Hi", "Hello"));
    }
}
