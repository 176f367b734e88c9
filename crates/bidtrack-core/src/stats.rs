//! Derived statistics over a job list.
//!
//! The summary is recomputed from scratch on every snapshot change and never
//! persisted. Aggregation is a pure function of the job list and an injected
//! reference date, so it is deterministic and trivially testable.

use chrono::NaiveDate;

use crate::models::{Job, JobStatus};

/// Counts and monetary totals for one company's job list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobStatistics {
    pub total: usize,
    pub in_progress: usize,
    pub submitted: usize,
    pub follow_up: usize,
    pub won: usize,
    pub lost: usize,
    pub no_bid: usize,
    /// Open jobs whose deadline has passed.
    pub overdue: usize,
    /// Sum of bid amounts across all jobs.
    pub total_value: f64,
    /// Sum of bid amounts for won jobs.
    pub won_value: f64,
    /// Sum of bid amounts for jobs still in flight
    /// (in-progress, submitted, follow-up-required).
    pub pending_value: f64,
}

impl JobStatistics {
    pub fn status_count(&self, status: JobStatus) -> usize {
        match status {
            JobStatus::InProgress => self.in_progress,
            JobStatus::Submitted => self.submitted,
            JobStatus::FollowUpRequired => self.follow_up,
            JobStatus::Won => self.won,
            JobStatus::Lost => self.lost,
            JobStatus::NoBid => self.no_bid,
        }
    }
}

/// Aggregate a job list into a statistics summary.
///
/// `today` is the start-of-day reference used for overdue detection; callers
/// pass it in rather than reading the clock so a single aggregation is
/// evaluated against one consistent instant.
pub fn aggregate(jobs: &[Job], today: NaiveDate) -> JobStatistics {
    let mut stats = JobStatistics {
        total: jobs.len(),
        ..JobStatistics::default()
    };

    for job in jobs {
        match job.status {
            JobStatus::InProgress => stats.in_progress += 1,
            JobStatus::Submitted => stats.submitted += 1,
            JobStatus::FollowUpRequired => stats.follow_up += 1,
            JobStatus::Won => stats.won += 1,
            JobStatus::Lost => stats.lost += 1,
            JobStatus::NoBid => stats.no_bid += 1,
        }

        if job.is_overdue(today) {
            stats.overdue += 1;
        }

        stats.total_value += job.bid_amount;
        match job.status {
            JobStatus::Won => stats.won_value += job.bid_amount,
            status if !status.is_closed() => stats.pending_value += job.bid_amount,
            _ => {}
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Job;
    use serde_json::json;

    fn job(status: &str, bid: f64, deadline: Option<&str>) -> Job {
        let mut doc = json!({
            "projectName": "Job",
            "client": "Client",
            "status": status,
            "bidAmount": bid,
            "company": "mhc",
        });
        if let Some(d) = deadline {
            doc["deadline"] = json!(d);
        }
        Job::from_document("j", &doc).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_total_matches_input_length() {
        let jobs = vec![
            job("in-progress", 0.0, None),
            job("won", 0.0, None),
            job("gibberish", 0.0, None),
        ];
        let stats = aggregate(&jobs, date(2024, 6, 1));
        assert_eq!(stats.total, 3);
    }

    #[test]
    fn test_every_job_lands_in_exactly_one_bucket() {
        let jobs = vec![
            job("in-progress", 0.0, None),
            job("submitted", 0.0, None),
            job("follow-up-required", 0.0, None),
            job("won", 0.0, None),
            job("lost", 0.0, None),
            job("no-bid", 0.0, None),
            job("not-a-status", 0.0, None),
        ];
        let stats = aggregate(&jobs, date(2024, 6, 1));
        let bucket_sum = stats.in_progress
            + stats.submitted
            + stats.follow_up
            + stats.won
            + stats.lost
            + stats.no_bid;
        assert_eq!(bucket_sum, stats.total);
        // the unrecognized status joined the no-bid bucket
        assert_eq!(stats.no_bid, 2);
    }

    #[test]
    fn test_monetary_totals() {
        let jobs = vec![
            job("won", 100.0, None),
            job("submitted", 50.0, None),
            job("lost", 30.0, None),
        ];
        let stats = aggregate(&jobs, date(2024, 6, 1));
        assert_eq!(stats.total_value, 180.0);
        assert_eq!(stats.won_value, 100.0);
        assert_eq!(stats.pending_value, 50.0);
    }

    #[test]
    fn test_pending_value_covers_all_open_statuses() {
        let jobs = vec![
            job("in-progress", 10.0, None),
            job("submitted", 20.0, None),
            job("follow-up-required", 40.0, None),
            job("no-bid", 80.0, None),
        ];
        let stats = aggregate(&jobs, date(2024, 6, 1));
        assert_eq!(stats.pending_value, 70.0);
    }

    #[test]
    fn test_value_invariants() {
        let jobs = vec![
            job("won", 100.0, None),
            job("in-progress", 25.0, None),
            job("lost", 5.0, None),
        ];
        let stats = aggregate(&jobs, date(2024, 6, 1));
        assert!(stats.won_value <= stats.total_value);
        assert!(stats.pending_value <= stats.total_value);
    }

    #[test]
    fn test_overdue_counting() {
        let today = date(2024, 6, 1);
        let jobs = vec![
            job("in-progress", 0.0, Some("2024-01-01")),
            job("won", 0.0, Some("2024-01-01")),
            job("in-progress", 0.0, Some("2024-12-01")),
            job("in-progress", 0.0, None),
        ];
        let stats = aggregate(&jobs, today);
        assert_eq!(stats.overdue, 1);
    }

    #[test]
    fn test_deadline_today_is_not_overdue() {
        let today = date(2024, 6, 1);
        let jobs = vec![job("in-progress", 0.0, Some("2024-06-01"))];
        assert_eq!(aggregate(&jobs, today).overdue, 0);
    }

    #[test]
    fn test_empty_list() {
        let stats = aggregate(&[], date(2024, 6, 1));
        assert_eq!(stats, JobStatistics::default());
    }
}
