use serde::{Deserialize, Serialize};

use crate::models::JobStatus;

/// Filter specification for the job list. Unset fields match everything;
/// set fields combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    /// Exact match on the stored estimator display value (case-sensitive).
    pub estimator: Option<String>,
    /// Case-insensitive substring match over title, client, and location.
    /// Whitespace-only text is treated as "no filter".
    pub search_text: Option<String>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_estimator(mut self, estimator: impl Into<String>) -> Self {
        self.estimator = Some(estimator.into());
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// True when the filter matches every job.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.estimator.is_none()
            && self
                .search_text
                .as_deref()
                .map(|s| s.trim().is_empty())
                .unwrap_or(true)
    }
}
