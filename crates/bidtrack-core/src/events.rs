use crate::models::Job;
use crate::stats::JobStatistics;

/// Severity for transient user-facing notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Outputs the core hands to the presentation layer. The transport is a
/// plain return value; callers render, forward, or drop them as they like.
#[derive(Debug)]
pub enum DashboardEvent {
    /// Statistics were recomputed over the full snapshot.
    StatsUpdated(JobStatistics),
    /// The filtered view changed, either from a store push or a local
    /// filter change.
    FilteredJobsUpdated(Vec<Job>),
    /// Short-lived toast-style notification.
    Notification {
        level: NoticeLevel,
        message: String,
    },
}

impl DashboardEvent {
    pub fn notice(level: NoticeLevel, message: impl Into<String>) -> Self {
        DashboardEvent::Notification {
            level,
            message: message.into(),
        }
    }
}
