use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a bid job.
///
/// The kebab-case form is canonical on the wire. Stored data predating the
/// canonicalization also carries human labels ("In Progress", "Follow-up
/// Required"), so parsing accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    InProgress,
    Submitted,
    FollowUpRequired,
    Won,
    Lost,
    NoBid,
}

impl JobStatus {
    pub const ALL: [JobStatus; 6] = [
        JobStatus::InProgress,
        JobStatus::Submitted,
        JobStatus::FollowUpRequired,
        JobStatus::Won,
        JobStatus::Lost,
        JobStatus::NoBid,
    ];

    /// Canonical wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::InProgress => "in-progress",
            JobStatus::Submitted => "submitted",
            JobStatus::FollowUpRequired => "follow-up-required",
            JobStatus::Won => "won",
            JobStatus::Lost => "lost",
            JobStatus::NoBid => "no-bid",
        }
    }

    /// Human-readable label for tables and reports.
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::InProgress => "In Progress",
            JobStatus::Submitted => "Submitted",
            JobStatus::FollowUpRequired => "Follow-up Required",
            JobStatus::Won => "Won",
            JobStatus::Lost => "Lost",
            JobStatus::NoBid => "No Bid",
        }
    }

    /// Terminal statuses. Closed jobs never count as overdue and carry no
    /// pending value.
    pub fn is_closed(&self) -> bool {
        matches!(self, JobStatus::Won | JobStatus::Lost | JobStatus::NoBid)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "in-progress" | "in progress" => Some(JobStatus::InProgress),
            "submitted" => Some(JobStatus::Submitted),
            "follow-up-required" | "follow-up required" | "follow up required" => {
                Some(JobStatus::FollowUpRequired)
            }
            "won" => Some(JobStatus::Won),
            "lost" => Some(JobStatus::Lost),
            "no-bid" | "no bid" => Some(JobStatus::NoBid),
            _ => None,
        }
    }

    /// Parse with the documented fallback: anything unrecognized is treated
    /// as `no-bid` so every record lands in exactly one bucket.
    pub fn parse_lossy(value: &str) -> Self {
        Self::parse(value).unwrap_or(JobStatus::NoBid)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_both_forms() {
        assert_eq!(JobStatus::parse("in-progress"), Some(JobStatus::InProgress));
        assert_eq!(JobStatus::parse("In Progress"), Some(JobStatus::InProgress));
        assert_eq!(
            JobStatus::parse("Follow-up Required"),
            Some(JobStatus::FollowUpRequired)
        );
        assert_eq!(JobStatus::parse("WON"), Some(JobStatus::Won));
        assert_eq!(JobStatus::parse("pending"), None);
    }

    #[test]
    fn test_parse_lossy_falls_back_to_no_bid() {
        assert_eq!(JobStatus::parse_lossy("???"), JobStatus::NoBid);
        assert_eq!(JobStatus::parse_lossy("submitted"), JobStatus::Submitted);
    }

    #[test]
    fn test_wire_form_matches_serde() {
        for status in JobStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_is_closed() {
        assert!(JobStatus::Won.is_closed());
        assert!(JobStatus::Lost.is_closed());
        assert!(JobStatus::NoBid.is_closed());
        assert!(!JobStatus::InProgress.is_closed());
        assert!(!JobStatus::Submitted.is_closed());
        assert!(!JobStatus::FollowUpRequired.is_closed());
    }
}
