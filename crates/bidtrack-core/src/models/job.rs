use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::document::{date_field, money_field, string_field, timestamp_field};
use crate::models::{Company, JobStatus};
use crate::store::StoreError;

/// One tracked bid opportunity belonging to a single tenant company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    #[serde(rename = "projectName")]
    pub title: String,
    pub client: String,
    pub location: Option<String>,
    pub estimator: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub follow_up_date: Option<NaiveDate>,
    pub status: JobStatus,
    pub description: Option<String>,
    pub estimating_cost: f64,
    pub bid_amount: f64,
    pub bond_amount: f64,
    pub company: Company,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Build a job from a raw store document.
    ///
    /// The company tag is the tenant boundary and is required; everything
    /// else degrades gracefully (missing text becomes empty/absent, missing
    /// money becomes zero, unrecognized status becomes `no-bid`).
    pub fn from_document(id: &str, doc: &Value) -> Option<Self> {
        let company = Company::parse(doc.get("company")?.as_str()?)?;

        let status = doc
            .get("status")
            .and_then(Value::as_str)
            .map(JobStatus::parse_lossy)
            .unwrap_or(JobStatus::NoBid);

        Some(Job {
            id: id.to_string(),
            title: string_field(doc, "projectName").unwrap_or_default(),
            client: string_field(doc, "client").unwrap_or_default(),
            location: string_field(doc, "location"),
            estimator: string_field(doc, "estimator"),
            deadline: date_field(doc, "deadline"),
            follow_up_date: date_field(doc, "followUpDate"),
            status,
            description: string_field(doc, "description"),
            estimating_cost: money_field(doc, "estimatingCost"),
            bid_amount: money_field(doc, "bidAmount"),
            bond_amount: money_field(doc, "bondAmount"),
            company,
            created_at: timestamp_field(doc, "createdAt"),
            updated_at: timestamp_field(doc, "updatedAt"),
        })
    }

    /// Overdue means the deadline has passed and the job is still open.
    /// Jobs without a deadline are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.deadline {
            Some(deadline) => deadline < today && !self.status.is_closed(),
            None => false,
        }
    }

    pub fn deadline_status(&self, today: NaiveDate) -> Option<DeadlineStatus> {
        self.deadline.map(|d| deadline_status(d, today))
    }

    pub fn deadline_label(&self, today: NaiveDate) -> Option<String> {
        self.deadline.map(|d| deadline_label(d, today))
    }

    pub fn estimator_label(&self) -> &str {
        self.estimator.as_deref().unwrap_or("Unassigned")
    }
}

/// How close a deadline is, relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
    Overdue,
    /// Due within the next three days (inclusive of today).
    DueSoon,
    OnTrack,
}

pub fn deadline_status(deadline: NaiveDate, today: NaiveDate) -> DeadlineStatus {
    let days = (deadline - today).num_days();
    if days < 0 {
        DeadlineStatus::Overdue
    } else if days <= 3 {
        DeadlineStatus::DueSoon
    } else {
        DeadlineStatus::OnTrack
    }
}

/// Countdown text for a deadline ("Due today", "2 days remaining", ...).
pub fn deadline_label(deadline: NaiveDate, today: NaiveDate) -> String {
    let days = (deadline - today).num_days();
    if days < 0 {
        format!("{} days overdue", -days)
    } else if days == 0 {
        "Due today".to_string()
    } else if days == 1 {
        "Due tomorrow".to_string()
    } else {
        format!("{days} days remaining")
    }
}

/// Payload for creating a job. The store assigns the id and both timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    #[serde(rename = "projectName")]
    pub title: String,
    pub client: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<NaiveDate>,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub estimating_cost: f64,
    pub bid_amount: f64,
    pub bond_amount: f64,
    pub company: Company,
}

impl JobDraft {
    pub fn new(title: impl Into<String>, client: impl Into<String>, company: Company) -> Self {
        JobDraft {
            title: title.into(),
            client: client.into(),
            location: None,
            estimator: None,
            deadline: None,
            follow_up_date: None,
            status: JobStatus::InProgress,
            description: None,
            estimating_cost: 0.0,
            bid_amount: 0.0,
            bond_amount: 0.0,
            company,
        }
    }

    /// Required-field check, performed before any store call is made.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::Validation("project name is required".into()));
        }
        if self.client.trim().is_empty() {
            return Err(StoreError::Validation("client is required".into()));
        }
        for (label, amount) in [
            ("estimating cost", self.estimating_cost),
            ("bid amount", self.bid_amount),
            ("bond amount", self.bond_amount),
        ] {
            if amount < 0.0 {
                return Err(StoreError::Validation(format!(
                    "{label} must not be negative"
                )));
            }
        }
        Ok(())
    }
}

/// Partial update for a job. Only provided fields are written; the store
/// stamps `updatedAt` on every successful patch.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(rename = "projectName", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimating_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bond_amount: Option<f64>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.client.is_none()
            && self.location.is_none()
            && self.estimator.is_none()
            && self.deadline.is_none()
            && self.follow_up_date.is_none()
            && self.status.is_none()
            && self.description.is_none()
            && self.estimating_cost.is_none()
            && self.bid_amount.is_none()
            && self.bond_amount.is_none()
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(StoreError::Validation("project name is required".into()));
            }
        }
        if let Some(client) = &self.client {
            if client.trim().is_empty() {
                return Err(StoreError::Validation("client is required".into()));
            }
        }
        for (label, amount) in [
            ("estimating cost", self.estimating_cost),
            ("bid amount", self.bid_amount),
            ("bond amount", self.bond_amount),
        ] {
            if matches!(amount, Some(a) if a < 0.0) {
                return Err(StoreError::Validation(format!(
                    "{label} must not be negative"
                )));
            }
        }
        Ok(())
    }

    /// Apply this patch to an existing job, leaving untouched fields alone.
    pub fn apply_to(&self, job: &mut Job) {
        if let Some(title) = &self.title {
            job.title = title.clone();
        }
        if let Some(client) = &self.client {
            job.client = client.clone();
        }
        if let Some(location) = &self.location {
            job.location = Some(location.clone());
        }
        if let Some(estimator) = &self.estimator {
            job.estimator = Some(estimator.clone());
        }
        if let Some(deadline) = self.deadline {
            job.deadline = Some(deadline);
        }
        if let Some(follow_up) = self.follow_up_date {
            job.follow_up_date = Some(follow_up);
        }
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(description) = &self.description {
            job.description = Some(description.clone());
        }
        if let Some(cost) = self.estimating_cost {
            job.estimating_cost = cost;
        }
        if let Some(bid) = self.bid_amount {
            job.bid_amount = bid;
        }
        if let Some(bond) = self.bond_amount {
            job.bond_amount = bond;
        }
    }
}
