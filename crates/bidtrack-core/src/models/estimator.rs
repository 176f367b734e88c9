use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::document::{string_field, timestamp_field};
use crate::models::Company;
use crate::store::StoreError;

/// A person who can be assigned to prepare a bid, scoped to one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimator {
    pub id: String,
    pub name: String,
    pub company: Company,
    pub created_at: Option<DateTime<Utc>>,
}

impl Estimator {
    /// Build an estimator from a raw store document. Records without a
    /// usable display name are dropped rather than surfaced as blanks.
    pub fn from_document(id: &str, doc: &Value) -> Option<Self> {
        let company = Company::parse(doc.get("company")?.as_str()?)?;
        let name = string_field(doc, "name")?;

        Some(Estimator {
            id: id.to_string(),
            name,
            company,
            created_at: timestamp_field(doc, "createdAt"),
        })
    }
}

/// Payload for creating an estimator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatorDraft {
    pub name: String,
    pub company: Company,
}

impl EstimatorDraft {
    pub fn new(name: impl Into<String>, company: Company) -> Self {
        EstimatorDraft {
            name: name.into(),
            company,
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::Validation("estimator name is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_document() {
        let doc = json!({"name": "Sarah Johnson", "company": "mhc"});
        let estimator = Estimator::from_document("e1", &doc).unwrap();
        assert_eq!(estimator.name, "Sarah Johnson");
        assert_eq!(estimator.company, Company::Mhc);
    }

    #[test]
    fn test_from_document_drops_blank_names() {
        assert!(Estimator::from_document("e1", &json!({"name": " ", "company": "mhc"})).is_none());
        assert!(Estimator::from_document("e1", &json!({"company": "mhc"})).is_none());
    }

    #[test]
    fn test_draft_validation() {
        assert!(EstimatorDraft::new("Lisa Chen", Company::Mhc).validate().is_ok());
        assert!(EstimatorDraft::new("  ", Company::Mhc).validate().is_err());
    }
}
