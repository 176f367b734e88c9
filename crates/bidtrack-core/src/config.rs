use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::{MemoryStore, RecordStore, RestStore, StoreError};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Core construction-time configuration: which backend to talk to and how
/// often the live subscription polls it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreConfig {
    /// Base URL of the hosted document API. `None` selects the in-memory
    /// store seeded with sample data.
    pub store_url: Option<String>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            store_url: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl CoreConfig {
    /// Open the configured record store. The backend is fixed here, once, at
    /// construction; everything downstream works through the trait.
    pub fn open_store(&self) -> Result<Arc<dyn RecordStore>, StoreError> {
        match &self.store_url {
            Some(url) => {
                let interval = Duration::from_secs(self.poll_interval_secs.max(1));
                Ok(Arc::new(RestStore::new(url, interval)?))
            }
            None => Ok(Arc::new(MemoryStore::with_sample_data())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Company;

    #[test]
    fn test_default_opens_sample_store() {
        let store = CoreConfig::default().open_store().unwrap();
        assert_eq!(store.list_jobs(Company::Mhc).unwrap().len(), 3);
    }

    #[test]
    fn test_poll_interval_defaults_when_absent() {
        let config: CoreConfig = serde_json::from_str(r#"{"storeUrl": null}"#).unwrap();
        assert_eq!(config.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
    }
}
