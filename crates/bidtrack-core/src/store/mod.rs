//! Record store abstraction.
//!
//! The dashboard core never talks to a concrete backend directly: it holds
//! an `Arc<dyn RecordStore>` and the backend is chosen at construction time.
//! `MemoryStore` serves tests and offline/sample mode; `RestStore` adapts a
//! hosted JSON document API.

pub mod memory;
pub mod rest;

use std::sync::mpsc::Sender;

use crate::models::{Company, Estimator, EstimatorDraft, Job, JobDraft, JobPatch};

pub use memory::MemoryStore;
pub use rest::RestStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connectivity or initialization failure talking to the backend.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// Required-field check failed; detected locally, never reaches the store.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Asynchronous failure reported by a live subscription.
    #[error("subscription error: {0}")]
    Subscription(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// A push from a live jobs subscription. Snapshots are authoritative full
/// replacements of the company's job list, never deltas.
#[derive(Debug)]
pub enum StorePush {
    Snapshot(Vec<Job>),
    Error(StoreError),
}

/// Cancellation guard for a live subscription.
///
/// `stop` is idempotent and also runs on drop, so teardown paths cannot leak
/// a listener or double-free one.
pub struct SubscriptionHandle {
    stop: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionHandle {
    pub fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        SubscriptionHandle {
            stop: Some(Box::new(stop)),
        }
    }

    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }

    pub fn is_active(&self) -> bool {
        self.stop.is_some()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Capability set of the hosted document store.
///
/// All write operations stamp server-assigned creation/update timestamps;
/// callers never set those directly. Job listings come back newest first,
/// estimators ordered by name.
pub trait RecordStore: Send + Sync {
    fn create_job(&self, draft: JobDraft) -> Result<String, StoreError>;
    fn update_job(&self, id: &str, patch: JobPatch) -> Result<(), StoreError>;
    fn delete_job(&self, id: &str) -> Result<(), StoreError>;
    fn get_job(&self, id: &str) -> Result<Job, StoreError>;

    /// Apply several patches as one logical operation. Subscribers observe a
    /// single snapshot push for the whole batch where the backend allows it.
    fn batch_update_jobs(&self, updates: Vec<(String, JobPatch)>) -> Result<(), StoreError>;

    fn list_jobs(&self, company: Company) -> Result<Vec<Job>, StoreError>;
    fn list_estimators(&self, company: Company) -> Result<Vec<Estimator>, StoreError>;

    fn create_estimator(&self, draft: EstimatorDraft) -> Result<String, StoreError>;
    fn update_estimator(&self, id: &str, name: &str) -> Result<(), StoreError>;
    fn delete_estimator(&self, id: &str) -> Result<(), StoreError>;

    /// Register a live listener for one company's jobs. The current snapshot
    /// is pushed immediately, then again after every change. Subscription
    /// failures arrive as `StorePush::Error` without closing the channel.
    fn subscribe_jobs(
        &self,
        company: Company,
        sender: Sender<StorePush>,
    ) -> Result<SubscriptionHandle, StoreError>;
}
