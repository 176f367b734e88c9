//! In-process record store.
//!
//! Backs tests and the CLI's offline/sample mode. Mutations push a full
//! replacement snapshot to every live subscriber of the affected company,
//! mirroring the hosted store's subscription semantics.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{Company, Estimator, EstimatorDraft, Job, JobDraft, JobPatch};
use crate::sample;
use crate::store::{RecordStore, StoreError, StorePush, SubscriptionHandle};

pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    /// Newest first; new jobs are inserted at the front.
    jobs: Vec<Job>,
    estimators: Vec<Estimator>,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
}

struct Subscriber {
    id: u64,
    company: Company,
    sender: Sender<StorePush>,
}

impl Inner {
    fn snapshot_for(&self, company: Company) -> Vec<Job> {
        self.jobs
            .iter()
            .filter(|job| job.company == company)
            .cloned()
            .collect()
    }

    /// Push the current snapshot to every subscriber of `company`, dropping
    /// subscribers whose receiving end has gone away.
    fn notify(&mut self, company: Company) {
        let snapshot = self.snapshot_for(company);
        self.subscribers.retain(|sub| {
            if sub.company != company {
                return true;
            }
            sub.sender
                .send(StorePush::Snapshot(snapshot.clone()))
                .is_ok()
        });
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// A store pre-seeded with the demo jobs and estimator rosters.
    pub fn with_sample_data() -> Self {
        let store = Self::new();
        for draft in sample::sample_estimators() {
            if let Err(err) = store.create_estimator(draft) {
                warn!("skipping sample estimator: {err}");
            }
        }
        // Insert oldest first so the newest-first listing order matches the
        // declaration order in reverse.
        for draft in sample::sample_jobs().into_iter().rev() {
            if let Err(err) = store.create_job(draft) {
                warn!("skipping sample job: {err}");
            }
        }
        store
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Simulate an asynchronous subscription failure, as a hosted backend
    /// would report on transient connectivity loss.
    #[cfg(test)]
    pub(crate) fn emit_subscription_error(&self, company: Company, message: &str) {
        let inner = self.inner.lock();
        for sub in inner.subscribers.iter().filter(|s| s.company == company) {
            let _ = sub
                .sender
                .send(StorePush::Error(StoreError::Subscription(message.into())));
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn create_job(&self, draft: JobDraft) -> Result<String, StoreError> {
        draft.validate()?;
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            client: draft.client,
            location: draft.location,
            estimator: draft.estimator,
            deadline: draft.deadline,
            follow_up_date: draft.follow_up_date,
            status: draft.status,
            description: draft.description,
            estimating_cost: draft.estimating_cost,
            bid_amount: draft.bid_amount,
            bond_amount: draft.bond_amount,
            company: draft.company,
            created_at: Some(now),
            updated_at: Some(now),
        };
        let id = job.id.clone();
        let company = job.company;

        let mut inner = self.inner.lock();
        inner.jobs.insert(0, job);
        inner.notify(company);
        debug!(job = %id, %company, "job created");
        Ok(id)
    }

    fn update_job(&self, id: &str, patch: JobPatch) -> Result<(), StoreError> {
        patch.validate()?;
        let mut inner = self.inner.lock();
        let job = inner
            .jobs
            .iter_mut()
            .find(|job| job.id == id)
            .ok_or_else(|| StoreError::not_found("job", id))?;
        patch.apply_to(job);
        job.updated_at = Some(Utc::now());
        let company = job.company;
        inner.notify(company);
        Ok(())
    }

    fn delete_job(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let index = inner
            .jobs
            .iter()
            .position(|job| job.id == id)
            .ok_or_else(|| StoreError::not_found("job", id))?;
        let company = inner.jobs.remove(index).company;
        inner.notify(company);
        Ok(())
    }

    fn get_job(&self, id: &str) -> Result<Job, StoreError> {
        self.inner
            .lock()
            .jobs
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("job", id))
    }

    fn batch_update_jobs(&self, updates: Vec<(String, JobPatch)>) -> Result<(), StoreError> {
        for (_, patch) in &updates {
            patch.validate()?;
        }

        let mut inner = self.inner.lock();
        let mut touched: Vec<Company> = Vec::new();
        for (id, patch) in &updates {
            let job = inner
                .jobs
                .iter_mut()
                .find(|job| job.id == *id)
                .ok_or_else(|| StoreError::not_found("job", id.clone()))?;
            patch.apply_to(job);
            job.updated_at = Some(Utc::now());
            if !touched.contains(&job.company) {
                touched.push(job.company);
            }
        }
        // One push per affected company for the whole batch.
        for company in touched {
            inner.notify(company);
        }
        Ok(())
    }

    fn list_jobs(&self, company: Company) -> Result<Vec<Job>, StoreError> {
        Ok(self.inner.lock().snapshot_for(company))
    }

    fn list_estimators(&self, company: Company) -> Result<Vec<Estimator>, StoreError> {
        let mut estimators: Vec<Estimator> = self
            .inner
            .lock()
            .estimators
            .iter()
            .filter(|e| e.company == company)
            .cloned()
            .collect();
        estimators.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(estimators)
    }

    fn create_estimator(&self, draft: EstimatorDraft) -> Result<String, StoreError> {
        draft.validate()?;
        let estimator = Estimator {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            company: draft.company,
            created_at: Some(Utc::now()),
        };
        let id = estimator.id.clone();
        self.inner.lock().estimators.push(estimator);
        Ok(id)
    }

    fn update_estimator(&self, id: &str, name: &str) -> Result<(), StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::Validation("estimator name is required".into()));
        }
        let mut inner = self.inner.lock();
        let estimator = inner
            .estimators
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::not_found("estimator", id))?;
        estimator.name = name.trim().to_string();
        Ok(())
    }

    fn delete_estimator(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let index = inner
            .estimators
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::not_found("estimator", id))?;
        inner.estimators.remove(index);
        Ok(())
    }

    fn subscribe_jobs(
        &self,
        company: Company,
        sender: Sender<StorePush>,
    ) -> Result<SubscriptionHandle, StoreError> {
        let mut inner = self.inner.lock();
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;

        // Listeners receive the current state right away, then deltas-as-
        // snapshots on every change.
        let _ = sender.send(StorePush::Snapshot(inner.snapshot_for(company)));
        inner.subscribers.push(Subscriber {
            id,
            company,
            sender,
        });

        let registry = Arc::clone(&self.inner);
        Ok(SubscriptionHandle::new(move || {
            registry.lock().subscribers.retain(|sub| sub.id != id);
        }))
    }
}
