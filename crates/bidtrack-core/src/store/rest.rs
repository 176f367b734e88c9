//! Adapter for a hosted JSON document API.
//!
//! Documents travel as flat JSON objects (`{"id": ..., ...fields}`) over
//! `/jobs` and `/estimators`. The backend has no change-stream primitive, so
//! live subscriptions are emulated by a polling worker that re-lists the
//! company's jobs and pushes a full replacement snapshot whenever the
//! collection differs from the last one it saw.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{Company, Estimator, EstimatorDraft, Job, JobDraft, JobPatch};
use crate::store::{RecordStore, StoreError, StorePush, SubscriptionHandle};

/// How long a stopped poll worker may keep sleeping before it notices.
const STOP_CHECK_INTERVAL: Duration = Duration::from_millis(50);

/// A hung request must not leave callers waiting forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RestStore {
    base_url: String,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    poll_interval: Duration,
}

impl RestStore {
    pub fn new(base_url: &str, poll_interval: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        Ok(RestStore {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            runtime,
            poll_interval,
        })
    }
}

fn unavailable(err: reqwest::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn expect_ok(
    resp: reqwest::Response,
    kind: &'static str,
    id: &str,
) -> Result<reqwest::Response, StoreError> {
    if resp.status() == StatusCode::NOT_FOUND {
        return Err(StoreError::not_found(kind, id));
    }
    resp.error_for_status().map_err(unavailable)
}

/// Parse a listing response, dropping documents that cannot be normalized.
pub(crate) fn parse_job_docs(docs: Vec<Value>) -> Vec<Job> {
    let mut jobs: Vec<Job> = docs
        .into_iter()
        .filter_map(|doc| {
            let id = doc.get("id").and_then(Value::as_str)?.to_string();
            let job = Job::from_document(&id, &doc);
            if job.is_none() {
                warn!(%id, "dropping malformed job document");
            }
            job
        })
        .collect();
    // Sort newest first on the client side to avoid a server index
    // requirement; undated documents go last.
    jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    jobs
}

async fn fetch_jobs(
    client: &reqwest::Client,
    base_url: &str,
    company: Company,
) -> Result<Vec<Job>, StoreError> {
    let resp = client
        .get(format!("{base_url}/jobs"))
        .query(&[("company", company.code())])
        .send()
        .await
        .map_err(unavailable)?
        .error_for_status()
        .map_err(unavailable)?;
    let docs: Vec<Value> = resp.json().await.map_err(unavailable)?;
    Ok(parse_job_docs(docs))
}

impl RecordStore for RestStore {
    fn create_job(&self, draft: JobDraft) -> Result<String, StoreError> {
        draft.validate()?;
        self.runtime.block_on(async {
            let resp = self
                .client
                .post(format!("{}/jobs", self.base_url))
                .json(&draft)
                .send()
                .await
                .map_err(unavailable)?
                .error_for_status()
                .map_err(unavailable)?;
            let body: Value = resp.json().await.map_err(unavailable)?;
            body.get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    StoreError::Unavailable("create response carried no document id".into())
                })
        })
    }

    fn update_job(&self, id: &str, patch: JobPatch) -> Result<(), StoreError> {
        patch.validate()?;
        if patch.is_empty() {
            return Ok(());
        }
        self.runtime.block_on(async {
            let resp = self
                .client
                .patch(format!("{}/jobs/{id}", self.base_url))
                .json(&patch)
                .send()
                .await
                .map_err(unavailable)?;
            expect_ok(resp, "job", id)?;
            Ok(())
        })
    }

    fn delete_job(&self, id: &str) -> Result<(), StoreError> {
        self.runtime.block_on(async {
            let resp = self
                .client
                .delete(format!("{}/jobs/{id}", self.base_url))
                .send()
                .await
                .map_err(unavailable)?;
            expect_ok(resp, "job", id)?;
            Ok(())
        })
    }

    fn get_job(&self, id: &str) -> Result<Job, StoreError> {
        self.runtime.block_on(async {
            let resp = self
                .client
                .get(format!("{}/jobs/{id}", self.base_url))
                .send()
                .await
                .map_err(unavailable)?;
            let resp = expect_ok(resp, "job", id)?;
            let doc: Value = resp.json().await.map_err(unavailable)?;
            Job::from_document(id, &doc).ok_or_else(|| {
                StoreError::Unavailable(format!("malformed job document {id}"))
            })
        })
    }

    fn batch_update_jobs(&self, updates: Vec<(String, JobPatch)>) -> Result<(), StoreError> {
        // The document API has no batch endpoint; apply sequentially and fail
        // on the first error. Subscribers will coalesce via polling anyway.
        for (_, patch) in &updates {
            patch.validate()?;
        }
        for (id, patch) in updates {
            self.update_job(&id, patch)?;
        }
        Ok(())
    }

    fn list_jobs(&self, company: Company) -> Result<Vec<Job>, StoreError> {
        self.runtime
            .block_on(fetch_jobs(&self.client, &self.base_url, company))
    }

    fn list_estimators(&self, company: Company) -> Result<Vec<Estimator>, StoreError> {
        self.runtime.block_on(async {
            let resp = self
                .client
                .get(format!("{}/estimators", self.base_url))
                .query(&[("company", company.code())])
                .send()
                .await
                .map_err(unavailable)?
                .error_for_status()
                .map_err(unavailable)?;
            let docs: Vec<Value> = resp.json().await.map_err(unavailable)?;
            let mut estimators: Vec<Estimator> = docs
                .into_iter()
                .filter_map(|doc| {
                    let id = doc.get("id").and_then(Value::as_str)?.to_string();
                    Estimator::from_document(&id, &doc)
                })
                .collect();
            estimators.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(estimators)
        })
    }

    fn create_estimator(&self, draft: EstimatorDraft) -> Result<String, StoreError> {
        draft.validate()?;
        self.runtime.block_on(async {
            let resp = self
                .client
                .post(format!("{}/estimators", self.base_url))
                .json(&draft)
                .send()
                .await
                .map_err(unavailable)?
                .error_for_status()
                .map_err(unavailable)?;
            let body: Value = resp.json().await.map_err(unavailable)?;
            body.get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    StoreError::Unavailable("create response carried no document id".into())
                })
        })
    }

    fn update_estimator(&self, id: &str, name: &str) -> Result<(), StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::Validation("estimator name is required".into()));
        }
        self.runtime.block_on(async {
            let resp = self
                .client
                .patch(format!("{}/estimators/{id}", self.base_url))
                .json(&serde_json::json!({"name": name.trim()}))
                .send()
                .await
                .map_err(unavailable)?;
            expect_ok(resp, "estimator", id)?;
            Ok(())
        })
    }

    fn delete_estimator(&self, id: &str) -> Result<(), StoreError> {
        self.runtime.block_on(async {
            let resp = self
                .client
                .delete(format!("{}/estimators/{id}", self.base_url))
                .send()
                .await
                .map_err(unavailable)?;
            expect_ok(resp, "estimator", id)?;
            Ok(())
        })
    }

    fn subscribe_jobs(
        &self,
        company: Company,
        sender: Sender<StorePush>,
    ) -> Result<SubscriptionHandle, StoreError> {
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let poll_interval = self.poll_interval;

        thread::Builder::new()
            .name(format!("bidtrack-poll-{company}"))
            .spawn(move || {
                poll_loop(client, base_url, company, sender, poll_interval, worker_stop);
            })
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        Ok(SubscriptionHandle::new(move || {
            stop.store(true, Ordering::Relaxed);
        }))
    }
}

fn poll_loop(
    client: reqwest::Client,
    base_url: String,
    company: Company,
    sender: Sender<StorePush>,
    poll_interval: Duration,
    stop: Arc<AtomicBool>,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            let _ = sender.send(StorePush::Error(StoreError::Subscription(err.to_string())));
            return;
        }
    };

    let mut last: Option<Vec<Job>> = None;
    // Report a failure once per outage, not once per poll.
    let mut failing = false;

    while !stop.load(Ordering::Relaxed) {
        match runtime.block_on(fetch_jobs(&client, &base_url, company)) {
            Ok(jobs) => {
                failing = false;
                if last.as_ref() != Some(&jobs) {
                    debug!(%company, count = jobs.len(), "pushing changed snapshot");
                    last = Some(jobs.clone());
                    if sender.send(StorePush::Snapshot(jobs)).is_err() {
                        break;
                    }
                }
            }
            Err(err) => {
                warn!(%company, %err, "poll failed");
                if !failing {
                    failing = true;
                    let push = StorePush::Error(StoreError::Subscription(err.to_string()));
                    if sender.send(push).is_err() {
                        break;
                    }
                }
            }
        }

        let mut slept = Duration::ZERO;
        while slept < poll_interval && !stop.load(Ordering::Relaxed) {
            let step = STOP_CHECK_INTERVAL.min(poll_interval - slept);
            thread::sleep(step);
            slept += step;
        }
    }
}
