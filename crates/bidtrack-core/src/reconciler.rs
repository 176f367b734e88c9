//! Live view reconciliation.
//!
//! `LiveView` owns the authoritative in-memory snapshot of jobs for the
//! currently selected company. Store pushes (always full replacements, never
//! deltas) arrive on an mpsc channel; processing one replaces the snapshot,
//! re-runs aggregation and filtering, and returns the resulting
//! `DashboardEvent`s for the presentation layer to render.
//!
//! At most one subscription is live at a time, so a snapshot never mixes
//! records from two companies.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::events::{DashboardEvent, NoticeLevel};
use crate::models::{Company, Job, JobFilter};
use crate::search::filter_jobs;
use crate::stats::{aggregate, JobStatistics};
use crate::store::{RecordStore, StoreError, StorePush, SubscriptionHandle};

/// Quiet period before a search-text change is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

enum Subscription {
    Inactive,
    Active {
        company: Company,
        handle: SubscriptionHandle,
        receiver: Receiver<StorePush>,
    },
}

struct PendingSearch {
    text: String,
    due: Instant,
}

pub struct LiveView {
    store: Arc<dyn RecordStore>,
    subscription: Subscription,
    snapshot: Vec<Job>,
    filter: JobFilter,
    pending_search: Option<PendingSearch>,
}

impl LiveView {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        LiveView {
            store,
            subscription: Subscription::Inactive,
            snapshot: Vec::new(),
            filter: JobFilter::default(),
            pending_search: None,
        }
    }

    pub fn company(&self) -> Option<Company> {
        match &self.subscription {
            Subscription::Active { company, .. } => Some(*company),
            Subscription::Inactive => None,
        }
    }

    pub fn filter(&self) -> &JobFilter {
        &self.filter
    }

    /// The authoritative snapshot for the subscribed company.
    pub fn snapshot(&self) -> &[Job] {
        &self.snapshot
    }

    pub fn filtered_jobs(&self) -> Vec<Job> {
        filter_jobs(&self.snapshot, &self.filter)
    }

    pub fn statistics(&self, today: NaiveDate) -> JobStatistics {
        aggregate(&self.snapshot, today)
    }

    /// Register a live listener for `company`. Any existing subscription is
    /// stopped first; the reconciler never holds two at once.
    pub fn subscribe(&mut self, company: Company) -> Result<(), StoreError> {
        self.unsubscribe();

        let (sender, receiver) = mpsc::channel();
        let handle = self.store.subscribe_jobs(company, sender)?;
        debug!(%company, "subscribed");
        self.subscription = Subscription::Active {
            company,
            handle,
            receiver,
        };
        Ok(())
    }

    /// Stop the live listener and discard the held snapshot. Safe to call
    /// repeatedly and during teardown.
    pub fn unsubscribe(&mut self) {
        if let Subscription::Active {
            company,
            mut handle,
            ..
        } = std::mem::replace(&mut self.subscription, Subscription::Inactive)
        {
            handle.stop();
            debug!(%company, "unsubscribed");
        }
        self.snapshot.clear();
    }

    /// Switch the active tenant: always unsubscribe, then subscribe fresh.
    pub fn set_active_company(&mut self, company: Company) -> Result<(), StoreError> {
        self.subscribe(company)
    }

    /// Replace the filter specification. Cancels any pending debounced
    /// search, since an explicit filter change supersedes it.
    pub fn set_filter(&mut self, filter: JobFilter) -> Vec<DashboardEvent> {
        self.pending_search = None;
        self.filter = filter;
        vec![DashboardEvent::FilteredJobsUpdated(self.filtered_jobs())]
    }

    /// Record a search-text keystroke. The text is applied once no newer
    /// keystroke arrives within [`SEARCH_DEBOUNCE`]; a newer keystroke
    /// simply supersedes the pending one.
    pub fn search(&mut self, text: impl Into<String>, now: Instant) {
        self.pending_search = Some(PendingSearch {
            text: text.into(),
            due: now + SEARCH_DEBOUNCE,
        });
    }

    /// When the pending search (if any) comes due.
    pub fn next_search_due(&self) -> Option<Instant> {
        self.pending_search.as_ref().map(|p| p.due)
    }

    /// Apply the pending search if its quiet period has elapsed.
    pub fn poll_search(&mut self, now: Instant) -> Vec<DashboardEvent> {
        let due = matches!(&self.pending_search, Some(p) if now >= p.due);
        if !due {
            return Vec::new();
        }
        let pending = match self.pending_search.take() {
            Some(p) => p,
            None => return Vec::new(),
        };
        self.filter.search_text = if pending.text.trim().is_empty() {
            None
        } else {
            Some(pending.text)
        };
        vec![DashboardEvent::FilteredJobsUpdated(self.filtered_jobs())]
    }

    /// Drain all queued store pushes, processing them in delivery order.
    pub fn pump(&mut self, today: NaiveDate) -> Vec<DashboardEvent> {
        let pushes: Vec<StorePush> = match &self.subscription {
            Subscription::Active { receiver, .. } => receiver.try_iter().collect(),
            Subscription::Inactive => Vec::new(),
        };

        let mut events = Vec::new();
        for push in pushes {
            events.extend(self.apply_push(push, today));
        }
        events
    }

    /// Block for up to `timeout` waiting for a store push, then drain
    /// whatever else is queued.
    pub fn wait(&mut self, today: NaiveDate, timeout: Duration) -> Vec<DashboardEvent> {
        let first = match &self.subscription {
            Subscription::Active { receiver, .. } => match receiver.recv_timeout(timeout) {
                Ok(push) => Some(push),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
            },
            Subscription::Inactive => None,
        };

        match first {
            Some(push) => {
                let mut events = self.apply_push(push, today);
                events.extend(self.pump(today));
                events
            }
            None => Vec::new(),
        }
    }

    fn apply_push(&mut self, push: StorePush, today: NaiveDate) -> Vec<DashboardEvent> {
        match push {
            StorePush::Snapshot(jobs) => {
                self.snapshot = jobs;
                vec![
                    DashboardEvent::StatsUpdated(self.statistics(today)),
                    DashboardEvent::FilteredJobsUpdated(self.filtered_jobs()),
                ]
            }
            StorePush::Error(err) => {
                // Keep the last-known-good snapshot; stale data beats a
                // blank dashboard during a transient outage.
                warn!(%err, "subscription error");
                vec![DashboardEvent::notice(NoticeLevel::Error, err.to_string())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Company, JobDraft, JobStatus};
    use crate::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn setup() -> (Arc<MemoryStore>, LiveView) {
        let store = Arc::new(MemoryStore::new());
        let view = LiveView::new(store.clone());
        (store, view)
    }

    fn stats_of(events: &[DashboardEvent]) -> Option<&JobStatistics> {
        events.iter().rev().find_map(|e| match e {
            DashboardEvent::StatsUpdated(stats) => Some(stats),
            _ => None,
        })
    }

    fn filtered_of(events: &[DashboardEvent]) -> Option<&Vec<Job>> {
        events.iter().rev().find_map(|e| match e {
            DashboardEvent::FilteredJobsUpdated(jobs) => Some(jobs),
            _ => None,
        })
    }

    #[test]
    fn test_push_replaces_snapshot_entirely() {
        let (store, mut view) = setup();
        view.subscribe(Company::Mhc).unwrap();

        let _a = store
            .create_job(JobDraft::new("Job A", "Client", Company::Mhc))
            .unwrap();
        let b = store
            .create_job(JobDraft::new("Job B", "Client", Company::Mhc))
            .unwrap();

        let events = view.pump(today());
        let filtered = filtered_of(&events).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(stats_of(&events).unwrap().total, 2);

        // Server-side removal: the next snapshot must leave no residue of B.
        store.delete_job(&b).unwrap();
        let events = view.pump(today());
        let filtered = filtered_of(&events).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Job A");
        assert_eq!(stats_of(&events).unwrap().total, 1);
        assert!(view.snapshot().iter().all(|j| j.title != "Job B"));
    }

    #[test]
    fn test_subscribe_delivers_initial_snapshot() {
        let (store, mut view) = setup();
        store
            .create_job(JobDraft::new("Existing", "Client", Company::Mhc))
            .unwrap();

        view.subscribe(Company::Mhc).unwrap();
        let events = view.pump(today());
        assert_eq!(filtered_of(&events).unwrap().len(), 1);
    }

    #[test]
    fn test_company_switch_never_mixes_tenants() {
        let (store, mut view) = setup();
        store
            .create_job(JobDraft::new("Construction", "Client", Company::Mhc))
            .unwrap();
        store
            .create_job(JobDraft::new("Drywall", "Client", Company::Hdd))
            .unwrap();

        view.subscribe(Company::Mhc).unwrap();
        view.pump(today());
        assert_eq!(view.company(), Some(Company::Mhc));
        assert_eq!(store.subscriber_count(), 1);

        view.set_active_company(Company::Hdd).unwrap();
        // exactly one listener: the old one was stopped before the new
        // registration
        assert_eq!(store.subscriber_count(), 1);
        assert_eq!(view.company(), Some(Company::Hdd));

        let events = view.pump(today());
        let filtered = filtered_of(&events).unwrap();
        assert_eq!(filtered.len(), 1);
        assert!(filtered.iter().all(|j| j.company == Company::Hdd));
    }

    #[test]
    fn test_unsubscribe_is_idempotent_and_discards_snapshot() {
        let (store, mut view) = setup();
        store
            .create_job(JobDraft::new("Job", "Client", Company::Mhc))
            .unwrap();
        view.subscribe(Company::Mhc).unwrap();
        view.pump(today());
        assert_eq!(view.snapshot().len(), 1);

        view.unsubscribe();
        view.unsubscribe();
        assert!(view.snapshot().is_empty());
        assert_eq!(view.company(), None);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_error_keeps_last_good_snapshot() {
        let (store, mut view) = setup();
        store
            .create_job(JobDraft::new("Job", "Client", Company::Mhc))
            .unwrap();
        view.subscribe(Company::Mhc).unwrap();
        view.pump(today());
        assert_eq!(view.snapshot().len(), 1);

        store.emit_subscription_error(Company::Mhc, "connection reset");
        let events = view.pump(today());
        assert_eq!(events.len(), 1);
        match &events[0] {
            DashboardEvent::Notification { level, message } => {
                assert_eq!(*level, NoticeLevel::Error);
                assert!(message.contains("connection reset"));
            }
            other => panic!("expected notification, got {other:?}"),
        }
        // stale-but-available beats cleared
        assert_eq!(view.snapshot().len(), 1);
    }

    #[test]
    fn test_filter_change_updates_filtered_view_only() {
        let (store, mut view) = setup();
        let mut draft = JobDraft::new("Won Job", "Client", Company::Mhc);
        draft.status = JobStatus::Won;
        store.create_job(draft).unwrap();
        store
            .create_job(JobDraft::new("Open Job", "Client", Company::Mhc))
            .unwrap();
        view.subscribe(Company::Mhc).unwrap();
        view.pump(today());

        let events = view.set_filter(JobFilter::new().with_status(JobStatus::Won));
        assert_eq!(events.len(), 1);
        let filtered = filtered_of(&events).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Won Job");
    }

    #[test]
    fn test_search_is_debounced() {
        let (store, mut view) = setup();
        store
            .create_job(JobDraft::new("Downtown Office", "Metro", Company::Mhc))
            .unwrap();
        store
            .create_job(JobDraft::new("Bridge Repair", "ADOT", Company::Mhc))
            .unwrap();
        view.subscribe(Company::Mhc).unwrap();
        view.pump(today());

        let t0 = Instant::now();
        view.search("off", t0);
        assert!(view.poll_search(t0 + Duration::from_millis(100)).is_empty());

        // newer keystroke supersedes the pending one
        view.search("office", t0 + Duration::from_millis(200));
        assert!(view.poll_search(t0 + Duration::from_millis(400)).is_empty());

        let events = view.poll_search(t0 + Duration::from_millis(600));
        let filtered = filtered_of(&events).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Downtown Office");
        assert_eq!(view.filter().search_text.as_deref(), Some("office"));
    }

    #[test]
    fn test_blank_search_clears_the_text_filter() {
        let (store, mut view) = setup();
        store
            .create_job(JobDraft::new("Job", "Client", Company::Mhc))
            .unwrap();
        view.subscribe(Company::Mhc).unwrap();
        view.pump(today());

        let t0 = Instant::now();
        view.search("job", t0);
        view.poll_search(t0 + SEARCH_DEBOUNCE);
        assert!(view.filter().search_text.is_some());

        view.search("   ", t0);
        let events = view.poll_search(t0 + SEARCH_DEBOUNCE);
        assert!(view.filter().search_text.is_none());
        assert_eq!(filtered_of(&events).unwrap().len(), 1);
    }

    #[test]
    fn test_wait_returns_queued_events() {
        let (store, mut view) = setup();
        view.subscribe(Company::Mhc).unwrap();
        store
            .create_job(JobDraft::new("Job", "Client", Company::Mhc))
            .unwrap();

        let events = view.wait(today(), Duration::from_millis(200));
        assert!(stats_of(&events).is_some());
        assert!(filtered_of(&events).is_some());
    }

    #[test]
    fn test_pump_applies_pushes_in_delivery_order() {
        let (store, mut view) = setup();
        view.subscribe(Company::Mhc).unwrap();
        store
            .create_job(JobDraft::new("First", "Client", Company::Mhc))
            .unwrap();
        store
            .create_job(JobDraft::new("Second", "Client", Company::Mhc))
            .unwrap();

        // three queued pushes (initial empty + two creates); the final state
        // must reflect the last one
        let events = view.pump(today());
        assert_eq!(stats_of(&events).unwrap().total, 2);
        assert_eq!(view.snapshot().len(), 2);
    }
}
