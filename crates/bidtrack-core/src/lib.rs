//! Core of the dual-company bid tracking dashboard.
//!
//! The crate is organized around three pieces: pure aggregation and
//! filtering over a job list (`stats`, `search`), a live view reconciler
//! that owns the snapshot for the selected company (`reconciler`), and a
//! pluggable record store behind a trait (`store`). Presentation layers
//! consume `DashboardEvent`s and never touch the backend directly.

pub mod config;
pub mod events;
pub mod export;
pub mod models;
pub mod reconciler;
pub mod sample;
pub mod search;
pub mod stats;
pub mod store;

pub use config::CoreConfig;
pub use events::{DashboardEvent, NoticeLevel};
pub use models::{
    Company, Estimator, EstimatorDraft, Job, JobDraft, JobFilter, JobPatch, JobStatus,
};
pub use reconciler::LiveView;
pub use stats::{aggregate, JobStatistics};
pub use store::{RecordStore, StoreError};
