//! Command implementations for the bidtrack CLI.

pub mod config;
pub mod render;

pub use config::CliConfig;

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};

use bidtrack_core::export::{self, ExportFormat};
use bidtrack_core::search::filter_jobs;
use bidtrack_core::stats::aggregate;
use bidtrack_core::{
    Company, EstimatorDraft, JobDraft, JobFilter, JobPatch, JobStatus, LiveView, NoticeLevel,
    RecordStore,
};

pub fn parse_company(code: &str) -> Result<Company> {
    Company::parse(code).ok_or_else(|| anyhow!("unknown company {code:?} (expected mhc or hdd)"))
}

pub fn parse_status(value: &str) -> Result<JobStatus> {
    JobStatus::parse(value).ok_or_else(|| {
        anyhow!(
            "unknown status {value:?} (expected in-progress, submitted, \
             follow-up-required, won, lost, or no-bid)"
        )
    })
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date {value:?} (expected YYYY-MM-DD)"))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn build_filter(
    status: Option<&str>,
    estimator: Option<String>,
    search: Option<String>,
) -> Result<JobFilter> {
    let mut filter = JobFilter::new();
    if let Some(status) = status {
        filter.status = Some(parse_status(status)?);
    }
    filter.estimator = estimator;
    filter.search_text = search;
    Ok(filter)
}

fn ok(message: impl AsRef<str>) {
    println!("{}", render::render_notice(NoticeLevel::Success, message.as_ref()));
}

pub fn add_job(store: &dyn RecordStore, draft: JobDraft) -> Result<()> {
    let title = draft.title.clone();
    let id = store.create_job(draft)?;
    ok(format!("Created job \"{title}\" ({id})"));
    Ok(())
}

pub fn update_job(store: &dyn RecordStore, id: &str, patch: JobPatch) -> Result<()> {
    if patch.is_empty() {
        bail!("nothing to update; pass at least one field");
    }
    store.update_job(id, patch)?;
    ok(format!("Updated job {id}"));
    Ok(())
}

pub fn delete_job(store: &dyn RecordStore, id: &str) -> Result<()> {
    let job = store.get_job(id)?;
    store.delete_job(id)?;
    ok(format!("Deleted \"{}\"", job.title));
    Ok(())
}

pub fn show_job(store: &dyn RecordStore, id: &str) -> Result<()> {
    let job = store.get_job(id)?;
    println!("{}", render::render_job_detail(&job, today()));
    Ok(())
}

pub fn list_jobs(store: &dyn RecordStore, company: Company, filter: &JobFilter) -> Result<()> {
    let jobs = store.list_jobs(company)?;
    let filtered = filter_jobs(&jobs, filter);
    println!("{}", render::render_jobs_table(&filtered, today()));
    if filtered.len() < jobs.len() {
        println!("({} of {} jobs match)", filtered.len(), jobs.len());
    }
    Ok(())
}

pub fn show_stats(store: &dyn RecordStore, company: Company) -> Result<()> {
    let jobs = store.list_jobs(company)?;
    let stats = aggregate(&jobs, today());
    println!("{} — {}\n", company.name(), company.subtitle());
    println!("{}", render::render_stats(&stats));
    Ok(())
}

pub fn add_estimator(store: &dyn RecordStore, company: Company, name: &str) -> Result<()> {
    let id = store.create_estimator(EstimatorDraft::new(name, company))?;
    ok(format!("Added estimator \"{name}\" ({id})"));
    Ok(())
}

pub fn list_estimators(store: &dyn RecordStore, company: Company) -> Result<()> {
    let estimators = store.list_estimators(company)?;
    if estimators.is_empty() {
        println!("No estimators for {}.", company.name());
        return Ok(());
    }
    for estimator in estimators {
        println!("{}  {}", estimator.id, estimator.name);
    }
    Ok(())
}

pub fn remove_estimator(store: &dyn RecordStore, id: &str) -> Result<()> {
    store.delete_estimator(id)?;
    ok(format!("Removed estimator {id}"));
    Ok(())
}

pub fn export_jobs(
    store: &dyn RecordStore,
    company: Company,
    filter: &JobFilter,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let jobs = store.list_jobs(company)?;
    let filtered = filter_jobs(&jobs, filter);
    let now = today();

    let content = match format {
        ExportFormat::Csv => export::jobs_to_csv(&filtered),
        ExportFormat::Json => export::jobs_to_json(&filtered)?,
        ExportFormat::Report => export::jobs_to_report(&filtered, company, now),
    };

    let path =
        output.unwrap_or_else(|| PathBuf::from(export::export_filename(company, format, now)));
    fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    ok(format!(
        "Exported {} jobs to {}",
        filtered.len(),
        path.display()
    ));
    Ok(())
}

/// Live dashboard loop: subscribe and re-render on every push until ctrl-c.
pub fn watch(store: Arc<dyn RecordStore>, company: Company, filter: JobFilter) -> Result<()> {
    let mut view = LiveView::new(store);
    view.set_filter(filter);
    view.subscribe(company)?;

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
        .context("installing ctrl-c handler")?;

    println!("Watching {} jobs — ctrl-c to exit", company.name());
    while running.load(Ordering::SeqCst) {
        let now = today();
        for event in view.wait(now, Duration::from_millis(250)) {
            render::print_event(&event, now);
        }
    }

    view.unsubscribe();
    println!("Stopped.");
    Ok(())
}
