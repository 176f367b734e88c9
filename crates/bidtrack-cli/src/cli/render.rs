//! Terminal rendering of jobs, statistics, and notifications.

use chrono::NaiveDate;

use bidtrack_core::export::{format_currency, format_date};
use bidtrack_core::{DashboardEvent, Job, JobStatistics, NoticeLevel};

pub fn render_notice(level: NoticeLevel, message: &str) -> String {
    let tag = match level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Warning => "warn",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {message}")
}

pub fn render_stats(stats: &JobStatistics) -> String {
    let lines = [
        format!("Total jobs:     {}", stats.total),
        format!("In progress:    {}", stats.in_progress),
        format!("Submitted:      {}", stats.submitted),
        format!("Follow-up:      {}", stats.follow_up),
        format!("Won:            {}", stats.won),
        format!("Lost:           {}", stats.lost),
        format!("No bid:         {}", stats.no_bid),
        format!("Overdue:        {}", stats.overdue),
        format!("Total value:    {}", format_currency(stats.total_value)),
        format!("Won value:      {}", format_currency(stats.won_value)),
        format!("Pending value:  {}", format_currency(stats.pending_value)),
    ];
    lines.join("\n")
}

/// Fixed set of columns, sized to their widest cell.
pub fn render_jobs_table(jobs: &[Job], today: NaiveDate) -> String {
    if jobs.is_empty() {
        return "No jobs found.".to_string();
    }

    let header = ["ID", "Title", "Client", "Estimator", "Deadline", "Bid", "Status"];
    let rows: Vec<[String; 7]> = jobs
        .iter()
        .map(|job| {
            let deadline = match job.deadline {
                Some(d) => format!(
                    "{} ({})",
                    format_date(d),
                    job.deadline_label(today).unwrap_or_default()
                ),
                None => "—".to_string(),
            };
            [
                short_id(&job.id),
                job.title.clone(),
                job.client.clone(),
                job.estimator_label().to_string(),
                deadline,
                format_currency(job.bid_amount),
                job.status.label().to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render_row = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(
        &header.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
    ));
    lines.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    for row in &rows {
        lines.push(render_row(row));
    }
    lines.join("\n")
}

/// Detail block for a single job.
pub fn render_job_detail(job: &Job, today: NaiveDate) -> String {
    let mut lines = vec![
        format!("Id:              {}", job.id),
        format!("Project:         {}", job.title),
        format!("Client:          {}", job.client),
        format!("Location:        {}", job.location.as_deref().unwrap_or("—")),
        format!("Estimator:       {}", job.estimator_label()),
        format!("Status:          {}", job.status.label()),
        format!(
            "Deadline:        {}",
            job.deadline.map(format_date).unwrap_or_else(|| "—".into())
        ),
    ];
    if let Some(label) = job.deadline_label(today) {
        lines.push(format!("                 {label}"));
    }
    lines.push(format!(
        "Follow-up:       {}",
        job.follow_up_date
            .map(format_date)
            .unwrap_or_else(|| "—".into())
    ));
    lines.push(format!(
        "Estimating cost: {}",
        format_currency(job.estimating_cost)
    ));
    lines.push(format!("Bid amount:      {}", format_currency(job.bid_amount)));
    lines.push(format!("Bond amount:     {}", format_currency(job.bond_amount)));
    if let Some(description) = &job.description {
        lines.push(format!("Notes:           {description}"));
    }
    lines.join("\n")
}

/// Print one dashboard event to stdout, as the watch loop receives them.
pub fn print_event(event: &DashboardEvent, today: NaiveDate) {
    match event {
        DashboardEvent::StatsUpdated(stats) => {
            println!("\n{}", render_stats(stats));
        }
        DashboardEvent::FilteredJobsUpdated(jobs) => {
            println!("\n{}", render_jobs_table(jobs, today));
        }
        DashboardEvent::Notification { level, message } => {
            println!("{}", render_notice(*level, message));
        }
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn job() -> Job {
        Job::from_document(
            "0a1b2c3d4e5f",
            &json!({
                "projectName": "Downtown Office",
                "client": "Metro",
                "estimator": "John Smith",
                "deadline": "2025-01-15",
                "status": "in-progress",
                "bidAmount": 2_500_000,
                "company": "mhc",
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_table_contains_core_columns() {
        let table = render_jobs_table(&[job()], today());
        assert!(table.contains("Downtown Office"));
        assert!(table.contains("$2,500,000"));
        assert!(table.contains("5 days remaining"));
        assert!(table.contains("0a1b2c3d"));
        assert!(!table.contains("0a1b2c3d4e5f"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render_jobs_table(&[], today()), "No jobs found.");
    }

    #[test]
    fn test_notice_levels() {
        assert_eq!(render_notice(NoticeLevel::Error, "boom"), "[error] boom");
        assert_eq!(render_notice(NoticeLevel::Success, "saved"), "[ok] saved");
    }

    #[test]
    fn test_stats_block() {
        let stats = JobStatistics {
            total: 2,
            won: 1,
            won_value: 100.0,
            total_value: 150.0,
            ..JobStatistics::default()
        };
        let block = render_stats(&stats);
        assert!(block.contains("Total jobs:     2"));
        assert!(block.contains("Won value:      $100"));
    }
}
