//! Export formatting: CSV, JSON, and a plain-text report.
//!
//! CSV quotes text fields (internal quotes doubled) and leaves monetary
//! fields as raw numbers; the on-screen/report rendering uses locale-style
//! currency formatting instead.

use chrono::NaiveDate;
use serde_json::Error as JsonError;

use crate::models::{Company, Job};

pub const CSV_HEADER: &str = "Title,Client,Location,Estimator,Deadline,Bid Value,Status,Notes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    /// Plain-text job report (stand-in for PDF output).
    Report,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "report" | "txt" | "text" => Some(ExportFormat::Report),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Report => "txt",
        }
    }

    fn filename_label(&self) -> &'static str {
        match self {
            ExportFormat::Csv | ExportFormat::Json => "Jobs",
            ExportFormat::Report => "Report",
        }
    }
}

/// `<Company>_Jobs_<date>.csv` style download name.
pub fn export_filename(company: Company, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.{}",
        company.name(),
        format.filename_label(),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn raw_amount(amount: f64) -> String {
    amount.to_string()
}

pub fn jobs_to_csv(jobs: &[Job]) -> String {
    let mut lines = Vec::with_capacity(jobs.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for job in jobs {
        let row = [
            quote(&job.title),
            quote(&job.client),
            quote(job.location.as_deref().unwrap_or("")),
            quote(job.estimator_label()),
            job.deadline.map(format_date).unwrap_or_default(),
            raw_amount(job.bid_amount),
            quote(job.status.label()),
            quote(job.description.as_deref().unwrap_or("")),
        ];
        lines.push(row.join(","));
    }
    lines.join("\n")
}

pub fn jobs_to_json(jobs: &[Job]) -> Result<String, JsonError> {
    serde_json::to_string_pretty(jobs)
}

/// Plain-text report, one block per job.
pub fn jobs_to_report(jobs: &[Job], company: Company, generated_on: NaiveDate) -> String {
    let mut out = format!(
        "{} - Job Report\nGenerated: {}\n",
        company.name(),
        format_date(generated_on)
    );

    for job in jobs {
        out.push_str(&format!(
            "\nProject: {}\nClient: {}\nLocation: {}\nEstimator: {}\nDeadline: {}\nFollow-up Date: {}\nStatus: {}\nEstimating Cost: {}\nBid Amount: {}\nBond Amount: {}\nDescription: {}\n---\n",
            job.title,
            job.client,
            job.location.as_deref().unwrap_or("N/A"),
            job.estimator_label(),
            job.deadline.map(format_date).unwrap_or_else(|| "N/A".into()),
            job.follow_up_date.map(format_date).unwrap_or_else(|| "N/A".into()),
            job.status.label(),
            format_currency(job.estimating_cost),
            format_currency(job.bid_amount),
            format_currency(job.bond_amount),
            job.description.as_deref().unwrap_or("N/A"),
        ));
    }

    out
}

/// "Jan 15, 2025" style date rendering.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Whole-dollar currency rendering with thousands separators.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
