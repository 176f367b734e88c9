use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bidtrack_cli::cli::{self, render, CliConfig};
use bidtrack_core::export::ExportFormat;
use bidtrack_core::{JobDraft, JobPatch, NoticeLevel};

#[derive(Parser)]
#[command(name = "bidtrack")]
#[command(about = "Dual-company construction bid tracking", version)]
struct Cli {
    /// Company scope: mhc or hdd (defaults to the persisted selection)
    #[arg(long, global = true)]
    company: Option<String>,

    /// Base URL of the hosted document API
    #[arg(long, global = true)]
    store: Option<String>,

    /// Use the in-memory sample store regardless of configuration
    #[arg(long, global = true)]
    sample: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage jobs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Manage estimators
    Estimator {
        #[command(subcommand)]
        command: EstimatorCommands,
    },
    /// Show the statistics summary for the selected company
    Stats,
    /// Export jobs to CSV, JSON, or a plain-text report
    Export {
        /// csv, json, or report
        #[arg(long, default_value = "csv")]
        format: String,
        /// Output path (defaults to a name derived from company and date)
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        estimator: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show or persist the selected company
    Company {
        /// mhc or hdd; omit to print the current selection
        code: Option<String>,
    },
    /// Live dashboard: re-render stats and jobs on every store change
    Watch {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        estimator: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// Create a job
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        client: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        estimator: Option<String>,
        /// Bid deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// Follow-up date (YYYY-MM-DD)
        #[arg(long = "follow-up")]
        follow_up: Option<String>,
        #[arg(long, default_value = "in-progress")]
        status: String,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        estimating_cost: f64,
        #[arg(long, default_value_t = 0.0)]
        bid_amount: f64,
        #[arg(long, default_value_t = 0.0)]
        bond_amount: f64,
    },
    /// Update fields on an existing job
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        estimator: Option<String>,
        /// Bid deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// Follow-up date (YYYY-MM-DD)
        #[arg(long = "follow-up")]
        follow_up: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        estimating_cost: Option<f64>,
        #[arg(long)]
        bid_amount: Option<f64>,
        #[arg(long)]
        bond_amount: Option<f64>,
    },
    /// Delete a job
    Delete { id: String },
    /// Show one job in full
    Show { id: String },
    /// List jobs, optionally filtered
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        estimator: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum EstimatorCommands {
    /// Add an estimator to the selected company
    Add { name: String },
    /// List the selected company's estimators
    List,
    /// Remove an estimator
    Remove { id: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!(
            "{}",
            render::render_notice(NoticeLevel::Error, &format!("{err:#}"))
        );
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Cli::parse();

    let mut config = CliConfig::load();
    if args.sample {
        config.store_url = None;
    } else if let Some(url) = &args.store {
        config.store_url = Some(url.clone());
    }

    let company = match &args.company {
        Some(code) => cli::parse_company(code)?,
        None => config.company,
    };

    // The company command only touches preferences; no store needed.
    if let Commands::Company { code } = &args.command {
        match code {
            Some(code) => {
                let selected = cli::parse_company(code)?;
                config.company = selected;
                config.save()?;
                println!(
                    "{}",
                    render::render_notice(
                        NoticeLevel::Success,
                        &format!("Switched to {} ({})", selected.code(), selected.name()),
                    )
                );
            }
            None => println!("{} ({})", config.company.code(), config.company.name()),
        }
        return Ok(());
    }

    let store = config.core_config().open_store()?;

    match args.command {
        Commands::Company { .. } => unreachable!("handled above"),
        Commands::Job { command } => match command {
            JobCommands::Add {
                title,
                client,
                location,
                estimator,
                deadline,
                follow_up,
                status,
                notes,
                estimating_cost,
                bid_amount,
                bond_amount,
            } => {
                let draft = JobDraft {
                    location,
                    estimator,
                    deadline: deadline.as_deref().map(cli::parse_date).transpose()?,
                    follow_up_date: follow_up.as_deref().map(cli::parse_date).transpose()?,
                    status: cli::parse_status(&status)?,
                    description: notes,
                    estimating_cost,
                    bid_amount,
                    bond_amount,
                    ..JobDraft::new(title, client, company)
                };
                cli::add_job(store.as_ref(), draft)
            }
            JobCommands::Update {
                id,
                title,
                client,
                location,
                estimator,
                deadline,
                follow_up,
                status,
                notes,
                estimating_cost,
                bid_amount,
                bond_amount,
            } => {
                let patch = JobPatch {
                    title,
                    client,
                    location,
                    estimator,
                    deadline: deadline.as_deref().map(cli::parse_date).transpose()?,
                    follow_up_date: follow_up.as_deref().map(cli::parse_date).transpose()?,
                    status: status.as_deref().map(cli::parse_status).transpose()?,
                    description: notes,
                    estimating_cost,
                    bid_amount,
                    bond_amount,
                };
                cli::update_job(store.as_ref(), &id, patch)
            }
            JobCommands::Delete { id } => cli::delete_job(store.as_ref(), &id),
            JobCommands::Show { id } => cli::show_job(store.as_ref(), &id),
            JobCommands::List {
                status,
                estimator,
                search,
            } => {
                let filter = cli::build_filter(status.as_deref(), estimator, search)?;
                cli::list_jobs(store.as_ref(), company, &filter)
            }
        },
        Commands::Estimator { command } => match command {
            EstimatorCommands::Add { name } => cli::add_estimator(store.as_ref(), company, &name),
            EstimatorCommands::List => cli::list_estimators(store.as_ref(), company),
            EstimatorCommands::Remove { id } => cli::remove_estimator(store.as_ref(), &id),
        },
        Commands::Stats => cli::show_stats(store.as_ref(), company),
        Commands::Export {
            format,
            output,
            status,
            estimator,
            search,
        } => {
            let format = ExportFormat::parse(&format)
                .ok_or_else(|| anyhow::anyhow!("unknown export format {format:?}"))?;
            let filter = cli::build_filter(status.as_deref(), estimator, search)?;
            cli::export_jobs(store.as_ref(), company, &filter, format, output)
        }
        Commands::Watch {
            status,
            estimator,
            search,
        } => {
            let filter = cli::build_filter(status.as_deref(), estimator, search)?;
            cli::watch(store, company, filter)
        }
    }
}
