//! Sightline CLI - a minimal shell around the page pipeline
//!
//! Usage:
//!   sightline pages
//!   sightline run <page> [--user <name>] [--filter <facet=v1,v2>]... [--csv <path>]
//!   sightline validate
//!
//! Examples:
//!   sightline run deals_closing --filter "Service Line=Consulting"
//!   sightline run invoice_details --user "Alpesh Patel" --csv invoices.csv

use clap::{Parser, Subcommand, ValueEnum};
use sightline::config::Settings;
use sightline::filter::FacetSelection;
use sightline::model::Value;
use sightline::pages;
use sightline::pipeline::{self, PageOutput};
use sightline::store::DatasetStore;
use sightline::validation;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sightline")]
#[command(about = "Sightline - CRM dashboard data pipeline")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ./sightline.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available pages
    Pages,

    /// Run a page and print its KPIs and blocks
    Run {
        /// Page name (see `sightline pages`)
        page: String,

        /// Identity to run as ("admin" sees everything)
        #[arg(short, long, default_value = "admin")]
        user: String,

        /// Facet selection, repeatable: --filter "Deal Owner=Ana,Bob"
        #[arg(short, long)]
        filter: Vec<String>,

        /// Write the page's CSV export to this path
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        output: OutputFormat,
    },

    /// Validate the built-in page specs
    Validate,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Plain text tables
    Table,
    /// JSON page output
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = match load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Pages => cmd_pages(),
        Commands::Run {
            page,
            user,
            filter,
            csv,
            output,
        } => cmd_run(&settings, &page, &user, &filter, csv, output),
        Commands::Validate => cmd_validate(),
    }
}

fn load_settings(path: Option<&std::path::Path>) -> Result<Settings, sightline::config::SettingsError> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn cmd_pages() -> ExitCode {
    for page in pages::registry() {
        println!("{:<24} {}", page.name, page.title);
    }
    ExitCode::SUCCESS
}

fn cmd_validate() -> ExitCode {
    match validation::validate(&pages::registry()) {
        Ok(()) => {
            println!("All page specs valid.");
            ExitCode::SUCCESS
        }
        Err(errors) => {
            eprintln!("Validation errors:");
            for error in errors {
                eprintln!("  {}", error);
            }
            ExitCode::FAILURE
        }
    }
}

fn cmd_run(
    settings: &Settings,
    page_name: &str,
    user: &str,
    filters: &[String],
    csv: Option<PathBuf>,
    output: OutputFormat,
) -> ExitCode {
    let Some(page) = pages::page(page_name) else {
        eprintln!("Unknown page '{}'. See `sightline pages`.", page_name);
        return ExitCode::FAILURE;
    };

    if !settings.auth.knows(user) {
        eprintln!("Unknown user '{}'.", user);
        return ExitCode::FAILURE;
    }

    let selection = match parse_filters(filters) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = match settings.source.build() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Source error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let today = chrono::Local::now().date_naive();
    let mut store = DatasetStore::new(source, today);
    let frame = store.get(page.dataset);

    let result = pipeline::run_page(&page, frame, user, &selection);
    match output {
        OutputFormat::Table => print_output(&result),
        OutputFormat::Json => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("JSON error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    if let Some(path) = csv {
        match pipeline::export_page(&page, frame, user, &selection) {
            Ok(Some(bytes)) => {
                if let Err(e) = fs::write(&path, bytes) {
                    eprintln!("Error writing '{}': {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
                println!("Export written to {}", path.display());
            }
            Ok(None) => println!("Page '{}' has no export.", page.name),
            Err(e) => {
                eprintln!("Export error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Parse repeated `facet=v1,v2` arguments.
fn parse_filters(filters: &[String]) -> Result<FacetSelection, String> {
    let mut selection = FacetSelection::new();
    for raw in filters {
        let Some((facet, values)) = raw.split_once('=') else {
            return Err(format!("Invalid filter '{}': expected facet=v1,v2", raw));
        };
        selection.set(
            facet.trim().to_string(),
            values.split(',').map(|v| v.trim().to_string()).collect(),
        );
    }
    Ok(selection)
}

fn print_output(result: &PageOutput) {
    println!("{}", result.title);
    if !result.kpis.is_empty() {
        println!();
        for kpi in &result.kpis {
            println!("  {:<24} {}", kpi.label, kpi.value);
        }
    }
    for block in &result.blocks {
        println!();
        println!("[{}]", block.name);
        print_frame(&block.frame);
    }
}

fn print_frame(frame: &sightline::model::Frame) {
    let columns = frame.columns();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    let rows: Vec<Vec<String>> = frame
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    let cell = row
                        .get(column)
                        .map(Value::canonical)
                        .unwrap_or_default();
                    widths[idx] = widths[idx].max(cell.len());
                    cell
                })
                .collect()
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| format!("{:<width$}", column, width = widths[idx]))
        .collect();
    println!("  {}", header.join("  "));
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(idx, cell)| format!("{:<width$}", cell, width = widths[idx]))
            .collect();
        println!("  {}", cells.join("  "));
    }
    if frame.is_empty() {
        println!("  (no rows)");
    }
}
