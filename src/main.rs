//! mindflow-report: print the weekly report for one week as JSON.
//!
//! Tasks come from the configured SQLite store unless `--backup` names a JSON
//! backup file. The week defaults to the current one; `--offset -1` is last week.
//! `--export` also writes the loaded tasks to a backup file.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use clap::Parser;
use serde_json::json;

use mindflow_lib::analysis::analyze_in;
use mindflow_lib::backup::{read_backup_file, write_backup_file};
use mindflow_lib::db::TaskDb;
use mindflow_lib::state::load_config;
use mindflow_lib::types::{Config, TaskRecord};
use mindflow_lib::util::now_millis;
use mindflow_lib::week::{shift_week, week_label, week_start, week_window};

#[derive(Debug, Parser)]
#[command(
    name = "mindflow-report",
    version,
    about = "Print the MindFlow weekly report as JSON"
)]
struct Args {
    /// Task database to read (defaults to the configured one).
    #[arg(long, conflicts_with = "backup")]
    db: Option<PathBuf>,

    /// Read tasks from a JSON backup file instead of the database.
    #[arg(long)]
    backup: Option<PathBuf>,

    /// Any day of the week to report on, as YYYY-MM-DD (defaults to today).
    #[arg(long)]
    week: Option<NaiveDate>,

    /// Whole weeks to move from the selected week (negative goes back).
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    offset: i64,

    /// IANA time zone for reading task dates (overrides the config file).
    #[arg(long)]
    tz: Option<String>,

    /// Also write the loaded tasks to this backup file.
    #[arg(long)]
    export: Option<PathBuf>,
}

fn load_tasks(args: &Args, config: &Config) -> Result<Vec<TaskRecord>, String> {
    if let Some(path) = &args.backup {
        return read_backup_file(path)
            .map_err(|e| format!("{} ({})", e, e.recovery_suggestion()));
    }
    let db = match &args.db {
        Some(path) => TaskDb::open_at(path.clone()),
        None => TaskDb::open(config),
    }
    .map_err(|e| format!("Failed to open task database: {}", e))?;
    db.get_all_tasks()
        .map_err(|e| format!("Failed to load tasks: {}", e))
}

fn render_report<Z: TimeZone>(
    tasks: &[TaskRecord],
    args: &Args,
    tz: &Z,
) -> serde_json::Value {
    let today = Utc::now().with_timezone(tz).date_naive();
    let start = shift_week(week_start(args.week.unwrap_or(today)), args.offset);
    let (start, end) = week_window(start);
    let report = analyze_in(tasks, start, end, tz);
    log::info!(
        "Week {}..{}: '{}' ({} points)",
        start,
        end,
        report.title,
        report.score.total_score
    );
    json!({
        "weekStart": start,
        "weekEnd": end,
        "label": week_label(start),
        "report": report,
    })
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let mut config = load_config()?;
    if let Some(tz) = &args.tz {
        config.timezone = Some(tz.clone());
    }
    let tasks = load_tasks(&args, &config)?;

    if let Some(path) = &args.export {
        write_backup_file(path, &tasks, config.device_name(), now_millis())
            .map_err(|e| format!("{} ({})", e, e.recovery_suggestion()))?;
    }

    let output = match config.resolved_timezone() {
        Some(tz) => render_report::<Tz>(&tasks, &args, &tz),
        None => render_report(&tasks, &args, &Local),
    };
    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|e| format!("Failed to render report: {}", e))?;
    println!("{}", rendered);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("mindflow-report: {}", e);
            ExitCode::FAILURE
        }
    }
}
