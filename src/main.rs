use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use planr::calendar::{IcsCalendar, NullCalendar};
use planr::display::{assignment_table, schedule_report};
use planr::domain::Assignment;
use planr::scheduler::{Planner, StudyBudget};
use planr::store::{AssignmentStore, SortOrder, read_assignments, write_assignments};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("planr.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_store(config: &Config) -> Result<AssignmentStore> {
    let path = &config.storage.db_path;
    AssignmentStore::open(path).context(format!("Failed to open assignment store at {}", path.display()))
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
        println!("Database: {}", config.storage.db_path.display());
    }

    match &cli.command {
        Commands::Add {
            subject,
            name,
            deadline,
            duration,
            weight,
            size,
            group_size,
        } => {
            let assignment = Assignment::new(
                subject,
                name,
                *deadline,
                *duration,
                *weight,
                *size,
                group_size.is_some(),
                group_size.unwrap_or(1),
            );
            handle_add_command(assignment, config)
        }
        Commands::Delete { id } => handle_delete_command(*id, config),
        Commands::List { subject, sort } => handle_list_command(subject.as_deref(), (*sort).into(), config),
        Commands::Schedule {
            weekday_hours,
            weekend_hours,
            start_date,
            ics,
            no_calendar,
        } => {
            let budget = StudyBudget::new(
                weekday_hours.unwrap_or(config.schedule.weekday_hours),
                weekend_hours.unwrap_or(config.schedule.weekend_hours),
            );
            let start_date = start_date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let ics_path = (!*no_calendar).then(|| ics.clone().unwrap_or_else(|| config.calendar.ics_path()));
            handle_schedule_command(budget, start_date, ics_path.as_deref(), cli.is_verbose(), config)
        }
        Commands::Import { file } => handle_import_command(file, config),
        Commands::Export { file } => handle_export_command(file, config),
    }
}

fn handle_add_command(assignment: Assignment, config: &Config) -> Result<()> {
    let mut store = open_store(config)?;
    let id = store.insert(&assignment).context("Failed to add assignment")?;
    info!("Added assignment {} ({})", id, assignment.name);
    println!(
        "{} {} (id {}, {}h remaining)",
        "Added".green(),
        assignment.name.bold(),
        id,
        assignment.real_duration
    );
    Ok(())
}

fn handle_delete_command(id: i64, config: &Config) -> Result<()> {
    let mut store = open_store(config)?;
    store.delete(id).context(format!("Failed to delete assignment {}", id))?;
    println!("{} assignment {}", "Deleted".green(), id);
    Ok(())
}

fn handle_list_command(subject: Option<&str>, sort: SortOrder, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let assignments = match subject {
        Some(subject) => store.list_subject_sorted(subject, sort),
        None => store.list_sorted(sort),
    }
    .context("Failed to list assignments")?;

    if assignments.is_empty() {
        println!("{}", "No assignments found".yellow());
        return Ok(());
    }
    print!("{}", assignment_table(&assignments));
    Ok(())
}

fn handle_schedule_command(
    budget: StudyBudget,
    start_date: NaiveDate,
    ics_path: Option<&Path>,
    verbose: bool,
    config: &Config,
) -> Result<()> {
    let mut store = open_store(config)?;
    let planner = Planner::new(budget);
    info!(
        "Scheduling from {} with {}h weekdays / {}h weekends",
        start_date, budget.weekday_hours, budget.weekend_hours
    );

    let summary = match ics_path {
        Some(path) => {
            let mut calendar = IcsCalendar::create(path, start_date, config.calendar.anchor_hour)
                .context(format!("Failed to create calendar file {}", path.display()))?;
            let summary = planner
                .run_from_store(&mut store, &mut calendar)
                .context("Failed to load assignments")?;
            let written = calendar.finish().context("Failed to finish calendar file")?;
            println!("{} {}", "Calendar written to".cyan(), written.display());
            summary
        }
        None => planner
            .run_from_store(&mut store, &mut NullCalendar)
            .context("Failed to load assignments")?,
    };

    if summary.days.is_empty() && summary.preresolved.is_empty() {
        println!("{}", "Nothing to schedule".yellow());
        return Ok(());
    }

    if verbose {
        print!("{}", schedule_report(&summary));
    } else {
        for day in &summary.days {
            for allocation in &day.allocations {
                println!("Day {}, Hour {}: {}", day.day, allocation.hour + 1, allocation.title);
            }
            for missed in &day.missed {
                println!("{} {}", "Missed deadline for assignment:".red(), missed.name);
            }
        }
    }

    println!(
        "{} {} hours over {} days, {} completed, {} missed",
        "Scheduled".green(),
        summary.total_hours(),
        summary.days.len(),
        summary.completed().count(),
        summary.missed().count()
    );
    for warning in &summary.warnings {
        println!("{} {}", "warning:".yellow(), warning);
    }
    Ok(())
}

fn handle_import_command(file: &Path, config: &Config) -> Result<()> {
    let assignments = read_assignments(file).context(format!("Failed to read {}", file.display()))?;
    let mut store = open_store(config)?;

    let mut imported = 0;
    for assignment in &assignments {
        match store.insert(assignment) {
            Ok(_) => imported += 1,
            Err(e) => {
                log::warn!("Skipping {}: {}", assignment.name, e);
                println!("{} {}: {}", "Skipped".yellow(), assignment.name, e);
            }
        }
    }
    println!("{} {} assignments from {}", "Imported".green(), imported, file.display());
    Ok(())
}

fn handle_export_command(file: &Path, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let assignments = store.list_all().context("Failed to list assignments")?;
    write_assignments(file, &assignments).context(format!("Failed to write {}", file.display()))?;
    println!("{} {} assignments to {}", "Exported".green(), assignments.len(), file.display());
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
