//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - add / delete / list: manage stored assignments
//! - schedule: plan study hours and write the calendar
//! - import / export: JSON files

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use planr::store::SortOrder;

/// Planr - priority-based study scheduler
#[derive(Parser, Debug)]
#[command(name = "planr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Listing order
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortArg {
    #[default]
    Id,
    Deadline,
    Duration,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Id => SortOrder::Id,
            SortArg::Deadline => SortOrder::Deadline,
            SortArg::Duration => SortOrder::Duration,
        }
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add an assignment
    Add {
        /// Subject, e.g. "Math"
        subject: String,

        /// Assignment name
        name: String,

        /// Days until the deadline
        #[arg(short, long)]
        deadline: i32,

        /// Estimated hours of work
        #[arg(short = 'u', long)]
        duration: i32,

        /// Share of the final grade, in percent
        #[arg(short, long)]
        weight: f64,

        /// Size class: 1 = large, 2 = medium, 3 = small
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=3))]
        size: i32,

        /// Number of people sharing the work (implies group work)
        #[arg(short, long)]
        group_size: Option<i32>,
    },

    /// Delete an assignment by id
    Delete {
        /// Assignment id
        id: i64,
    },

    /// List stored assignments
    List {
        /// Only show this subject
        #[arg(short, long)]
        subject: Option<String>,

        /// Sort order
        #[arg(long, value_enum, default_value_t = SortArg::Id)]
        sort: SortArg,
    },

    /// Schedule study hours for every stored assignment
    Schedule {
        /// Study hours on a weekday
        #[arg(long)]
        weekday_hours: Option<u32>,

        /// Study hours on a weekend day
        #[arg(long)]
        weekend_hours: Option<u32>,

        /// Date of day 1 (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Calendar output file
        #[arg(long, conflicts_with = "no_calendar")]
        ics: Option<PathBuf>,

        /// Do not write a calendar file
        #[arg(long)]
        no_calendar: bool,
    },

    /// Import assignments from a JSON file
    Import {
        /// JSON file to read
        file: PathBuf,
    },

    /// Export assignments to a JSON file
    Export {
        /// JSON file to write
        file: PathBuf,
    },
}
