pub mod meetings;
pub mod schedule;
pub mod simulate;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lendr")]
#[command(about = "Loan schedule calculator and lifecycle simulator.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Log engine decisions in detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read engine settings from this file instead of config/lendr.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the number of currency decimal places
    #[arg(long, global = true)]
    pub digits: Option<u32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a scenario and print its repayment schedule
    #[command(alias = "s")]
    Schedule { scenario: PathBuf },
    /// Run a scenario through submission, approval and disbursal
    #[command(alias = "r")]
    Simulate { scenario: PathBuf },
    /// List upcoming meeting dates of a group calendar
    #[command(alias = "m")]
    Meetings(MeetingArgs),
}

#[derive(Args)]
pub struct MeetingArgs {
    /// First day the calendar is in effect
    #[arg(long)]
    pub start: NaiveDate,
    /// Frequency code: 1 daily, 2 weekly, 3 monthly, 4 yearly
    #[arg(long, default_value_t = 2)]
    pub frequency: u8,
    /// Meet every N frequency units
    #[arg(long, default_value_t = 1)]
    pub interval: u32,
    /// Weekday code of weekly meetings: 1 Monday through 7 Sunday
    #[arg(long)]
    pub day: Option<u8>,
    /// List meetings on or after this date (defaults to the start date)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long, short = 'n', default_value_t = 10)]
    pub count: usize,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
