pub mod output;
pub mod report;

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use output::{render, OutputFormat};
use report::{build_report, parse_report_date, DateStyle, Report};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    presence::{entities::UserId, source::CsvPresenceSource},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, create_dir},
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Presence analyzer", version, long_about = None)]
#[command(about = "Presence of employees grouped by weekday", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Presence csv with user_id,date,start_time,end_time rows. By default <dir>/data/presence.csv"
    )]
    data: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = OutputFormat::Json, help = "Format of the printed document")]
    format: OutputFormat,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Mean presence time of a user grouped by weekday")]
    MeanTime { user_id: UserId },
    #[command(about = "Total presence time of a user grouped by weekday")]
    PresenceWeekday { user_id: UserId },
    #[command(about = "Mean start and end time of a user grouped by weekday")]
    StartEnd {
        user_id: UserId,
        #[arg(
            long,
            help = "Day the times are attached to. Examples are \"yesterday\", \"15/03/2025\". Defaults to today"
        )]
        date: Option<String>,
        #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
        date_style: DateStyle,
    },
    #[command(about = "List users present in the data")]
    Users,
}

/// Everything the application needs resolved from the command line. Passed down explicitly
/// instead of being read from globals.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub app_dir: PathBuf,
    pub data_csv: PathBuf,
    pub format: OutputFormat,
}

impl AnalyzerConfig {
    fn from_args(args: &Args) -> Result<Self> {
        let app_dir = match &args.dir {
            Some(dir) => create_dir(dir.clone())?,
            None => create_application_default_path()?,
        };
        let data_csv = args
            .data
            .clone()
            .unwrap_or_else(|| app_dir.join("data").join("presence.csv"));
        Ok(Self {
            app_dir,
            data_csv,
            format: args.format,
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.app_dir.join("logs")
    }
}

impl Commands {
    fn into_report(self, clock: &dyn Clock) -> Result<Report> {
        Ok(match self {
            Commands::MeanTime { user_id } => Report::MeanTime { user_id },
            Commands::PresenceWeekday { user_id } => Report::PresenceWeekday { user_id },
            Commands::StartEnd {
                user_id,
                date,
                date_style,
            } => Report::StartEnd {
                user_id,
                date: date
                    .map(|v| parse_report_date(&v, date_style, clock.time()))
                    .transpose()?,
            },
            Commands::Users => Report::Users,
        })
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();
    let config = AnalyzerConfig::from_args(&args)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &config.log_dir(), logging_level, args.log)?;
    debug!("Using {config:?}");

    let clock = DefaultClock;
    let report = args.commands.into_report(&clock)?;
    let source = CsvPresenceSource::new(config.data_csv.clone());
    let document = build_report(&report, &source, &clock).await?;
    render(&document, config.format, io::stdout().lock())
}
