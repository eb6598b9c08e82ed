use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod calendar;
mod error;
mod html;
mod sample;
mod server;
mod types;

use calendar::MonthCalendar;
use types::{CalendarConfig, DEFAULT_ACCENT_COLOR, DEFAULT_PRIMARY_COLOR};

const DEFAULT_PORT: u16 = 5000;

#[derive(Parser, Debug)]
#[command(name = "scadenziario")]
#[command(about = "Track due dates on a monthly calendar")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Month to display first (1-12). Defaults to the current month
    #[arg(long, global = true)]
    month: Option<u32>,

    /// Year to display first. Defaults to the current year
    #[arg(long, global = true, allow_negative_numbers = true)]
    year: Option<i32>,

    /// Primary color of the calendar (any CSS color)
    #[arg(long, default_value = DEFAULT_PRIMARY_COLOR, global = true)]
    primary_color: String,

    /// Accent color for due dates (any CSS color)
    #[arg(long, default_value = DEFAULT_ACCENT_COLOR, global = true)]
    accent_color: String,

    /// Start with an empty calendar instead of the demo due dates
    #[arg(long, global = true)]
    no_samples: bool,

    /// Output directory for generated files
    #[arg(short, long, default_value = ".", global = true)]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start the web server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Generate a static HTML page for the month (no server)
    Build,

    /// Print the calendar view as JSON
    Show,
}

impl Args {
    fn calendar_config(&self) -> CalendarConfig {
        CalendarConfig {
            month: self.month,
            year: self.year,
            primary_color: self.primary_color.clone(),
            accent_color: self.accent_color.clone(),
        }
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level))
        .add_directive("hyper=warn".parse()?)
        .add_directive("tower_http=warn".parse()?);

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_max_level(Level::TRACE)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level)?;

    let mut calendar = MonthCalendar::new(args.calendar_config())?;
    if !args.no_samples {
        sample::seed_samples(&mut calendar)?;
    }

    match args.command {
        // Default to serve if no command specified
        None => {
            server::serve(DEFAULT_PORT, calendar).await?;
        }
        Some(Commands::Serve { port }) => {
            server::serve(port, calendar).await?;
        }
        Some(Commands::Build) => {
            let html_path = args.output.join("index.html");
            html::generate_html(&calendar.to_view_model(), &html_path)?;
            info!(
                path = %html_path.display(),
                month = %calendar.month_name(),
                year = calendar.year(),
                "HTML saved"
            );
        }
        Some(Commands::Show) => {
            let view = calendar.to_view_model();
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(())
}
