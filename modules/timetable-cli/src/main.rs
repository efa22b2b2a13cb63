use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use timetable_common::format::parse_date;
use untis_client::{fetch_schedules, ElementType, TimetableQuery, UntisClient};

mod config;
mod render;

use config::Config;

#[derive(Parser)]
#[command(name = "timetable")]
#[command(about = "Reconstruct weekly schedules from a WebUntis timetable")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a timetable and print its weekly schedules
    Schedules {
        /// Type of the element whose timetable is fetched
        #[arg(long, value_enum)]
        element_type: ElementKind,

        /// Id of the element
        #[arg(long)]
        id: i64,

        /// First day (yyyy-mm-dd)
        #[arg(long, value_parser = parse_date)]
        from: NaiveDate,

        /// Last day, inclusive (yyyy-mm-dd)
        #[arg(long, value_parser = parse_date)]
        to: NaiveDate,

        /// Keep double periods as separate schedules
        #[arg(long)]
        no_combine: bool,

        /// Print JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },

    /// List master data
    Elements {
        #[arg(value_enum)]
        kind: MasterKind,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ElementKind {
    Class,
    Teacher,
    Subject,
    Room,
    Student,
}

impl From<ElementKind> for ElementType {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Class => ElementType::Class,
            ElementKind::Teacher => ElementType::Teacher,
            ElementKind::Subject => ElementType::Subject,
            ElementKind::Room => ElementType::Room,
            ElementKind::Student => ElementType::Student,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MasterKind {
    Classes,
    Teachers,
    Subjects,
    Rooms,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays clean for output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("timetable=info".parse()?)
                .add_directive("untis_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.log_redacted();

    let client = UntisClient::new(&config.server, &config.school);
    client
        .authenticate(&config.user, &config.password, &config.client_name)
        .await
        .context("Authentication failed")?;

    let outcome = run(&client, cli.command).await;

    if let Err(e) = client.logout().await {
        warn!(error = %e, "Logout failed");
    }
    outcome
}

async fn run(client: &UntisClient, command: Commands) -> Result<()> {
    match command {
        Commands::Schedules {
            element_type,
            id,
            from,
            to,
            no_combine,
            json,
        } => {
            anyhow::ensure!(from <= to, "--from {from} is after --to {to}");
            let query = TimetableQuery {
                element_type: element_type.into(),
                element_id: id,
                start: from,
                end: to,
            };

            let schedules = fetch_schedules(client, &query, !no_combine)
                .await
                .context("Failed to fetch schedules")?;
            info!(count = schedules.len(), "Schedules ready");

            if json {
                println!("{}", serde_json::to_string_pretty(&schedules)?);
            } else {
                print!("{}", render::schedules(&schedules));
            }
        }
        Commands::Elements { kind, json } => {
            let elements = match kind {
                MasterKind::Classes => client.classes().await,
                MasterKind::Teachers => client.teachers().await,
                MasterKind::Subjects => client.subjects().await,
                MasterKind::Rooms => client.rooms().await,
            }
            .context("Failed to fetch master data")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&elements)?);
            } else {
                print!("{}", render::elements(&elements));
            }
        }
    }
    Ok(())
}
