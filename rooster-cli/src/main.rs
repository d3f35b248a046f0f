mod app;
mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::app::App;

#[derive(Parser)]
#[command(name = "rooster")]
#[command(about = "Sign up for events and manage volunteer rosters")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with the email address you signed up with
    Login { email: String },
    Logout,
    /// Show who is logged in
    Whoami,
    /// Create a volunteer account and log in
    Signup {
        email: String,

        #[command(flatten)]
        profile: commands::profile::ProfileArgs,
    },
    /// List events
    Events,
    /// List the days of an event
    Days {
        /// Event id or name
        event: String,
    },
    /// Sign up for an event
    Register {
        /// Event id or name
        event: String,

        /// Day to help on (YYYY-MM-DD); repeat for several days
        #[arg(long = "day")]
        days: Vec<String>,
    },
    /// Withdraw from an event
    Unregister {
        /// Event id or name
        event: String,
    },
    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        action: Option<commands::profile::ProfileAction>,
    },
    /// Roster grid and roster blocks
    Roster {
        #[command(subcommand)]
        action: commands::roster::RosterAction,
    },
    /// Manage departments
    Departments {
        #[command(subcommand)]
        action: Option<commands::departments::DepartmentAction>,
    },
    /// Create or remove events (admin)
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Volunteers signed up per event (admin)
    Registrations,
    /// Validate the store against the configured field names
    Check,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{}", format!("{e:#}").red());
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ROOSTER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Commands that run without the startup schema check.
    match cli.command {
        Commands::Logout => return commands::account::logout(),
        Commands::Whoami => return commands::account::whoami(),
        Commands::Check => return commands::check::run(&App::connect().await?).await,
        _ => {}
    }

    let app = App::load().await?;

    match cli.command {
        Commands::Login { email } => commands::account::login(&app, &email).await,
        Commands::Logout | Commands::Whoami | Commands::Check => Ok(()),
        Commands::Signup { email, profile } => commands::account::signup(&app, &email, profile).await,
        Commands::Events => commands::events::list(&app).await,
        Commands::Days { event } => commands::events::days(&app, &event).await,
        Commands::Register { event, days } => commands::registration::register(&app, &event, &days).await,
        Commands::Unregister { event } => commands::registration::unregister(&app, &event).await,
        Commands::Profile { action } => commands::profile::run(&app, action).await,
        Commands::Roster { action } => commands::roster::run(&app, action).await,
        Commands::Departments { action } => commands::departments::run(&app, action).await,
        Commands::Event { action } => commands::event::run(&app, action).await,
        Commands::Registrations => commands::registrations::run(&app).await,
    }
}
