use anyhow::Result;
use clap::Subcommand;
use owo_colors::OwoColorize;
use rooster_core::admin;
use rooster_core::days::parse_day;
use rooster_core::EventDraft;

use crate::app::App;
use crate::commands::resolve_event;
use crate::render::Render;
use crate::utils::tui;

#[derive(Subcommand)]
pub enum EventAction {
    /// Create an event
    Add {
        name: String,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day (YYYY-MM-DD); defaults to the first day
        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an event
    Remove {
        /// Event id or name
        event: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn run(app: &App, action: EventAction) -> Result<()> {
    let session = app.admin_session()?;
    let repo = app.repo();

    match action {
        EventAction::Add {
            name,
            start,
            end,
            location,
            description,
        } => {
            let start_date = parse_day(&start).map_err(|e| anyhow::anyhow!(e))?;
            let end_date = match end {
                Some(end) => parse_day(&end).map_err(|e| anyhow::anyhow!(e))?,
                None => start_date,
            };
            let draft = EventDraft {
                name,
                start_date,
                end_date,
                description,
                location,
            };
            let event = admin::create_event(&repo, &session, &draft).await?;
            println!("{} {}", "Created".green(), event.render());
            println!("   {}", event.id.dimmed());
        }
        EventAction::Remove { event, force } => {
            let event = resolve_event(&repo, &event).await?;
            println!("{}", event.render());
            if !tui::confirm(&format!("Delete event {}?", event.name), force)? {
                return Ok(());
            }
            admin::delete_event(&repo, &session, &event.id).await?;
            println!("Deleted {}", event.name);
        }
    }

    Ok(())
}
