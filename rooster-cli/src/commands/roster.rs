use anyhow::Result;
use clap::Subcommand;
use dialoguer::MultiSelect;
use owo_colors::OwoColorize;
use rooster_core::admin::{self, ResolvedBlock};
use rooster_core::days::parse_day;
use rooster_core::{AssignmentDraft, AssignmentEdit, DeletionStaging, ScheduleView};

use crate::app::App;
use crate::commands::{parse_time, resolve_event, resolve_volunteer};
use crate::render::{Render, pluralize, render_schedule};
use crate::utils::tui;

#[derive(Subcommand)]
pub enum RosterAction {
    /// Volunteer × hour grid for one event day
    Show {
        /// Event id or name
        event: String,

        /// Day to show (YYYY-MM-DD); defaults to the first day
        #[arg(short, long)]
        day: Option<String>,
    },
    /// All roster blocks in start order
    List {
        /// Only blocks of this event (id or name)
        #[arg(short, long)]
        event: Option<String>,
    },
    /// Put a volunteer on the roster (admin)
    Add {
        /// Event id or name
        event: String,

        /// Volunteer email or record id
        #[arg(long)]
        volunteer: String,

        /// YYYY-MM-DD
        #[arg(long)]
        day: String,

        /// Start time (HH:MM)
        #[arg(long)]
        from: String,

        /// End time (HH:MM)
        #[arg(long)]
        to: String,

        #[arg(long)]
        department: String,
    },
    /// Change a block's department or times (admin)
    Edit {
        /// Block record id
        id: String,

        #[arg(long)]
        department: Option<String>,

        /// New start time (HH:MM)
        #[arg(long)]
        from: Option<String>,

        /// New end time (HH:MM)
        #[arg(long)]
        to: Option<String>,
    },
    /// Delete roster blocks (admin)
    Delete {
        /// Block record ids. Without ids, pick from an event's blocks.
        ids: Vec<String>,

        /// Event to pick blocks from
        #[arg(short, long)]
        event: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn run(app: &App, action: RosterAction) -> Result<()> {
    match action {
        RosterAction::Show { event, day } => show(app, &event, day.as_deref()).await,
        RosterAction::List { event } => list(app, event.as_deref()).await,
        RosterAction::Add {
            event,
            volunteer,
            day,
            from,
            to,
            department,
        } => {
            let repo = app.repo();
            let session = app.admin_session()?;
            let event = resolve_event(&repo, &event).await?;
            let volunteer = resolve_volunteer(&repo, &volunteer).await?;

            let draft = AssignmentDraft {
                event_id: event.id.clone(),
                volunteer_id: volunteer.id.clone(),
                department,
                day: parse_day(&day).map_err(|e| anyhow::anyhow!(e))?,
                start_time: parse_time(&from)?,
                end_time: parse_time(&to)?,
            };
            let block = admin::add_assignment(&repo, &session, &draft).await?;

            println!(
                "{}",
                format!(
                    "Rostered {} at {} on {} {}",
                    volunteer.display_name(),
                    block.department,
                    draft.day.format("%a %d %b"),
                    block.render_interval()
                )
                .green()
            );
            Ok(())
        }
        RosterAction::Edit {
            id,
            department,
            from,
            to,
        } => {
            let repo = app.repo();
            let session = app.admin_session()?;
            let edit = AssignmentEdit {
                department,
                start_time: from.as_deref().map(parse_time).transpose()?,
                end_time: to.as_deref().map(parse_time).transpose()?,
            };
            let block = admin::edit_assignment(&repo, &session, &id, &edit).await?;
            println!(
                "{}",
                format!("Updated {}: {} {}", block.id, block.department, block.render_interval()).green()
            );
            Ok(())
        }
        RosterAction::Delete { ids, event, force } => delete(app, ids, event.as_deref(), force).await,
    }
}

async fn show(app: &App, event: &str, day: Option<&str>) -> Result<()> {
    let repo = app.repo();
    let event = resolve_event(&repo, event).await?;

    let spinner = tui::create_spinner(format!("Loading roster for {}", event.name));
    let view = async {
        let mut view = ScheduleView::open(&repo, &event.id, app.slots()?).await?;
        if let Some(day) = day {
            let day = parse_day(day).map_err(|e| anyhow::anyhow!(e))?;
            view.select_day(&repo, day).await?;
        }
        Ok::<_, anyhow::Error>(view)
    }
    .await;
    spinner.finish_and_clear();

    println!("{}", render_schedule(&view?));
    Ok(())
}

async fn list(app: &App, event: Option<&str>) -> Result<()> {
    let repo = app.repo();
    let event_id = match event {
        Some(query) => Some(resolve_event(&repo, query).await?.id),
        None => None,
    };

    let blocks = admin::resolved_roster(&repo, event_id.as_deref()).await?;
    if blocks.is_empty() {
        println!("{}", "No roster blocks".dimmed());
        return Ok(());
    }
    for block in &blocks {
        println!("{}", block.render());
    }
    Ok(())
}

async fn delete(app: &App, ids: Vec<String>, event: Option<&str>, force: bool) -> Result<()> {
    let repo = app.repo();
    let session = app.admin_session()?;

    let event_id = match event {
        Some(query) => Some(resolve_event(&repo, query).await?.id),
        None => None,
    };
    let blocks = admin::resolved_roster(&repo, event_id.as_deref()).await?;

    let mut staging = DeletionStaging::new();
    if ids.is_empty() {
        if event_id.is_none() {
            anyhow::bail!("Pass block ids, or --event to pick blocks interactively");
        }
        for i in pick_blocks(&blocks)? {
            staging.select(&blocks[i].id);
        }
    } else {
        for id in &ids {
            staging.select(id);
        }
    }

    // Validates the selection before anything is shown or asked.
    let valid = staging.valid_ids()?;

    for id in &valid {
        match blocks.iter().find(|b| &b.id == id) {
            Some(block) => println!("  {}", block.render()),
            None => println!("  {}", id.dimmed()),
        }
    }

    let prompt = format!("Delete {} roster {}?", valid.len(), pluralize("block", valid.len()));
    if !tui::confirm(&prompt, force)? {
        return Ok(());
    }

    let spinner = tui::create_spinner("Deleting".into());
    let result = admin::delete_assignments(&repo, &session, &mut staging).await;
    spinner.finish_and_clear();

    let deleted = result?;
    println!(
        "{}",
        format!("Deleted {} roster {}", deleted.len(), pluralize("block", deleted.len())).green()
    );
    Ok(())
}

fn pick_blocks(blocks: &[ResolvedBlock]) -> Result<Vec<usize>> {
    if blocks.is_empty() {
        anyhow::bail!("This event has no roster blocks");
    }
    if !tui::interactive() {
        anyhow::bail!("Pass the block ids to delete");
    }
    let labels: Vec<String> = blocks.iter().map(|b| b.render()).collect();
    Ok(MultiSelect::new()
        .with_prompt("  Select blocks to delete (space to select)")
        .items(&labels)
        .interact()?)
}
