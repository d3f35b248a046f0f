use anyhow::Result;
use owo_colors::OwoColorize;
use rooster_core::Session;
use rooster_core::days::expand_days;

use crate::app::App;
use crate::commands::resolve_event;
use crate::render::{Render, pluralize};
use crate::utils::tui;

pub async fn list(app: &App) -> Result<()> {
    let repo = app.repo();

    let spinner = tui::create_spinner("Loading events".into());
    let events = repo.events().await;
    spinner.finish_and_clear();
    let events = events?;

    if events.is_empty() {
        println!("{}", "No events yet".dimmed());
        return Ok(());
    }

    // Registration marks only when someone is logged in.
    let profile = match Session::load()? {
        Some(session) => Some(repo.volunteer(&session.volunteer_id).await?),
        None => None,
    };

    for event in &events {
        let days = expand_days(event).len();
        let mut line = event.render();
        if days > 1 {
            line.push_str(&format!(" {}", format!("({days} {})", pluralize("day", days)).dimmed()));
        }
        if profile.as_ref().is_some_and(|p| p.is_registered_for(&event.id)) {
            line.push_str(&format!(" {}", "✓ registered".green()));
        }
        println!("{line}");

        if let Some(description) = &event.description {
            println!("   {}", description.dimmed());
        }
    }

    Ok(())
}

pub async fn days(app: &App, event: &str) -> Result<()> {
    let event = resolve_event(&app.repo(), event).await?;
    let days = expand_days(&event);

    println!("{}", event.render());
    if days.is_empty() {
        println!("   {}", "No dates set".dimmed());
    }
    for day in days {
        println!("   {}", day.format("%a %d %b %Y"));
    }
    Ok(())
}
