use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::MultiSelect;
use owo_colors::OwoColorize;
use rooster_core::account;
use rooster_core::days::expand_days;

use crate::app::App;
use crate::commands::{parse_days, resolve_event};
use crate::utils::tui;

pub async fn register(app: &App, event: &str, day_args: &[String]) -> Result<()> {
    let session = app.session()?;
    let repo = app.repo();
    let event = resolve_event(&repo, event).await?;

    let mut days = parse_days(day_args)?;
    let span = expand_days(&event);
    if days.is_empty() && span.len() > 1 && tui::interactive() {
        days = prompt_days(&span)?;
    }

    let spinner = tui::create_spinner(format!("Registering for {}", event.name));
    let result = account::register_for_event(&repo, &session, &event.id, &days).await;
    spinner.finish_and_clear();
    result?;

    println!("{}", format!("Registered for {}", event.name).green());
    if span.len() > 1 {
        let mut picked = days;
        picked.sort();
        picked.dedup();
        let labels: Vec<String> = picked.iter().map(|d| d.format("%a %d %b").to_string()).collect();
        println!("   {}", labels.join(", ").dimmed());
    }
    Ok(())
}

fn prompt_days(span: &[NaiveDate]) -> Result<Vec<NaiveDate>> {
    let labels: Vec<String> = span.iter().map(|d| d.format("%a %d %b %Y").to_string()).collect();
    let picked = MultiSelect::new()
        .with_prompt("  Which days can you help? (space to select)")
        .items(&labels)
        .interact()?;
    Ok(picked.into_iter().map(|i| span[i]).collect())
}

pub async fn unregister(app: &App, event: &str) -> Result<()> {
    let session = app.session()?;
    let repo = app.repo();
    let event = resolve_event(&repo, event).await?;

    let was_registered = repo.volunteer(&session.volunteer_id).await?.is_registered_for(&event.id);
    account::unregister_from_event(&repo, &session, &event.id).await?;

    if was_registered {
        println!("Unregistered from {}", event.name);
    } else {
        println!("{}", format!("You were not registered for {}", event.name).dimmed());
    }
    Ok(())
}
