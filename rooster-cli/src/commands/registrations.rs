use anyhow::Result;
use owo_colors::OwoColorize;
use rooster_core::admin;

use crate::app::App;
use crate::render::{Render, pluralize};
use crate::utils::tui;

/// Who signed up for what, per event.
pub async fn run(app: &App) -> Result<()> {
    app.admin_session()?;
    let repo = app.repo();

    let spinner = tui::create_spinner("Loading registrations".into());
    let overview = admin::registrations_by_event(&repo).await;
    spinner.finish_and_clear();
    let overview = overview?;

    if overview.is_empty() {
        println!("{}", "No events yet".dimmed());
        return Ok(());
    }

    for entry in &overview {
        let count = entry.volunteers.len();
        println!(
            "{} {}",
            entry.event.render(),
            format!("({count} {})", pluralize("volunteer", count)).dimmed()
        );
        for volunteer in &entry.volunteers {
            println!("   {}", volunteer.render());
        }
        println!();
    }

    Ok(())
}
