pub mod account;
pub mod check;
pub mod departments;
pub mod event;
pub mod events;
pub mod profile;
pub mod registration;
pub mod registrations;
pub mod roster;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use rooster_core::days::parse_day;
use rooster_core::{Event, Repository, VolunteerProfile};

/// Find an event by record id or (case-insensitive) name.
pub async fn resolve_event(repo: &Repository<'_>, query: &str) -> Result<Event> {
    let events = repo.events().await?;
    let query = query.trim();

    if let Some(event) = events
        .iter()
        .find(|e| e.id == query || e.name.eq_ignore_ascii_case(query))
    {
        return Ok(event.clone());
    }

    let available: Vec<&str> = events.iter().map(|e| e.name.as_str()).collect();
    anyhow::bail!(
        "Event '{}' not found. Available: {}",
        query,
        if available.is_empty() { "none".to_string() } else { available.join(", ") }
    );
}

/// Find a volunteer by email address or record id.
pub async fn resolve_volunteer(repo: &Repository<'_>, query: &str) -> Result<VolunteerProfile> {
    let query = query.trim();
    if query.contains('@') {
        return repo
            .volunteer_by_email(query)
            .await?
            .ok_or_else(|| anyhow::anyhow!("No volunteer found with email {query}"));
    }
    Ok(repo.volunteer(query).await?)
}

pub fn parse_days(inputs: &[String]) -> Result<Vec<NaiveDate>> {
    inputs
        .iter()
        .map(|s| parse_day(s).map_err(|e| anyhow::anyhow!(e)))
        .collect()
}

/// Parse HH:MM
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| anyhow::anyhow!("Invalid time '{}'. Expected HH:MM", s))
}
