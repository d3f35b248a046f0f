use anyhow::Result;
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use rooster_core::{ProfileUpdate, account};

use crate::app::App;
use crate::render::Render;

/// Editable profile fields. Unset flags leave the stored value alone.
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub nickname: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub postcode: Option<String>,

    #[arg(long)]
    pub city: Option<String>,
}

impl ProfileArgs {
    pub fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            nickname: self.nickname,
            email: None,
            phone: self.phone,
            address: self.address,
            postcode: self.postcode,
            city: self.city,
        }
    }
}

#[derive(Subcommand)]
pub enum ProfileAction {
    Show,
    Edit {
        #[arg(long)]
        email: Option<String>,

        #[command(flatten)]
        profile: ProfileArgs,
    },
}

pub async fn run(app: &App, action: Option<ProfileAction>) -> Result<()> {
    let session = app.session()?;
    let repo = app.repo();

    match action.unwrap_or(ProfileAction::Show) {
        ProfileAction::Show => {
            let profile = account::profile(&repo, &session).await?;
            println!("{}", profile.render());

            let rows = [
                ("Name", &profile.name),
                ("Nickname", &profile.nickname),
                ("Phone", &profile.phone),
                ("Address", &profile.address),
                ("Postcode", &profile.postcode),
                ("City", &profile.city),
            ];
            for (label, value) in rows {
                let value = value.as_deref().unwrap_or("-");
                println!("  {:<10} {}", label.dimmed(), value);
            }

            let events = repo.events().await?;
            let registered: Vec<&str> = events
                .iter()
                .filter(|e| profile.is_registered_for(&e.id))
                .map(|e| e.name.as_str())
                .collect();
            if !registered.is_empty() {
                println!("  {:<10} {}", "Events".dimmed(), registered.join(", "));
            }
        }
        ProfileAction::Edit { email, profile } => {
            let update = ProfileUpdate {
                email,
                ..profile.into_update()
            };
            let updated = account::update_profile(&repo, &session, &update).await?;
            println!("{}", format!("Updated profile of {}", updated.display_name()).green());
        }
    }

    Ok(())
}
