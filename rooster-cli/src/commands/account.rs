use anyhow::Result;
use dialoguer::Input;
use owo_colors::OwoColorize;
use rooster_core::{Session, account};

use crate::app::App;
use crate::commands::profile::ProfileArgs;
use crate::utils::tui;

pub async fn login(app: &App, email: &str) -> Result<()> {
    let spinner = tui::create_spinner(format!("Looking up {email}"));
    let result = account::login(&app.repo(), email, &app.config.admin_emails).await;
    spinner.finish_and_clear();

    let session = result?;
    session.save()?;
    print_welcome(&session);
    Ok(())
}

pub fn logout() -> Result<()> {
    if Session::clear()? {
        println!("Logged out");
    } else {
        println!("{}", "Not logged in".dimmed());
    }
    Ok(())
}

pub fn whoami() -> Result<()> {
    match Session::load()? {
        Some(session) => {
            println!("{} {}", session.display_name.bold(), format!("<{}>", session.email).dimmed());
            if session.is_admin {
                println!("  {}", "admin".cyan());
            }
            println!(
                "  {}",
                format!("since {}", session.started_at.format("%Y-%m-%d %H:%M UTC")).dimmed()
            );
        }
        None => println!("{}", "Not logged in".dimmed()),
    }
    Ok(())
}

pub async fn signup(app: &App, email: &str, profile: ProfileArgs) -> Result<()> {
    let mut update = profile.into_update();

    if update.nickname.is_none() && tui::interactive() {
        let nickname: String = Input::new().with_prompt("  What should we call you?").interact_text()?;
        update.nickname = Some(nickname);
    }

    let spinner = tui::create_spinner("Creating your account".into());
    let result = account::signup(&app.repo(), email, update, &app.config.admin_emails).await;
    spinner.finish_and_clear();

    let session = result?;
    session.save()?;
    print_welcome(&session);
    Ok(())
}

fn print_welcome(session: &Session) {
    let role = if session.is_admin { " (admin)" } else { "" };
    println!(
        "{}{}",
        format!("Logged in as {}", session.display_name).green(),
        role.dimmed()
    );
}
