use anyhow::Result;
use clap::Subcommand;
use owo_colors::OwoColorize;
use rooster_core::admin;
use rooster_core::palette::DepartmentPalette;
use rooster_core::{Department, Repository};

use crate::app::App;
use crate::render::swatch;
use crate::utils::tui;

#[derive(Subcommand)]
pub enum DepartmentAction {
    /// List departments with their colours
    List,
    /// Add a department (admin)
    Add { name: String },
    /// Rename a department (admin)
    Rename {
        /// Current name or record id
        department: String,
        new_name: String,
    },
    /// Remove a department (admin)
    Remove {
        /// Name or record id
        department: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn run(app: &App, action: Option<DepartmentAction>) -> Result<()> {
    let repo = app.repo();

    match action.unwrap_or(DepartmentAction::List) {
        DepartmentAction::List => {
            let departments = repo.departments().await?;
            if departments.is_empty() {
                println!("{}", "No departments yet".dimmed());
                return Ok(());
            }
            let palette = DepartmentPalette::new(&departments);
            for department in &departments {
                println!(
                    "{} {} {}",
                    swatch(palette.color(&department.name), 2),
                    department.name,
                    department.id.dimmed()
                );
            }
        }
        DepartmentAction::Add { name } => {
            let session = app.admin_session()?;
            let department = admin::add_department(&repo, &session, &name).await?;
            println!("{}", format!("Added department {}", department.name).green());
        }
        DepartmentAction::Rename { department, new_name } => {
            let session = app.admin_session()?;
            let current = resolve_department(&repo, &department).await?;
            let renamed = admin::rename_department(&repo, &session, &current.id, &new_name).await?;
            println!(
                "{}",
                format!("Renamed {} to {}", current.name, renamed.name).green()
            );
        }
        DepartmentAction::Remove { department, force } => {
            let session = app.admin_session()?;
            let current = resolve_department(&repo, &department).await?;
            // Existing roster blocks keep their label text.
            if !tui::confirm(&format!("Remove department {}?", current.name), force)? {
                return Ok(());
            }
            admin::remove_department(&repo, &session, &current.id).await?;
            println!("Removed department {}", current.name);
        }
    }

    Ok(())
}

async fn resolve_department(repo: &Repository<'_>, query: &str) -> Result<Department> {
    let departments = repo.departments().await?;
    let query = query.trim();
    departments
        .into_iter()
        .find(|d| d.id == query || d.name.eq_ignore_ascii_case(query))
        .ok_or_else(|| anyhow::anyhow!("Department '{query}' not found"))
}
