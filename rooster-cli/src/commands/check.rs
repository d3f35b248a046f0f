use anyhow::Result;
use owo_colors::OwoColorize;
use rooster_core::Collection;

use crate::app::App;

pub async fn run(app: &App) -> Result<()> {
    app.validate_schema().await?;

    println!("{} {}", "✓".green(), format!("{} store matches the field mapping", app.store_name()).bold());
    for collection in Collection::ALL {
        println!(
            "   {:<14} {}",
            collection.to_string(),
            app.config.schema.table(collection).dimmed()
        );
    }
    Ok(())
}
