//! Config, store and field mapping for one CLI invocation.

use anyhow::{Context, Result};
use rooster_airtable::AirtableStore;
use rooster_core::matrix::HourSlots;
use rooster_core::{
    LocalStore, Normalizer, RecordStore, Repository, RoosterConfig, Session, StoreConfig,
};
use tracing::debug;

use crate::utils::tui;

pub struct App {
    pub config: RoosterConfig,
    store: Box<dyn RecordStore>,
    normalizer: Normalizer,
}

impl App {
    /// Load config and open the store, without checking the schema.
    pub async fn connect() -> Result<Self> {
        let config = RoosterConfig::load().context("Could not load configuration")?;
        let normalizer = config.normalizer()?;

        let store: Box<dyn RecordStore> = match &config.store {
            StoreConfig::Local { .. } => {
                let path = config
                    .store
                    .local_path()
                    .context("Local store has no path")?;
                debug!(path = %path.display(), "opening local store");
                let store = LocalStore::open(&path)
                    .await
                    .with_context(|| format!("Could not open {}", path.display()))?;
                Box::new(store)
            }
            StoreConfig::Airtable {
                base_id,
                api_key_env,
            } => Box::new(AirtableStore::from_env(base_id, api_key_env, &config.schema)?),
        };

        Ok(App {
            config,
            store,
            normalizer,
        })
    }

    /// Connect and fail fast when the store doesn't match the field mapping.
    pub async fn load() -> Result<Self> {
        let app = Self::connect().await?;
        app.validate_schema().await?;
        Ok(app)
    }

    pub async fn validate_schema(&self) -> Result<()> {
        let spinner = tui::create_spinner("Checking store".into());
        let result = self.config.schema.validate(self.store.as_ref()).await;
        spinner.finish_and_clear();
        result.context("The store does not match the configured field names")
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    pub fn repo(&self) -> Repository<'_> {
        Repository::new(self.store.as_ref(), &self.normalizer)
    }

    pub fn slots(&self) -> Result<HourSlots> {
        Ok(self.config.hour_slots()?)
    }

    pub fn session(&self) -> Result<Session> {
        Ok(Session::require()?)
    }

    pub fn admin_session(&self) -> Result<Session> {
        let session = Session::require()?;
        session.require_admin()?;
        Ok(session)
    }
}
