//! Global rooster configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::account::is_admin_email;
use crate::constants::{
    DEFAULT_API_KEY_ENV, DEFAULT_DAY_END_HOUR, DEFAULT_DAY_START_HOUR, DEFAULT_TIMEZONE,
};
use crate::error::{RoosterError, RoosterResult};
use crate::matrix::HourSlots;
use crate::store::{Normalizer, Schema};

static DEFAULT_STORE_PATH: &str = "~/.local/share/rooster/store.json";

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

/// Where records live.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// JSON file on this machine.
    Local {
        #[serde(default = "default_store_path")]
        path: PathBuf,
    },
    /// Hosted Airtable base. The API key is read from `api_key_env`.
    Airtable {
        base_id: String,
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Local {
            path: default_store_path(),
        }
    }
}

impl StoreConfig {
    /// Local store path with `~` expanded.
    pub fn local_path(&self) -> Option<PathBuf> {
        match self {
            StoreConfig::Local { path } => Some(PathBuf::from(
                shellexpand::tilde(&path.to_string_lossy()).into_owned(),
            )),
            StoreConfig::Airtable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    /// IANA name; defaults to Europe/Amsterdam.
    pub timezone: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            day_start_hour: DEFAULT_DAY_START_HOUR,
            day_end_hour: DEFAULT_DAY_END_HOUR,
            timezone: None,
        }
    }
}

/// Configuration at ~/.config/rooster/config.toml, overridable with
/// `ROOSTER_`-prefixed environment variables (`ROOSTER_STORE__BACKEND`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoosterConfig {
    pub store: StoreConfig,
    pub display: DisplayConfig,
    /// Emails whose sessions get admin rights. Compared case-insensitively.
    pub admin_emails: Vec<String>,
    pub schema: Schema,
}

impl RoosterConfig {
    pub fn config_path() -> RoosterResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RoosterError::Config("Could not determine config directory".into()))?
            .join("rooster");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, creating a commented default file on first run.
    pub fn load() -> RoosterResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> RoosterResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("ROOSTER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| RoosterError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| RoosterError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> RoosterResult<()> {
        let contents = format!(
            "\
# rooster configuration

# Emails that may manage events, departments and rosters:
# admin_emails = [\"coordinator@example.org\"]

# Where records are stored. Either a local file:
# [store]
# backend = \"local\"
# path = \"{DEFAULT_STORE_PATH}\"
#
# or an Airtable base (API key read from the named environment variable):
# [store]
# backend = \"airtable\"
# base_id = \"appXXXXXXXXXXXXXX\"
# api_key_env = \"{DEFAULT_API_KEY_ENV}\"

# Schedule grid:
# [display]
# day_start_hour = {DEFAULT_DAY_START_HOUR}
# day_end_hour = {DEFAULT_DAY_END_HOUR}
# timezone = \"{DEFAULT_TIMEZONE}\"

# Field names in the store, when they differ from the defaults:
# [schema.rosters]
# table = \"Team Roosters\"
# start = \"Start tijd\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RoosterError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RoosterError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn is_admin(&self, email: &str) -> bool {
        is_admin_email(&self.admin_emails, email)
    }

    pub fn hour_slots(&self) -> RoosterResult<HourSlots> {
        HourSlots::new(self.display.day_start_hour, self.display.day_end_hour)
    }

    pub fn timezone(&self) -> RoosterResult<Tz> {
        let name = self.display.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        name.parse::<Tz>()
            .map_err(|_| RoosterError::Config(format!("Unknown timezone '{name}'")))
    }

    /// Field mapping for the configured schema and timezone. Fails on a
    /// malformed mapping before anything talks to the store.
    pub fn normalizer(&self) -> RoosterResult<Normalizer> {
        self.schema.check()?;
        Ok(Normalizer::new(self.schema.clone(), self.timezone()?))
    }
}
