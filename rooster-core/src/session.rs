//! The logged-in volunteer, persisted between CLI invocations.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RoosterError, RoosterResult};

const SESSION_FILE: &str = "session.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub volunteer_id: String,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// ~/.local/state/rooster/session.toml (or the platform equivalent).
    pub fn path() -> RoosterResult<PathBuf> {
        let base = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .ok_or_else(|| RoosterError::Config("Could not determine state directory".into()))?;
        Ok(base.join("rooster").join(SESSION_FILE))
    }

    /// The current session, if someone is logged in.
    pub fn load() -> RoosterResult<Option<Self>> {
        Self::load_from(&Self::path()?)
    }

    /// The current session, or `NotLoggedIn`.
    pub fn require() -> RoosterResult<Self> {
        Self::load()?.ok_or(RoosterError::NotLoggedIn)
    }

    pub fn save(&self) -> RoosterResult<()> {
        self.save_to(&Self::path()?)
    }

    /// Log out. Succeeds when nobody was logged in.
    pub fn clear() -> RoosterResult<bool> {
        Self::clear_at(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> RoosterResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let session = toml::from_str(&content)
            .map_err(|e| RoosterError::Serialization(format!("Corrupt session file: {e}")))?;
        Ok(Some(session))
    }

    pub fn save_to(&self, path: &Path) -> RoosterResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| RoosterError::Serialization(e.to_string()))?;

        let temp = path.with_extension("toml.tmp");
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, path)?;
        Ok(())
    }

    pub fn clear_at(path: &Path) -> RoosterResult<bool> {
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }

    pub fn require_admin(&self) -> RoosterResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(RoosterError::PermissionDenied(format!(
                "{} is not an administrator",
                self.email
            )))
        }
    }
}
