// Per-category display settings.
// Stored as a single JSON document in the settings collection under id "main".
// An absent (or unreadable) document means defaults: random for all three.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::constants::SINGLETON_ID;
use crate::error::Result;
use crate::store::records::{get_settings_document, put_settings_document, SettingsDocument};

/// Selection policy for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Uniform random pick on every load.
    Random,
    /// One pick per calendar day, stable until local midnight.
    Daily,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Random
    }
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Random => "random",
            Mode::Daily => "daily",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "random" => Ok(Mode::Random),
            "daily" => Ok(Mode::Daily),
            other => Err(format!("unknown mode '{}' (expected 'random' or 'daily')", other)),
        }
    }
}

/// The three independent mode selectors. Serialized with the camelCase keys
/// the persisted config JSON uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub background_mode: Mode,
    #[serde(default)]
    pub displayed_mode: Mode,
    #[serde(default)]
    pub quotes_mode: Mode,
}

/// Load settings, filling defaults when no document exists.
pub fn load_settings(conn: &Connection) -> Result<Settings> {
    Ok(get_settings_document(conn)?
        .map(|doc| doc.config)
        .unwrap_or_default())
}

/// Save settings as a whole-document replacement.
pub fn save_settings(conn: &Connection, settings: &Settings) -> Result<()> {
    put_settings_document(
        conn,
        &SettingsDocument {
            id: SINGLETON_ID.to_string(),
            config: settings.clone(),
        },
    )
}
