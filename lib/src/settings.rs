//! Global display settings.
//!
//! Settings are singleton records addressed by a fixed key and always
//! upserted. Only the theme exists for now.

use crate::{Database, Result};

pub const COLLECTION: &str = "settings";
pub const THEME_KEY: &str = "theme";
pub const DEFAULT_THEME: &str = "dark";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub theme: String,
}

/// Returns the stored theme, or the default one if it was never set.
pub fn get_theme(db: &Database) -> Result<String> {
    Ok(db
        .get_keyed::<Setting>(COLLECTION, THEME_KEY)?
        .map(|s| s.value)
        .unwrap_or_else(|| DEFAULT_THEME.to_string()))
}

/// Stores the theme as is. Any string is accepted.
pub fn set_theme(db: &Database, theme: impl Into<String>) -> Result<String> {
    let setting = Setting {
        key: THEME_KEY.to_string(),
        value: theme.into(),
    };
    db.set_keyed(COLLECTION, THEME_KEY, &setting)?;
    Ok(setting.value)
}
