use std::env;

use anyhow::{Context, Result};

use crate::fetch::SheetTarget;

const DEFAULT_PORT: u16 = 5000;

/// Process configuration, read from the environment at startup.
/// The three sheet settings are required; a missing one is fatal before
/// the server binds.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub spreadsheet_id: String,
    pub range: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("SHEETS_API_KEY").context("SHEETS_API_KEY must be set")?;
        let spreadsheet_id =
            env::var("SHEETS_SPREADSHEET_ID").context("SHEETS_SPREADSHEET_ID must be set")?;
        let range = env::var("SHEETS_RANGE").context("SHEETS_RANGE must be set")?;
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Ok(Self {
            api_key,
            spreadsheet_id,
            range,
            port,
        })
    }

    pub fn sheet_target(&self) -> SheetTarget {
        SheetTarget {
            spreadsheet_id: self.spreadsheet_id.clone(),
            range: self.range.clone(),
            api_key: self.api_key.clone(),
        }
    }
}
