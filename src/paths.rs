use std::path::PathBuf;

use crate::error::{Error, Result};

/// Base directory (~/.fitwatch or FITWATCH_HOME override).
pub fn fitwatch_dir() -> Result<PathBuf> {
    if let Ok(p) = std::env::var("FITWATCH_HOME") {
        return Ok(PathBuf::from(p));
    }
    let home = dirs::home_dir().ok_or(Error::HomeDir)?;
    Ok(home.join(".fitwatch"))
}

pub fn config_file() -> Result<PathBuf> {
    Ok(fitwatch_dir()?.join("config.json"))
}
