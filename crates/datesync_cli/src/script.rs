use std::fs;
use std::path::{Path, PathBuf};

use datesync::CityDate;
use serde::Deserialize;
use thiserror::Error;

/// One scripted host notification, in session order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Open a city slot at the given simulator date.
    EnterCity {
        date: CityDate,
        #[serde(default = "default_established")]
        established: bool,
    },
    /// Let the open city's simulator run for a number of days.
    Advance { days: u64 },
    /// Save the open city.
    SaveCity,
    /// Close the open city back to the region view.
    ExitCity,
    /// Show the region view. Fired both when returning from a city and
    /// when switching regions.
    EnterRegion,
}

fn default_established() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionScript {
    pub events: Vec<SessionEvent>,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read session script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid session script {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
}

pub fn load_script(path: &Path) -> Result<SessionScript, ScriptError> {
    let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|source| ScriptError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
