//! Keeps a city's in-game calendar date in step with the most recently
//! saved sibling city in the same region.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod command;
pub mod controller;
pub mod date;
pub mod host;
pub mod log;
pub mod plugin;

#[cfg(test)]
pub(crate) mod test_support;

pub use command::{SimDateCommand, CHEAT_ID_SIM_DATE};
pub use controller::DateSyncController;
pub use date::CityDate;
pub use host::{
    AppAccess, CityAccess, CommandExecutor, HostEvent, HostFramework, Message,
    NotificationSubscriber, SimulatorAccess, MSG_POST_CITY_INIT, MSG_POST_CITY_SAVE,
    MSG_POST_REGION_INIT, MSG_PRE_CITY_SHUTDOWN, SUBSCRIBED_MESSAGES,
};
pub use log::{FileSessionLog, NullSessionLog, SessionLog};
pub use plugin::{DateSyncPlugin, HandshakeError};

/// Overrides the session-log location when set.
pub const LOG_ENV_VAR: &str = "CITY_DATE_SYNC_LOG";
pub const LOG_FILE_NAME: &str = "CityDateSync.log";

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
}

/// Where the session log lives: next to the running binary, unless
/// `CITY_DATE_SYNC_LOG` points somewhere else.
pub fn resolve_log_path() -> Result<PathBuf, StartupError> {
    match env::var(LOG_ENV_VAR) {
        Ok(value) => Ok(PathBuf::from(value)),
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;
            Ok(dir.join(LOG_FILE_NAME))
        }
        Err(source) => Err(StartupError::EnvVar {
            var: LOG_ENV_VAR,
            source,
        }),
    }
}
