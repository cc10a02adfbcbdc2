//! Hand-rolled error type for the simulation crate, matching the
//! teacher's plain-enum-with-manual-`Display` convention rather than
//! pulling in `thiserror`.

use std::fmt;

use sor_types::ConfigError;

#[derive(Debug)]
pub enum SimError {
    Config(ConfigError),
    LogFileOpen { path: std::path::PathBuf, source: std::io::Error },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(err) => write!(f, "invalid configuration: {err}"),
            SimError::LogFileOpen { path, source } => {
                write!(f, "failed to open log file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(err) => Some(err),
            SimError::LogFileOpen { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        SimError::Config(err)
    }
}
