// SPDX-License-Identifier: MPL-2.0
use crate::backup::BackupError;
use crate::pipeline::NotReady;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error(transparent)]
    Backup(#[from] BackupError),

    #[error("Not Ready: {0}")]
    NotReady(#[from] NotReady),

    /// The operator declined a confirmation.
    #[error("Cancelled")]
    Cancelled,

    /// The operator asked for something the command line cannot express
    /// (unknown instance name, unknown language, missing argument).
    #[error("Usage Error: {0}")]
    Usage(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<pico_args::Error> for Error {
    fn from(err: pico_args::Error) -> Self {
        Error::Usage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
