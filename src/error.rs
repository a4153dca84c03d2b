//! Error types for the fallible edges of the crate.
//!
//! The per-sample transform itself is total. Only configuration, file
//! access and renderer output can fail.

use core::fmt;
use std::io;
use std::process::{ExitCode, Termination};

use log::error;

#[derive(Debug)]
pub enum QrstError {
    /// Rejected pipeline or plot configuration
    InvalidConfig(String),
    /// Underlying I/O failure (sample files, renderer output)
    Io(io::Error),
    Message(String),
}

impl fmt::Display for QrstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QrstError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            QrstError::Io(err) => write!(f, "i/o error: {}", err),
            QrstError::Message(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for QrstError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QrstError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for QrstError {
    fn from(err: io::Error) -> Self {
        QrstError::Io(err)
    }
}

pub type QrstResult<T> = Result<T, QrstError>;

/// Process exit adapter: logs the error and reports failure.
pub struct TermResult(pub QrstResult<()>);

impl Termination for TermResult {
    fn report(self) -> ExitCode {
        match self.0 {
            Ok(_) => ExitCode::SUCCESS,
            Err(err) => {
                error!("{}", err);
                ExitCode::FAILURE
            }
        }
    }
}
