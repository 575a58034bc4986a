//! Tahoe-LAFS error definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::actions::ActionError;
use crate::edit::{EditError, LoadError};

/// The storage node could not be restarted.
#[derive(Debug, Error)]
pub enum RestartError {
    #[error("restart of {node} failed: {source}")]
    Action {
        node: String,
        #[source]
        source: ActionError,
    },

    #[error("restart of {node} timed out after {secs}s")]
    Timeout { node: String, secs: u64 },
}

/// Errors from Tahoe-LAFS configuration operations.
#[derive(Debug, Error)]
pub enum TahoeError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("introducer {pet_name:?} is not configured")]
    IntroducerNotFound { pet_name: String },

    #[error("invalid introducer: {0}")]
    InvalidIntroducer(String),

    #[error("no domain name is configured for Tahoe-LAFS")]
    DomainNotConfigured,

    #[error("invalid domain name {0:?}")]
    InvalidDomainName(String),

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration change is on disk; only the restart failed.
    #[error("change saved, but the storage node was not restarted: {0}")]
    Restart(#[from] RestartError),
}

impl TahoeError {
    /// Whether the operation's file change was committed despite the error.
    pub fn is_committed(&self) -> bool {
        matches!(self, TahoeError::Restart(_))
    }
}
