//! Scoped editing of structured configuration files.
//!
//! # Data Flow
//! ```text
//! with_config(path, on_success, body)
//!     → session.rs opens an EditSession (document.rs loads & parses)
//!     → body mutates the ConfigDocument in memory
//!     → Ok:  atomic.rs replaces the file, then on_success runs once
//!     → Err: session dropped, file and callback untouched
//! ```
//!
//! # Design Decisions
//! - A session that ends in an error never reaches the disk
//! - The hook runs after the write; a failing hook cannot undo it
//! - Unchanged documents are not rewritten, so their bytes stay identical
//! - Changed documents keep the text and comments of every untouched entry
//! - One writer per file is assumed; callers serialize sessions themselves

pub mod atomic;
pub mod document;
pub mod session;
mod splice;

use std::path::PathBuf;

use thiserror::Error;

pub use atomic::{write_atomic, write_atomic_with};
pub use document::ConfigDocument;
pub use session::{with_config, CommitOutcome, EditSession};

/// The file could not be turned into a document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("configuration file {} does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unexpected layout in {}: {reason}", .path.display())]
    Schema { path: PathBuf, reason: String },
}

/// An edit session failed before its changes were committed.
#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
