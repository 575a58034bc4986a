//! Edit sessions over a [`ConfigDocument`].

use std::future::Future;
use std::io;
use std::path::Path;

use uuid::Uuid;

use crate::edit::atomic::write_atomic;
use crate::edit::document::ConfigDocument;
use crate::edit::{EditError, LoadError};
use crate::observability::metrics;

/// What a successful commit did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The document changed and the file was replaced.
    Written,
    /// The document was left as loaded; the file was not touched.
    Unchanged,
}

/// Exclusive handle on one file's document.
///
/// Dropping a session without calling [`commit`](Self::commit) discards every
/// in-memory change.
#[derive(Debug)]
pub struct EditSession {
    id: Uuid,
    document: ConfigDocument,
    committed: bool,
}

impl EditSession {
    /// Load `path` and open a session on it.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let document = ConfigDocument::load(path)?;
        let id = Uuid::new_v4();
        tracing::debug!(session_id = %id, path = %path.display(), "Edit session opened");
        Ok(Self {
            id,
            document,
            committed: false,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut ConfigDocument {
        &mut self.document
    }

    /// Write the document back if it changed.
    pub fn commit(self) -> Result<CommitOutcome, EditError> {
        self.commit_with(write_atomic)
    }

    /// Like [`commit`](Self::commit), with `write` replacing the file.
    ///
    /// On a write error the session is discarded, as if it had been dropped.
    pub fn commit_with<W>(mut self, write: W) -> Result<CommitOutcome, EditError>
    where
        W: FnOnce(&Path, &[u8]) -> io::Result<()>,
    {
        let path = self.document.path().to_path_buf();

        let outcome = if self.document.is_modified() {
            let text = self.document.render().map_err(|source| EditError::Serialize {
                path: path.clone(),
                source,
            })?;
            write(&path, text.as_bytes()).map_err(|source| EditError::Write {
                path: path.clone(),
                source,
            })?;
            CommitOutcome::Written
        } else {
            CommitOutcome::Unchanged
        };

        self.committed = true;
        metrics::record_config_edit("committed");
        tracing::info!(
            session_id = %self.id,
            path = %path.display(),
            outcome = ?outcome,
            "Edit session committed"
        );
        Ok(outcome)
    }
}

impl Drop for EditSession {
    fn drop(&mut self) {
        if !self.committed {
            metrics::record_config_edit("discarded");
            tracing::debug!(
                session_id = %self.id,
                path = %self.document.path().display(),
                "Edit session discarded"
            );
        }
    }
}

/// Run `body` against the document at `path`, then persist and notify.
///
/// The file is written only when `body` returns `Ok`, and `on_success` runs
/// exactly once after the write. An error from `on_success` is returned to
/// the caller, but the write it follows is already on disk.
pub async fn with_config<T, E, B, H, Fut>(path: &Path, on_success: H, body: B) -> Result<T, E>
where
    B: FnOnce(&mut ConfigDocument) -> Result<T, E>,
    H: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: From<EditError>,
{
    let mut session = EditSession::open(path).map_err(EditError::from)?;
    let value = body(session.document_mut())?;
    session.commit()?;

    on_success().await?;
    Ok(value)
}
