//! Introducer list of the storage node.
//!
//! # Responsibilities
//! - Upsert and delete `introducers.<pet name>.furl` through edit sessions
//! - Restart the storage node once after each committed change
//! - List introducers read-only in on-file order
//!
//! # Design Decisions
//! - Last write wins on add; removing an unknown pet name is an error
//! - Keys of an entry other than `furl` survive an update

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::edit::{with_config, ConfigDocument, EditError, LoadError};
use crate::tahoe::error::{RestartError, TahoeError};

const SECTION: &str = "introducers";
const FURL: &str = "furl";

/// A remote introducer known to the storage node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntroducerEntry {
    pub pet_name: String,
    pub furl: String,
}

impl IntroducerEntry {
    pub fn new(pet_name: impl Into<String>, furl: impl Into<String>) -> Self {
        Self {
            pet_name: pet_name.into(),
            furl: furl.into(),
        }
    }

    fn validate(&self) -> Result<(), TahoeError> {
        if self.pet_name.trim().is_empty() {
            return Err(TahoeError::InvalidIntroducer(
                "pet name must not be empty".to_string(),
            ));
        }
        if self.furl.is_empty() || self.furl.chars().any(char::is_whitespace) {
            return Err(TahoeError::InvalidIntroducer(format!(
                "fURL for {:?} must be non-empty and contain no whitespace",
                self.pet_name
            )));
        }
        Ok(())
    }
}

/// Something to run after the introducer list changed on disk.
pub trait NodeRestart {
    fn restart(&self) -> impl Future<Output = Result<(), RestartError>> + Send;
}

/// The storage node's `introducers.yaml`.
#[derive(Debug, Clone)]
pub struct IntroducerList<R> {
    path: PathBuf,
    restart: R,
}

impl<R: NodeRestart> IntroducerList<R> {
    pub fn new(path: impl Into<PathBuf>, restart: R) -> Self {
        Self {
            path: path.into(),
            restart,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All introducers in file order. Never writes or restarts.
    pub fn list(&self) -> Result<Vec<IntroducerEntry>, TahoeError> {
        let document = ConfigDocument::load(&self.path)?;
        let Some(section) = document.mapping(SECTION)? else {
            return Ok(Vec::new());
        };

        section
            .iter()
            .map(|(key, value)| entry_from_yaml(&self.path, key, value))
            .collect::<Result<Vec<_>, LoadError>>()
            .map_err(TahoeError::from)
    }

    /// Set `pet_name` to `furl`, replacing any previous fURL.
    pub async fn add(&self, pet_name: &str, furl: &str) -> Result<(), TahoeError> {
        let entry = IntroducerEntry::new(pet_name, furl);
        entry.validate()?;

        self.edit(|document| {
            let section = document.mapping_mut(SECTION)?;
            let key = find_key(section, pet_name).unwrap_or_else(|| Value::from(pet_name));
            match section.get_mut(&key) {
                Some(Value::Mapping(existing)) => {
                    existing.insert(Value::from(FURL), Value::from(furl));
                }
                _ => {
                    let mut fields = Mapping::new();
                    fields.insert(Value::from(FURL), Value::from(furl));
                    section.insert(key, Value::Mapping(fields));
                }
            }
            Ok(())
        })
        .await?;

        tracing::info!(pet_name, "Introducer added");
        Ok(())
    }

    /// Delete `pet_name`. Fails when it is not in the list.
    pub async fn remove(&self, pet_name: &str) -> Result<(), TahoeError> {
        self.edit(|document| {
            let key = document
                .mapping(SECTION)?
                .and_then(|section| find_key(section, pet_name));
            let Some(key) = key else {
                return Err(TahoeError::IntroducerNotFound {
                    pet_name: pet_name.to_string(),
                });
            };

            document.mapping_mut(SECTION)?.shift_remove(&key);
            Ok(())
        })
        .await?;

        tracing::info!(pet_name, "Introducer removed");
        Ok(())
    }

    async fn edit<F>(&self, body: F) -> Result<(), TahoeError>
    where
        F: FnOnce(&mut ConfigDocument) -> Result<(), TahoeError>,
    {
        with_config(&self.path, || self.restart_after_commit(), body)
            .await
            .map_err(|e| match e {
                TahoeError::Edit(EditError::Load(source)) => TahoeError::Load(source),
                other => other,
            })
    }

    async fn restart_after_commit(&self) -> Result<(), TahoeError> {
        self.restart.restart().await.map_err(|e| {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Introducer list saved but storage node restart failed"
            );
            TahoeError::from(e)
        })
    }
}

fn entry_from_yaml(path: &Path, key: &Value, value: &Value) -> Result<IntroducerEntry, LoadError> {
    let schema = |reason: String| LoadError::Schema {
        path: path.to_path_buf(),
        reason,
    };

    let Some(pet_name) = pet_name_of(key) else {
        return Err(schema(format!("introducer name {:?} is not a scalar", key)));
    };

    match value.get(FURL) {
        Some(Value::String(furl)) => Ok(IntroducerEntry::new(pet_name, furl.clone())),
        _ => Err(schema(format!(
            "introducer {:?} has no string `furl`",
            pet_name
        ))),
    }
}

/// Pet name a YAML key stands for. Plain scalar keys such as `2` or `true`
/// count as their text.
fn pet_name_of(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn find_key(section: &Mapping, pet_name: &str) -> Option<Value> {
    section
        .keys()
        .find(|key| pet_name_of(key).as_deref() == Some(pet_name))
        .cloned()
}
