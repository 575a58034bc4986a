//! In-memory YAML document bound to the file it was read from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::edit::{splice, LoadError};

/// A YAML file's top-level mapping plus the text it was parsed from.
///
/// Mappings keep their on-file key order. Comments are not modelled in the
/// tree; [`render`](Self::render) carries them over from the original text
/// for every entry the edit left alone.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    original: String,
    pristine: Mapping,
    root: Mapping,
}

impl ConfigDocument {
    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(path, text)
    }

    /// Parse `text` as the content of `path`.
    pub fn parse(path: &Path, text: String) -> Result<Self, LoadError> {
        let value: Value = serde_yaml::from_str(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let root = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => {
                return Err(LoadError::Schema {
                    path: path.to_path_buf(),
                    reason: "top level is not a mapping".to_string(),
                })
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            original: text,
            pristine: root.clone(),
            root,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Mapping {
        &mut self.root
    }

    /// Whether the mapping differs from what was loaded.
    pub fn is_modified(&self) -> bool {
        self.root != self.pristine
    }

    /// Serialize the document for writing back to disk.
    ///
    /// Untouched entries keep their original text. Layouts the splicer cannot
    /// follow (flow style, anchors, complex keys) fall back to a plain
    /// re-serialization of the whole document.
    pub fn render(&self) -> Result<String, serde_yaml::Error> {
        if !self.is_modified() {
            return Ok(self.original.clone());
        }
        match splice::render_onto(&self.original, &self.pristine, &self.root) {
            Some(text) => Ok(text),
            None => {
                tracing::debug!(
                    path = %self.path.display(),
                    "Layout not preserved, re-serializing document"
                );
                serde_yaml::to_string(&self.root)
            }
        }
    }

    /// Mapping stored under `key`, created when absent or null.
    ///
    /// Fails with [`LoadError::Schema`] when `key` holds something else.
    pub fn mapping_mut(&mut self, key: &str) -> Result<&mut Mapping, LoadError> {
        let needs_init = matches!(self.root.get(key), None | Some(Value::Null));
        if needs_init {
            self.root
                .insert(Value::String(key.to_string()), Value::Mapping(Mapping::new()));
        }

        match self.root.get_mut(key) {
            Some(Value::Mapping(mapping)) => Ok(mapping),
            _ => Err(LoadError::Schema {
                path: self.path.clone(),
                reason: format!("`{}` is not a mapping", key),
            }),
        }
    }

    /// Mapping stored under `key`; `None` when absent or null.
    pub fn mapping(&self, key: &str) -> Result<Option<&Mapping>, LoadError> {
        match self.root.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Mapping(mapping)) => Ok(Some(mapping)),
            Some(_) => Err(LoadError::Schema {
                path: self.path.clone(),
                reason: format!("`{}` is not a mapping", key),
            }),
        }
    }
}
