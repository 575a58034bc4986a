//! Module setup bookkeeping.
//!
//! # Responsibilities
//! - Persist which version of each module has been set up
//! - Derive the setup state of a module from that record
//! - Give setup routines their install / call capabilities
//!
//! # Design Decisions
//! - The record is a JSON map written atomically after each setup
//! - A missing record file means nothing has been set up

use std::collections::BTreeMap;
use std::fs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

use crate::actions::{ActionError, ActionRunner};
use crate::edit::write_atomic;
use crate::modules::AppModule;

/// Action script that installs distribution packages.
pub const PACKAGES_ACTION: &str = "packages";

/// Errors reading or writing the setup record.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to access setup record {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("setup record {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where a module stands relative to its current version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetupState {
    NeedsSetup,
    NeedsUpdate,
    UpToDate,
}

impl SetupState {
    pub fn from_versions(installed: Option<u32>, current: u32) -> Self {
        match installed {
            None | Some(0) => SetupState::NeedsSetup,
            Some(v) if v < current => SetupState::NeedsUpdate,
            Some(_) => SetupState::UpToDate,
        }
    }
}

/// Persistent map of module name to the version last set up.
#[derive(Debug)]
pub struct SetupRegistry {
    path: PathBuf,
    versions: Mutex<BTreeMap<String, u32>>,
}

impl SetupRegistry {
    /// Load the record at `path`; a missing file is an empty record.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        let versions = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StateError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StateError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            versions: Mutex::new(versions),
        })
    }

    pub fn installed_version(&self, module: &str) -> Option<u32> {
        self.lock().get(module).copied()
    }

    pub fn state(&self, module: &AppModule) -> SetupState {
        SetupState::from_versions(self.installed_version(module.name), module.version)
    }

    /// Record that `module` is set up at `version` and persist the record.
    pub fn record(&self, module: &str, version: u32) -> Result<(), StateError> {
        let mut versions = self.lock();
        versions.insert(module.to_string(), version);

        let json = serde_json::to_vec_pretty(&*versions).map_err(|source| StateError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| StateError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        write_atomic(&self.path, &json).map_err(|source| StateError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, u32>> {
        self.versions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Capabilities handed to a module's setup routine.
pub struct SetupHelper<'a, A> {
    module: &'static AppModule,
    runner: &'a A,
    current_step: Option<&'static str>,
}

impl<'a, A: ActionRunner> SetupHelper<'a, A> {
    pub fn new(module: &'static AppModule, runner: &'a A) -> Self {
        Self {
            module,
            runner,
            current_step: None,
        }
    }

    /// Step currently being executed, for progress reporting.
    pub fn current_step(&self) -> Option<&'static str> {
        self.current_step
    }

    /// Install distribution packages.
    pub async fn install(&mut self, packages: &[&str]) -> Result<(), ActionError> {
        if packages.is_empty() {
            return Ok(());
        }
        self.current_step = Some("install");
        tracing::info!(module = self.module.name, ?packages, "Installing packages");

        let mut args = vec!["install"];
        args.extend_from_slice(packages);
        self.runner.superuser_run(PACKAGES_ACTION, &args).await?;
        Ok(())
    }

    /// Run one named setup step.
    pub async fn call<F, T>(&mut self, step: &'static str, work: F) -> T
    where
        F: Future<Output = T>,
    {
        self.current_step = Some(step);
        tracing::info!(module = self.module.name, step, "Running setup step");
        work.await
    }
}
