//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the panel
//! modules. All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the panel modules.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PanelConfig {
    /// Tahoe-LAFS node layout and service account.
    pub tahoe: TahoeConfig,

    /// Privileged action runner settings.
    pub actions: ActionsConfig,

    /// Where module setup state is persisted.
    pub state: StateConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Tahoe-LAFS node layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TahoeConfig {
    /// Home directory holding the introducer and storage node directories.
    pub home: PathBuf,

    /// Non-privileged account the nodes run under.
    pub service_user: String,

    /// Directory name of the storage node inside `home`.
    pub storage_node: String,

    /// Directory name of the local introducer inside `home`.
    pub introducer: String,

    /// Deadline for the storage node restart command.
    pub restart_timeout_secs: u64,
}

impl Default for TahoeConfig {
    fn default() -> Self {
        Self {
            home: PathBuf::from("/var/lib/tahoe-lafs"),
            service_user: "tahoe".to_string(),
            storage_node: "storage_node".to_string(),
            introducer: "introducer".to_string(),
            restart_timeout_secs: 30,
        }
    }
}

impl TahoeConfig {
    /// File holding the configured domain name.
    pub fn domain_name_file(&self) -> PathBuf {
        self.home.join("domain_name")
    }

    /// YAML file listing the storage node's introducers.
    pub fn introducers_file(&self) -> PathBuf {
        self.home
            .join(&self.storage_node)
            .join("private")
            .join("introducers.yaml")
    }

    /// fURL file written by the local introducer on creation.
    pub fn introducer_furl_file(&self) -> PathBuf {
        self.home
            .join(&self.introducer)
            .join("private")
            .join(format!("{}.furl", self.introducer))
    }
}

/// Privileged action runner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Directory holding the action scripts.
    pub directory: PathBuf,

    /// Escalate through `sudo -n`. Disable when already running as root.
    pub sudo: bool,

    /// Deadline for a single action invocation.
    pub timeout_secs: u64,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("/usr/share/plinth/actions"),
            sudo: true,
            timeout_secs: 300,
        }
    }
}

/// Persistent state location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StateConfig {
    /// Directory for `setup.json`.
    pub directory: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("/var/lib/plinth"),
        }
    }
}

impl StateConfig {
    pub fn setup_file(&self) -> PathBuf {
        self.directory.join("setup.json")
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "plinth_modules=info".to_string(),
        }
    }
}
