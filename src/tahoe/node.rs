//! Tahoe-LAFS node files and the storage node restart.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::actions::ActionRunner;
use crate::config::TahoeConfig;
use crate::edit::write_atomic;
use crate::observability::metrics;
use crate::resilience::with_timeout;
use crate::tahoe::error::{RestartError, TahoeError};
use crate::tahoe::introducers::{IntroducerEntry, IntroducerList, NodeRestart};

/// Action script driving the Tahoe-LAFS nodes.
pub const ACTION: &str = "tahoe";

/// Pet name under which the introducer hosted on this box is shown.
pub const LOCAL_PET_NAME: &str = "local";

/// Restarts the storage node through the action runner.
#[derive(Debug, Clone)]
pub struct StorageNode<A> {
    runner: A,
    home: PathBuf,
    user: String,
    name: String,
    timeout: Duration,
}

impl<A: ActionRunner + Sync> NodeRestart for StorageNode<A> {
    async fn restart(&self) -> Result<(), RestartError> {
        let args = ["restart", self.name.as_str()];
        let run = self
            .runner
            .run_as_user(ACTION, &args, &self.user, Some(self.home.as_path()));

        let result = match with_timeout("storage node restart", self.timeout, run).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(source)) => Err(RestartError::Action {
                node: self.name.clone(),
                source,
            }),
            Err(_) => Err(RestartError::Timeout {
                node: self.name.clone(),
                secs: self.timeout.as_secs(),
            }),
        };

        metrics::record_restart(&self.name, result.is_ok());
        match &result {
            Ok(()) => tracing::info!(node = %self.name, "Storage node restarted"),
            Err(e) => tracing::error!(node = %self.name, error = %e, "Storage node restart failed"),
        }
        result
    }
}

/// The Tahoe-LAFS installation under one home directory.
#[derive(Debug, Clone)]
pub struct TahoeNode<A> {
    config: TahoeConfig,
    runner: A,
}

impl<A: ActionRunner + Clone + Sync> TahoeNode<A> {
    pub fn new(config: TahoeConfig, runner: A) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &TahoeConfig {
        &self.config
    }

    /// Domain name the nodes were set up for.
    pub fn configured_domain_name(&self) -> Result<String, TahoeError> {
        let path = self.config.domain_name_file();
        match fs::read_to_string(&path) {
            Ok(content) => {
                let name = content.trim_end().to_string();
                if name.is_empty() {
                    Err(TahoeError::DomainNotConfigured)
                } else {
                    Ok(name)
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(TahoeError::DomainNotConfigured),
            Err(source) => Err(TahoeError::Io { path, source }),
        }
    }

    /// Record the domain name the nodes are reachable under.
    pub fn set_domain_name(&self, name: &str) -> Result<(), TahoeError> {
        let name = name.trim();
        if !is_valid_domain_name(name) {
            return Err(TahoeError::InvalidDomainName(name.to_string()));
        }

        let path = self.config.domain_name_file();
        write_atomic(&path, format!("{}\n", name).as_bytes())
            .map_err(|source| TahoeError::Io { path, source })?;

        tracing::info!(domain = name, "Tahoe-LAFS domain name set");
        Ok(())
    }

    /// The introducer hosted on this box.
    pub fn local_introducer(&self) -> Result<IntroducerEntry, TahoeError> {
        let path = self.config.introducer_furl_file();
        let furl = fs::read_to_string(&path).map_err(|source| TahoeError::Io { path, source })?;
        Ok(IntroducerEntry::new(LOCAL_PET_NAME, furl.trim_end()))
    }

    pub fn storage_node(&self) -> StorageNode<A> {
        StorageNode {
            runner: self.runner.clone(),
            home: self.config.home.clone(),
            user: self.config.service_user.clone(),
            name: self.config.storage_node.clone(),
            timeout: Duration::from_secs(self.config.restart_timeout_secs),
        }
    }

    /// The storage node's introducer list.
    ///
    /// Fails with [`TahoeError::DomainNotConfigured`] until a domain name is
    /// set, since the nodes do not exist before that.
    pub fn introducers(&self) -> Result<IntroducerList<StorageNode<A>>, TahoeError> {
        self.configured_domain_name()?;
        Ok(IntroducerList::new(
            self.config.introducers_file(),
            self.storage_node(),
        ))
    }
}

fn is_valid_domain_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 253
        && name.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
