//! Managed service state.
//!
//! # Data Flow
//! ```text
//! Service::is_enabled / is_running
//!     → ServiceQuery (systemctl, a2query)
//!     → cached enabled flag, updated on every query and notify_enabled
//! ```
//!
//! # Design Decisions
//! - One Service per managed unit, built at startup and passed by reference
//! - A module counts as enabled only when its unit and its web server
//!   configuration are both enabled

use std::future::Future;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::process::Command;

/// Queries the init system and the web server.
pub trait ServiceQuery {
    fn is_service_running(&self, unit: &str) -> impl Future<Output = bool> + Send;
    fn is_service_enabled(&self, unit: &str) -> impl Future<Output = bool> + Send;
    fn is_webserver_enabled(&self, config: &str) -> impl Future<Output = bool> + Send;
}

/// Answers queries through `systemctl` and `a2query`.
#[derive(Debug, Clone, Default)]
pub struct SystemctlQuery;

impl SystemctlQuery {
    async fn succeeds(program: &str, args: &[&str]) -> bool {
        match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) => status.success(),
            Err(e) => {
                tracing::warn!(program, error = %e, "Service query could not run");
                false
            }
        }
    }
}

impl ServiceQuery for SystemctlQuery {
    async fn is_service_running(&self, unit: &str) -> bool {
        Self::succeeds("systemctl", &["is-active", "--quiet", unit]).await
    }

    async fn is_service_enabled(&self, unit: &str) -> bool {
        Self::succeeds("systemctl", &["is-enabled", "--quiet", unit]).await
    }

    async fn is_webserver_enabled(&self, config: &str) -> bool {
        Self::succeeds("a2query", &["-q", "-c", config]).await
    }
}

/// Static description of a managed service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSpec {
    /// systemd unit name.
    pub unit: &'static str,
    /// Web server configuration that exposes the service, if any.
    pub webserver_config: Option<&'static str>,
    /// Firewall services the module needs open.
    pub ports: &'static [&'static str],
    /// Reachable from outside the local network.
    pub is_external: bool,
}

/// Snapshot of a service's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub enabled: bool,
    pub running: bool,
}

/// Tracks one managed service.
#[derive(Debug)]
pub struct Service<Q> {
    id: &'static str,
    title: &'static str,
    spec: ServiceSpec,
    query: Q,
    enabled: AtomicBool,
}

impl<Q: ServiceQuery + Sync> Service<Q> {
    pub fn new(id: &'static str, title: &'static str, spec: ServiceSpec, query: Q) -> Self {
        Self {
            id,
            title,
            spec,
            query,
            enabled: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn spec(&self) -> &ServiceSpec {
        &self.spec
    }

    pub async fn is_enabled(&self) -> bool {
        let mut enabled = self.query.is_service_enabled(self.spec.unit).await;
        if enabled {
            if let Some(config) = self.spec.webserver_config {
                enabled = self.query.is_webserver_enabled(config).await;
            }
        }
        self.enabled.store(enabled, Ordering::Relaxed);
        enabled
    }

    pub async fn is_running(&self) -> bool {
        self.query.is_service_running(self.spec.unit).await
    }

    pub async fn status(&self) -> ServiceStatus {
        ServiceStatus {
            enabled: self.is_enabled().await,
            running: self.is_running().await,
        }
    }

    /// Record that the service was switched on or off.
    pub fn notify_enabled(&self, enabled: bool) {
        let previous = self.enabled.swap(enabled, Ordering::Relaxed);
        if previous != enabled {
            tracing::info!(service = self.id, enabled, "Service state changed");
        }
    }

    /// Last known enabled state, without querying.
    pub fn cached_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}
