//! Privileged action execution.
//!
//! # Data Flow
//! ```text
//! module / tahoe operation
//!     → ActionRunner::superuser_run / run_as_user
//!     → CommandRunner: [sudo -n [-u user]] <actions dir>/<action> args...
//!     → stdout on success, ActionError otherwise
//! ```
//!
//! # Design Decisions
//! - Actions are named scripts in one directory; names never contain `/`
//! - The working directory is set on the child, never on this process
//! - Every invocation has a deadline and the child is killed when it expires

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use crate::config::ActionsConfig;
use crate::resilience::with_timeout;

/// Errors from running an action script.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("invalid action name {0:?}")]
    InvalidName(String),

    #[error("failed to start action {action}: {source}")]
    Spawn {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("action {action} exited with {}: {stderr}", .status.map_or("signal".to_string(), |c| format!("status {}", c)))]
    Failed {
        action: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("action {action} timed out after {secs}s")]
    Timeout { action: String, secs: u64 },
}

/// Runs named privileged actions.
pub trait ActionRunner {
    /// Run `action` with root privileges.
    fn superuser_run(
        &self,
        action: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<String, ActionError>> + Send;

    /// Run `action` as `user`, optionally from `cwd`.
    fn run_as_user(
        &self,
        action: &str,
        args: &[&str],
        user: &str,
        cwd: Option<&Path>,
    ) -> impl Future<Output = Result<String, ActionError>> + Send;
}

/// Executes action scripts as child processes.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    directory: PathBuf,
    sudo: bool,
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(config: &ActionsConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            sudo: config.sudo,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn script(&self, action: &str) -> Result<PathBuf, ActionError> {
        if action.is_empty() || action.contains('/') || action.starts_with('.') {
            return Err(ActionError::InvalidName(action.to_string()));
        }
        Ok(self.directory.join(action))
    }

    fn command(&self, script: &Path, args: &[&str], user: Option<&str>) -> Command {
        let mut cmd = if self.sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg("-n");
            if let Some(user) = user {
                cmd.arg("-u").arg(user);
            }
            cmd.arg(script);
            cmd
        } else {
            if let Some(user) = user {
                tracing::warn!(user, "sudo disabled, running action as current user");
            }
            Command::new(script)
        };
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn execute(
        &self,
        action: &str,
        args: &[&str],
        user: Option<&str>,
        cwd: Option<&Path>,
    ) -> Result<String, ActionError> {
        let script = self.script(action)?;
        let mut cmd = self.command(&script, args, user);
        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }

        tracing::debug!(action, ?args, user, "Running action");

        let output = with_timeout(action, self.timeout, cmd.output())
            .await
            .map_err(|_| ActionError::Timeout {
                action: action.to_string(),
                secs: self.timeout.as_secs(),
            })?
            .map_err(|source| ActionError::Spawn {
                action: action.to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(action, status = ?output.status.code(), %stderr, "Action failed");
            Err(ActionError::Failed {
                action: action.to_string(),
                status: output.status.code(),
                stderr,
            })
        }
    }
}

impl ActionRunner for CommandRunner {
    async fn superuser_run(&self, action: &str, args: &[&str]) -> Result<String, ActionError> {
        self.execute(action, args, None, None).await
    }

    async fn run_as_user(
        &self,
        action: &str,
        args: &[&str],
        user: &str,
        cwd: Option<&Path>,
    ) -> Result<String, ActionError> {
        self.execute(action, args, Some(user), cwd).await
    }
}
