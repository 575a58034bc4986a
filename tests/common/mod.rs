//! Shared fixtures for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use plinth_modules::actions::{ActionError, ActionRunner};
use plinth_modules::config::{PanelConfig, TahoeConfig};
use plinth_modules::service::ServiceQuery;

/// One call seen by [`RecordingRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub action: String,
    pub args: Vec<String>,
    pub user: Option<String>,
    pub cwd: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Succeed,
    Fail,
    Hang,
}

/// Action runner that records calls instead of executing them.
///
/// Calls whose first argument matches `trigger` fail or hang, depending on
/// how the runner was built.
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<Call>>>,
    trigger: Option<String>,
    mode: Mode,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            trigger: None,
            mode: Mode::Succeed,
        }
    }
}

#[allow(dead_code)]
impl RecordingRunner {
    pub fn failing_on(first_arg: &str) -> Self {
        Self {
            trigger: Some(first_arg.to_string()),
            mode: Mode::Fail,
            ..Self::default()
        }
    }

    pub fn hanging_on(first_arg: &str) -> Self {
        Self {
            trigger: Some(first_arg.to_string()),
            mode: Mode::Hang,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// `action arg arg...` for each call, for compact assertions.
    pub fn commands(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| {
                let mut parts = vec![c.action.clone()];
                parts.extend(c.args.iter().cloned());
                parts.join(" ")
            })
            .collect()
    }

    async fn record(
        &self,
        action: &str,
        args: &[&str],
        user: Option<&str>,
        cwd: Option<&Path>,
    ) -> Result<String, ActionError> {
        self.calls.lock().unwrap().push(Call {
            action: action.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            user: user.map(str::to_string),
            cwd: cwd.map(Path::to_path_buf),
        });

        let triggered = self.trigger.as_deref().is_some_and(|t| args.first() == Some(&t));
        match (triggered, self.mode) {
            (true, Mode::Fail) => Err(ActionError::Failed {
                action: action.to_string(),
                status: Some(1),
                stderr: "injected failure".to_string(),
            }),
            (true, Mode::Hang) => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(String::new())
            }
            _ => Ok(String::new()),
        }
    }
}

impl ActionRunner for RecordingRunner {
    async fn superuser_run(&self, action: &str, args: &[&str]) -> Result<String, ActionError> {
        self.record(action, args, None, None).await
    }

    async fn run_as_user(
        &self,
        action: &str,
        args: &[&str],
        user: &str,
        cwd: Option<&Path>,
    ) -> Result<String, ActionError> {
        self.record(action, args, Some(user), cwd).await
    }
}

/// Service query with switchable answers.
#[derive(Debug, Clone, Default)]
pub struct CannedQuery {
    pub unit_enabled: Arc<AtomicBool>,
    pub webserver_enabled: Arc<AtomicBool>,
    pub running: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl CannedQuery {
    pub fn all_on() -> Self {
        let query = Self::default();
        query.unit_enabled.store(true, Ordering::SeqCst);
        query.webserver_enabled.store(true, Ordering::SeqCst);
        query.running.store(true, Ordering::SeqCst);
        query
    }
}

impl ServiceQuery for CannedQuery {
    async fn is_service_running(&self, _unit: &str) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn is_service_enabled(&self, _unit: &str) -> bool {
        self.unit_enabled.load(Ordering::SeqCst)
    }

    async fn is_webserver_enabled(&self, _config: &str) -> bool {
        self.webserver_enabled.load(Ordering::SeqCst)
    }
}

/// Scratch Tahoe home with a domain name and an introducers file.
#[allow(dead_code)]
pub fn tahoe_home(dir: &Path, introducers: &str) -> TahoeConfig {
    let config = TahoeConfig {
        home: dir.to_path_buf(),
        restart_timeout_secs: 1,
        ..TahoeConfig::default()
    };

    fs::write(config.domain_name_file(), "box.example.org\n").unwrap();

    let file = config.introducers_file();
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, introducers).unwrap();

    config
}

/// Panel configuration rooted in a scratch directory.
#[allow(dead_code)]
pub fn panel_config(dir: &Path) -> PanelConfig {
    let mut config = PanelConfig::default();
    config.tahoe.home = dir.join("tahoe");
    config.state.directory = dir.join("state");
    config
}
