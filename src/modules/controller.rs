//! Lifecycle operations shared by all modules.

use serde::Serialize;
use thiserror::Error;

use crate::actions::{ActionError, ActionRunner};
use crate::modules::frontpage::Frontpage;
use crate::modules::setup::{SetupHelper, SetupRegistry, SetupState, StateError};
use crate::modules::{AppModule, RunAs, SetupStep};
use crate::observability::metrics;
use crate::service::{Service, ServiceQuery, ServiceStatus};

/// Errors from module lifecycle operations.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("unknown module {0:?}")]
    Unknown(String),

    #[error("module {module} failed at step {step}: {source}")]
    Step {
        module: &'static str,
        step: &'static str,
        #[source]
        source: ActionError,
    },

    #[error("module {0} has no service to enable or disable")]
    NoService(&'static str),

    #[error("module {0} has not been set up")]
    NeedsSetup(&'static str),

    #[error("module {0} has no service account configured")]
    NoServiceAccount(&'static str),

    #[error(transparent)]
    State(#[from] StateError),
}

/// Module overview for display.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleStatus {
    pub name: &'static str,
    pub title: &'static str,
    pub setup_state: SetupState,
    pub service: Option<ServiceStatus>,
    pub shortcut: bool,
}

/// A module bound to the panel's collaborators.
pub struct ModuleController<'a, A, Q> {
    module: &'static AppModule,
    runner: &'a A,
    service: Option<&'a Service<Q>>,
    frontpage: &'a Frontpage,
    registry: &'a SetupRegistry,
    service_account: Option<&'a str>,
}

impl<'a, A, Q> ModuleController<'a, A, Q>
where
    A: ActionRunner + Sync,
    Q: ServiceQuery + Sync,
{
    pub fn new(
        module: &'static AppModule,
        runner: &'a A,
        service: Option<&'a Service<Q>>,
        frontpage: &'a Frontpage,
        registry: &'a SetupRegistry,
        service_account: Option<&'a str>,
    ) -> Self {
        Self {
            module,
            runner,
            service,
            frontpage,
            registry,
            service_account,
        }
    }

    pub fn module(&self) -> &'static AppModule {
        self.module
    }

    pub fn setup_state(&self) -> SetupState {
        self.registry.state(self.module)
    }

    /// Restore runtime state for a module that is already set up.
    pub async fn init(&self) {
        if self.setup_state() == SetupState::NeedsSetup {
            return;
        }
        if let Some(service) = self.service {
            if service.is_enabled().await {
                self.add_shortcut();
            }
        }
    }

    /// Install and configure the module, then record its version.
    pub async fn setup(&self) -> Result<(), ModuleError> {
        let result = self.run_setup().await;
        metrics::record_module_action(self.module.name, "setup", result.is_ok());
        result
    }

    async fn run_setup(&self) -> Result<(), ModuleError> {
        let name = self.module.name;
        let old_version = self.registry.installed_version(name);
        tracing::info!(module = name, ?old_version, version = self.module.version, "Setting up module");

        let mut helper = SetupHelper::new(self.module, self.runner);
        helper
            .install(self.module.managed_packages)
            .await
            .map_err(|source| ModuleError::Step {
                module: name,
                step: "install",
                source,
            })?;

        for step in self.module.setup_steps {
            helper
                .call(step.name, self.run_step(step))
                .await
                .map_err(|e| match e {
                    StepFailure::Action(source) => ModuleError::Step {
                        module: name,
                        step: step.name,
                        source,
                    },
                    StepFailure::NoAccount => ModuleError::NoServiceAccount(name),
                })?;
        }

        if let Some(service) = self.service {
            helper
                .call("post", async { service.notify_enabled(true) })
                .await;
        }
        helper.call("post", async { self.add_shortcut() }).await;

        self.registry.record(name, self.module.version)?;
        tracing::info!(module = name, "Module setup complete");
        Ok(())
    }

    async fn run_step(&self, step: &SetupStep) -> Result<String, StepFailure> {
        let action = self.module.action;
        match step.run_as {
            RunAs::Superuser => self
                .runner
                .superuser_run(action, step.args)
                .await
                .map_err(StepFailure::Action),
            RunAs::ServiceAccount => {
                let user = self.service_account.ok_or(StepFailure::NoAccount)?;
                self.runner
                    .run_as_user(action, step.args, user, None)
                    .await
                    .map_err(StepFailure::Action)
            }
        }
    }

    pub async fn enable(&self) -> Result<(), ModuleError> {
        let result = self.toggle(true).await;
        metrics::record_module_action(self.module.name, "enable", result.is_ok());
        result
    }

    pub async fn disable(&self) -> Result<(), ModuleError> {
        let result = self.toggle(false).await;
        metrics::record_module_action(self.module.name, "disable", result.is_ok());
        result
    }

    async fn toggle(&self, enable: bool) -> Result<(), ModuleError> {
        let name = self.module.name;
        let service = self.service.ok_or(ModuleError::NoService(name))?;
        if self.setup_state() == SetupState::NeedsSetup {
            return Err(ModuleError::NeedsSetup(name));
        }

        let step = if enable { "enable" } else { "disable" };
        self.runner
            .superuser_run(self.module.action, &[step])
            .await
            .map_err(|source| ModuleError::Step {
                module: name,
                step,
                source,
            })?;

        if enable {
            self.add_shortcut();
        } else {
            self.frontpage.remove_shortcut(name);
        }
        service.notify_enabled(enable);
        Ok(())
    }

    pub async fn status(&self) -> ModuleStatus {
        let service = match self.service {
            Some(service) => Some(service.status().await),
            None => None,
        };
        ModuleStatus {
            name: self.module.name,
            title: self.module.title,
            setup_state: self.setup_state(),
            service,
            shortcut: self.frontpage.contains(self.module.name),
        }
    }

    fn add_shortcut(&self) {
        if let Some(shortcut) = &self.module.shortcut {
            self.frontpage.add_shortcut(
                self.module.name,
                self.module.title,
                shortcut.url,
                shortcut.login_required,
            );
        }
    }
}

enum StepFailure {
    Action(ActionError),
    NoAccount,
}
