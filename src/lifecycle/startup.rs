//! Startup orchestration.
//!
//! # Responsibilities
//! - Build every collaborator once from the validated configuration
//! - Create one Service per module that manages a unit
//! - Hand out module controllers and the Tahoe node by reference
//!
//! # Design Decisions
//! - Fail fast: an unreadable setup record is fatal
//! - No process-wide singletons; everything hangs off the Panel

use thiserror::Error;

use crate::actions::{ActionRunner, CommandRunner};
use crate::config::PanelConfig;
use crate::modules::{self, AppModule, Frontpage, ModuleController, ModuleError, SetupRegistry, StateError};
use crate::service::{Service, ServiceQuery, SystemctlQuery};
use crate::tahoe::TahoeNode;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load module setup state: {0}")]
    State(#[from] StateError),
}

/// The panel's modules and their shared collaborators.
pub struct Panel<A, Q> {
    config: PanelConfig,
    runner: A,
    frontpage: Frontpage,
    registry: SetupRegistry,
    services: Vec<Service<Q>>,
}

impl Panel<CommandRunner, SystemctlQuery> {
    /// Wire the panel to the real system.
    pub fn bootstrap(config: PanelConfig) -> Result<Self, StartupError> {
        let runner = CommandRunner::new(&config.actions);
        Self::new(config, runner, SystemctlQuery)
    }
}

impl<A, Q> Panel<A, Q>
where
    A: ActionRunner + Clone + Sync,
    Q: ServiceQuery + Clone + Sync,
{
    pub fn new(config: PanelConfig, runner: A, query: Q) -> Result<Self, StartupError> {
        let registry = SetupRegistry::load(&config.state.setup_file())?;
        let services = modules::ALL
            .iter()
            .filter_map(|module| {
                module
                    .service
                    .map(|spec| Service::new(module.name, module.title, spec, query.clone()))
            })
            .collect();

        tracing::debug!(modules = modules::ALL.len(), "Panel initialised");
        Ok(Self {
            config,
            runner,
            frontpage: Frontpage::new(),
            registry,
            services,
        })
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn frontpage(&self) -> &Frontpage {
        &self.frontpage
    }

    pub fn service(&self, module: &str) -> Option<&Service<Q>> {
        self.services.iter().find(|s| s.id() == module)
    }

    /// Controller for the module called `name`.
    pub fn module(&self, name: &str) -> Result<ModuleController<'_, A, Q>, ModuleError> {
        let module = modules::find(name).ok_or_else(|| ModuleError::Unknown(name.to_string()))?;
        Ok(self.controller(module))
    }

    pub fn controllers(&self) -> impl Iterator<Item = ModuleController<'_, A, Q>> {
        modules::ALL.iter().map(|module| self.controller(module))
    }

    /// Run every module's init hook.
    pub async fn init(&self) {
        for controller in self.controllers() {
            controller.init().await;
        }
    }

    pub fn tahoe(&self) -> TahoeNode<A> {
        TahoeNode::new(self.config.tahoe.clone(), self.runner.clone())
    }

    fn controller(&self, module: &'static AppModule) -> ModuleController<'_, A, Q> {
        ModuleController::new(
            module,
            &self.runner,
            self.service(module.name),
            &self.frontpage,
            &self.registry,
            self.service_account(module),
        )
    }

    fn service_account(&self, module: &AppModule) -> Option<&str> {
        if module.name == modules::tahoe::MODULE.name {
            Some(self.config.tahoe.service_user.as_str())
        } else {
            None
        }
    }
}
