//! Panel application modules.
//!
//! # Data Flow
//! ```text
//! AppModule (static descriptor: packages, service, menu, shortcut, steps)
//!     → ModuleController (descriptor + collaborators from the Panel)
//!     → setup:  SetupHelper.install → steps via ActionRunner → shortcut
//!               → SetupRegistry records the version
//!     → enable / disable: `<action> enable|disable` → shortcut → Service
//! ```
//!
//! # Design Decisions
//! - Modules are data; the behaviour they share lives in the controller
//! - Collaborators are passed in, never looked up globally

pub mod cockpit;
pub mod controller;
pub mod frontpage;
pub mod setup;
pub mod snapshot;
pub mod tahoe;

use serde::Serialize;

use crate::service::ServiceSpec;

pub use controller::{ModuleController, ModuleError, ModuleStatus};
pub use frontpage::{Frontpage, Shortcut};
pub use setup::{SetupHelper, SetupRegistry, SetupState, StateError};

/// Every module this crate provides.
pub const ALL: &[&AppModule] = &[&cockpit::MODULE, &snapshot::MODULE, &tahoe::MODULE];

/// Look a module up by name.
pub fn find(name: &str) -> Option<&'static AppModule> {
    ALL.iter().copied().find(|m| m.name == name)
}

/// Static description of a module.
#[derive(Debug, Serialize)]
pub struct AppModule {
    pub name: &'static str,
    pub version: u32,
    pub title: &'static str,
    pub description: &'static [&'static str],
    pub depends: &'static [&'static str],
    pub managed_packages: &'static [&'static str],
    /// Action script handling `enable`, `disable` and the setup steps.
    pub action: &'static str,
    #[serde(skip)]
    pub service: Option<ServiceSpec>,
    pub menu: MenuEntry,
    pub shortcut: Option<ShortcutSpec>,
    #[serde(skip)]
    pub setup_steps: &'static [SetupStep],
}

/// Where the module appears in the navigation menu.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MenuEntry {
    pub section: &'static str,
    pub icon: &'static str,
    pub url_name: &'static str,
}

/// Front page tile shown while the module is enabled.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShortcutSpec {
    pub url: &'static str,
    pub login_required: bool,
}

/// One privileged call made after package installation.
#[derive(Debug, Clone, Copy)]
pub struct SetupStep {
    pub name: &'static str,
    pub args: &'static [&'static str],
    pub run_as: RunAs,
}

/// Account a setup step runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAs {
    Superuser,
    /// The module's non-privileged service account.
    ServiceAccount,
}
