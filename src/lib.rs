//! Administrative modules for a self-hosted server management panel.
//!
//! Each module installs a package, switches a service on or off and puts a
//! shortcut on the front page. The Tahoe-LAFS module additionally manages the
//! storage node's introducer list through scoped, atomic YAML edits.

pub mod actions;
pub mod config;
pub mod edit;
pub mod lifecycle;
pub mod modules;
pub mod observability;
pub mod resilience;
pub mod service;
pub mod tahoe;

pub use config::schema::PanelConfig;
pub use edit::{with_config, ConfigDocument, EditSession};
pub use lifecycle::Panel;
pub use tahoe::{IntroducerEntry, TahoeError};
