//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Load setup record → Build services
//!     → Panel (runner, services, front page, Tahoe node)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then state, then modules
//! - Every command gets its collaborators from the one Panel

pub mod startup;

pub use startup::{Panel, StartupError};
