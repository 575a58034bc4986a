//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! External command (action script, restart):
//!     → timeouts.rs (enforce a deadline, kill on expiry)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - No automatic retries: privileged actions are not assumed idempotent

pub mod timeouts;

pub use timeouts::{with_timeout, TimedOut};
