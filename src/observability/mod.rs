//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters via the `metrics` facade)
//!
//! Consumers:
//!     → stderr through the fmt subscriber
//!     → whatever recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (session_id, module, action) over formatted strings
//! - Counters are free when no recorder is installed
//! - `RUST_LOG` wins over the configured level

pub mod logging;
pub mod metrics;
