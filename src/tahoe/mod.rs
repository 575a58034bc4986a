//! Tahoe-LAFS distributed storage.
//!
//! # Data Flow
//! ```text
//! add / remove introducer
//!     → node.rs checks the domain name precondition
//!     → introducers.rs edits introducers.yaml in an edit session
//!     → on commit: StorageNode restart (run as the service account,
//!       from the Tahoe home, with a deadline)
//!
//! list introducers / local introducer / domain name
//!     → plain reads, no session, no restart
//! ```
//!
//! # Design Decisions
//! - A failed restart is logged and returned, but never undoes the edit
//! - File locations come from the node layout in TahoeConfig

pub mod error;
pub mod introducers;
pub mod node;

pub use error::{RestartError, TahoeError};
pub use introducers::{IntroducerEntry, IntroducerList, NodeRestart};
pub use node::{StorageNode, TahoeNode};
