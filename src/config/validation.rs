//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Reject account and node names that would escape the Tahoe home
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PanelConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::PanelConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be a single path component, got {value:?}")]
    NotAComponent { field: &'static str, value: String },

    #[error("{field} must be an absolute path")]
    RelativePath { field: &'static str },
}

pub fn validate_config(config: &PanelConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.tahoe.restart_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "tahoe.restart_timeout_secs",
        });
    }
    if config.actions.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "actions.timeout_secs",
        });
    }

    if config.tahoe.service_user.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "tahoe.service_user",
        });
    }

    for (field, value) in [
        ("tahoe.storage_node", &config.tahoe.storage_node),
        ("tahoe.introducer", &config.tahoe.introducer),
    ] {
        if value.is_empty() {
            errors.push(ValidationError::Empty { field });
        } else if value.contains('/') || value == "." || value == ".." {
            errors.push(ValidationError::NotAComponent {
                field,
                value: value.clone(),
            });
        }
    }

    for (field, path) in [
        ("tahoe.home", &config.tahoe.home),
        ("actions.directory", &config.actions.directory),
    ] {
        if !path.is_absolute() {
            errors.push(ValidationError::RelativePath { field });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
