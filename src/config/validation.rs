//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("console.module_name is required")]
    MissingModuleName,
    #[error("console.module_name must not contain spaces, got '{0}'")]
    InvalidModuleName(String),
    #[error("session.user is required")]
    MissingSessionUser,
    #[error("console.bouncer_config does not exist: {0}")]
    BouncerConfigNotFound(String),
    #[error("console.store_path parent directory does not exist: {0}")]
    StorePathInvalid(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let module_name = &config.console.module_name;
    if module_name.is_empty() {
        errors.push(ValidationError::MissingModuleName);
    } else if module_name.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidModuleName(module_name.clone()));
    }
    if config.session.user.is_empty() {
        errors.push(ValidationError::MissingSessionUser);
    }

    let bouncer_config = &config.console.bouncer_config;
    if !bouncer_config.exists() {
        errors.push(ValidationError::BouncerConfigNotFound(
            bouncer_config.display().to_string(),
        ));
    }

    if let Some(ref store) = config.console.store_path
        && let Some(parent) = store.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        errors.push(ValidationError::StorePathInvalid(
            store.display().to_string(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
