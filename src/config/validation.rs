//! Configuration validation.

use super::Config;
use thiserror::Error;

/// Semantic problems in an otherwise well-formed config.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("dispatcher.confirm_command must be a single non-empty word, got {0:?}")]
    InvalidConfirmCommand(String),
    #[error("conversion.{0} must not be empty or whitespace")]
    BlankDelimiter(&'static str),
    #[error("conversion.map_row_delimiter and map_value_delimiter must differ")]
    AmbiguousMapDelimiters,
    #[error("logging.filter is not a valid filter directive: {0}")]
    InvalidLogFilter(String),
}

/// Validate the configuration, collecting every error.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let keyword = config.dispatcher.confirm_command.trim();
    if keyword.is_empty() || keyword.split_whitespace().count() != 1 {
        errors.push(ValidationError::InvalidConfirmCommand(
            config.dispatcher.confirm_command.clone(),
        ));
    }

    let conversion = &config.conversion;
    for (name, value) in [
        ("list_delimiter", &conversion.list_delimiter),
        ("map_row_delimiter", &conversion.map_row_delimiter),
        ("map_value_delimiter", &conversion.map_value_delimiter),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::BlankDelimiter(name));
        }
    }
    if conversion.map_row_delimiter == conversion.map_value_delimiter {
        errors.push(ValidationError::AmbiguousMapDelimiters);
    }

    if let Err(e) = tracing_subscriber::EnvFilter::try_new(&config.logging.filter) {
        errors.push(ValidationError::InvalidLogFilter(e.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
