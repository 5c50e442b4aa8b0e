//! Definition-time validation.
//!
//! Catches configuration mistakes when commands and configs are built,
//! before any argv is dispatched: alias targets that name no field, empty
//! declaration keys, and a default command the table does not declare.
//!
//! # Examples
//!
//! ```
//! use command_dispatch_core::*;
//!
//! let schema = OptionsSchema::new().with_field("verbose", Field::boolean());
//! assert!(validate_aliases(&AliasMap::new().with_alias("v", "verbose"), Some(&schema)).is_ok());
//!
//! // Invalid: alias points at a field the schema lacks
//! let err = validate_aliases(&AliasMap::new().with_alias("q", "quiet"), Some(&schema));
//! assert!(err.is_err());
//! ```

use thiserror::Error;

use crate::definition::{AliasMap, CommandSource, DispatchConfig};
use crate::field::OptionsSchema;

/// Command/config definition errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// An alias points at a field the schema does not declare.
    #[error("alias `{alias}` targets unknown field `{target}`")]
    UnknownAliasTarget {
        /// Alias key.
        alias: String,
        /// Missing target field.
        target: String,
    },
    /// The default command key is not declared in the command table.
    #[error("default command `{0}` is not declared")]
    UnknownDefaultCommand(String),
    /// A command was declared under an empty or whitespace-only key.
    #[error("command key cannot be empty")]
    EmptyCommandKey,
}

/// Checks that every alias target is a field of `schema`.
///
/// A missing schema declares no fields, so any alias fails. The first
/// offending alias (in alias-key order) is reported.
pub fn validate_aliases(
    aliases: &AliasMap,
    schema: Option<&OptionsSchema>,
) -> Result<(), DefinitionError> {
    for (alias, target) in aliases.iter() {
        if !schema.is_some_and(|schema| schema.contains(target)) {
            return Err(DefinitionError::UnknownAliasTarget {
                alias: alias.to_string(),
                target: target.to_string(),
            });
        }
    }
    Ok(())
}

/// Validates a dispatch configuration.
///
/// Checks global aliases and, for static tables, every command's key and
/// option aliases plus the default command key. Factory tables only exist
/// per dispatch, so their commands are checked when they are built.
pub fn validate_config(config: &DispatchConfig) -> Vec<DefinitionError> {
    let mut errors = Vec::new();

    if let Err(err) = validate_aliases(&config.global_aliases, config.global_options.as_ref()) {
        errors.push(err);
    }

    let CommandSource::Static(table) = &config.commands else {
        return errors;
    };

    for (key, command) in table.iter() {
        if key.trim().is_empty() {
            errors.push(DefinitionError::EmptyCommandKey);
        }
        if let Err(err) = validate_aliases(&command.option_aliases, command.options.as_ref()) {
            errors.push(err);
        }
    }

    if let Some(default) = &config.default_command {
        if table.get(default).is_none() {
            errors.push(DefinitionError::UnknownDefaultCommand(default.clone()));
        }
    }

    errors
}
