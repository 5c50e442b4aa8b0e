//! Error types for dispatch.
//!
//! Unknown-flag and field failures for one argv region are batched into a
//! single [`ValidationErrors`]; every other failure is surfaced on its own.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::definition::ActionError;
use crate::field::FieldFailure;
use crate::types::{CommandSummary, FlagContext};
use crate::validate::DefinitionError;

/// One problem found while validating a region of argv.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// Flag keys no schema field accepts, reported together.
    UnrecognizedFlags {
        /// Region the keys were found in.
        context: FlagContext,
        /// Offending keys in order of first appearance.
        keys: Vec<String>,
    },
    /// A value rejected by its field schema.
    Field(FieldFailure),
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedFlags { context, keys } => {
                write!(f, "unrecognized {context} flag(s): {}", keys.join(", "))
            }
            Self::Field(failure) => write!(f, "{failure}"),
        }
    }
}

/// Aggregate of every issue found in one region.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{FieldFailure, FlagContext, Issue, ValidationErrors};
///
/// let errors = ValidationErrors::new(vec![
///     Issue::UnrecognizedFlags { context: FlagContext::Command, keys: vec!["foo".into(), "bar".into()] },
///     Issue::Field(FieldFailure::new("required").at("port")),
/// ]);
/// assert_eq!(
///     errors.to_string(),
///     "unrecognized command flag(s): foo, bar; port: required"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{}", join_issues(.issues))]
pub struct ValidationErrors {
    /// Issues in the order they were found.
    pub issues: Vec<Issue>,
}

impl ValidationErrors {
    /// Wraps a list of issues.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Keys reported as unrecognized, across all contexts.
    pub fn unrecognized_keys(&self) -> impl Iterator<Item = &str> {
        self.issues
            .iter()
            .flat_map(|issue| match issue {
                Issue::UnrecognizedFlags { keys, .. } => keys.as_slice(),
                Issue::Field(_) => &[][..],
            })
            .map(String::as_str)
    }
}

fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn list_commands(available: &[CommandSummary]) -> String {
    if available.is_empty() {
        return "  (none)".to_string();
    }
    available
        .iter()
        .map(|summary| format!("  {summary}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors produced by dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A long flag with an empty key, e.g. `--=value`.
    #[error("malformed flag: {0}")]
    MalformedFlag(String),

    /// No command matched the path and no default command exists.
    #[error("unknown command \"{path}\"; available commands:\n{}", list_commands(.available))]
    UnknownCommand {
        /// Space-joined path that was attempted.
        path: String,
        /// Every declared command.
        available: Vec<CommandSummary>,
    },

    /// Unknown flags and/or field failures within one region.
    #[error("invalid {context} flags: {errors}")]
    Validation {
        /// Region that failed.
        context: FlagContext,
        /// Aggregated issues.
        errors: ValidationErrors,
    },

    /// A positional argument rejected by its field schema.
    #[error("invalid argument {0}")]
    Argument(FieldFailure),

    /// The configuration failed a definition-time check.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// `run` matched a command that has no action.
    #[error("command \"{0}\" has no action")]
    MissingAction(String),

    /// A command action returned an error.
    #[error("command \"{command}\" failed: {source}")]
    Action {
        /// Canonical name of the command.
        command: String,
        /// Error returned by the action.
        #[source]
        source: ActionError,
    },
}

impl DispatchError {
    /// The aggregated validation issues, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

/// Convenience alias for results with [`DispatchError`].
pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_lists_available() {
        let err = DispatchError::UnknownCommand {
            path: "nope".into(),
            available: vec![CommandSummary {
                name: "serve".into(),
                aliases: vec!["s".into()],
                description: Some("Start the dev server".into()),
            }],
        };
        assert_eq!(
            err.to_string(),
            "unknown command \"nope\"; available commands:\n  serve (s) - Start the dev server"
        );
    }

    #[test]
    fn test_validation_error_accessor() {
        let err = DispatchError::Validation {
            context: FlagContext::Global,
            errors: ValidationErrors::new(vec![Issue::UnrecognizedFlags {
                context: FlagContext::Global,
                keys: vec!["x".into()],
            }]),
        };
        assert_eq!(
            err.validation_errors()
                .unwrap()
                .unrecognized_keys()
                .collect::<Vec<_>>(),
            vec!["x"]
        );
        assert_eq!(
            err.to_string(),
            "invalid global flags: unrecognized global flag(s): x"
        );
        assert!(DispatchError::MalformedFlag("--=x".into())
            .validation_errors()
            .is_none());
    }

    #[test]
    fn test_issue_serializes_with_kind_tag() {
        let issue = Issue::UnrecognizedFlags {
            context: FlagContext::Command,
            keys: vec!["foo".into()],
        };
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            serde_json::json!({"kind": "unrecognized_flags", "context": "command", "keys": ["foo"]})
        );
    }
}
