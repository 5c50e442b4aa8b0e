//! Argv tokenizing, command resolution, and validation.
//!
//! Given raw argv and a [`DispatchConfig`], this crate splits the tokens
//! into global flags, a command path, and command flags; resolves the path
//! to a declared command (including aliases and multi-word names); and
//! turns flags and positional tokens into typed values through each field's
//! schema.
//!
//! # Main entry points
//!
//! - [`process_config`]: dispatch argv and return a [`DispatchResult`].
//! - [`run`]: dispatch, then invoke the matched command's action.
//! - [`Dispatcher`]: a configuration checked once up front.
//!
//! The individual stages ([`tokenize`], [`resolve_key`], [`split_argv`],
//! [`resolve_command`], [`validate_flags`], [`validate_args`]) are public
//! for callers that need only part of the pipeline.
//!
//! # Example
//!
//! ```
//! use command_dispatch::process_config;
//! use command_dispatch_core::*;
//! use serde_json::json;
//!
//! let table = CommandTable::new()
//!     .with_command("user", CommandDefinition::new().with_args(ArgsSpec::array(Field::string())))
//!     .with_command(
//!         "userAdd",
//!         CommandDefinition::new()
//!             .with_name("user add")
//!             .with_args(ArgsSpec::single(Field::string())),
//!     );
//! let config = DispatchConfig::new(table);
//!
//! let result = process_config(&config, &["user", "add", "bob"]).unwrap();
//! assert_eq!(result.command_name, "user add");
//! assert_eq!(result.path_length, 2);
//! assert_eq!(result.args, json!("bob"));
//!
//! let err = process_config(&config, &["nope"]).unwrap_err();
//! assert!(matches!(err, DispatchError::UnknownCommand { .. }));
//! ```
//!
//! [`DispatchConfig`]: command_dispatch_core::DispatchConfig
//! [`DispatchResult`]: command_dispatch_core::DispatchResult

mod alias;
mod boundary;
mod dispatch;
mod resolve;
mod tokenize;
mod validate;

pub use alias::{camel_case, resolve_key};
pub use boundary::{ArgvRegions, find_global_options_end, split_argv};
pub use dispatch::{Dispatcher, process_config, run};
pub use resolve::{ResolvedCommand, matches_command, resolve_command};
pub use tokenize::{collect_flags, is_flag, tokenize};
pub use validate::{parse_options, validate_args, validate_flags};
