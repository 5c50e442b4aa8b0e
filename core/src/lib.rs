//! Core types for argv command dispatch.
//!
//! This crate defines the data model shared by the tokenizer, command
//! resolver and dispatcher in `command-dispatch`:
//!
//! - [`FlagToken`] / [`FlagValue`]: atomic flags produced from argv tokens.
//! - [`FlagMap`]: last-write-wins flag accumulator.
//! - [`FieldSchema`]: the capability that validates one raw value; [`Field`]
//!   is the built-in implementation and [`OptionsSchema`] groups fields.
//! - [`ArgsSpec`]: positional-argument shape (`None`, `Single`, `Tuple`,
//!   `Array`).
//! - [`CommandDefinition`], [`CommandTable`], [`CommandSource`] and
//!   [`DispatchConfig`]: what the caller declares.
//! - [`DispatchResult`]: what a successful dispatch produces.
//!
//! Definition-time checks ([`validate_aliases`], [`validate_config`]) reject
//! alias targets that name no field before any argv is seen.
//!
//! # Example
//!
//! ```
//! use command_dispatch_core::*;
//! use serde_json::json;
//!
//! let serve = CommandDefinition::new()
//!     .with_description("Start the dev server")
//!     .with_options(
//!         OptionsSchema::new()
//!             .with_field("port", Field::number().with_min(1024.0).with_default(json!(3000))),
//!     )
//!     .with_args(ArgsSpec::array(Field::string()));
//!
//! let config = DispatchConfig::new(CommandTable::new().with_command("serve", serve))
//!     .with_global_options(
//!         OptionsSchema::new().with_field("verbose", Field::boolean().with_default(json!(false))),
//!     );
//!
//! assert!(config.validate().is_empty());
//! ```

mod definition;
mod error;
mod field;
mod types;
mod validate;

pub use definition::{
    Action, ActionError, AliasMap, CommandDefinition, CommandFactory, CommandSource,
    CommandTable, DispatchConfig, DispatchResult,
};
pub use error::{DispatchError, Issue, Result, ValidationErrors};
pub use field::{Field, FieldFailure, FieldSchema, OptionsSchema, ValueKind};
pub use types::*;
pub use validate::{DefinitionError, validate_aliases, validate_config};
