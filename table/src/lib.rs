//! Declarative command tables for argv dispatch.
//!
//! This crate reads YAML or JSON documents that describe a complete
//! [`DispatchConfig`](command_dispatch_core::DispatchConfig): global flags,
//! commands with their options and positional arguments, aliases, and the
//! default command. Documents are checked with the same definition-time
//! rules as configurations built in code.
//!
//! # Quick start
//!
//! ```no_run
//! use command_dispatch_table::{TableDocument, load_config};
//!
//! // Load and check in one step
//! let config = load_config("commands.yaml").unwrap();
//!
//! // Or keep the document around, e.g. to re-save it as JSON
//! let doc = TableDocument::load("commands.yaml").unwrap();
//! doc.save("commands.json").unwrap();
//! let config = doc.into_config().unwrap();
//! ```

mod document;
mod error;
mod loader;

pub use document::{
    ArgsDocument, CURRENT_VERSION, CommandDocument, FieldDocument, OptionsDocument, TableDocument,
};
pub use error::{Result, TableError};
pub use loader::{TableFormat, load_config};
