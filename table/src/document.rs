//! Serializable command-table documents.
//!
//! A document describes a whole [`DispatchConfig`] with built-in
//! [`Field`] schemas, so tables can live in YAML or JSON files next to the
//! program that dispatches them. Actions cannot be declared in a document;
//! attach them after conversion if needed.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! global:
//!   fields:
//!     - name: verbose
//!       type: boolean
//!       default: false
//!   aliases:
//!     v: verbose
//! default_command: serve
//! commands:
//!   - key: serve
//!     aliases: [s]
//!     description: Start the dev server
//!     options:
//!       fields:
//!         - name: port
//!           type: number
//!           min: 1024
//!           default: 3000
//!     args:
//!       kind: array
//!       field:
//!         type: string
//! ```

use serde::{Deserialize, Serialize};

use command_dispatch_core::{
    AliasMap, ArgsSpec, CommandDefinition, CommandTable, DispatchConfig, Field, OptionsSchema,
};

use crate::error::{Result, TableError};

/// Format version written by [`TableDocument::new`].
pub const CURRENT_VERSION: &str = "1.0";

fn default_version() -> String {
    CURRENT_VERSION.to_string()
}

/// One named field of an options block.
///
/// The field's own keys (`type`, `min`, `default`, ...) sit next to `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDocument {
    /// Field name as it appears in the parsed options.
    pub name: String,
    /// Field schema.
    #[serde(flatten)]
    pub field: Field,
}

/// Declared fields plus the aliases that point at them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsDocument {
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDocument>,
    /// Short or alternate flag keys.
    #[serde(default, skip_serializing_if = "AliasMap::is_empty")]
    pub aliases: AliasMap,
}

impl OptionsDocument {
    /// Builds the runtime schema.
    pub fn to_schema(&self) -> OptionsSchema {
        self.fields
            .iter()
            .fold(OptionsSchema::new(), |schema, doc| {
                schema.with_field(doc.name.clone(), doc.field.clone())
            })
    }
}

/// Positional-argument declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgsDocument {
    /// No positional arguments.
    #[default]
    None,
    /// The first token only.
    Single {
        /// Schema for the token.
        field: Field,
    },
    /// One schema per position.
    Tuple {
        /// Schemas in position order.
        fields: Vec<Field>,
    },
    /// Every token against the same schema.
    Array {
        /// Schema for each token.
        field: Field,
    },
}

impl ArgsDocument {
    /// Builds the runtime spec.
    pub fn to_spec(&self) -> ArgsSpec {
        match self {
            Self::None => ArgsSpec::None,
            Self::Single { field } => ArgsSpec::single(field.clone()),
            Self::Tuple { fields } => ArgsSpec::tuple(fields.iter().cloned()),
            Self::Array { field } => ArgsSpec::array(field.clone()),
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// One command entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDocument {
    /// Declaration key; also the canonical name unless `name` is set.
    pub key: String,
    /// Canonical name, possibly multi-word (`"user add"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Alternate names matched verbatim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Shown in unknown-command listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Command flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsDocument>,
    /// Positional arguments.
    #[serde(default, skip_serializing_if = "ArgsDocument::is_none")]
    pub args: ArgsDocument,
}

impl CommandDocument {
    /// Builds the runtime command.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Definition`] when an option alias targets an
    /// undeclared field.
    pub fn to_definition(&self) -> Result<CommandDefinition> {
        let mut command = CommandDefinition::new().with_args(self.args.to_spec());
        if let Some(name) = &self.name {
            command = command.with_name(name.clone());
        }
        for alias in &self.aliases {
            command = command.with_alias(alias.clone());
        }
        if let Some(description) = &self.description {
            command = command.with_description(description);
        }
        if let Some(options) = &self.options {
            command = command
                .with_options(options.to_schema())
                .with_option_aliases(options.aliases.clone())?;
        }
        Ok(command)
    }
}

/// A complete declarative dispatch configuration.
///
/// # Examples
///
/// ```
/// use command_dispatch_table::TableDocument;
///
/// let doc = TableDocument::from_yaml_str(r#"
/// commands:
///   - key: build
///   - key: userAdd
///     name: user add
///     args: { kind: single, field: { type: string } }
/// "#).unwrap();
///
/// assert_eq!(doc.version, "1.0");
/// let config = doc.into_config().unwrap();
/// assert!(config.validate().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDocument {
    /// Format version (`"1.x"`).
    #[serde(default = "default_version")]
    pub version: String,
    /// Global flags accepted before the command path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<OptionsDocument>,
    /// Key of the fallback command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_command: Option<String>,
    /// Accept flags no schema declares.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_unknown_flags: bool,
    /// Commands in declaration order.
    #[serde(default)]
    pub commands: Vec<CommandDocument>,
}

impl Default for TableDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDocument {
    /// Creates an empty document at the current version.
    pub fn new() -> Self {
        Self {
            version: default_version(),
            global: None,
            default_command: None,
            allow_unknown_flags: false,
            commands: Vec::new(),
        }
    }

    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](TableError::YamlError) if parsing fails.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`](TableError::JsonError) if parsing fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the document as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](TableError::YamlError) if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Serializes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`](TableError::JsonError) if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the runtime command table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuplicateCommand`] when two entries share a key,
    /// or [`TableError::Definition`] for a bad option alias.
    pub fn to_table(&self) -> Result<CommandTable> {
        let mut table = CommandTable::new();
        for doc in &self.commands {
            if table.get(&doc.key).is_some() {
                return Err(TableError::DuplicateCommand(doc.key.clone()));
            }
            table.insert(doc.key.clone(), doc.to_definition()?);
        }
        Ok(table)
    }

    /// Converts the document into a checked [`DispatchConfig`].
    ///
    /// # Errors
    ///
    /// - [`TableError::UnsupportedVersion`] for a version other than `1.x`.
    /// - [`TableError::DuplicateCommand`] for repeated keys.
    /// - [`TableError::Definition`] for the first failed definition check.
    pub fn into_config(self) -> Result<DispatchConfig> {
        if self.version != "1" && !self.version.starts_with("1.") {
            return Err(TableError::UnsupportedVersion(self.version));
        }

        let mut config = DispatchConfig::new(self.to_table()?);
        if let Some(global) = &self.global {
            config = config
                .with_global_options(global.to_schema())
                .with_global_aliases(global.aliases.clone())?;
        }
        if let Some(default) = self.default_command {
            config = config.with_default_command(default);
        }
        if self.allow_unknown_flags {
            config = config.allow_unknown_flags();
        }

        match config.validate().into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(config),
        }
    }
}
