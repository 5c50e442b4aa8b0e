//! Command and configuration definitions.
//!
//! Definitions are built once, checked once (alias targets must exist in the
//! schema they were declared against), and then read by every dispatch call.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::field::OptionsSchema;
use crate::types::{ArgsSpec, CommandSummary};
use crate::validate::{DefinitionError, validate_aliases};

/// Error type returned by command actions.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

/// Callback invoked with the dispatch result of its command.
pub type Action = Arc<dyn Fn(&DispatchResult) -> Result<(), ActionError> + Send + Sync>;

/// Builds a command table from the typed global options and the global schema.
pub type CommandFactory =
    Arc<dyn Fn(&Value, Option<&OptionsSchema>) -> CommandTable + Send + Sync>;

/// Maps short flag keys to canonical field names.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::AliasMap;
///
/// let aliases = AliasMap::new().with_alias("v", "verbose");
/// assert_eq!(aliases.get("v"), Some("verbose"));
/// assert!(aliases.contains_alias("v"));
/// assert!(!aliases.contains_alias("verbose"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasMap {
    entries: BTreeMap<String, String>,
}

impl AliasMap {
    /// Creates an empty alias map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.entries.insert(alias.into(), target.into());
        self
    }

    /// Returns the canonical name an alias points at.
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    /// Returns `true` when `alias` is a declared alias key.
    pub fn contains_alias(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    /// Iterates `(alias, target)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, t)| (a.as_str(), t.as_str()))
    }

    /// Returns `true` when no alias is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Into<String>, T: Into<String>> FromIterator<(A, T)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (A, T)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(a, t)| (a.into(), t.into()))
                .collect(),
        }
    }
}

/// A declared command.
///
/// The canonical name is the explicit [`name`](CommandDefinition::with_name)
/// or, once inserted into a [`CommandTable`], the declaration key.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::*;
/// use serde_json::json;
///
/// let serve = CommandDefinition::new()
///     .with_description("Start the dev server")
///     .with_alias("s")
///     .with_options(OptionsSchema::new().with_field("port", Field::number().with_default(json!(3000))))
///     .with_option_aliases(AliasMap::new().with_alias("p", "port"))
///     .unwrap()
///     .with_args(ArgsSpec::array(Field::string()));
///
/// let table = CommandTable::new().with_command("serve", serve);
/// assert_eq!(table.get("serve").unwrap().canonical_name(), "serve");
/// ```
#[derive(Clone, Default)]
pub struct CommandDefinition {
    /// Explicit canonical name.
    pub name: Option<String>,
    /// Alternative names, matched literally.
    pub aliases: Vec<String>,
    /// Short description for diagnostics.
    pub description: Option<String>,
    /// Schema for command flags.
    pub options: Option<OptionsSchema>,
    /// Aliases for command flags.
    pub option_aliases: AliasMap,
    /// Positional-argument shape.
    pub args: ArgsSpec,
    action: Option<Action>,
}

impl CommandDefinition {
    /// Creates an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit canonical name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets the flag schema.
    pub fn with_options(mut self, options: OptionsSchema) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the flag aliases.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnknownAliasTarget`] when an alias points at
    /// a field the option schema does not declare. Set the schema first.
    pub fn with_option_aliases(mut self, aliases: AliasMap) -> Result<Self, DefinitionError> {
        validate_aliases(&aliases, self.options.as_ref())?;
        self.option_aliases = aliases;
        Ok(self)
    }

    /// Sets the positional-argument shape.
    pub fn with_args(mut self, args: ArgsSpec) -> Self {
        self.args = args;
        self
    }

    /// Sets the action run by `run`.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&DispatchResult) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Canonical name, empty until named or inserted into a table.
    pub fn canonical_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// The action, if one was attached.
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Diagnostic summary of this command.
    pub fn summary(&self) -> CommandSummary {
        CommandSummary {
            name: self.canonical_name().to_string(),
            aliases: self.aliases.clone(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("description", &self.description)
            .field("options", &self.options)
            .field("option_aliases", &self.option_aliases)
            .field("args", &self.args)
            .field("action", &self.action.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Ordered mapping of declaration keys to commands.
///
/// Declaration order is the resolution tie-break. Inserting a command
/// without an explicit name gives it the declaration key as canonical name.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: Vec<(String, CommandDefinition)>,
}

impl CommandTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command, replacing an existing one with the same key in place.
    pub fn with_command(mut self, key: impl Into<String>, command: CommandDefinition) -> Self {
        self.insert(key, command);
        self
    }

    /// Adds a command, replacing an existing one with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, mut command: CommandDefinition) {
        let key = key.into();
        if command.name.is_none() {
            command.name = Some(key.clone());
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = command,
            None => self.entries.push((key, command)),
        }
    }

    /// Looks up a command by declaration key.
    pub fn get(&self, key: &str) -> Option<&CommandDefinition> {
        self.get_key_value(key).map(|(_, command)| command)
    }

    /// Looks up a command by declaration key, returning the stored key too.
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &CommandDefinition)> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(k, command)| (k.as_str(), command))
    }

    /// Iterates `(key, command)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandDefinition)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no command is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summaries of every command in declaration order.
    pub fn summaries(&self) -> Vec<CommandSummary> {
        self.entries.iter().map(|(_, c)| c.summary()).collect()
    }
}

/// Where the command table comes from.
#[derive(Clone)]
pub enum CommandSource {
    /// A table fixed at configuration time.
    Static(CommandTable),
    /// A table built per dispatch from the typed global options.
    Factory(CommandFactory),
}

impl CommandSource {
    /// Wraps a factory closure.
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn(&Value, Option<&OptionsSchema>) -> CommandTable + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(factory))
    }

    /// Produces the table for one dispatch.
    pub fn materialize(
        &self,
        global_options: &Value,
        global_schema: Option<&OptionsSchema>,
    ) -> CommandTable {
        match self {
            Self::Static(table) => table.clone(),
            Self::Factory(factory) => factory(global_options, global_schema),
        }
    }
}

impl From<CommandTable> for CommandSource {
    fn from(table: CommandTable) -> Self {
        Self::Static(table)
    }
}

impl fmt::Debug for CommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(table) => f.debug_tuple("Static").field(table).finish(),
            Self::Factory(_) => f.write_str("Factory(<fn>)"),
        }
    }
}

/// Complete dispatch configuration.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::*;
/// use serde_json::json;
///
/// let config = DispatchConfig::new(CommandTable::new().with_command("build", CommandDefinition::new()))
///     .with_global_options(OptionsSchema::new().with_field("verbose", Field::boolean().with_default(json!(false))))
///     .with_global_aliases(AliasMap::new().with_alias("v", "verbose"))
///     .unwrap()
///     .with_default_command("build");
///
/// assert!(config.validate().is_empty());
///
/// let bad = DispatchConfig::new(CommandTable::new()).with_default_command("missing");
/// assert_eq!(bad.validate(), vec![DefinitionError::UnknownDefaultCommand("missing".into())]);
/// ```
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Command table or factory.
    pub commands: CommandSource,
    /// Schema for global flags.
    pub global_options: Option<OptionsSchema>,
    /// Aliases for global flags.
    pub global_aliases: AliasMap,
    /// Declaration key of the command used when no path matches.
    pub default_command: Option<String>,
    /// Skip unknown-flag detection in both regions.
    pub allow_unknown_flags: bool,
}

impl DispatchConfig {
    /// Creates a configuration over a command source.
    pub fn new(commands: impl Into<CommandSource>) -> Self {
        Self {
            commands: commands.into(),
            global_options: None,
            global_aliases: AliasMap::new(),
            default_command: None,
            allow_unknown_flags: false,
        }
    }

    /// Sets the global flag schema.
    pub fn with_global_options(mut self, options: OptionsSchema) -> Self {
        self.global_options = Some(options);
        self
    }

    /// Sets the global flag aliases.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnknownAliasTarget`] when an alias points at
    /// a field the global schema does not declare.
    pub fn with_global_aliases(mut self, aliases: AliasMap) -> Result<Self, DefinitionError> {
        validate_aliases(&aliases, self.global_options.as_ref())?;
        self.global_aliases = aliases;
        Ok(self)
    }

    /// Sets the fallback command key.
    pub fn with_default_command(mut self, key: impl Into<String>) -> Self {
        self.default_command = Some(key.into());
        self
    }

    /// Accepts flags no schema declares.
    pub fn allow_unknown_flags(mut self) -> Self {
        self.allow_unknown_flags = true;
        self
    }

    /// Runs every definition-time check; see [`validate_config`](crate::validate_config).
    pub fn validate(&self) -> Vec<DefinitionError> {
        crate::validate::validate_config(self)
    }
}

/// Outcome of a successful dispatch.
///
/// Typed values are JSON; the `*_as` helpers deserialize them into caller
/// types.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{CommandDefinition, DispatchResult};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Deserialize)]
/// struct ServeOptions {
///     port: u16,
/// }
///
/// let result = DispatchResult {
///     command_name: "serve".into(),
///     command: CommandDefinition::new().with_name("serve"),
///     path_length: 1,
///     global_options: json!({}),
///     options: json!({"port": 8080}),
///     args: json!(["src"]),
/// };
///
/// let options: ServeOptions = result.options_as().unwrap();
/// assert_eq!(options.port, 8080);
/// let args: Vec<String> = result.args_as().unwrap();
/// assert_eq!(args, vec!["src"]);
/// ```
#[derive(Debug, Clone)]
pub struct DispatchResult {
    /// Canonical name of the matched command.
    pub command_name: String,
    /// The matched command.
    pub command: CommandDefinition,
    /// Path tokens consumed to identify the command (0 for the default command).
    pub path_length: usize,
    /// Typed global options.
    pub global_options: Value,
    /// Typed command options.
    pub options: Value,
    /// Typed positional arguments.
    pub args: Value,
}

impl DispatchResult {
    /// Deserializes the global options.
    pub fn global_options_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.global_options)
    }

    /// Deserializes the command options.
    pub fn options_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.options)
    }

    /// Deserializes the positional arguments.
    pub fn args_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.args)
    }

    /// JSON rendering without the command definition.
    pub fn to_json(&self) -> Value {
        json!({
            "command": self.command_name,
            "global_options": self.global_options,
            "options": self.options,
            "args": self.args,
        })
    }
}
