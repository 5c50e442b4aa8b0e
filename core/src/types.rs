//! Token-level data model shared by every dispatch stage.
//!
//! These types describe what the tokenizer produces ([`FlagToken`]), how
//! flags accumulate before validation ([`FlagMap`]), and how a command
//! declares its positional arguments ([`ArgsSpec`]).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::FieldSchema;

/// Raw value carried by a flag before any field schema has seen it.
///
/// A bare flag (`--watch`) carries `Bool(true)`, a negated flag
/// (`--no-watch`) carries `Bool(false)`, and `--out=dist` carries
/// `Text("dist")`. Positional tokens are always handed to field schemas
/// as `Text`.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::FlagValue;
///
/// assert_eq!(FlagValue::from(true), FlagValue::Bool(true));
/// assert_eq!(FlagValue::from("dist").as_text(), Some("dist"));
/// assert_eq!(FlagValue::Bool(false).as_text(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Bare or negated flag.
    Bool(bool),
    /// Value given after `=`, or a positional token.
    Text(String),
}

impl FlagValue {
    /// Returns the string payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bool(_) => None,
        }
    }

    /// Converts the raw value to JSON without interpretation.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Text(text) => Value::String(text.clone()),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

/// One atomic flag produced by tokenizing an argv token.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{FlagToken, FlagValue};
///
/// let token = FlagToken::new("port", "8080");
/// assert_eq!(token.key, "port");
/// assert_eq!(token.value, FlagValue::Text("8080".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagToken {
    /// Flag key as written, without leading dashes.
    pub key: String,
    /// Raw value.
    pub value: FlagValue,
}

impl FlagToken {
    /// Creates a token from a key and anything convertible to a [`FlagValue`].
    pub fn new(key: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Insertion-ordered flag accumulator with last-write-wins semantics.
///
/// Re-inserting a key overwrites the earlier value in place; no history is
/// kept. Keys are reported in order of first appearance, which keeps
/// diagnostics stable.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{FlagMap, FlagValue};
///
/// let mut flags = FlagMap::new();
/// flags.insert("port", "3000".into());
/// flags.insert("verbose", true.into());
/// flags.insert("port", "4000".into());
///
/// assert_eq!(flags.len(), 2);
/// assert_eq!(flags.get("port"), Some(&FlagValue::Text("4000".into())));
/// assert_eq!(flags.keys().collect::<Vec<_>>(), vec!["port", "verbose"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagMap {
    entries: Vec<(String, FlagValue)>,
}

impl FlagMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: FlagValue) -> Option<FlagValue> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Looks up a value by key.
    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` when the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates keys in first-appearance order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates entries in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no flag was accumulated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FlagValue)> for FlagMap {
    fn from_iter<I: IntoIterator<Item = (K, FlagValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Positional-argument shape of a command.
///
/// The dispatcher's argument validation is the single place arity is
/// handled; see the variant docs for how surplus or missing tokens behave.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{ArgsSpec, Field};
///
/// let files = ArgsSpec::array(Field::string());
/// assert!(matches!(files, ArgsSpec::Array(_)));
///
/// let pair = ArgsSpec::tuple([Field::string(), Field::number().optional()]);
/// assert!(matches!(pair, ArgsSpec::Tuple(ref schemas) if schemas.len() == 2));
/// assert!(matches!(ArgsSpec::default(), ArgsSpec::None));
/// ```
#[derive(Debug, Clone, Default)]
pub enum ArgsSpec {
    /// No positional arguments; any passed tokens are ignored.
    #[default]
    None,
    /// Exactly one schema applied to the first token; extra tokens are discarded.
    Single(Arc<dyn FieldSchema>),
    /// One schema per position; positions past the tuple are ignored and
    /// missing positions are passed to their schema as missing.
    Tuple(Vec<Arc<dyn FieldSchema>>),
    /// One schema applied to every token.
    Array(Arc<dyn FieldSchema>),
}

impl ArgsSpec {
    /// Creates a [`Single`](ArgsSpec::Single) spec.
    pub fn single(schema: impl FieldSchema + 'static) -> Self {
        Self::Single(Arc::new(schema))
    }

    /// Creates a [`Tuple`](ArgsSpec::Tuple) spec.
    pub fn tuple<F, I>(schemas: I) -> Self
    where
        F: FieldSchema + 'static,
        I: IntoIterator<Item = F>,
    {
        Self::Tuple(
            schemas
                .into_iter()
                .map(|schema| Arc::new(schema) as Arc<dyn FieldSchema>)
                .collect(),
        )
    }

    /// Creates an [`Array`](ArgsSpec::Array) spec.
    pub fn array(schema: impl FieldSchema + 'static) -> Self {
        Self::Array(Arc::new(schema))
    }
}

/// Region of argv a flag was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagContext {
    /// Flags before the command path.
    Global,
    /// Flags after the command path.
    Command,
}

impl fmt::Display for FlagContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Command => f.write_str("command"),
        }
    }
}

/// Diagnostic description of a declared command.
///
/// Collected for every command when resolution fails so callers can list
/// what was available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSummary {
    /// Canonical command name.
    pub name: String,
    /// Alternative names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl fmt::Display for CommandSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.aliases.is_empty() {
            write!(f, " ({})", self.aliases.join(", "))?;
        }
        if let Some(description) = &self.description {
            write!(f, " - {description}")?;
        }
        Ok(())
    }
}
