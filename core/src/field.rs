//! Field schemas: the capability that turns one raw value into a typed value.
//!
//! Dispatch never interprets values itself. It hands each raw flag value or
//! positional token to a [`FieldSchema`] and collects whatever
//! [`FieldFailure`] comes back. [`Field`] is the built-in implementation;
//! callers with their own validation engine implement the trait instead.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::types::{FlagMap, FlagValue};

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Validates one raw value into a typed JSON value.
///
/// `raw` is `None` when the flag or positional token was not given; the
/// schema decides whether that means a default, `null`, or a failure.
pub trait FieldSchema: fmt::Debug + Send + Sync {
    /// Parses a raw value.
    fn parse(&self, raw: Option<&FlagValue>) -> Result<Value, FieldFailure>;

    /// Human-readable description, if the schema carries one.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// Structured failure reported by a [`FieldSchema`].
///
/// # Examples
///
/// ```
/// use command_dispatch_core::FieldFailure;
///
/// let failure = FieldFailure::new("expected number").at("port");
/// assert_eq!(failure.path, vec!["port".to_string()]);
/// assert_eq!(failure.to_string(), "port: expected number");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}{message}", render_path(.path))]
pub struct FieldFailure {
    /// Location of the failing value, outermost segment first.
    pub path: Vec<String>,
    /// What went wrong.
    pub message: String,
}

impl FieldFailure {
    /// Creates a failure with an empty path.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Prefixes the path with `segment`.
    pub fn at(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }
}

fn render_path(path: &[String]) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{}: ", path.join("."))
    }
}

/// Kind of value a built-in [`Field`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// `true`/`false`, or a bare/negated flag.
    Boolean,
    /// Any string.
    String,
    /// A decimal number, optionally bounded.
    Number,
    /// One of a fixed set of strings.
    Choice,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Number => "number",
            Self::Choice => "choice",
        })
    }
}

/// Built-in field schema.
///
/// Construct with [`boolean`](Field::boolean), [`string`](Field::string),
/// [`number`](Field::number) or [`choice`](Field::choice), then chain
/// modifiers. Serializes with a `type` tag so command tables can declare
/// fields in YAML or JSON.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{Field, FieldSchema, FlagValue};
/// use serde_json::json;
///
/// let port = Field::number().with_min(1024.0).with_default(json!(3000));
/// assert_eq!(port.parse(None).unwrap(), json!(3000));
/// assert_eq!(port.parse(Some(&FlagValue::from("8080"))).unwrap(), json!(8080));
/// assert!(port.parse(Some(&FlagValue::from("80"))).is_err());
///
/// let verbose = Field::boolean().with_default(json!(false));
/// assert_eq!(verbose.parse(Some(&FlagValue::Bool(true))).unwrap(), json!(true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Accepted value kind.
    #[serde(rename = "type")]
    pub kind: ValueKind,
    /// Inclusive lower bound for numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound for numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Reject numbers with a fractional part.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub integer: bool,
    /// Allowed values for choices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Value used when the field is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Missing yields `null` instead of a failure.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    /// Description shown in diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    fn of_kind(kind: ValueKind) -> Self {
        Self {
            kind,
            min: None,
            max: None,
            integer: false,
            choices: Vec::new(),
            default: None,
            optional: false,
            description: None,
        }
    }

    /// Boolean field.
    pub fn boolean() -> Self {
        Self::of_kind(ValueKind::Boolean)
    }

    /// String field.
    pub fn string() -> Self {
        Self::of_kind(ValueKind::String)
    }

    /// Number field.
    pub fn number() -> Self {
        Self::of_kind(ValueKind::Number)
    }

    /// Choice field over the given values.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_dispatch_core::{Field, FieldSchema, FlagValue};
    ///
    /// let format = Field::choice(["json", "yaml"]);
    /// assert!(format.parse(Some(&FlagValue::from("yaml"))).is_ok());
    /// let err = format.parse(Some(&FlagValue::from("xml"))).unwrap_err();
    /// assert_eq!(err.message, "expected one of: json, yaml, received \"xml\"");
    /// ```
    pub fn choice<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::of_kind(ValueKind::Choice);
        field.choices = choices.into_iter().map(Into::into).collect();
        field
    }

    /// Sets the default used when the value is missing.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Makes a missing value parse to `null`.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets an inclusive lower bound.
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets an inclusive upper bound.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Rejects fractional numbers.
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    fn expect_text<'a>(&self, raw: &'a FlagValue) -> Result<&'a str, FieldFailure> {
        raw.as_text().ok_or_else(|| {
            FieldFailure::new(format!("expected {}, received boolean", self.kind))
        })
    }

    fn parse_boolean(&self, raw: &FlagValue) -> Result<Value, FieldFailure> {
        match raw {
            FlagValue::Bool(b) => Ok(Value::Bool(*b)),
            FlagValue::Text(text) => match text.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                other => Err(FieldFailure::new(format!(
                    "expected boolean, received {other:?}"
                ))),
            },
        }
    }

    fn parse_number(&self, raw: &FlagValue) -> Result<Value, FieldFailure> {
        let text = self.expect_text(raw)?;
        let number: f64 = text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| FieldFailure::new(format!("expected number, received {text:?}")))?;

        if self.integer && number.fract() != 0.0 {
            return Err(FieldFailure::new(format!(
                "expected integer, received {text:?}"
            )));
        }
        if let Some(min) = self.min {
            if number < min {
                return Err(FieldFailure::new(format!(
                    "must be greater than or equal to {min}"
                )));
            }
        }
        if let Some(max) = self.max {
            if number > max {
                return Err(FieldFailure::new(format!(
                    "must be less than or equal to {max}"
                )));
            }
        }

        Ok(number_value(number))
    }

    fn parse_choice(&self, raw: &FlagValue) -> Result<Value, FieldFailure> {
        let text = self.expect_text(raw)?;
        if self.choices.iter().any(|choice| choice == text) {
            Ok(Value::String(text.to_string()))
        } else {
            Err(FieldFailure::new(format!(
                "expected one of: {}, received {text:?}",
                self.choices.join(", ")
            )))
        }
    }
}

/// Whole numbers become JSON integers so `8080` round-trips as `8080`.
fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        Value::from(number as i64)
    } else {
        Number::from_f64(number).map_or(Value::Null, Value::Number)
    }
}

impl FieldSchema for Field {
    fn parse(&self, raw: Option<&FlagValue>) -> Result<Value, FieldFailure> {
        let Some(raw) = raw else {
            if let Some(default) = &self.default {
                return Ok(default.clone());
            }
            if self.optional {
                return Ok(Value::Null);
            }
            return Err(FieldFailure::new("required"));
        };

        match self.kind {
            ValueKind::Boolean => self.parse_boolean(raw),
            ValueKind::String => self
                .expect_text(raw)
                .map(|text| Value::String(text.to_string())),
            ValueKind::Number => self.parse_number(raw),
            ValueKind::Choice => self.parse_choice(raw),
        }
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Ordered mapping of field names to schemas.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{Field, FlagMap, OptionsSchema};
/// use serde_json::json;
///
/// let schema = OptionsSchema::new()
///     .with_field("port", Field::number().with_default(json!(3000)))
///     .with_field("host", Field::string().optional());
///
/// let mut flags = FlagMap::new();
/// flags.insert("port", "8080".into());
///
/// let parsed = schema.parse(&flags).unwrap();
/// assert_eq!(serde_json::Value::Object(parsed), json!({"port": 8080, "host": null}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionsSchema {
    fields: Vec<(String, Arc<dyn FieldSchema>)>,
}

impl OptionsSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field.
    pub fn with_field(self, name: impl Into<String>, schema: impl FieldSchema + 'static) -> Self {
        self.with_shared_field(name, Arc::new(schema))
    }

    /// Adds or replaces a field with an already shared schema.
    pub fn with_shared_field(
        mut self,
        name: impl Into<String>,
        schema: Arc<dyn FieldSchema>,
    ) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = schema,
            None => self.fields.push((name, schema)),
        }
        self
    }

    /// Returns `true` when `name` is a declared field.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Looks up a field schema.
    pub fn get(&self, name: &str) -> Option<&dyn FieldSchema> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, schema)| schema.as_ref())
    }

    /// Iterates field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses every declared field from `flags`.
    ///
    /// Undeclared keys are ignored. All fields are attempted; failures carry
    /// the field name as the first path segment.
    pub fn parse(&self, flags: &FlagMap) -> Result<Map<String, Value>, Vec<FieldFailure>> {
        let mut parsed = Map::new();
        let mut failures = Vec::new();

        for (name, schema) in &self.fields {
            match schema.parse(flags.get(name)) {
                Ok(value) => {
                    parsed.insert(name.clone(), value);
                }
                Err(failure) => failures.push(failure.at(name.clone())),
            }
        }

        if failures.is_empty() {
            Ok(parsed)
        } else {
            Err(failures)
        }
    }
}
