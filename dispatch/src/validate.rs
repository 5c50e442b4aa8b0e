//! Flag and positional-argument validation.
//!
//! Flag problems within one region are collected and reported together;
//! positional arguments stop at the first failure.

use command_dispatch_core::{
    ArgsSpec, DispatchError, FieldFailure, FieldSchema, FlagContext, FlagMap, FlagValue, Issue,
    OptionsSchema, Result, ValidationErrors,
};
use serde_json::{Map, Value};

use crate::alias::camel_case;

/// Reports keys that `schema` does not declare.
///
/// A key is known when it is a field name as-is or after camelCase
/// normalization. All unknown keys end up in one
/// [`Issue::UnrecognizedFlags`] tagged with `context`. Nothing is reported
/// when `allow_unknown` is set.
///
/// # Examples
///
/// ```
/// use command_dispatch::validate_flags;
/// use command_dispatch_core::{Field, FlagContext, FlagMap, Issue, OptionsSchema};
///
/// let schema = OptionsSchema::new().with_field("port", Field::number());
/// let mut flags = FlagMap::new();
/// flags.insert("foo", true.into());
/// flags.insert("port", "1".into());
/// flags.insert("bar", true.into());
///
/// let issues = validate_flags(&flags, Some(&schema), FlagContext::Command, false);
/// assert_eq!(
///     issues,
///     vec![Issue::UnrecognizedFlags {
///         context: FlagContext::Command,
///         keys: vec!["foo".into(), "bar".into()],
///     }]
/// );
/// assert!(validate_flags(&flags, Some(&schema), FlagContext::Command, true).is_empty());
/// ```
pub fn validate_flags(
    flags: &FlagMap,
    schema: Option<&OptionsSchema>,
    context: FlagContext,
    allow_unknown: bool,
) -> Vec<Issue> {
    if allow_unknown {
        return Vec::new();
    }

    let keys: Vec<String> = flags
        .keys()
        .filter(|key| !is_known(key, schema))
        .map(String::from)
        .collect();

    if keys.is_empty() {
        Vec::new()
    } else {
        vec![Issue::UnrecognizedFlags { context, keys }]
    }
}

fn is_known(key: &str, schema: Option<&OptionsSchema>) -> bool {
    schema.is_some_and(|schema| schema.contains(key) || schema.contains(&camel_case(key)))
}

/// Parses accumulated flags into a typed options object.
///
/// `issues` holds whatever [`validate_flags`] already found for the same
/// region; field failures are appended to it so a single error carries
/// everything wrong with the region. Without a schema the result is an
/// empty object.
///
/// # Errors
///
/// Returns [`DispatchError::Validation`] when `issues` is non-empty or any
/// field fails.
pub fn parse_options(
    flags: &FlagMap,
    schema: Option<&OptionsSchema>,
    context: FlagContext,
    mut issues: Vec<Issue>,
) -> Result<Value> {
    let parsed = match schema {
        Some(schema) => schema.parse(flags),
        None => Ok(Map::new()),
    };

    match parsed {
        Ok(options) if issues.is_empty() => return Ok(Value::Object(options)),
        Ok(_) => {}
        Err(failures) => issues.extend(failures.into_iter().map(Issue::Field)),
    }

    Err(DispatchError::Validation {
        context,
        errors: ValidationErrors::new(issues),
    })
}

/// Validates positional tokens against an [`ArgsSpec`].
///
/// Failures carry the token index as their first path segment. The first
/// failure stops validation.
///
/// # Examples
///
/// ```
/// use command_dispatch::validate_args;
/// use command_dispatch_core::{ArgsSpec, Field};
/// use serde_json::json;
///
/// let spec = ArgsSpec::tuple([Field::string(), Field::number().with_default(json!(1))]);
/// assert_eq!(validate_args(&spec, &["a"]).unwrap(), json!(["a", 1]));
/// assert_eq!(validate_args(&spec, &["a", "2", "ignored"]).unwrap(), json!(["a", 2]));
///
/// let err = validate_args(&ArgsSpec::array(Field::number()), &["1", "x"]).unwrap_err();
/// assert_eq!(err.path, vec!["1".to_string()]);
/// ```
pub fn validate_args(spec: &ArgsSpec, tokens: &[&str]) -> std::result::Result<Value, FieldFailure> {
    match spec {
        ArgsSpec::None => Ok(Value::Array(Vec::new())),
        ArgsSpec::Single(schema) => parse_position(schema.as_ref(), 0, tokens.first().copied()),
        ArgsSpec::Tuple(schemas) => schemas
            .iter()
            .enumerate()
            .map(|(index, schema)| parse_position(schema.as_ref(), index, tokens.get(index).copied()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::Array),
        ArgsSpec::Array(schema) => tokens
            .iter()
            .enumerate()
            .map(|(index, token)| parse_position(schema.as_ref(), index, Some(*token)))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::Array),
    }
}

fn parse_position(
    schema: &dyn FieldSchema,
    index: usize,
    token: Option<&str>,
) -> std::result::Result<Value, FieldFailure> {
    let raw = token.map(FlagValue::from);
    schema
        .parse(raw.as_ref())
        .map_err(|failure| failure.at(index.to_string()))
}

#[cfg(test)]
mod tests {
    use command_dispatch_core::Field;
    use serde_json::json;

    use super::*;

    fn flags(entries: &[(&str, FlagValue)]) -> FlagMap {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_hyphenated_key_matches_after_normalization() {
        let schema = OptionsSchema::new().with_field("dryRun", Field::boolean());
        let flags = flags(&[("dry-run", FlagValue::Bool(true))]);
        assert!(validate_flags(&flags, Some(&schema), FlagContext::Command, false).is_empty());
    }

    #[test]
    fn test_no_schema_rejects_every_key() {
        let flags = flags(&[("a", FlagValue::Bool(true)), ("b", FlagValue::Bool(true))]);
        let issues = validate_flags(&flags, None, FlagContext::Global, false);
        assert_eq!(
            issues,
            vec![Issue::UnrecognizedFlags {
                context: FlagContext::Global,
                keys: vec!["a".into(), "b".into()]
            }]
        );
    }

    #[test]
    fn test_parse_options_merges_unknown_and_field_issues() {
        let schema = OptionsSchema::new().with_field("port", Field::number());
        let flags = flags(&[("port", "abc".into()), ("foo", FlagValue::Bool(true))]);
        let issues = validate_flags(&flags, Some(&schema), FlagContext::Command, false);

        let err = parse_options(&flags, Some(&schema), FlagContext::Command, issues).unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.issues.len(), 2);
        assert!(matches!(errors.issues[0], Issue::UnrecognizedFlags { .. }));
        match &errors.issues[1] {
            Issue::Field(failure) => {
                assert_eq!(failure.path, vec!["port".to_string()]);
                assert_eq!(failure.message, "expected number, received \"abc\"");
            }
            other => panic!("expected field issue, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_options_without_schema_is_empty_object() {
        let value = parse_options(&FlagMap::new(), None, FlagContext::Global, Vec::new()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_parse_options_ignores_undeclared_keys() {
        let schema = OptionsSchema::new().with_field("port", Field::number().optional());
        let flags = flags(&[("extra", FlagValue::Bool(true))]);
        let value = parse_options(&flags, Some(&schema), FlagContext::Command, Vec::new()).unwrap();
        assert_eq!(value, json!({"port": null}));
    }

    #[test]
    fn test_none_spec_ignores_tokens() {
        assert_eq!(validate_args(&ArgsSpec::None, &["a", "b"]).unwrap(), json!([]));
    }

    #[test]
    fn test_single_spec_uses_first_token_only() {
        let spec = ArgsSpec::single(Field::string());
        assert_eq!(validate_args(&spec, &["a", "b"]).unwrap(), json!("a"));
        assert_eq!(validate_args(&spec, &[]).unwrap_err().to_string(), "0: required");
    }

    #[test]
    fn test_tuple_missing_positions_go_to_schema() {
        let spec = ArgsSpec::tuple([Field::string(), Field::string().optional()]);
        assert_eq!(validate_args(&spec, &["a"]).unwrap(), json!(["a", null]));

        let strict = ArgsSpec::tuple([Field::string(), Field::string()]);
        let err = validate_args(&strict, &["a"]).unwrap_err();
        assert_eq!(err.path, vec!["1".to_string()]);
    }

    #[test]
    fn test_array_accepts_zero_tokens() {
        let spec = ArgsSpec::array(Field::number());
        assert_eq!(validate_args(&spec, &[]).unwrap(), json!([]));
        assert_eq!(validate_args(&spec, &["1", "2.5"]).unwrap(), json!([1, 2.5]));
    }
}
