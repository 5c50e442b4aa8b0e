//! Flag tokenizer.
//!
//! Grammar, per argv token:
//!
//! - `--key`, `--key=value`, `--no-key` (negation, any `=value` ignored)
//! - `-x`, `-xy` (cluster), `-xy=value` (every flag in the cluster shares
//!   the value)
//! - anything not starting with `-` is positional and yields no flags

use command_dispatch_core::{AliasMap, DispatchError, FlagMap, FlagToken, FlagValue, Result};
use tracing::debug;

use crate::alias::resolve_key;

/// Returns `true` when the token is flag-like.
pub fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

/// Splits one argv token into atomic flags.
///
/// # Errors
///
/// Returns [`DispatchError::MalformedFlag`] for a long flag with an empty
/// key, such as `--=value` or `--no-`.
///
/// # Examples
///
/// ```
/// use command_dispatch::tokenize;
/// use command_dispatch_core::FlagToken;
///
/// assert_eq!(tokenize("--port=8080").unwrap(), vec![FlagToken::new("port", "8080")]);
/// assert_eq!(tokenize("--no-color").unwrap(), vec![FlagToken::new("color", false)]);
/// assert_eq!(
///     tokenize("-ab").unwrap(),
///     vec![FlagToken::new("a", true), FlagToken::new("b", true)]
/// );
/// assert!(tokenize("src").unwrap().is_empty());
/// assert!(tokenize("--=x").is_err());
/// ```
pub fn tokenize(token: &str) -> Result<Vec<FlagToken>> {
    if let Some(long) = token.strip_prefix("--") {
        return tokenize_long(token, long).map(|flag| vec![flag]);
    }

    let Some(cluster) = token.strip_prefix('-') else {
        return Ok(Vec::new());
    };

    let (keys, value) = match cluster.split_once('=') {
        Some((keys, value)) => (keys, FlagValue::from(value)),
        None => (cluster, FlagValue::Bool(true)),
    };

    Ok(keys
        .chars()
        .map(|key| FlagToken::new(key.to_string(), value.clone()))
        .collect())
}

fn tokenize_long(token: &str, long: &str) -> Result<FlagToken> {
    let malformed = || DispatchError::MalformedFlag(token.to_string());

    if let Some(negated) = long.strip_prefix("no-") {
        let key = negated.split_once('=').map_or(negated, |(key, _)| key);
        if key.is_empty() {
            return Err(malformed());
        }
        return Ok(FlagToken::new(key, false));
    }

    let (key, value) = match long.split_once('=') {
        Some((key, value)) => (key, FlagValue::from(value)),
        None => (long, FlagValue::Bool(true)),
    };
    if key.is_empty() {
        return Err(malformed());
    }
    Ok(FlagToken::new(key, value))
}

/// Tokenizes a run of argv tokens into a flag map.
///
/// Keys are resolved through `aliases` (then camelCased) and later values
/// overwrite earlier ones. Positional tokens inside the run are skipped.
///
/// # Examples
///
/// ```
/// use command_dispatch::collect_flags;
/// use command_dispatch_core::{AliasMap, FlagValue};
///
/// let aliases = AliasMap::new().with_alias("p", "port");
/// let flags = collect_flags(&["--port=3000", "-p=4000", "--dry-run"], &aliases).unwrap();
///
/// assert_eq!(flags.get("port"), Some(&FlagValue::from("4000")));
/// assert_eq!(flags.get("dryRun"), Some(&FlagValue::Bool(true)));
/// ```
pub fn collect_flags(tokens: &[&str], aliases: &AliasMap) -> Result<FlagMap> {
    let mut flags = FlagMap::new();

    for token in tokens {
        if !is_flag(token) {
            debug!(token = %token, "Ignoring positional token among flags");
            continue;
        }
        for flag in tokenize(token)? {
            flags.insert(resolve_key(&flag.key, aliases), flag.value);
        }
    }

    Ok(flags)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_long_flag_without_value_is_true() {
        assert_eq!(tokenize("--watch").unwrap(), vec![FlagToken::new("watch", true)]);
    }

    #[test]
    fn test_long_flag_splits_on_first_equals() {
        assert_eq!(
            tokenize("--define=a=b").unwrap(),
            vec![FlagToken::new("define", "a=b")]
        );
        assert_eq!(tokenize("--out=").unwrap(), vec![FlagToken::new("out", "")]);
    }

    #[test]
    fn test_negated_flag_ignores_value() {
        assert_eq!(
            tokenize("--no-cache=yes").unwrap(),
            vec![FlagToken::new("cache", false)]
        );
    }

    #[test]
    fn test_empty_long_keys_are_malformed() {
        for token in ["--", "--=x", "--no-", "--no-=x"] {
            match tokenize(token) {
                Err(DispatchError::MalformedFlag(t)) => assert_eq!(t, token),
                other => panic!("expected MalformedFlag for {token}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_short_cluster_shares_value() {
        assert_eq!(
            tokenize("-abc=v").unwrap(),
            vec![
                FlagToken::new("a", "v"),
                FlagToken::new("b", "v"),
                FlagToken::new("c", "v"),
            ]
        );
    }

    #[test]
    fn test_lone_dash_yields_nothing() {
        assert!(tokenize("-").unwrap().is_empty());
        assert!(tokenize("-=v").unwrap().is_empty());
    }

    #[test]
    fn test_collect_flags_last_write_wins() {
        let flags =
            collect_flags(&["--port=3000", "--port=4000"], &AliasMap::new()).unwrap();
        assert_eq!(flags.get("port"), Some(&FlagValue::from("4000")));
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn test_collect_flags_skips_positional_tokens() {
        let flags = collect_flags(&["--a", "loose", "-b"], &AliasMap::new()).unwrap();
        assert_eq!(flags.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    proptest! {
        #[test]
        fn property_long_flag_with_value_yields_one_token(
            key in "[a-z][a-z0-9]{0,12}",
            value in "[^\\s]{0,16}",
        ) {
            let tokens = tokenize(&format!("--{key}={value}")).unwrap();
            prop_assert_eq!(tokens, vec![FlagToken::new(key, value)]);
        }

        #[test]
        fn property_negated_flag_is_false(key in "[a-z][a-z0-9-]{0,12}", tail in "(=[a-z0-9]*)?") {
            let tokens = tokenize(&format!("--no-{key}{tail}")).unwrap();
            prop_assert_eq!(tokens, vec![FlagToken::new(key, false)]);
        }

        #[test]
        fn property_short_cluster_yields_one_token_per_char(
            cluster in "[a-zA-Z]{1,8}",
            value in "[a-z0-9]{1,8}",
        ) {
            let tokens = tokenize(&format!("-{cluster}={value}")).unwrap();
            prop_assert_eq!(tokens.len(), cluster.chars().count());
            for (token, key) in tokens.iter().zip(cluster.chars()) {
                prop_assert_eq!(&token.key, &key.to_string());
                prop_assert_eq!(&token.value, &FlagValue::from(value.as_str()));
            }
        }

        #[test]
        fn property_positional_tokens_yield_nothing(token in "[^-].{0,16}") {
            prop_assert!(tokenize(&token).unwrap().is_empty());
        }
    }
}
