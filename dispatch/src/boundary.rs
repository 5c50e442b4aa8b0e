//! Splits argv into global flags, command path, and command flags.

use command_dispatch_core::{AliasMap, OptionsSchema, Result};

use crate::alias::resolve_key;
use crate::tokenize::{is_flag, tokenize};

/// The three regions of an argv.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgvRegions<'a> {
    /// Leading flags that all belong to the global schema.
    pub global_flags: &'a [&'a str],
    /// Non-flag tokens naming the command, followed by its positional args.
    pub command_path: &'a [&'a str],
    /// Everything from the first flag after the path onward.
    pub command_flags: &'a [&'a str],
}

/// Index of the first token that is not part of the global-flag prefix.
///
/// A flag token is global only when every flag it expands to resolves to a
/// field of `schema` or to an alias key of `aliases`. The scan stops at the
/// first non-global flag or the first positional token; a global flag seen
/// after that point is left to the command.
///
/// # Errors
///
/// Propagates [`MalformedFlag`](command_dispatch_core::DispatchError::MalformedFlag)
/// from the tokenizer.
///
/// # Examples
///
/// ```
/// use command_dispatch::find_global_options_end;
/// use command_dispatch_core::{AliasMap, Field, OptionsSchema};
///
/// let schema = OptionsSchema::new().with_field("verbose", Field::boolean());
/// let aliases = AliasMap::new().with_alias("v", "verbose");
///
/// assert_eq!(find_global_options_end(&["-v", "serve", "--verbose"], Some(&schema), &aliases).unwrap(), 1);
/// assert_eq!(find_global_options_end(&["--port=1", "--verbose"], Some(&schema), &aliases).unwrap(), 0);
/// assert_eq!(find_global_options_end(&["--verbose"], Some(&schema), &aliases).unwrap(), 1);
/// ```
pub fn find_global_options_end(
    argv: &[&str],
    schema: Option<&OptionsSchema>,
    aliases: &AliasMap,
) -> Result<usize> {
    for (index, token) in argv.iter().enumerate() {
        if !is_flag(token) {
            return Ok(index);
        }

        let all_global = tokenize(token)?.iter().all(|flag| {
            let key = resolve_key(&flag.key, aliases);
            schema.is_some_and(|schema| schema.contains(&key)) || aliases.contains_alias(&key)
        });
        if !all_global {
            return Ok(index);
        }
    }

    Ok(argv.len())
}

/// Partitions argv into its three regions.
///
/// # Examples
///
/// ```
/// use command_dispatch::split_argv;
/// use command_dispatch_core::{AliasMap, Field, OptionsSchema};
///
/// let schema = OptionsSchema::new().with_field("verbose", Field::boolean());
/// let argv = ["--verbose", "serve", "src", "--port=8080", "extra"];
/// let regions = split_argv(&argv, Some(&schema), &AliasMap::new()).unwrap();
///
/// assert_eq!(regions.global_flags, &["--verbose"]);
/// assert_eq!(regions.command_path, &["serve", "src"]);
/// assert_eq!(regions.command_flags, &["--port=8080", "extra"]);
/// ```
pub fn split_argv<'a>(
    argv: &'a [&'a str],
    schema: Option<&OptionsSchema>,
    aliases: &AliasMap,
) -> Result<ArgvRegions<'a>> {
    let end = find_global_options_end(argv, schema, aliases)?;
    let (global_flags, rest) = argv.split_at(end);
    let path_len = rest
        .iter()
        .position(|token| is_flag(token))
        .unwrap_or(rest.len());
    let (command_path, command_flags) = rest.split_at(path_len);

    Ok(ArgvRegions {
        global_flags,
        command_path,
        command_flags,
    })
}
