//! Progressive command-path resolution.
//!
//! The whole path is tried first, then shorter prefixes, so `user add bob`
//! finds a command named `user add` before one named `user`, and the
//! unmatched tail becomes positional arguments.

use command_dispatch_core::{CommandDefinition, CommandTable, DispatchError, Result};
use tracing::debug;

use crate::alias::camel_case;

/// A command picked from the table.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedCommand<'t> {
    /// Declaration key of the command.
    pub key: &'t str,
    /// The command itself.
    pub command: &'t CommandDefinition,
    /// Words in the matched candidate (0 when the default command was used).
    ///
    /// This counts space-separated words, not argv tokens: a single token
    /// containing a space, such as `"user add"`, counts as two.
    pub path_length: usize,
}

/// Returns `true` when `candidate` names `command`.
///
/// Matches the canonical name as written or camelCased, or an alias
/// verbatim (aliases are not normalized).
///
/// # Examples
///
/// ```
/// use command_dispatch::matches_command;
/// use command_dispatch_core::CommandDefinition;
///
/// let command = CommandDefinition::new().with_name("userAdd").with_alias("ua");
/// assert!(matches_command("userAdd", &command));
/// assert!(matches_command("user add", &command));
/// assert!(matches_command("user-add", &command));
/// assert!(matches_command("ua", &command));
/// assert!(!matches_command("user", &command));
/// ```
pub fn matches_command(candidate: &str, command: &CommandDefinition) -> bool {
    let name = command.canonical_name();
    candidate == name
        || camel_case(candidate) == name
        || command.aliases.iter().any(|alias| alias == candidate)
}

/// Resolves the command path against the table.
///
/// Each shortening of `path` is space-joined and compared against commands
/// in declaration order; the first hit wins. With no hit, the command under
/// `default_command` is returned with a path length of 0.
///
/// # Errors
///
/// Returns [`DispatchError::UnknownCommand`] listing every declared command
/// when nothing matches and no (declared) default command exists.
///
/// # Examples
///
/// ```
/// use command_dispatch::resolve_command;
/// use command_dispatch_core::{CommandDefinition, CommandTable};
///
/// let table = CommandTable::new()
///     .with_command("user", CommandDefinition::new())
///     .with_command("userAdd", CommandDefinition::new().with_name("user add"));
///
/// let resolved = resolve_command(&["user", "add", "bob"], &table, None).unwrap();
/// assert_eq!(resolved.key, "userAdd");
/// assert_eq!(resolved.path_length, 2);
///
/// let resolved = resolve_command(&["user", "bob"], &table, None).unwrap();
/// assert_eq!(resolved.key, "user");
/// assert_eq!(resolved.path_length, 1);
/// ```
pub fn resolve_command<'t>(
    path: &[&str],
    table: &'t CommandTable,
    default_command: Option<&str>,
) -> Result<ResolvedCommand<'t>> {
    for len in (1..=path.len()).rev() {
        let candidate = path[..len].join(" ");
        let found = table
            .iter()
            .find(|(_, command)| matches_command(&candidate, command));

        if let Some((key, command)) = found {
            let path_length = candidate.split(' ').count();
            debug!(command = %command.canonical_name(), path_length, "Resolved command");
            return Ok(ResolvedCommand {
                key,
                command,
                path_length,
            });
        }
    }

    if let Some(default) = default_command {
        if let Some((key, command)) = table.get_key_value(default) {
            debug!(command = %command.canonical_name(), "Falling back to default command");
            return Ok(ResolvedCommand {
                key,
                command,
                path_length: 0,
            });
        }
        debug!(default = %default, "Default command is not declared");
    }

    Err(DispatchError::UnknownCommand {
        path: path.join(" "),
        available: table.summaries(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CommandTable {
        CommandTable::new()
            .with_command("serve", CommandDefinition::new().with_alias("s"))
            .with_command("build", CommandDefinition::new().with_description("Build it"))
            .with_command("remoteAdd", CommandDefinition::new())
    }

    #[test]
    fn test_resolves_by_alias() {
        let table = table();
        let resolved = resolve_command(&["s", "src"], &table, None).unwrap();
        assert_eq!(resolved.key, "serve");
        assert_eq!(resolved.path_length, 1);
    }

    #[test]
    fn test_resolves_multi_word_by_normalized_name() {
        let table = table();
        let resolved = resolve_command(&["remote", "add", "origin"], &table, None).unwrap();
        assert_eq!(resolved.key, "remoteAdd");
        assert_eq!(resolved.path_length, 2);
    }

    #[test]
    fn test_aliases_are_not_normalized() {
        let table =
            CommandTable::new().with_command("x", CommandDefinition::new().with_alias("dry-run"));
        assert!(resolve_command(&["dryRun"], &table, None).is_err());
        assert!(resolve_command(&["dry-run"], &table, None).is_ok());
    }

    #[test]
    fn test_path_length_counts_words_not_tokens() {
        let table = CommandTable::new()
            .with_command("userAdd", CommandDefinition::new().with_name("user add"));

        let resolved = resolve_command(&["user add", "bob"], &table, None).unwrap();
        assert_eq!(resolved.key, "userAdd");
        assert_eq!(resolved.path_length, 2);

        let resolved = resolve_command(&["user", "add", "bob"], &table, None).unwrap();
        assert_eq!(resolved.path_length, 2);
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        let table = CommandTable::new()
            .with_command("first", CommandDefinition::new().with_name("go"))
            .with_command("second", CommandDefinition::new().with_alias("go"));

        let resolved = resolve_command(&["go"], &table, None).unwrap();
        assert_eq!(resolved.key, "first");
    }

    #[test]
    fn test_default_command_with_empty_path() {
        let table = table();
        let resolved = resolve_command(&[], &table, Some("build")).unwrap();
        assert_eq!(resolved.key, "build");
        assert_eq!(resolved.path_length, 0);
    }

    #[test]
    fn test_default_command_when_nothing_matches() {
        let table = table();
        let resolved = resolve_command(&["src", "lib"], &table, Some("build")).unwrap();
        assert_eq!(resolved.key, "build");
        assert_eq!(resolved.path_length, 0);
    }

    #[test]
    fn test_unknown_command_lists_everything() {
        match resolve_command(&["nope", "x"], &table(), None) {
            Err(DispatchError::UnknownCommand { path, available }) => {
                assert_eq!(path, "nope x");
                let names: Vec<&str> = available.iter().map(|s| s.name.as_str()).collect();
                assert_eq!(names, vec!["serve", "build", "remoteAdd"]);
                assert_eq!(available[0].aliases, vec!["s".to_string()]);
                assert_eq!(available[1].description.as_deref(), Some("Build it"));
            }
            other => panic!("expected UnknownCommand, got {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_default_command_is_unknown() {
        assert!(matches!(
            resolve_command(&[], &table(), Some("missing")),
            Err(DispatchError::UnknownCommand { .. })
        ));
    }
}
