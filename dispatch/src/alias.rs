//! Flag-key and command-path normalization.

use command_dispatch_core::AliasMap;

/// Converts a space- or hyphen-separated string to camelCase.
///
/// Segments after the first get their first letter upper-cased; the rest
/// of each segment is left alone. Empty segments are dropped.
///
/// # Examples
///
/// ```
/// use command_dispatch::camel_case;
///
/// assert_eq!(camel_case("user-add"), "userAdd");
/// assert_eq!(camel_case("user add"), "userAdd");
/// assert_eq!(camel_case("dry-run-all"), "dryRunAll");
/// assert_eq!(camel_case("port"), "port");
/// ```
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let segments = input
        .split([' ', '-'])
        .filter(|segment| !segment.is_empty());

    for (index, segment) in segments.enumerate() {
        if index == 0 {
            out.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    out
}

/// Maps a raw flag key to its canonical field name.
///
/// Aliases are checked first; anything else is camelCased.
///
/// # Examples
///
/// ```
/// use command_dispatch::resolve_key;
/// use command_dispatch_core::AliasMap;
///
/// let aliases = AliasMap::new().with_alias("n", "dry-run");
/// assert_eq!(resolve_key("n", &aliases), "dry-run");
/// assert_eq!(resolve_key("dry-run", &aliases), "dryRun");
/// ```
pub fn resolve_key(raw: &str, aliases: &AliasMap) -> String {
    match aliases.get(raw) {
        Some(target) => target.to_string(),
        None => camel_case(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_skips_empty_segments() {
        assert_eq!(camel_case("a--b"), "aB");
        assert_eq!(camel_case("-x"), "x");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn test_camel_case_keeps_segment_tail() {
        assert_eq!(camel_case("get HTTP-url"), "getHTTPUrl");
        assert_eq!(camel_case("already camelCase"), "alreadyCamelCase");
    }

    #[test]
    fn test_alias_wins_over_normalization() {
        let aliases = AliasMap::new().with_alias("x", "y");
        assert_eq!(resolve_key("x", &aliases), "y");
        assert_eq!(resolve_key("x-ray", &aliases), "xRay");
    }

    #[test]
    fn test_alias_target_is_returned_verbatim() {
        let aliases = AliasMap::new().with_alias("o", "out-dir");
        assert_eq!(resolve_key("o", &aliases), "out-dir");
    }
}
