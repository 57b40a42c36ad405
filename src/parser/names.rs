/// Return the identifier without surrounding double quotes or backticks.
pub fn unquote_identifier(ident: &str) -> &str {
    ident
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| ident.strip_prefix('`').and_then(|s| s.strip_suffix('`')))
        .unwrap_or(ident)
}

/// Split a comma-separated list of snippet names, as typed on a command line.
///
/// Commas inside quoted identifiers do not split, each entry is trimmed and
/// unquoted, and empty entries are dropped.
///
/// Example: `a, "b"` -> `["a", "b"]`
pub fn split_identifier_list(raw: &str) -> Vec<String> {
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    let mut parts: Vec<&str> = Vec::new();

    for (idx, ch) in raw.char_indices() {
        match (ch, quote) {
            ('"' | '`', None) => quote = Some(ch),
            (c, Some(open)) if c == open => quote = None,
            (',', None) => {
                parts.push(&raw[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);

    parts
        .into_iter()
        .map(|part| unquote_identifier(part.trim()).to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Wrap an alias in the quote character selected for the target dialect.
pub fn quote_alias(name: &str, backtick: bool) -> String {
    if backtick {
        format!("`{name}`")
    } else {
        format!("\"{name}\"")
    }
}
