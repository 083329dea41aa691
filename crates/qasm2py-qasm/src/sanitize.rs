//! Lexical stripping of gate modifier prefixes.
//!
//! This is a lossy rewrite: `ctrl @ cx a, b;` becomes `cx a, b;`, dropping
//! the extra control. The loader only applies it after the primary parse of
//! an OpenQASM 3 program has failed.

use std::sync::OnceLock;

use regex::Regex;

/// One leading `<modifier> @` prefix.
fn modifier_prefix() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(
            r"^\s*(?:ctrl(?:\(\s*\d+\s*\))?|negctrl(?:\(\s*\d+\s*\))?|inv|pow\(\s*[-+]?\d+\s*\))\s*@\s*",
        )
        .expect("modifier pattern is a valid regex")
    })
}

/// Remove every chained gate modifier prefix from each line of `source`.
///
/// Blank lines, `//` comment lines and lines without an `@` are kept as
/// they are. A line that contains an `@` is trimmed and then peeled one
/// modifier at a time until no prefix matches. Lines are joined with `\n`.
pub fn sanitize_modifiers(source: &str) -> String {
    source
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") || !trimmed.contains('@') {
                return line;
            }
            strip_prefixes(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_prefixes(mut line: &str) -> &str {
    while let Some(prefix) = modifier_prefix().find(line) {
        line = &line[prefix.end()..];
    }
    line
}
