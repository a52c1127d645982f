//! Helpers for reading `nmcli` terse output.
//!
//! In terse mode (`nmcli -t`) every line is `FIELD:value`, with `:` and `\`
//! inside values escaped as `\:` and `\\`.

use log::warn;
use std::collections::HashMap;

/// Removes `nmcli` terse escaping from a value.
pub(crate) fn unescape_terse(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Parses `nmcli -t connection show <id>` output into a field map.
///
/// Field names never contain `:`, so each line splits at its first colon.
/// Lines without a colon are skipped. Repeated fields keep the first value.
pub(crate) fn parse_terse_fields(output: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            warn!("Skipping malformed nmcli line: {line}");
            continue;
        };
        fields
            .entry(key.trim().to_string())
            .or_insert_with(|| unescape_terse(value));
    }
    fields
}
