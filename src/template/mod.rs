//! Endpoint template substitution
//!
//! Resolves `{name}` placeholders in an endpoint template against one
//! parameter set.

use std::collections::BTreeMap;

/// Default placeholder opening delimiter
pub const OPEN: &str = "{";

/// Default placeholder closing delimiter
pub const CLOSE: &str = "}";

/// Replace every `open + key + close` token whose key is present in `params`.
///
/// The template is scanned once from left to right. Substituted values are
/// copied to the output and never rescanned, so a value containing
/// placeholder syntax stays literal and names that are substrings of each
/// other (`{id}`, `{userid}`) resolve independently. Tokens without a
/// matching key are left untouched.
pub fn substitute(
    template: &str,
    params: &BTreeMap<String, String>,
    open: &str,
    close: &str,
) -> String {
    if open.is_empty() || close.is_empty() {
        return template.to_string();
    }

    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(open) {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + open.len()..];

        let Some(end) = after_open.find(close) else {
            rest = &rest[start..];
            break;
        };

        let name = &after_open[..end];
        match params.get(name) {
            Some(value) if !name.contains(open) => {
                output.push_str(value);
                rest = &after_open[end + close.len()..];
            }
            _ => {
                // Not a known placeholder: keep the opening delimiter and
                // resume scanning right after it.
                output.push_str(open);
                rest = after_open;
            }
        }
    }

    output.push_str(rest);
    output
}

/// Substitute using the default `{` `}` delimiters
pub fn resolve(template: &str, params: &BTreeMap<String, String>) -> String {
    substitute(template, params, OPEN, CLOSE)
}
