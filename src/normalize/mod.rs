//! Response body normalization
//!
//! Re-indents JSON bodies into a line-oriented form so that two responses
//! can be compared line by line. Only whitespace between tokens changes:
//! numbers, strings and duplicate keys are kept exactly as the host sent them.

use serde::de::IgnoredAny;
use thiserror::Error;

/// Indentation used for normalized output
const INDENT: &str = "    ";

/// Normalization errors
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Pretty-print a JSON document with 4-space indentation.
///
/// Object keys keep their source order. Empty objects and arrays stay on one
/// line.
pub fn normalize(raw: &str) -> Result<String, NormalizeError> {
    serde_json::from_str::<IgnoredAny>(raw)?;
    Ok(reindent(raw))
}

/// Re-indent an already validated JSON document token by token
fn reindent(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() * 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            ' ' | '\t' | '\n' | '\r' => {}
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                while chars.next_if(|c| matches!(c, ' ' | '\t' | '\n' | '\r')).is_some() {}
                match chars.next_if(|c| matches!(c, '}' | ']')) {
                    Some(close) => out.push(close),
                    None => {
                        depth += 1;
                        newline(&mut out, depth);
                    }
                }
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                newline(&mut out, depth);
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            _ => out.push(c),
        }
    }

    out
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
