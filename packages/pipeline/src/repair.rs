//! Best-effort repair of near-JSON text produced by text generators.
//!
//! The repairer only rewrites syntax; it never interprets content. Its
//! output is handed to `serde_json`, and a parse failure there is a repair
//! failure like any other.

use tracing::debug;

use crate::error::{PipelineError, Result};

/// Turns near-JSON text into JSON text, enabling substitution in tests.
pub trait Repairer {
    fn repair(&self, text: &str) -> Result<String>;
}

/// Single-pass heuristic repairer.
///
/// Handles the usual generator slips: code fences, prose around the object,
/// unescaped quotes and raw control characters inside strings, single-quoted
/// strings, unquoted keys, Python literals, trailing commas, mismatched or
/// missing closing brackets, and truncated strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicRepairer;

impl Repairer for HeuristicRepairer {
    fn repair(&self, text: &str) -> Result<String> {
        let body = fenced_blocks(text)
            .into_iter()
            .find(|b| b.contains(['{', '[']))
            .unwrap_or(text);

        let Some(start) = body.find(['{', '[']) else {
            return Err(PipelineError::repair("no JSON object or array found", text));
        };

        let repaired = repair_structure(&body[start..]);
        if repaired != body[start..].trim_end() {
            debug!(
                input_len = text.len(),
                output_len = repaired.len(),
                "repaired near-JSON text"
            );
        }
        Ok(repaired)
    }
}

/// Bodies of fenced code blocks, `json`-tagged blocks ahead of the rest.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut tagged = Vec::new();
    let mut other = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("```") {
        let Some((tag, body)) = rest[open + 3..].split_once('\n') else {
            break;
        };
        let Some(close) = body.find("```") else {
            break;
        };
        if tag.trim().eq_ignore_ascii_case("json") {
            tagged.push(&body[..close]);
        } else {
            other.push(&body[..close]);
        }
        rest = &body[close + 3..];
    }

    tagged.extend(other);
    tagged
}

/// Next non-whitespace character at or after `from`.
fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars.iter().skip(from).copied().find(|c| !c.is_whitespace())
}

/// Whether a quote at `at` ends its string: only if structure follows.
fn closes_string(chars: &[char], at: usize) -> bool {
    matches!(
        next_significant(chars, at + 1),
        None | Some(',' | ':' | '}' | ']')
    )
}

/// Drop a trailing comma (and the whitespace after it) from the output.
fn strip_trailing_comma(out: &mut String) {
    let trimmed = out.trim_end().len();
    if out[..trimmed].ends_with(',') {
        out.truncate(trimmed - 1);
    }
}

fn push_string_char(out: &mut String, ch: char) {
    match ch {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
        c => out.push(c),
    }
}

fn push_bare_word(out: &mut String, word: &str) {
    match word {
        "true" | "True" | "TRUE" => out.push_str("true"),
        "false" | "False" | "FALSE" => out.push_str("false"),
        "null" | "Null" | "NULL" | "None" | "NaN" | "undefined" => out.push_str("null"),
        other => {
            out.push('"');
            out.push_str(other);
            out.push('"');
        }
    }
}

fn repair_structure(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 16);
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if let Some(q) = quote {
            if escaped {
                escaped = false;
                match ch {
                    '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u' => out.push(ch),
                    '\'' => {
                        out.pop();
                        out.push('\'');
                    }
                    other => {
                        // Unknown escape: keep the backslash as a literal.
                        out.push('\\');
                        push_string_char(&mut out, other);
                    }
                }
            } else if ch == '\\' {
                out.push('\\');
                escaped = true;
            } else if ch == q {
                if closes_string(&chars, i) {
                    out.push('"');
                    quote = None;
                } else if q == '"' {
                    out.push_str("\\\"");
                } else {
                    out.push('\'');
                }
            } else if ch == '"' {
                out.push_str("\\\"");
            } else {
                push_string_char(&mut out, ch);
            }
            i += 1;
            continue;
        }

        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                out.push('"');
            }
            '{' => {
                stack.push('}');
                out.push('{');
            }
            '[' => {
                stack.push(']');
                out.push('[');
            }
            '}' | ']' => {
                // Close intermediate levels up to the matching opener; stray closers are dropped.
                if let Some(depth) = stack.iter().rposition(|&c| c == ch) {
                    while stack.len() > depth {
                        if let Some(closer) = stack.pop() {
                            strip_trailing_comma(&mut out);
                            out.push(closer);
                        }
                    }
                    if stack.is_empty() {
                        break;
                    }
                }
            }
            c if c.is_ascii_digit() || c == '-' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_digit() || matches!(chars[i], '.' | 'e' | 'E' | '+' | '-'))
                {
                    i += 1;
                }
                out.extend(&chars[start..i]);
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                push_bare_word(&mut out, &word);
                continue;
            }
            c => out.push(c),
        }
        i += 1;
    }

    if quote.is_some() {
        if escaped {
            out.pop();
        }
        out.push('"');
    }
    strip_trailing_comma(&mut out);
    if out.trim_end().ends_with(':') {
        out.push_str(" null");
    }
    while let Some(closer) = stack.pop() {
        strip_trailing_comma(&mut out);
        out.push(closer);
    }

    out.trim_end().to_string()
}
