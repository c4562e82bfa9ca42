//! Relaxed JSON recovery for model-written arrays.
//!
//! Models often emit "almost JSON": single-quoted strings, unquoted keys,
//! trailing commas, Python literals. This module rewrites those forms into
//! strict JSON text and hands the result to `serde_json`. Nothing is ever
//! evaluated: any bare identifier that is not a literal or an object key is
//! rejected.

use serde_json::Value;

use super::ExtractionError;

/// Parse relaxed JSON text that must be an array.
pub fn parse_relaxed_array(text: &str) -> Result<Vec<Value>, ExtractionError> {
    let strict = to_strict_json(text)?;
    match serde_json::from_str::<Value>(&strict) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err(ExtractionError::NotAnArray),
        Err(e) => Err(ExtractionError::JsonParsing(e.to_string())),
    }
}

/// Rewrite relaxed JSON into strict JSON text.
pub fn to_strict_json(text: &str) -> Result<String, ExtractionError> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        match c {
            '"' => i = copy_double_quoted(&chars, i, &mut out)?,
            '\'' => i = convert_single_quoted(&chars, i, &mut out)?,
            ']' | '}' => {
                drop_trailing_comma(&mut out);
                out.push(c);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '-' => {
                while i < chars.len() && is_number_char(chars[i].1) {
                    out.push(chars[i].1);
                    i += 1;
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                let start = i;
                while i < chars.len() && is_ident_char(chars[i].1) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().map(|(_, c)| c).collect();
                match word.as_str() {
                    "true" | "True" => out.push_str("true"),
                    "false" | "False" => out.push_str("false"),
                    "null" | "None" | "undefined" => out.push_str("null"),
                    _ if next_significant(&chars, i) == Some(':') => {
                        out.push('"');
                        out.push_str(&word);
                        out.push('"');
                    }
                    _ => {
                        return Err(ExtractionError::RelaxedJson {
                            offset,
                            reason: format!("bare identifier `{word}`"),
                        })
                    }
                }
            }
            '(' | ')' | ';' | '=' | '`' => {
                return Err(ExtractionError::RelaxedJson {
                    offset,
                    reason: format!("unexpected `{c}`"),
                })
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
}

fn next_significant(chars: &[(usize, char)], from: usize) -> Option<char> {
    chars[from..].iter().map(|(_, c)| *c).find(|c| !c.is_whitespace())
}

fn drop_trailing_comma(out: &mut String) {
    let trimmed_len = out.trim_end().len();
    if out[..trimmed_len].ends_with(',') {
        out.truncate(trimmed_len - 1);
    }
}

/// Copy a double-quoted string verbatim. Returns the index after the
/// closing quote.
fn copy_double_quoted(
    chars: &[(usize, char)],
    start: usize,
    out: &mut String,
) -> Result<usize, ExtractionError> {
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i].1;
        match c {
            '\\' => {
                out.push(c);
                if let Some((_, next)) = chars.get(i + 1) {
                    out.push(*next);
                }
                i += 2;
            }
            '"' => {
                out.push('"');
                return Ok(i + 1);
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    Err(unterminated(chars, start))
}

/// Re-quote a single-quoted string with double quotes.
fn convert_single_quoted(
    chars: &[(usize, char)],
    start: usize,
    out: &mut String,
) -> Result<usize, ExtractionError> {
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i].1;
        match c {
            '\\' => match chars.get(i + 1).map(|(_, n)| *n) {
                Some('\'') => {
                    out.push('\'');
                    i += 2;
                }
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                    i += 2;
                }
                None => i += 1,
            },
            '"' => {
                out.push_str("\\\"");
                i += 1;
            }
            '\'' => {
                out.push('"');
                return Ok(i + 1);
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    Err(unterminated(chars, start))
}

fn unterminated(chars: &[(usize, char)], start: usize) -> ExtractionError {
    ExtractionError::RelaxedJson {
        offset: chars[start].0,
        reason: "unterminated string".into(),
    }
}
