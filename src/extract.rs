//! Recovers the record array from a hand-maintained `people-data.js`.
//!
//! This is text surgery, not a JS parser. Comment stripping does not know
//! about string literals, so a `//` or `/*` inside a quoted value is eaten as
//! a comment. Data files that need such values must avoid those sequences.

use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::error::{PipelineError, Result};

/// Drops `// ...` to end of line, then `/* ... */` blocks.
pub fn strip_comments(text: &str) -> String {
    static LINE_RE: OnceLock<Regex> = OnceLock::new();
    static BLOCK_RE: OnceLock<Regex> = OnceLock::new();
    let line_re = LINE_RE.get_or_init(|| Regex::new(r"(?m)//.*?$").unwrap());
    let block_re = BLOCK_RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

    let text = line_re.replace_all(text, "");
    block_re.replace_all(&text, "").into_owned()
}

/// Slice from the array's `[` through the last `]` in the text.
///
/// The opening bracket is the first `[` after `<binding> =`, or the first `[`
/// anywhere when no such assignment exists.
pub fn extract_array_literal<'a>(text: &'a str, binding: &str) -> Result<&'a str> {
    let pattern = format!(r"\b{}\b\s*=\s*\[", regex::escape(binding));
    let assign = Regex::new(&pattern).expect("binding is escaped");

    let start = match assign.find(text) {
        Some(m) => text[m.start()..].find('[').map(|i| m.start() + i),
        None => text.find('['),
    };
    let end = text.rfind(']');
    match (start, end) {
        (Some(start), Some(end)) if end > start => Ok(&text[start..=end]),
        _ => Err(PipelineError::ArrayNotFound(binding.to_string())),
    }
}

/// Removes a comma that only has whitespace between it and `}` or `]`.
pub fn remove_trailing_commas(text: &str) -> Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r",(\s*[}\]])").unwrap());
    re.replace_all(text, "$1")
}

/// Checks the parsed value is a list and that its first `sample` entries are
/// objects. Entries past the sample are not inspected.
pub fn validate(value: Value, sample: usize) -> Result<Vec<Value>> {
    let Value::Array(items) = value else {
        return Err(PipelineError::NotAList);
    };
    if let Some(index) = items.iter().take(sample).position(|v| !v.is_object()) {
        return Err(PipelineError::NotAnObject { index });
    }
    Ok(items)
}

/// Comment strip, extract, trailing comma repair, parse, validate.
pub fn parse_people_js(text: &str, binding: &str, sample: usize) -> Result<Vec<Value>> {
    let stripped = strip_comments(text);
    let literal = extract_array_literal(&stripped, binding)?;
    let repaired = remove_trailing_commas(literal);
    let value: Value = serde_json::from_str(&repaired)?;
    validate(value, sample)
}
