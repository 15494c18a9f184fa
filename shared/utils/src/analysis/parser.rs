//! Model Reply Parser
//!
//! Turns the free text returned by the model into an [`AnalysisResult`]
//! through a fixed sequence of strategies:
//!
//! 1. the whole reply is a JSON object
//! 2. a JSON object is embedded in surrounding prose or code fences
//! 3. one or more markdown tables
//! 4. nothing recognisable, which yields the empty default
//!
//! A JSON object always wins over a markdown table in the same reply.

use docsight_models::AnalysisResult;
use serde_json::{Map, Value};

use super::markdown::extract_tables;
use super::normalizer::{finalize_tables, normalize};

/// Top-level objects tried when looking for an embedded object.
const MAX_EMBEDDED_CANDIDATES: usize = 32;

/// Which strategy produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Json,
    EmbeddedJson,
    MarkdownTable,
    Empty,
}

impl ParseStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::EmbeddedJson => "embedded_json",
            Self::MarkdownTable => "markdown_table",
            Self::Empty => "empty",
        }
    }

    /// True when the reply could not be understood at all.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub result: AnalysisResult,
    pub strategy: ParseStrategy,
}

/// Model reply parser
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &str) -> ParseOutcome {
        let text = raw.trim();

        if let Some(object) = parse_whole(text) {
            return Self::from_object(&object, ParseStrategy::Json);
        }

        if let Some(object) = find_embedded_object(text) {
            return Self::from_object(&object, ParseStrategy::EmbeddedJson);
        }

        let tables = extract_tables(text);
        if !tables.is_empty() {
            let mut result = AnalysisResult {
                tables,
                ..Default::default()
            };
            finalize_tables(&mut result);
            return ParseOutcome {
                result,
                strategy: ParseStrategy::MarkdownTable,
            };
        }

        ParseOutcome {
            result: AnalysisResult::default(),
            strategy: ParseStrategy::Empty,
        }
    }

    fn from_object(object: &Map<String, Value>, strategy: ParseStrategy) -> ParseOutcome {
        ParseOutcome {
            result: normalize(object),
            strategy,
        }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_whole(text: &str) -> Option<Map<String, Value>> {
    if text.starts_with('{') && text.ends_with('}') {
        parse_object(text)
    } else {
        None
    }
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Try each top-level balanced object, then fall back to the span from the
/// first `{` to the last `}`.
///
/// Braces nested inside an earlier candidate are never tried on their own, so
/// a reply cut off mid-object cannot surface one of its children as the root.
fn find_embedded_object(text: &str) -> Option<Map<String, Value>> {
    let first = text.find('{')?;

    let mut start = first;
    for _ in 0..MAX_EMBEDDED_CANDIDATES {
        let Some(end) = balanced_end(text, start) else {
            break;
        };
        if let Some(object) = parse_object(&text[start..=end]) {
            return Some(object);
        }
        match text[end + 1..].find('{') {
            Some(offset) => start = end + 1 + offset,
            None => break,
        }
    }

    let last = text.rfind('}')?;
    if last > first {
        parse_object(&text[first..=last])
    } else {
        None
    }
}

/// Byte index of the `}` closing the `{` at `start`, honouring JSON strings.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().copied().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}
