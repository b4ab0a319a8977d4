//! Line parser for `(subject, RELATION, object)` model output

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Triplet;

// "-", "*", "•", "1.", "1)"
static LIST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*•]\s*|\d+[.)]\s*)").expect("valid regex"));

/// Why a line was not a triplet
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("blank line")]
    Blank,

    #[error("not wrapped in a single pair of parentheses")]
    NotParenthesized,

    #[error("expected 3 comma-separated fields, found {0}")]
    FieldCount(usize),

    #[error("field {0} is empty")]
    EmptyField(usize),
}

/// A triplet before provenance is attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTriplet {
    pub subject: String,
    pub relation: String,
    pub object: String,
}

impl ParsedTriplet {
    pub fn into_triplet(self, source_record_id: &str) -> Triplet {
        Triplet::new(self.subject, self.relation, self.object, source_record_id)
    }
}

/// Parse one line of model output
pub fn parse_triplet_line(line: &str) -> Result<ParsedTriplet, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Blank);
    }

    let line = LIST_MARKER_RE.replace(line, "");
    let line = line.trim().trim_end_matches([',', ';', '.']).trim_end();

    let inner = line
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or(ParseError::NotParenthesized)?;
    if inner.contains(['(', ')']) {
        return Err(ParseError::NotParenthesized);
    }

    let fields: Vec<&str> = inner.split(',').map(clean_field).collect();
    if fields.len() != 3 {
        return Err(ParseError::FieldCount(fields.len()));
    }
    if let Some(position) = fields.iter().position(|f| f.is_empty()) {
        return Err(ParseError::EmptyField(position + 1));
    }

    Ok(ParsedTriplet {
        subject: fields[0].to_string(),
        relation: fields[1].to_string(),
        object: fields[2].to_string(),
    })
}

fn clean_field(field: &str) -> &str {
    let field = field.trim();
    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”'), ('`', '`')] {
        if let Some(inner) = field
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    field
}

/// Triplets found in a full response plus the count of rejected lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    pub triplets: Vec<ParsedTriplet>,
    pub malformed_lines: usize,
}

/// Parse every line of a response; blank lines are neither kept nor counted
pub fn parse_response(text: &str) -> ParsedResponse {
    let mut parsed = ParsedResponse::default();
    for line in text.lines() {
        match parse_triplet_line(line) {
            Ok(triplet) => parsed.triplets.push(triplet),
            Err(ParseError::Blank) => {}
            Err(_) => parsed.malformed_lines += 1,
        }
    }
    parsed
}
