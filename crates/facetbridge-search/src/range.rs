//! Bracketed range literals, `"[<from> TO <to>]"`.
//!
//! The literal grammar is shared with persisted facet configuration and must
//! not change. A literal opens with `[` or `{` and closes with `]` or `}`; the
//! brackets are stripped without interpreting them as inclusive or exclusive.
//! `*` stands for an open bound.

use facetbridge_core::types::RangeBoundary;
use thiserror::Error;

pub const RANGE_SEPARATOR: &str = " TO ";
pub const OPEN_BOUND: &str = "*";

const OPENING_BRACKETS: [char; 2] = ['[', '{'];
const CLOSING_BRACKETS: [char; 2] = [']', '}'];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeLiteralError {
    #[error("range literal is empty")]
    Empty,

    #[error("range literal '{0}' is not enclosed in brackets")]
    MissingBrackets(String),

    #[error("range literal '{0}' has no '{sep}' separator", sep = RANGE_SEPARATOR.trim())]
    MissingSeparator(String),

    #[error("range literal '{0}' has more than one separator")]
    ExtraSeparator(String),

    #[error("range literal '{0}' has an empty bound")]
    EmptyBound(String),

    #[error("range bound '{0}' is not a number")]
    InvalidBound(String),
}

/// Splits a literal into its textual `(from, to)` bounds.
pub fn parse_range_literal(literal: &str) -> Result<(&str, &str), RangeLiteralError> {
    let literal = literal.trim();
    if literal.chars().count() < 2 {
        return Err(RangeLiteralError::Empty);
    }

    let inner = literal
        .strip_prefix(&OPENING_BRACKETS[..])
        .and_then(|rest| rest.strip_suffix(&CLOSING_BRACKETS[..]))
        .ok_or_else(|| RangeLiteralError::MissingBrackets(literal.to_string()))?;

    let (from, to) = inner
        .split_once(RANGE_SEPARATOR)
        .ok_or_else(|| RangeLiteralError::MissingSeparator(literal.to_string()))?;
    if to.contains(RANGE_SEPARATOR) {
        return Err(RangeLiteralError::ExtraSeparator(literal.to_string()));
    }

    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(RangeLiteralError::EmptyBound(literal.to_string()));
    }
    Ok((from, to))
}

pub fn parse_bound(bound: &str) -> Result<Option<f64>, RangeLiteralError> {
    if bound == OPEN_BOUND {
        return Ok(None);
    }
    match bound.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(RangeLiteralError::InvalidBound(bound.to_string())),
    }
}

/// Decodes a literal into numeric bucket boundaries.
pub fn decode_boundary(literal: &str) -> Result<RangeBoundary, RangeLiteralError> {
    let (from, to) = parse_range_literal(literal)?;
    Ok(RangeBoundary { from: parse_bound(from)?, to: parse_bound(to)? })
}

pub fn render_range(from: &str, to: &str) -> String {
    format!("[{}{}{}]", from, RANGE_SEPARATOR, to)
}

/// Renders numeric bounds in integer form, or `None` if a bound is not a whole number.
///
/// Engines report range boundaries as doubles, so integer timestamps come back
/// as `2.01406032E13` and must be printed as `20140603200000` to match the literal.
pub fn render_numeric_range(from: Option<f64>, to: Option<f64>) -> Option<String> {
    let from = numeric_bound(from)?;
    let to = numeric_bound(to)?;
    Some(render_range(&from, &to))
}

fn numeric_bound(value: Option<f64>) -> Option<String> {
    match value {
        None => Some(OPEN_BOUND.to_string()),
        Some(v) => whole_number(v).map(|n| n.to_string()),
    }
}

pub fn whole_number(value: f64) -> Option<i64> {
    // i64::MAX is not representable as f64; the cast rounds up to 2^63.
    if value.is_finite() && value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}
