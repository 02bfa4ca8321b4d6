// src/core/parse.rs
//
// Field coercion for scraped cells. Every parser returns `ParseResult` and
// never panics; whether a failure means "absent" or "skip the row" is the
// caller's call.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::core::sanitize::{normalize_ws, strip_footnotes};
use crate::error::{ParseFailure, ParseResult};

static LEADING_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+)").unwrap());
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());
static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^()]*)\)").unwrap());

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%B %d %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S"];

/// Source viewer counts are expressed in millions.
pub const VIEWERS_SCALE: f64 = 1_000_000.0;

fn non_empty(raw: &str) -> ParseResult<String> {
    let t = normalize_ws(&strip_footnotes(raw));
    if t.is_empty() { Err(ParseFailure::Empty) } else { Ok(t) }
}

/// Positive index such as an episode or season number.
/// Accepts `"7"`, `"7.0"` (float-typed columns), `"7[2]"`.
pub fn parse_index(raw: &str) -> ParseResult<u32> {
    let t = non_empty(raw)?;
    LEADING_INT.captures(&t)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|&n| n > 0)
        .ok_or(ParseFailure::NoMatch { expected: "index", raw: t })
}

fn parse_date_exact(t: &str) -> Option<NaiveDate> {
    DATE_FORMATS.iter()
        .find_map(|f| NaiveDate::parse_from_str(t, f).ok())
        .or_else(|| DATETIME_FORMATS.iter()
            .find_map(|f| NaiveDateTime::parse_from_str(t, f).ok())
            .map(|dt| dt.date()))
}

/// Air date: the whole cell first, then the first parenthesized part that
/// parses (`"September 20, 1999 (1999-09-20)"`).
pub fn parse_air_date(raw: &str) -> ParseResult<NaiveDate> {
    let t = non_empty(raw)?;
    if let Some(d) = parse_date_exact(&t) {
        return Ok(d);
    }
    let inner = PARENTHESIZED.captures_iter(&t).find_map(|c| parse_date_exact(c[1].trim()));
    inner.ok_or(ParseFailure::NoMatch { expected: "date", raw: t })
}

fn first_number(raw: &str) -> ParseResult<f64> {
    let t = non_empty(raw)?;
    DECIMAL.find(&t)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or(ParseFailure::NoMatch { expected: "number", raw: t })
}

/// Viewer count from a cell given in millions: first number, times one
/// million, rounded. `"17.29[2]"` -> `17_290_000.0`. `"N/A"` fails.
pub fn parse_viewers(raw: &str) -> ParseResult<f64> {
    first_number(raw).map(|v| (v * VIEWERS_SCALE).round())
}

/// Absolute count, e.g. a `viewers_millions` cell this crate wrote itself.
pub fn parse_count(raw: &str) -> ParseResult<f64> {
    first_number(raw).map(f64::round)
}

/// Free text: whitespace collapsed, empty means absent.
pub fn parse_text(raw: &str) -> ParseResult<String> {
    let t = normalize_ws(raw);
    if t.is_empty() { Err(ParseFailure::Empty) } else { Ok(t) }
}
