// src/core/sanitize.rs
use std::sync::LazyLock;

use regex::Regex;

/// One or more trailing `[n]` citation markers, e.g. `"Pilot"[1][2]`.
static TRAILING_FOOTNOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s*\[\s*\d+\s*\])+\s*$").unwrap());

const DOUBLE_QUOTES: &[char] = &['"', '\u{201c}', '\u{201d}'];

/// Single quotes double as apostrophes (`'Til Death`), so they only count
/// when they enclose the whole title.
const SINGLE_QUOTE_PAIRS: &[(char, char)] = &[('\'', '\''), ('\u{2018}', '\u{2019}')];

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Column name to canonical `lower_snake` form.
/// `"U.S. viewers (millions)[3]"` -> `"us_viewers_millions"`.
pub fn snakify(name: &str) -> String {
    let name = strip_footnotes(name);
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.trim().chars() {
        if ch.is_whitespace() {
            if !last_us && !out.is_empty() { out.push('_'); last_us = true; }
        } else if ch.is_ascii_punctuation() && ch != '_' {
            // dropped
        } else {
            out.extend(ch.to_lowercase());
            last_us = ch == '_';
        }
    }
    out.trim_end_matches('_').to_string()
}

/// Remove trailing bracketed numeric citations.
pub fn strip_footnotes(s: &str) -> String {
    TRAILING_FOOTNOTES.replace(s, "").into_owned()
}

/// Remove one layer of surrounding quotes. Double quotes are stripped from
/// either end; single quotes only as a matching pair.
pub fn strip_quotes(s: &str) -> String {
    let t = s.trim();
    let inner = t.strip_prefix(DOUBLE_QUOTES).unwrap_or(t);
    let inner = inner.strip_suffix(DOUBLE_QUOTES).unwrap_or(inner);
    if inner.len() != t.len() {
        return inner.trim().to_string();
    }
    SINGLE_QUOTE_PAIRS.iter()
        .find_map(|&(open, close)| t.strip_prefix(open)?.strip_suffix(close))
        .unwrap_or(t)
        .trim()
        .to_string()
}

/// Upper-case the first letter of every word. The rest of the word is left
/// alone so names like `McCoy` and acronyms like `DNA` survive.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_whitespace() || ch == '-' || ch == '/' {
            out.push(ch);
            at_word_start = true;
        } else if at_word_start && ch.is_alphabetic() {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.push(ch);
            if ch.is_alphanumeric() { at_word_start = false; }
        }
    }
    out
}

/// Drop every non-ASCII character and collapse whitespace.
pub fn ascii_only(s: &str) -> String {
    let kept: String = s.chars().filter(|c| c.is_ascii()).collect();
    normalize_ws(&kept)
}

/// Footnotes, quotes, whitespace, title case. Idempotent.
pub fn clean_title(raw: &str) -> String {
    let t = normalize_ws(raw);
    let t = strip_footnotes(&t);
    let t = strip_quotes(&t);
    let t = strip_footnotes(&t);
    title_case(&normalize_ws(&t))
}
