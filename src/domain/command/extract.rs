//! Extraction strategies for pasted command-line HTTP invocations
//!
//! Every strategy is a pure function over normalized command text that
//! returns `None` when it does not apply. Strategies are grouped into
//! ordered lists and composed with [`first_match`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A single extraction rule
pub type Strategy = fn(&str) -> Option<String>;

static LINE_CONTINUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\\^`][ \t]*\r?\n").expect("valid regex"));

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static LOCATION_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:^|\s)(?:--location|--url|-L)\s+(?:'(https?://[^']+)'|"(https?://[^"]+)"|(https?://[^\s'"]+))"#,
    )
    .expect("valid regex")
});

static PROGRAM_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|\s)curl(?:\.exe)?\s.*?(https?://[^\s'"]+)"#).expect("valid regex")
});

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s'"]+"#).expect("valid regex"));

static HEADER_BEARER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:^|\s)(?:-H|--header)\s*['"]?(?i:authorization)\s*:\s*(?i:bearer)\s+([^\s'"]+)"#,
    )
    .expect("valid regex")
});

static ANY_BEARER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i:authorization)\s*:\s*(?i:bearer)\s+([^\s'"]+)"#).expect("valid regex")
});

const BODY_FLAGS: &str = r"(?:^|\s)(?:--data-raw|--data-binary|--data-ascii|--data|-d)\s+";

static BODY_SINGLE_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{BODY_FLAGS}'((?:[^'\\]|\\.)*)'")).expect("valid regex")
});

static BODY_DOUBLE_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r#"{BODY_FLAGS}"((?:[^"\\]|\\.)*)""#)).expect("valid regex")
});

static BODY_DOLLAR_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{BODY_FLAGS}\$'((?:[^'\\]|\\.)*)'")).expect("valid regex")
});

/// Endpoint rules, tried in order
pub const ENDPOINT_STRATEGIES: &[Strategy] =
    &[endpoint_after_location_flag, endpoint_after_program, first_bare_url];

/// Bearer token rules, tried in order
pub const TOKEN_STRATEGIES: &[Strategy] = &[bearer_in_header_flag, bearer_anywhere];

/// Body rules, tried in order; the balanced scan is the last resort
pub const BODY_STRATEGIES: &[Strategy] = &[
    body_single_quoted,
    body_double_quoted,
    body_dollar_quoted,
    last_balanced_object,
];

/// Run strategies in order and keep the first result
pub fn first_match(strategies: &[Strategy], text: &str) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy(text))
}

/// Join continued lines and collapse all whitespace runs to one space
pub fn normalize(command: &str) -> String {
    let joined = LINE_CONTINUATION.replace_all(command, " ");
    WHITESPACE_RUN.replace_all(&joined, " ").trim().to_string()
}

fn first_group(captures: &Captures<'_>) -> Option<String> {
    captures
        .iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str().to_string())
        .next()
}

pub fn endpoint_after_location_flag(text: &str) -> Option<String> {
    LOCATION_URL.captures(text).as_ref().and_then(first_group)
}

pub fn endpoint_after_program(text: &str) -> Option<String> {
    PROGRAM_URL.captures(text).as_ref().and_then(first_group)
}

pub fn first_bare_url(text: &str) -> Option<String> {
    BARE_URL.find(text).map(|m| m.as_str().to_string())
}

pub fn bearer_in_header_flag(text: &str) -> Option<String> {
    HEADER_BEARER.captures(text).as_ref().and_then(first_group)
}

pub fn bearer_anywhere(text: &str) -> Option<String> {
    ANY_BEARER.captures(text).as_ref().and_then(first_group)
}

fn non_empty_body(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures_iter(text)
        .filter_map(|captures| first_group(&captures))
        .find(|body| !body.trim().is_empty())
}

pub fn body_single_quoted(text: &str) -> Option<String> {
    non_empty_body(&BODY_SINGLE_QUOTED, text)
}

pub fn body_double_quoted(text: &str) -> Option<String> {
    non_empty_body(&BODY_DOUBLE_QUOTED, text)
}

pub fn body_dollar_quoted(text: &str) -> Option<String> {
    non_empty_body(&BODY_DOLLAR_QUOTED, text)
}

/// The last top-level `{...}` object in the text, found by brace counting.
///
/// Braces inside JSON string literals do not count.
pub fn last_balanced_object(text: &str) -> Option<String> {
    let mut last = None;
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text.char_indices() {
        if depth > 0 && in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = index;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    last = Some(text[start..=index].to_string());
                }
            }
            _ => {}
        }
    }

    last
}

/// Undo the quote escaping shells put into a quoted body.
///
/// `\'`, `\"` and `\\` lose their backslash; every other escape is kept
/// as-is so JSON escapes such as `\n` or `\u00e9` survive.
pub fn unescape_shell_quotes(body: &str) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '\'' | '"' | '\\') {
                    result.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        result.push(ch);
    }

    result
}
