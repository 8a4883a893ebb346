// src/args/parse.rs

//! Best-effort parsing of free-text argument strings.
//!
//! Used to re-hydrate an [`OptionMap`] from something a user typed or pasted,
//! e.g. `-rc vbr -an -lookahead 4` or `scale=1280:720,fps=30`. Parsing never
//! fails: fragments that cannot be understood are dropped.

use tracing::trace;

use super::map::OptionMap;
use super::value::OptionValue;
use crate::types::ArgStyle;

/// Parse `text` according to `style`.
pub fn parse(style: ArgStyle, text: &str) -> OptionMap {
    match style {
        ArgStyle::Flag => parse_flags(text),
        ArgStyle::Assignment => parse_assignments(text),
    }
}

/// `-key value` / `-flag` form.
///
/// A name is taken from every token starting with `-`; the following token
/// becomes its value unless it is itself dash-prefixed (negative numbers are
/// accepted as values). A flag without a value is stored as `true`.
pub fn parse_flags(text: &str) -> OptionMap {
    let mut result = OptionMap::new();
    let mut tokens = text.split_whitespace().peekable();

    while let Some(token) = tokens.next() {
        let Some(name) = token.strip_prefix('-') else {
            trace!(token, "dropping stray token while parsing flags");
            continue;
        };

        if name.is_empty() {
            continue;
        }

        let value = match tokens.peek() {
            Some(next) if accepts_as_value(next) => {
                let v = OptionValue::Text((*next).to_string());
                tokens.next();
                v
            }
            _ => OptionValue::Bool(true),
        };

        result.insert(name, value);
    }

    result
}

/// `key=value` pairs separated by commas.
///
/// Whitespace is accepted as a separator as well, so the space-joined
/// serialized form parses back. A name without `=` is stored as `true`.
pub fn parse_assignments(text: &str) -> OptionMap {
    let mut result = OptionMap::new();

    let fragments = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty());

    for fragment in fragments {
        let (name, value) = match fragment.split_once('=') {
            Some((name, value)) => (name, OptionValue::Text(value.to_string())),
            None => (fragment, OptionValue::Bool(true)),
        };

        if name.is_empty() {
            trace!(fragment, "dropping assignment with empty name");
            continue;
        }

        result.insert(name, value);
    }

    result
}

fn accepts_as_value(token: &str) -> bool {
    match token.strip_prefix('-') {
        None => true,
        Some(rest) => !rest.is_empty() && rest.parse::<f64>().is_ok(),
    }
}
