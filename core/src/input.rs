use std::collections::HashMap;
use anyhow::{anyhow, Result};

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub positional: Vec<String>,
    pub metadata: HashMap<String, String>,
}

/// Splits `key:value` arguments from positional ones.
///
/// Only the first `:` separates key and value, so `title:a:b` keeps `a:b`.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut positional = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        positional.push(arg.clone());
    }

    ParsedInput {
        positional,
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Converts form text to a number the way a browser `Number()` call does.
///
/// Blank text is `0`, `Infinity` is accepted with an optional sign, `0x`/`0o`/`0b`
/// prefixes are integer literals, and anything else that is not a plain
/// decimal literal is `NaN`. Never fails.
pub fn coerce_number(input: &str) -> f64 {
    let s = input.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_radix_literal(s) {
        return value;
    }

    // f64::from_str also takes "inf" and "nan", which Number() rejects
    let is_decimal_literal = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !is_decimal_literal {
        return f64::NAN;
    }

    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix_literal(s: &str) -> Option<f64> {
    let prefix = s.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    // Accumulate as f64 so literals past u64::MAX still give a large number
    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    });
    Some(value.unwrap_or(f64::NAN))
}
