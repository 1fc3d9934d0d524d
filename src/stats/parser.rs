//! Parsing of line-oriented `key value` kernel pseudo-files.
//!
//! Counter files such as `memory.stat` consist of one whitespace-separated
//! key/value pair per line. The parser is permissive about *which* keys appear
//! (callers pick the keys they understand and default the rest to zero) but
//! strict about line shape: a line that is not exactly one key and one
//! unsigned decimal value aborts the parse.
//!
//! # Example
//!
//! ```rust
//! use cgctl::stats::parse_kv;
//!
//! let data = "cache 1024\nrss 2048\n";
//! let raw = parse_kv(data.as_bytes()).unwrap();
//! assert_eq!(raw["cache"], 1024);
//! assert_eq!(raw["rss"], 2048);
//! assert_eq!(raw.get("dirty"), None);
//! ```

use std::collections::HashMap;
use std::io::BufRead;

use super::error::StatParseError;

/// Parses a `key value` counter file into a map from counter name to value.
///
/// Unknown keys are retained (the caller decides what to ignore); a repeated
/// key keeps its last value.
///
/// # Errors
///
/// Returns a [`StatParseError`] on the first unreadable or malformed line.
pub fn parse_kv<R: BufRead>(reader: R) -> Result<HashMap<String, u64>, StatParseError> {
    let mut out = HashMap::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let (key, value) = parse_line(&line, idx + 1)?;
        out.insert(key.to_owned(), value);
    }
    Ok(out)
}

fn parse_line(line: &str, lineno: usize) -> Result<(&str, u64), StatParseError> {
    let mut fields = line.split_whitespace();
    let (Some(key), Some(raw), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(StatParseError::MalformedLine {
            content: line.to_string(),
            line: lineno,
        });
    };
    let value = raw
        .parse::<u64>()
        .map_err(|source| StatParseError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            line: lineno,
            source,
        })?;
    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_file() {
        let raw = parse_kv("".as_bytes()).unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn test_parse_counter_lines() {
        let data = "\
cache 1024
rss 2048
total_rss 4096
";
        let raw = parse_kv(data.as_bytes()).unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw["cache"], 1024);
        assert_eq!(raw["rss"], 2048);
        assert_eq!(raw["total_rss"], 4096);
    }

    #[test]
    fn test_missing_key_is_absent_not_zero() {
        let raw = parse_kv("cache 1024\n".as_bytes()).unwrap();
        assert_eq!(raw.get("dirty"), None);
    }

    #[test]
    fn test_malformed_line_aborts() {
        let data = "\
cache 1024
just-one-field
";
        let err = parse_kv(data.as_bytes()).unwrap_err();
        match err {
            StatParseError::MalformedLine { content, line } => {
                assert_eq!(content, "just-one-field");
                assert_eq!(line, 2);
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_three_fields_is_malformed() {
        let err = parse_kv("cache 1024 extra\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StatParseError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn test_invalid_value_reports_key_and_line() {
        let data = "\
cache 1024
rss abc
";
        let err = parse_kv(data.as_bytes()).unwrap_err();
        match err {
            StatParseError::InvalidValue {
                key, value, line, ..
            } => {
                assert_eq!(key, "rss");
                assert_eq!(value, "abc");
                assert_eq!(line, 2);
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_key_keeps_last_value() {
        let raw = parse_kv("cache 1\ncache 2\n".as_bytes()).unwrap();
        assert_eq!(raw["cache"], 2);
    }
}
