//! Date formatting for the `date` builtin. Patterns are either the
//! simple `YYYY.MM.DD HH:MM:SS` kind, where `MM` means minutes when
//! next to hours or seconds (as in spreadsheets), or, if they contain
//! a `%`, chrono strftime patterns.

use std::fmt::Write;

use chrono::{TimeZone, DateTime, Datelike, Timelike, Utc, LocalResult,
             format::{StrftimeItems, Item}};
use chrono_tz::Tz;

pub const DEFAULT_DATE_FORMAT: &str = "YYYY.MM.DD HH:MM:SS";

// chrono's limit is year 262143; keep some distance so that adding a
// zone offset can't step over it.
const MAX_ABS_YEAR: i32 = 262_000;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Token {
    Year4,
    Year2,
    // Month or minute, decided by the neighbours
    MM,
    Month,
    Minute,
    Day,
    Hour,
    Second,
    Lit(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = pattern;
    while let Some(c) = rest.chars().next() {
        let (tok, len) =
            if rest.starts_with("YYYY") { (Token::Year4, 4) }
            else if rest.starts_with("YY") { (Token::Year2, 2) }
            else if rest.starts_with("MM") { (Token::MM, 2) }
            else if rest.starts_with("DD") { (Token::Day, 2) }
            else if rest.starts_with("HH") { (Token::Hour, 2) }
            else if rest.starts_with("SS") { (Token::Second, 2) }
            else { (Token::Lit(c), c.len_utf8()) };
        tokens.push(tok);
        rest = &rest[len..];
    }

    // Disambiguate MM by looking at the closest non-literal tokens.
    let is_field = |t: &&Token| !matches!(t, Token::Lit(_));
    for i in 0..tokens.len() {
        if tokens[i] == Token::MM {
            let before = tokens[..i].iter().rev().find(is_field).copied();
            let after = tokens[i+1..].iter().find(is_field).copied();
            tokens[i] =
                if before == Some(Token::Hour) || after == Some(Token::Second) {
                    Token::Minute
                } else {
                    Token::Month
                };
        }
    }
    tokens
}

fn format_simple(dt: &DateTime<Tz>, pattern: &str) -> String {
    let mut out = String::new();
    for tok in tokenize(pattern) {
        // Writing to a String can't fail
        let _ = match tok {
            Token::Year4 => write!(out, "{:04}", dt.year()),
            Token::Year2 => write!(out, "{:02}", dt.year().rem_euclid(100)),
            Token::Month | Token::MM => write!(out, "{:02}", dt.month()),
            Token::Minute => write!(out, "{:02}", dt.minute()),
            Token::Day => write!(out, "{:02}", dt.day()),
            Token::Hour => write!(out, "{:02}", dt.hour()),
            Token::Second => write!(out, "{:02}", dt.second()),
            Token::Lit(c) => write!(out, "{c}"),
        };
    }
    out
}

fn format_strftime(dt: &DateTime<Tz>, pattern: &str, log: bool) -> String {
    let items: Vec<Item> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        crate::warn_if!(log, "date: invalid strftime pattern {pattern:?}");
        return format!("invalid date format {pattern:?}")
    }
    let mut out = String::new();
    match write!(out, "{}", dt.format_with_items(items.iter())) {
        Ok(()) => out,
        // e.g. %Z-like items a zone can't provide
        Err(_) => format!("can't format date with {pattern:?}")
    }
}

/// `timestamp` seconds since the epoch, seen in `zone`.
pub fn datetime_in_zone(timestamp: i64, zone: Tz) -> Option<DateTime<Tz>> {
    match Utc.timestamp_opt(timestamp, 0) {
        LocalResult::Single(utc) if utc.year().abs() <= MAX_ABS_YEAR =>
            Some(utc.with_timezone(&zone)),
        _ => None
    }
}

/// The `date` builtin. Always gives a string, out of range timestamps
/// and broken patterns give a message, and a warning if `log`.
pub fn format_timestamp(timestamp: i64, zone: Tz, pattern: &str, log: bool) -> String {
    match datetime_in_zone(timestamp, zone) {
        Some(dt) =>
            if pattern.contains('%') {
                format_strftime(&dt, pattern, log)
            } else {
                format_simple(&dt, pattern)
            },
        None => {
            crate::warn_if!(log, "date: timestamp {timestamp} out of range");
            format!("invalid timestamp {timestamp}")
        }
    }
}


#[cfg(test)]
mod tests {
    use chrono_tz::Europe::Zurich;

    use super::*;

    fn utc(t: i64, pat: &str) -> String {
        format_timestamp(t, Tz::UTC, pat, true)
    }

    #[test]
    fn t_default() {
        assert_eq!(utc(0, DEFAULT_DATE_FORMAT), "1970.01.01 00:00:00");
        assert_eq!(utc(1708967013, DEFAULT_DATE_FORMAT), "2024.02.26 17:03:33");
        assert_eq!(format_timestamp(1708967013, Zurich, DEFAULT_DATE_FORMAT, true),
                   "2024.02.26 18:03:33");
    }

    #[test]
    fn t_tokens() {
        assert_eq!(utc(0, "YYYY"), "1970");
        assert_eq!(utc(1714258620, "DD/MM/YY"), "27/04/24");
        assert_eq!(utc(1714258620, "HH:MM"), "22:57");
        assert_eq!(utc(1714258620, "MM:SS"), "57:00");
        assert_eq!(utc(1714258620, "MM-DD HH"), "04-27 22");
        assert_eq!(utc(1714258620, "Year YYYY!"), "Year 2024!");
        assert_eq!(utc(1714258620, ""), "");
    }

    #[test]
    fn t_dst() {
        // last second of CET, first of CEST
        assert_eq!(format_timestamp(1711846799, Zurich, DEFAULT_DATE_FORMAT, true),
                   "2024.03.31 01:59:59");
        assert_eq!(format_timestamp(1711846800, Zurich, DEFAULT_DATE_FORMAT, true),
                   "2024.03.31 03:00:00");
    }

    #[test]
    fn t_strftime() {
        assert_eq!(utc(0, "%Y"), "1970");
        assert_eq!(utc(1708967013, "%a, %d %b %Y %H:%M:%S"),
                   "Mon, 26 Feb 2024 17:03:33");
        assert_eq!(utc(0, "%Q"), "invalid date format \"%Q\"");
    }

    #[test]
    fn t_range() {
        assert_eq!(utc(-1, DEFAULT_DATE_FORMAT), "1969.12.31 23:59:59");
        assert_eq!(utc(i64::MAX, DEFAULT_DATE_FORMAT),
                   format!("invalid timestamp {}", i64::MAX));
        assert_eq!(utc(i64::MIN, "YYYY"), format!("invalid timestamp {}", i64::MIN));
        // far future, but representable
        assert_eq!(utc(253402300800, "YYYY"), "10000");
    }
}
