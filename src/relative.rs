// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Relative-offset strings (`"+10 min +10 seconds +123456 micro"`).
//!
//! A string splits into two parts:
//!
//! 1. An optional trailing microsecond clause, `(+|-)N[ ](microseconds|microsecond|micro|mic)`,
//!    matched case-sensitively at the very end of the string.
//! 2. Everything else, handed to the calendar clause parser. A blank remainder
//!    becomes the neutral `"0 seconds"`.
//!
//! Calendar clauses are `[+|-]N unit`, `next|last|previous|this unit`, the
//! no-op `now`, and `ago`, which negates every clause before it. Units are
//! case-insensitive and may be plural: `sec`, `second`, `min`, `minute`,
//! `hour`, `day`, `week`, `fortnight`, `month`, `year`.

use crate::calendar::CalendarOffset;
use crate::error::{DtmsError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Offset string the calendar parser receives when nothing but a microsecond
/// clause was given.
pub(crate) const NEUTRAL_OFFSET: &str = "0 seconds";

static MICROSECOND_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+|-)([0-9]+)\s?(?:microseconds|microsecond|micro|mic)$")
        .expect("microsecond clause pattern is valid")
});

static CALENDAR_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \A\s*
        (?:
            (?P<sign>[+-]?)\s*(?P<amount>[0-9]+)
          | (?P<word>next|last|previous|this)
        )
        \s*
        (?P<unit>seconds?|secs?|minutes?|mins?|hours?|days?|weeks?|fortnights?|months?|years?)
        \b",
    )
    .expect("calendar clause pattern is valid")
});

static KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A\s*(?P<keyword>now|ago)\b").expect("keyword pattern is valid")
});

/// A relative-offset string split into its two parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RelativeOffset {
    /// Signed microsecond amount from the trailing clause, if any.
    pub microseconds: Option<i64>,
    /// Calendar offset parsed from the remainder.
    pub calendar: CalendarOffset,
}

/// Split `text` and parse both parts. Nothing is applied.
pub(crate) fn parse(text: &str) -> Result<RelativeOffset> {
    let (remainder, microseconds) = split_microseconds(text)?;
    let remainder = if remainder.trim().is_empty() {
        NEUTRAL_OFFSET
    } else {
        remainder
    };
    let calendar = parse_calendar(remainder)?;
    log::debug!(
        "relative offset {text:?}: microseconds={microseconds:?}, calendar={calendar:?}"
    );
    Ok(RelativeOffset {
        microseconds,
        calendar,
    })
}

/// Strip the trailing microsecond clause, returning the remainder and the
/// signed amount.
pub(crate) fn split_microseconds(text: &str) -> Result<(&str, Option<i64>)> {
    let Some(caps) = MICROSECOND_CLAUSE.captures(text) else {
        return Ok((text, None));
    };
    let clause = caps.get(0).map_or(text.len()..text.len(), |m| m.range());
    let amount: i64 = caps[2]
        .parse()
        .map_err(|_| DtmsError::InvalidModifier(text.to_string()))?;
    let signed = if &caps[1] == "-" { -amount } else { amount };
    Ok((&text[..clause.start], Some(signed)))
}

/// Parse calendar clauses into a single offset.
pub(crate) fn parse_calendar(text: &str) -> Result<CalendarOffset> {
    let invalid = || DtmsError::InvalidModifier(text.to_string());
    let mut offset = CalendarOffset::ZERO;
    let mut rest = text;
    let mut matched_any = false;

    while !rest.trim().is_empty() {
        if let Some(caps) = KEYWORD.captures(rest) {
            if caps["keyword"].eq_ignore_ascii_case("ago") {
                offset = -offset;
            }
            rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
            matched_any = true;
            continue;
        }

        let caps = CALENDAR_CLAUSE.captures(rest).ok_or_else(invalid)?;
        let amount = match (caps.name("amount"), caps.name("word")) {
            (Some(amount), _) => {
                let value: i64 = amount.as_str().parse().map_err(|_| invalid())?;
                if caps.name("sign").is_some_and(|s| s.as_str() == "-") {
                    -value
                } else {
                    value
                }
            }
            (None, Some(word)) => match word.as_str().to_ascii_lowercase().as_str() {
                "next" => 1,
                "this" => 0,
                _ => -1,
            },
            (None, None) => return Err(invalid()),
        };

        let clause = unit_offset(&caps["unit"], amount).ok_or_else(invalid)?;
        offset = offset.checked_add(&clause).ok_or_else(invalid)?;
        rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
        matched_any = true;
    }

    if matched_any {
        Ok(offset)
    } else {
        Err(invalid())
    }
}

fn unit_offset(unit: &str, amount: i64) -> Option<CalendarOffset> {
    let unit = unit.to_ascii_lowercase();
    let unit = unit.strip_suffix('s').unwrap_or(&unit);
    let zero = CalendarOffset::ZERO;
    let offset = match unit {
        "sec" | "second" => CalendarOffset::seconds(amount),
        "min" | "minute" => CalendarOffset {
            minutes: amount,
            ..zero
        },
        "hour" => CalendarOffset {
            hours: amount,
            ..zero
        },
        "day" => CalendarOffset {
            days: amount,
            ..zero
        },
        "week" => CalendarOffset {
            days: amount.checked_mul(7)?,
            ..zero
        },
        "fortnight" => CalendarOffset {
            days: amount.checked_mul(14)?,
            ..zero
        },
        "month" => CalendarOffset {
            months: amount,
            ..zero
        },
        "year" => CalendarOffset {
            years: amount,
            ..zero
        },
        _ => return None,
    };
    Some(offset)
}
