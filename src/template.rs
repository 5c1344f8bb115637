// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Date-format templates.
//!
//! Templates use single-letter tokens (`Y-m-d H:i:s.u`, `U.u`, ...). A
//! backslash escapes the next character, so `\T` and `\Z` are literal text.
//!
//! Rendering scans the template once. The microsecond token `u` and the
//! millisecond token `v` are filled in from the sub-second fraction held by
//! the caller; every other token is translated to a chrono format item and
//! rendered by chrono. Because substitution only happens on unescaped token
//! boundaries, an escaped `\u` stays a literal `u`.
//!
//! Parsing translates the same token set to chrono parse items. A `u` after a
//! literal dot reads one to six fraction digits (`.5` is half a second), and
//! `S` skips an English ordinal suffix after the day.

use crate::calendar::{days_in_month, is_leap_year};
use crate::error::{DtmsError, Result};
use chrono::{DateTime, Datelike, Offset, TimeDelta, Timelike, Utc};
use chrono_tz::{OffsetComponents, Tz};
use regex::Regex;
use std::borrow::Cow;
use std::fmt::Write;
use std::sync::LazyLock;

static ORDINAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9])(?:st|nd|rd|th)\b").expect("ordinal suffix pattern is valid")
});

// ═══════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════

/// Render `instant` (whole seconds) plus `microseconds` with `template`.
pub(crate) fn render(instant: &DateTime<Tz>, microseconds: u32, template: &str) -> String {
    let mut spec = String::with_capacity(template.len() * 2);
    let mut chars = template.chars();

    while let Some(token) = chars.next() {
        match token {
            '\\' => push_literal(&mut spec, chars.next().unwrap_or('\\')),
            // Day
            'd' => spec.push_str("%d"),
            'D' => spec.push_str("%a"),
            'j' => spec.push_str("%-d"),
            'l' => spec.push_str("%A"),
            'N' => spec.push_str("%u"),
            'S' => spec.push_str(ordinal_suffix(instant.day())),
            'w' => spec.push_str("%w"),
            'z' => push_number(&mut spec, instant.ordinal0()),
            // Week / month / year
            'W' => spec.push_str("%V"),
            'F' => spec.push_str("%B"),
            'm' => spec.push_str("%m"),
            'M' => spec.push_str("%b"),
            'n' => spec.push_str("%-m"),
            't' => push_number(&mut spec, days_in_month(instant.year(), instant.month())),
            'L' => spec.push(if is_leap_year(instant.year()) { '1' } else { '0' }),
            'o' => spec.push_str("%G"),
            'Y' => spec.push_str("%Y"),
            'y' => spec.push_str("%y"),
            // Time
            'a' => spec.push_str("%P"),
            'A' => spec.push_str("%p"),
            'B' => {
                let _ = write!(spec, "{:03}", swatch_beat(instant));
            }
            'g' => spec.push_str("%-I"),
            'G' => spec.push_str("%-H"),
            'h' => spec.push_str("%I"),
            'H' => spec.push_str("%H"),
            'i' => spec.push_str("%M"),
            's' => spec.push_str("%S"),
            'u' => {
                let _ = write!(spec, "{microseconds:06}");
            }
            'v' => {
                let _ = write!(spec, "{:03}", microseconds / 1_000);
            }
            // Timezone
            'e' => instant.timezone().name().chars().for_each(|c| push_literal(&mut spec, c)),
            'I' => spec.push(if instant.offset().dst_offset() != TimeDelta::zero() {
                '1'
            } else {
                '0'
            }),
            'O' => spec.push_str("%z"),
            'P' => spec.push_str("%:z"),
            'p' if instant.offset().fix().local_minus_utc() == 0 => spec.push('Z'),
            'p' => spec.push_str("%:z"),
            'T' => spec.push_str("%Z"),
            'Z' => {
                let _ = write!(spec, "{}", instant.offset().fix().local_minus_utc());
            }
            // Full date/time
            'c' => spec.push_str("%Y-%m-%dT%H:%M:%S%:z"),
            'r' => spec.push_str("%a, %d %b %Y %H:%M:%S %z"),
            'U' => spec.push_str("%s"),
            other => push_literal(&mut spec, other),
        }
    }

    instant.format(&spec).to_string()
}

#[inline]
fn push_literal(spec: &mut String, c: char) {
    if c == '%' {
        spec.push_str("%%");
    } else {
        spec.push(c);
    }
}

#[inline]
fn push_number(spec: &mut String, value: u32) {
    let _ = write!(spec, "{value}");
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Swatch Internet Time (beats of 86.4 s since midnight UTC+1).
fn swatch_beat(instant: &DateTime<Tz>) -> u32 {
    let utc = instant.with_timezone(&Utc);
    let seconds = (utc.num_seconds_from_midnight() + 3_600) % 86_400;
    seconds * 10 / 864
}

// ═══════════════════════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════════════════════

/// A template translated to chrono parse items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseSpec {
    /// chrono `strftime`-style pattern.
    pub pattern: String,
    /// The template carries a UTC offset (`O`, `P`).
    pub has_offset: bool,
    /// The template carries an epoch timestamp (`U`).
    pub has_timestamp: bool,
    /// The template carries at least an hour.
    pub has_time: bool,
    /// The template skips ordinal suffixes (`S`).
    pub strip_ordinals: bool,
}

impl ParseSpec {
    /// The input as chrono should see it.
    pub fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.strip_ordinals {
            ORDINAL_SUFFIX.replace_all(text, "$1")
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// Translate a parse template into chrono items.
///
/// Tokens that only make sense when rendering (`N`, `z`, `t`, `e`, ...) are
/// rejected with [`DtmsError::InvalidArgument`].
pub(crate) fn parse_spec(template: &str) -> Result<ParseSpec> {
    let mut spec = ParseSpec {
        pattern: String::with_capacity(template.len() * 2),
        has_offset: false,
        has_timestamp: false,
        has_time: false,
        strip_ordinals: false,
    };
    let mut chars = template.chars();

    while let Some(token) = chars.next() {
        let item = match token {
            '\\' => {
                push_literal(&mut spec.pattern, chars.next().unwrap_or('\\'));
                continue;
            }
            'd' | 'j' => "%d",
            'D' => "%a",
            'l' => "%A",
            'm' | 'n' => "%m",
            'M' => "%b",
            'F' => "%B",
            'Y' => "%Y",
            'y' => "%y",
            'H' | 'G' => {
                spec.has_time = true;
                "%H"
            }
            'h' | 'g' => {
                spec.has_time = true;
                "%I"
            }
            'a' | 'A' => "%p",
            'i' => "%M",
            's' => "%S",
            'u' => {
                if spec.pattern.ends_with('.') {
                    spec.pattern.pop();
                    "%.f"
                } else {
                    "%6f"
                }
            }
            'v' => "%3f",
            'S' => {
                spec.strip_ordinals = true;
                continue;
            }
            'O' => {
                spec.has_offset = true;
                "%z"
            }
            'P' => {
                spec.has_offset = true;
                "%:z"
            }
            'U' => {
                spec.has_timestamp = true;
                "%s"
            }
            'N' | 'w' | 'z' | 'W' | 't' | 'L' | 'o' | 'B' | 'e' | 'I' | 'p' | 'T' | 'Z'
            | 'c' | 'r' => {
                return Err(DtmsError::InvalidArgument(format!(
                    "format token `{token}` cannot be used for parsing"
                )));
            }
            other => {
                push_literal(&mut spec.pattern, other);
                continue;
            }
        };
        spec.pattern.push_str(item);
    }

    Ok(spec)
}
