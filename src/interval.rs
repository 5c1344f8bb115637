// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Signed calendar intervals with a microsecond component.
//!
//! An [`Interval`] holds non-negative calendar components plus an `invert`
//! flag marking backward-in-time motion. It is produced by
//! [`Instant::diff`](crate::Instant::diff) or parsed from an ISO-8601 duration
//! whose seconds field may carry up to six decimals:
//!
//! ```
//! use dtms::Interval;
//!
//! let interval: Interval = "-P1DT2H3.250000S".parse().unwrap();
//! assert!(interval.is_inverted());
//! assert_eq!(interval.days(), 1);
//! assert_eq!(interval.microseconds(), 250_000);
//! assert_eq!(interval.to_string(), "-P1DT2H3.250000S");
//! ```

use crate::calendar::{CalendarDiff, CalendarOffset};
use crate::error::{DtmsError, Result};
use regex::Regex;
use std::fmt::{self, Write};
use std::str::FromStr;
use std::sync::LazyLock;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub(crate) const MICROS_PER_SECOND: u32 = 1_000_000;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(-)?P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.(\d{1,6}))?S)?)?$",
    )
    .expect("ISO-8601 duration pattern is valid")
});

/// A signed duration made of calendar components and microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Interval {
    years: u32,
    months: u32,
    days: u32,
    hours: u32,
    minutes: u32,
    seconds: u32,
    microseconds: u32,
    invert: bool,
    total_days: Option<u32>,
}

impl Interval {
    /// The empty interval, `PT0S`.
    pub const ZERO: Self = Self::new(0, 0, 0, 0, 0, 0);

    /// Build a forward interval from whole calendar components.
    pub const fn new(
        years: u32,
        months: u32,
        days: u32,
        hours: u32,
        minutes: u32,
        seconds: u32,
    ) -> Self {
        Self {
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
            microseconds: 0,
            invert: false,
            total_days: None,
        }
    }

    /// Set the sub-second part. Fails unless `microseconds < 1_000_000`.
    pub fn with_microseconds(mut self, microseconds: u32) -> Result<Self> {
        if microseconds >= MICROS_PER_SECOND {
            return Err(DtmsError::InvalidArgument(format!(
                "interval microseconds must be below {MICROS_PER_SECOND}, got {microseconds}"
            )));
        }
        self.microseconds = microseconds;
        Ok(self)
    }

    /// The same interval pointing the other way in time.
    #[must_use]
    pub const fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }

    /// The unsigned magnitude of this interval.
    #[must_use]
    pub const fn abs(mut self) -> Self {
        self.invert = false;
        self
    }

    /// Clear the invert flag in place.
    pub fn make_absolute(&mut self) {
        self.invert = false;
    }

    /// Parse an ISO-8601 duration (`[-]PnYnMnWnDTnHnMn[.ffffff]S`).
    ///
    /// Weeks are folded into days. A leading `-` sets the invert flag.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || DtmsError::InvalidInterval(text.to_string());
        let caps = ISO_DURATION.captures(text).ok_or_else(invalid)?;
        if text.trim_start_matches('-') == "P" || text.ends_with('T') {
            return Err(invalid());
        }

        let field = |index: usize| -> Result<u32> {
            caps.get(index)
                .map_or(Ok(0), |m| m.as_str().parse::<u32>().map_err(|_| invalid()))
        };
        let (weeks, plain_days) = (field(3)?, field(4)?);
        let days = weeks
            .checked_mul(7)
            .and_then(|w| w.checked_add(plain_days))
            .ok_or_else(invalid)?;
        let microseconds = match caps.get(9) {
            Some(fraction) => {
                let digits = fraction.as_str();
                let padded = format!("{digits:0<6}");
                padded.parse::<u32>().map_err(|_| invalid())?
            }
            None => 0,
        };

        Ok(Self {
            years: field(1)?,
            months: field(2)?,
            days,
            hours: field(5)?,
            minutes: field(6)?,
            seconds: field(7)?,
            microseconds,
            invert: caps.get(1).is_some(),
            total_days: None,
        })
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn years(&self) -> u32 {
        self.years
    }

    #[inline]
    pub const fn months(&self) -> u32 {
        self.months
    }

    #[inline]
    pub const fn days(&self) -> u32 {
        self.days
    }

    #[inline]
    pub const fn hours(&self) -> u32 {
        self.hours
    }

    #[inline]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    #[inline]
    pub const fn seconds(&self) -> u32 {
        self.seconds
    }

    #[inline]
    pub const fn microseconds(&self) -> u32 {
        self.microseconds
    }

    /// `true` when the interval represents backward motion in time.
    #[inline]
    pub const fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Whole days spanned, known only for intervals produced by `diff`.
    #[inline]
    pub const fn total_days(&self) -> Option<u32> {
        self.total_days
    }

    /// `true` when every component, including microseconds, is zero.
    pub const fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0
            && self.microseconds == 0
    }

    // ── rendering ─────────────────────────────────────────────────────

    /// Render with `%`-directives.
    ///
    /// | Directive | Meaning |
    /// |-----------|---------|
    /// | `%y` `%Y` | years (`%Y` at least 2 digits) |
    /// | `%m` `%M` | months |
    /// | `%d` `%D` | days |
    /// | `%a` | total days, or `(unknown)` |
    /// | `%h` `%H` | hours |
    /// | `%i` `%I` | minutes |
    /// | `%s` `%S` | seconds, with `.uuuuuu` appended when non-zero |
    /// | `%f` `%F` | microseconds (`%F` 6 digits) |
    /// | `%R` | `+` or `-` |
    /// | `%r` | `-` when inverted, empty otherwise |
    /// | `%%` | literal `%` |
    ///
    /// ```
    /// use dtms::Interval;
    ///
    /// let interval: Interval = "-PT4.469135S".parse().unwrap();
    /// assert_eq!(interval.format("%RPT%sS"), "-PT4.469135S");
    /// ```
    pub fn format(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len() + 16);
        let mut chars = template.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            let Some(directive) = chars.next() else {
                out.push('%');
                break;
            };
            let _ = match directive {
                'y' => write!(out, "{}", self.years),
                'Y' => write!(out, "{:02}", self.years),
                'm' => write!(out, "{}", self.months),
                'M' => write!(out, "{:02}", self.months),
                'd' => write!(out, "{}", self.days),
                'D' => write!(out, "{:02}", self.days),
                'a' => match self.total_days {
                    Some(total) => write!(out, "{total}"),
                    None => out.write_str("(unknown)"),
                },
                'h' => write!(out, "{}", self.hours),
                'H' => write!(out, "{:02}", self.hours),
                'i' => write!(out, "{}", self.minutes),
                'I' => write!(out, "{:02}", self.minutes),
                's' => write!(out, "{}", self.seconds).and_then(|_| self.write_fraction(&mut out)),
                'S' => {
                    write!(out, "{:02}", self.seconds).and_then(|_| self.write_fraction(&mut out))
                }
                'f' => write!(out, "{}", self.microseconds),
                'F' => write!(out, "{:06}", self.microseconds),
                'R' => out.write_char(if self.invert { '-' } else { '+' }),
                'r' if self.invert => out.write_char('-'),
                'r' => Ok(()),
                '%' => out.write_char('%'),
                other => write!(out, "%{other}"),
            };
        }

        out
    }

    fn write_fraction(&self, out: &mut String) -> fmt::Result {
        if self.microseconds > 0 {
            write!(out, ".{:06}", self.microseconds)
        } else {
            Ok(())
        }
    }

    // ── crate internals ───────────────────────────────────────────────

    /// Assemble the result of a difference computation.
    pub(crate) fn from_difference(diff: &CalendarDiff, microseconds: u32, invert: bool) -> Self {
        Self {
            years: diff.years,
            months: diff.months,
            days: diff.days,
            hours: diff.hours,
            minutes: diff.minutes,
            seconds: diff.seconds,
            microseconds,
            invert,
            total_days: Some(diff.total_days),
        }
    }

    /// Whole-unit part as an unsigned base-engine offset.
    pub(crate) fn calendar_offset(&self) -> CalendarOffset {
        CalendarOffset {
            years: i64::from(self.years),
            months: i64::from(self.months),
            days: i64::from(self.days),
            hours: i64::from(self.hours),
            minutes: i64::from(self.minutes),
            seconds: i64::from(self.seconds),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invert {
            f.write_char('-')?;
        }
        f.write_char('P')?;
        if self.is_zero() {
            return f.write_str("T0S");
        }
        if self.years > 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months > 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours == 0 && self.minutes == 0 && self.seconds == 0 && self.microseconds == 0 {
            return Ok(());
        }
        f.write_char('T')?;
        if self.hours > 0 {
            write!(f, "{}H", self.hours)?;
        }
        if self.minutes > 0 {
            write!(f, "{}M", self.minutes)?;
        }
        if self.microseconds > 0 {
            write!(f, "{}.{:06}S", self.seconds, self.microseconds)
        } else if self.seconds > 0 {
            write!(f, "{}S", self.seconds)
        } else {
            Ok(())
        }
    }
}

impl FromStr for Interval {
    type Err = DtmsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for Interval {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
