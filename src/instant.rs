// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Microsecond-aware calendar instant.
//!
//! [`Instant`] owns a whole-second `chrono::DateTime<Tz>` (the *base*) plus a
//! microsecond fraction. The base never carries sub-second data; everything
//! below one second lives in the fraction, which the carry/borrow operations
//! keep inside `0..1_000_000`.
//!
//! Arithmetic lives in sibling modules, each adding an inherent `impl` block:
//!
//! - `carry`: [`Instant::add_microseconds`] / [`Instant::sub_microseconds`]
//! - `arithmetic`: [`Instant::add`], [`Instant::subtract`], [`Instant::modify`]
//! - `diff`: [`Instant::diff`]

use crate::error::{DtmsError, Result};
use crate::interval::MICROS_PER_SECOND;
use crate::settings::Settings;
use crate::template;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use qtty::Seconds;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Text forms accepted by [`FromStr`], tried in order and read in UTC.
const ACCEPTED_FORMATS: [&str; 7] = [
    Instant::ISO8601,
    "Y-m-d H:i:s.u",
    "Y-m-d\\TH:i:s.u",
    "Y-m-d H:i:s",
    "Y-m-d\\TH:i:s\\Z",
    "Y-m-d\\TH:i:s",
    "Y-m-d",
];

/// A calendar instant with microsecond precision.
///
/// # Examples
///
/// ```
/// use dtms::Instant;
///
/// let mut instant: Instant = "2015-08-08 10:10:10.123456".parse().unwrap();
/// instant.modify("+10 min +10 seconds +123456 micro").unwrap();
/// assert_eq!(instant.format("U.u"), "1439029220.246912");
/// assert_eq!(instant.to_string(), "2015-08-08T10:20:20.246912Z");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    pub(crate) base: DateTime<Tz>,
    pub(crate) microseconds: u32,
}

impl Instant {
    /// Canonical template: `YYYY-MM-DDTHH:MM:SS.uuuuuuZ`.
    pub const ISO8601: &'static str = "Y-m-d\\TH:i:s.u\\Z";

    // ── constructors ──────────────────────────────────────────────────

    /// Current wall-clock time in UTC, with the clock's microseconds.
    pub fn now() -> Self {
        Self::now_with(&Settings::default())
    }

    /// Current wall-clock time in the zone configured by `settings`.
    pub fn now_with(settings: &Settings) -> Self {
        Self::now_in(settings.timezone())
    }

    /// Current wall-clock time in `tz`.
    pub fn now_in(tz: Tz) -> Self {
        Self::from_datetime(Utc::now().with_timezone(&tz))
    }

    /// Split a chrono value into a whole-second base and a microsecond
    /// fraction. Nanoseconds below one microsecond are truncated.
    pub fn from_datetime(datetime: DateTime<Tz>) -> Self {
        let nanos = datetime.nanosecond();
        let base = datetime
            .with_nanosecond(0)
            .unwrap_or_else(|| datetime - TimeDelta::nanoseconds(i64::from(nanos)));
        // Leap-second representations carry nanos above one second.
        let microseconds = (nanos / 1_000).min(MICROS_PER_SECOND - 1);
        Self { base, microseconds }
    }

    /// Parse `text` with a date-format `format` template.
    ///
    /// When `tz` is `None` the zone of [`Settings::default`] (UTC) is used.
    /// Templates carrying an offset (`O`, `P`) or an epoch (`U`) denote an
    /// absolute instant that is then converted to the zone; otherwise the wall
    /// time is read in the zone. A template without time fields yields
    /// midnight.
    ///
    /// ```
    /// use dtms::Instant;
    ///
    /// let a = Instant::parse("2015-08-08T10:10:10.123456Z", Instant::ISO8601, None).unwrap();
    /// let b = Instant::parse("08/08/2015 10:10:10.123456", "d/m/Y H:i:s.u", None).unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn parse(text: &str, format: &str, tz: Option<Tz>) -> Result<Self> {
        let settings = tz.map_or_else(Settings::default, Settings::new);
        Self::parse_with(text, format, &settings)
    }

    /// [`Instant::parse`] with the zone taken from `settings`.
    pub fn parse_with(text: &str, format: &str, settings: &Settings) -> Result<Self> {
        let tz = settings.timezone();
        let spec = template::parse_spec(format)?;
        let input = spec.prepare(text);
        let parse_error = |source| DtmsError::Parse {
            input: text.to_string(),
            format: format.to_string(),
            source,
        };

        let datetime = if spec.has_offset {
            DateTime::parse_from_str(&input, &spec.pattern)
                .map_err(parse_error)?
                .with_timezone(&tz)
        } else if spec.has_timestamp {
            let utc = NaiveDateTime::parse_from_str(&input, &spec.pattern).map_err(parse_error)?;
            Utc.from_utc_datetime(&utc).with_timezone(&tz)
        } else {
            let local = if spec.has_time {
                NaiveDateTime::parse_from_str(&input, &spec.pattern).map_err(parse_error)?
            } else {
                NaiveDate::parse_from_str(&input, &spec.pattern)
                    .map_err(parse_error)?
                    .and_time(chrono::NaiveTime::MIN)
            };
            tz.from_local_datetime(&local)
                .earliest()
                .ok_or_else(|| {
                    DtmsError::InvalidArgument(format!(
                        "`{text}` does not exist in timezone {}",
                        tz.name()
                    ))
                })?
        };

        Ok(Self::from_datetime(datetime))
    }

    // ── microsecond store ─────────────────────────────────────────────

    /// Raw microsecond fraction.
    #[inline]
    pub const fn microseconds(&self) -> u32 {
        self.microseconds
    }

    /// Microsecond fraction expressed in seconds, rounded to 6 decimals.
    pub fn fraction(&self) -> Seconds {
        Seconds::new(round6(f64::from(self.microseconds) / 1e6))
    }

    /// Store `microseconds` as is.
    ///
    /// No range check is made: a value of one million or more is kept until
    /// the next carry/borrow operation folds it into whole seconds.
    #[inline]
    pub fn set_microseconds(&mut self, microseconds: u32) {
        self.microseconds = microseconds;
    }

    /// Store a microsecond count given as decimal text (`"000123"` is 123).
    /// A fractional part is truncated.
    pub fn set_microseconds_str(&mut self, microseconds: &str) -> Result<()> {
        let trimmed = microseconds.trim();
        let integral = trimmed.split_once('.').map_or(trimmed, |(int, _)| int);
        let value = integral.parse::<u32>().map_err(|_| {
            DtmsError::InvalidArgument(format!("`{microseconds}` is not a microsecond count"))
        })?;
        self.set_microseconds(value);
        Ok(())
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// Whole-second base instant.
    #[inline]
    pub fn datetime(&self) -> &DateTime<Tz> {
        &self.base
    }

    /// Base instant plus the microsecond fraction as a single chrono value.
    pub fn to_datetime(&self) -> DateTime<Tz> {
        self.base + TimeDelta::microseconds(i64::from(self.microseconds))
    }

    #[inline]
    pub fn timezone(&self) -> Tz {
        self.base.timezone()
    }

    /// The same instant viewed in another zone.
    #[must_use]
    pub fn with_timezone(&self, tz: Tz) -> Self {
        Self {
            base: self.base.with_timezone(&tz),
            microseconds: self.microseconds,
        }
    }

    /// Whole seconds since the Unix epoch.
    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.base.timestamp()
    }

    /// Microseconds since the Unix epoch.
    pub fn timestamp_micros(&self) -> i64 {
        self.timestamp() * i64::from(MICROS_PER_SECOND) + i64::from(self.microseconds)
    }

    /// Seconds since the Unix epoch including the fraction.
    ///
    /// An `f64` holds every microsecond exactly only up to ~2^52 µs
    /// (year 2112); use [`timestamp_micros`](Self::timestamp_micros) for
    /// exact arithmetic.
    pub fn timestamp_with_fraction(&self) -> Seconds {
        Seconds::new(self.timestamp() as f64) + self.fraction()
    }

    // ── rendering ─────────────────────────────────────────────────────

    /// Render with a date-format template; `u` is the 6-digit fraction.
    ///
    /// ```
    /// use dtms::Instant;
    ///
    /// let instant: Instant = "2015-08-08 10:10:10.123456".parse().unwrap();
    /// assert_eq!(instant.format("d.m.Y H:i:s.u"), "08.08.2015 10:10:10.123456");
    /// ```
    pub fn format(&self, template: &str) -> String {
        template::render(&self.base, self.microseconds, template)
    }
}

#[inline]
fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

// ═══════════════════════════════════════════════════════════════════════════
// Trait implementations
// ═══════════════════════════════════════════════════════════════════════════

// ── Display ───────────────────────────────────────────────────────────────

/// Canonical form of the instant converted to UTC.
impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let utc = self.with_timezone(Tz::UTC);
        f.write_str(&utc.format(Self::ISO8601))
    }
}

impl FromStr for Instant {
    type Err = DtmsError;

    /// Accepts the canonical form and the common `Y-m-d H:i:s[.u]` variants,
    /// read in UTC.
    fn from_str(s: &str) -> Result<Self> {
        ACCEPTED_FORMATS
            .iter()
            .find_map(|format| Self::parse(s, format, Some(Tz::UTC)).ok())
            .ok_or_else(|| DtmsError::InvalidArgument(format!("`{s}` is not a recognized timestamp")))
    }
}

// ── From chrono ───────────────────────────────────────────────────────────

impl From<DateTime<Tz>> for Instant {
    #[inline]
    fn from(datetime: DateTime<Tz>) -> Self {
        Self::from_datetime(datetime)
    }
}

impl From<DateTime<Utc>> for Instant {
    #[inline]
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_datetime(datetime.with_timezone(&Tz::UTC))
    }
}

impl From<Instant> for DateTime<Tz> {
    #[inline]
    fn from(instant: Instant) -> Self {
        instant.to_datetime()
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for Instant {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::parse(&text, Self::ISO8601, Some(Tz::UTC)).map_err(serde::de::Error::custom)
    }
}
