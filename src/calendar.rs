// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Whole-second calendar arithmetic on `chrono::DateTime<Tz>`.
//!
//! This is the base calendar engine the microsecond layer delegates to. It
//! knows nothing about sub-second fractions:
//!
//! - [`CalendarOffset`] adds a signed years/months/days/hours/minutes/seconds
//!   offset to an instant.
//! - [`difference`] breaks the distance between two instants down into
//!   calendar components.
//!
//! Calendar units (years, months, days) move the local wall clock; clock units
//! (hours, minutes, seconds) move the absolute instant. Month addition keeps
//! the day of month and rolls any excess into the following month
//! (`2015-01-31 + 1 month = 2015-03-03`).

use crate::error::{DtmsError, Result};
use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta,
    TimeZone,
};
use chrono_tz::Tz;
use std::ops::Neg;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

// ═══════════════════════════════════════════════════════════════════════════
// CalendarOffset
// ═══════════════════════════════════════════════════════════════════════════

/// A signed calendar offset understood by the base engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CalendarOffset {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CalendarOffset {
    pub const ZERO: Self = Self {
        years: 0,
        months: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// An offset of `seconds` whole seconds.
    #[inline]
    pub const fn seconds(seconds: i64) -> Self {
        Self {
            seconds,
            ..Self::ZERO
        }
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0
    }

    /// Component-wise sum, `None` on `i64` overflow.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        Some(Self {
            years: self.years.checked_add(other.years)?,
            months: self.months.checked_add(other.months)?,
            days: self.days.checked_add(other.days)?,
            hours: self.hours.checked_add(other.hours)?,
            minutes: self.minutes.checked_add(other.minutes)?,
            seconds: self.seconds.checked_add(other.seconds)?,
        })
    }

    /// Apply the offset to `instant`, returning the shifted instant.
    ///
    /// The input is left untouched; an offset that leaves chrono's range
    /// yields [`DtmsError::OutOfRange`].
    pub fn apply(&self, instant: &DateTime<Tz>) -> Result<DateTime<Tz>> {
        let months = self
            .years
            .checked_mul(12)
            .and_then(|m| m.checked_add(self.months))
            .ok_or(DtmsError::OutOfRange)?;

        let mut shifted = *instant;
        if months != 0 || self.days != 0 {
            let mut local = shift_months(instant.naive_local(), months)?;
            let days = TimeDelta::try_days(self.days).ok_or(DtmsError::OutOfRange)?;
            local = local
                .checked_add_signed(days)
                .ok_or(DtmsError::OutOfRange)?;
            shifted = resolve_local(&instant.timezone(), local, instant.offset().fix())?;
        }

        let clock = self
            .hours
            .checked_mul(SECONDS_PER_HOUR)
            .zip(self.minutes.checked_mul(SECONDS_PER_MINUTE))
            .and_then(|(h, m)| h.checked_add(m))
            .and_then(|hm| hm.checked_add(self.seconds))
            .ok_or(DtmsError::OutOfRange)?;
        if clock == 0 {
            return Ok(shifted);
        }
        let delta = TimeDelta::try_seconds(clock).ok_or(DtmsError::OutOfRange)?;
        shifted
            .checked_add_signed(delta)
            .ok_or(DtmsError::OutOfRange)
    }
}

impl Neg for CalendarOffset {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            years: -self.years,
            months: -self.months,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
        }
    }
}

/// Move `local` by whole months, keeping the day of month. A day past the end
/// of the target month spills into the next one (`Jan 31 + 1 = Mar 3`).
fn shift_months(local: NaiveDateTime, months: i64) -> Result<NaiveDateTime> {
    if months == 0 {
        return Ok(local);
    }
    let index = (i64::from(local.year()) * 12 + i64::from(local.month0()))
        .checked_add(months)
        .ok_or(DtmsError::OutOfRange)?;
    let year = i32::try_from(index.div_euclid(12)).map_err(|_| DtmsError::OutOfRange)?;
    let month = u32::try_from(index.rem_euclid(12) + 1).map_err(|_| DtmsError::OutOfRange)?;

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(local.day0()))))
        .map(|date| date.and_time(local.time()))
        .ok_or(DtmsError::OutOfRange)
}

/// Map a wall-clock time back onto `tz`.
///
/// Ambiguous times pick the earlier instant; times inside a gap keep the
/// offset the instant had before the shift.
fn resolve_local(
    tz: &Tz,
    local: NaiveDateTime,
    previous: chrono::FixedOffset,
) -> Result<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(resolved) => Ok(resolved),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => {
            let shift = TimeDelta::try_seconds(i64::from(previous.local_minus_utc()))
                .ok_or(DtmsError::OutOfRange)?;
            let utc = local
                .checked_sub_signed(shift)
                .ok_or(DtmsError::OutOfRange)?;
            Ok(tz.from_utc_datetime(&utc))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Whole-second difference
// ═══════════════════════════════════════════════════════════════════════════

/// Calendar breakdown of the distance between two whole-second instants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarDiff {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Whole days between the two instants.
    pub total_days: u32,
    /// `true` when `to` lies before `from`.
    pub invert: bool,
}

/// Break `to - from` down into calendar components.
///
/// Both instants are read as wall-clock time in `from`'s zone. Whole months
/// are counted forward from the earlier instant with the same spill-over rule
/// as [`CalendarOffset::apply`]; the remainder is split into days, hours,
/// minutes and seconds.
pub fn difference(from: &DateTime<Tz>, to: &DateTime<Tz>) -> CalendarDiff {
    let zone = from.timezone();
    let a = from.naive_local();
    let b = to.with_timezone(&zone).naive_local();

    let invert = b < a;
    let (earlier, later) = if invert { (b, a) } else { (a, b) };

    let span = (later.year() - earlier.year()) * 12 + later.month() as i32
        - earlier.month() as i32;
    let mut months = u32::try_from(span).unwrap_or(0);
    let anchor = loop {
        match shift_months(earlier, i64::from(months)).ok() {
            Some(candidate) if candidate <= later => break candidate,
            _ if months == 0 => break earlier,
            _ => months -= 1,
        }
    };

    let rest = (later - anchor).num_seconds();
    let total_days = (later - earlier).num_days();

    CalendarDiff {
        years: months / 12,
        months: months % 12,
        days: clamp_u32(rest / SECONDS_PER_DAY),
        hours: clamp_u32(rest % SECONDS_PER_DAY / SECONDS_PER_HOUR),
        minutes: clamp_u32(rest % SECONDS_PER_HOUR / SECONDS_PER_MINUTE),
        seconds: clamp_u32(rest % SECONDS_PER_MINUTE),
        total_days: clamp_u32(total_days),
        invert,
    }
}

#[inline]
fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

// ═══════════════════════════════════════════════════════════════════════════
// Month helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Number of days in `month` (1-based) of `year`.
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

pub(crate) fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}
