// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Microsecond-accurate difference between two instants.
//!
//! The sign and the microsecond component are settled in fixed-point epoch
//! microseconds. When the fractional part has to borrow a whole second, the
//! second operand is nudged by one second toward the first so that the
//! whole-second breakdown from the base engine and the fraction agree.

use crate::calendar::{self, CalendarOffset};
use crate::error::{DtmsError, Result};
use crate::instant::Instant;
use crate::interval::{Interval, MICROS_PER_SECOND};
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use std::ops::Sub;

const MICROS: i64 = MICROS_PER_SECOND as i64;

// ═══════════════════════════════════════════════════════════════════════════
// Operand trait
// ═══════════════════════════════════════════════════════════════════════════

/// Anything [`Instant::diff`] accepts as its second operand.
pub trait ToInstant {
    /// Convert to a microsecond-aware instant.
    fn to_instant(&self) -> Result<Instant>;
}

impl ToInstant for Instant {
    #[inline]
    fn to_instant(&self) -> Result<Instant> {
        Ok(self.clone())
    }
}

/// Sub-microsecond precision is truncated.
impl<Z: TimeZone> ToInstant for DateTime<Z> {
    #[inline]
    fn to_instant(&self) -> Result<Instant> {
        Ok(Instant::from_datetime(self.with_timezone(&Tz::UTC)))
    }
}

/// Text in one of the forms accepted by `Instant`'s `FromStr`.
impl ToInstant for str {
    fn to_instant(&self) -> Result<Instant> {
        self.parse().map_err(|_| {
            DtmsError::InvalidArgument(format!(
                "`{self}` is not an instant; expected an Instant, a chrono DateTime or a timestamp string"
            ))
        })
    }
}

impl ToInstant for String {
    #[inline]
    fn to_instant(&self) -> Result<Instant> {
        self.as_str().to_instant()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Difference
// ═══════════════════════════════════════════════════════════════════════════

impl Instant {
    /// Interval from `self` to `other`.
    ///
    /// The result is inverted when `self` lies after `other`, unless
    /// `absolute` is set, in which case both directions yield the same
    /// non-inverted interval.
    ///
    /// ```
    /// use dtms::Instant;
    ///
    /// let a: Instant = "2015-08-08 10:10:10.123456".parse().unwrap();
    /// let b: Instant = "2015-08-08 10:10:05.654321".parse().unwrap();
    /// assert_eq!(a.diff(&b, false).unwrap().format("%RPT%sS"), "-PT4.469135S");
    /// assert_eq!(b.diff(&a, false).unwrap().format("%RPT%sS"), "+PT4.469135S");
    /// ```
    pub fn diff<T>(&self, other: &T, absolute: bool) -> Result<Interval>
    where
        T: ToInstant + ?Sized,
    {
        let mut first = self.clone();
        first.add_microseconds(0)?;
        let mut second = other.to_instant()?;
        second.add_microseconds(0)?;

        let negative = first.timestamp_micros() > second.timestamp_micros();
        let (u1, u2) = (
            i64::from(first.microseconds),
            i64::from(second.microseconds),
        );
        let (borrow, fraction) = if negative {
            (u2 > u1, u1 - u2)
        } else {
            (u2 < u1, u2 - u1)
        };
        let fraction = if fraction < 0 {
            fraction + MICROS
        } else {
            fraction
        };

        let end = if borrow {
            let nudge = if negative { 1 } else { -1 };
            CalendarOffset::seconds(nudge).apply(&second.base)?
        } else {
            second.base
        };
        let breakdown = calendar::difference(&first.base, &end);

        log::debug!(
            "diff {first} -> {second}: negative={negative}, borrow={borrow}, fraction={fraction}us"
        );

        let microseconds = u32::try_from(fraction).map_err(|_| DtmsError::OutOfRange)?;
        Ok(Interval::from_difference(
            &breakdown,
            microseconds,
            negative && !absolute,
        ))
    }
}

/// `a - b` is the interval that takes `b` to `a`.
impl Sub for &Instant {
    type Output = Result<Interval>;

    fn sub(self, rhs: Self) -> Self::Output {
        rhs.diff(self, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    fn at(text: &str) -> Instant {
        text.parse().unwrap()
    }

    fn both(first: &str, second: &str, template: &str) -> (String, String) {
        let (a, b) = (at(first), at(second));
        (
            a.diff(&b, false).unwrap().format(template),
            b.diff(&a, false).unwrap().format(template),
        )
    }

    #[test]
    fn diff_borrows_fraction_backward() {
        assert_eq!(
            both(
                "2015-08-08 10:10:10.123456",
                "2015-08-08 10:10:05.654321",
                "%RPT%sS"
            ),
            ("-PT4.469135S".into(), "+PT4.469135S".into())
        );
    }

    #[test]
    fn diff_without_borrow() {
        assert_eq!(
            both(
                "2015-08-08 10:10:10.123456",
                "2015-08-08 10:10:15.654321",
                "%RPT%sS"
            ),
            ("+PT5.530865S".into(), "-PT5.530865S".into())
        );
    }

    #[test]
    fn diff_single_microsecond() {
        assert_eq!(
            both(
                "2015-08-08 10:10:10.123456",
                "2015-08-08 10:10:10.123455",
                "%RPT%sS"
            ),
            ("-PT0.000001S".into(), "+PT0.000001S".into())
        );
    }

    #[test]
    fn diff_of_equal_instants_is_zero() {
        let a = at("2015-08-08 10:10:10.123456");
        let interval = a.diff(&a, false).unwrap();
        assert!(interval.is_zero());
        assert!(!interval.is_inverted());
        assert_eq!(interval.format("%RPT%sS"), "+PT0S");
    }

    #[test]
    fn diff_absolute_ignores_direction() {
        let (a, b) = (at("2015-08-08 10:10:10.123456"), at("2015-08-08 10:10:11.654321"));
        let forward = a.diff(&b, true).unwrap();
        let backward = b.diff(&a, true).unwrap();
        assert_eq!(forward.format("%RPT%sS"), "+PT1.530865S");
        assert_eq!(forward, backward);
    }

    #[test]
    fn diff_spans_months() {
        assert_eq!(
            both(
                "2005-10-10 23:59:01.555554",
                "2005-12-30 23:59:01.555555",
                "%RP%mM%dDT%sS"
            ),
            ("+P2M20DT0.000001S".into(), "-P2M20DT0.000001S".into())
        );
        let interval = at("2015-08-08 10:10:10.123456")
            .diff("2015-12-12 10:10:10.123456", false)
            .unwrap();
        assert_eq!(interval.total_days(), Some(126));
    }

    #[test]
    fn diff_accepts_chrono_operands() {
        let a = at("2015-08-08 10:10:10.123456");
        let b = Utc.with_ymd_and_hms(2015, 8, 8, 10, 10, 5).unwrap();
        assert_eq!(a.diff(&b, false).unwrap().format("%RPT%sS"), "-PT5.123456S");

        let c = Utc
            .with_ymd_and_hms(2015, 8, 8, 10, 10, 15)
            .unwrap()
            .with_nanosecond(500_000_999)
            .unwrap();
        assert_eq!(a.diff(&c, false).unwrap().format("%RPT%sS"), "+PT5.376544S");
    }

    #[test]
    fn diff_reads_operands_across_zones() {
        let a = at("2015-08-08 10:10:10.000000");
        let b = at("2015-08-08 10:10:11.500000").with_timezone(chrono_tz::Asia::Tokyo);
        assert_eq!(a.diff(&b, false).unwrap().format("%RPT%sS"), "+PT1.500000S");
    }

    #[test]
    fn diff_rejects_unrecognized_text() {
        let a = at("2015-08-08 10:10:10.123456");
        assert!(matches!(
            a.diff("next tuesday-ish", false),
            Err(DtmsError::InvalidArgument(_))
        ));
        assert!(a.diff(&String::from("2015-08-08"), false).is_ok());
    }

    #[test]
    fn diff_normalizes_out_of_range_store() {
        let mut a = at("2015-08-08 10:10:10.000000");
        a.set_microseconds(1_250_000);
        let b = at("2015-08-08 10:10:12.000000");
        assert_eq!(a.diff(&b, false).unwrap().format("%RPT%sS"), "+PT0.750000S");
    }

    #[test]
    fn sub_operator_measures_from_rhs() {
        let later = at("2015-08-08 10:10:10.123456");
        let earlier = at("2015-08-08 10:10:05.654321");
        let interval = (&later - &earlier).unwrap();
        assert_eq!(interval.format("%RPT%sS"), "+PT4.469135S");
    }
}
