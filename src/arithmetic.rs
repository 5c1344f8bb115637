// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Interval arithmetic and relative-offset modification.
//!
//! Every operation computes on a copy and commits only once the base engine
//! and the carry/borrow step have both succeeded, so a failing call leaves the
//! instant untouched.

use crate::error::Result;
use crate::instant::Instant;
use crate::interval::Interval;
use crate::relative;

impl Instant {
    /// Move by `interval`: forward, or backward when the interval is inverted.
    ///
    /// ```
    /// use dtms::{Instant, Interval};
    ///
    /// let mut instant: Instant = "2015-08-08 10:10:10.123456".parse().unwrap();
    /// instant.add(&"-PT1.999999S".parse::<Interval>().unwrap()).unwrap();
    /// assert_eq!(instant.format("U.u"), "1439028608.123457");
    /// ```
    pub fn add(&mut self, interval: &Interval) -> Result<&mut Self> {
        self.apply_interval(interval, !interval.is_inverted())
    }

    /// Move by `interval` in the opposite direction of [`Instant::add`].
    pub fn subtract(&mut self, interval: &Interval) -> Result<&mut Self> {
        self.apply_interval(interval, interval.is_inverted())
    }

    /// Apply a relative-offset string such as `"+1 day -250 micro"`.
    ///
    /// A trailing microsecond clause is split off and carried first; the rest
    /// goes to the calendar clause parser. The whole string is parsed before
    /// anything moves.
    ///
    /// ```
    /// use dtms::Instant;
    ///
    /// let mut instant: Instant = "2015-08-08 10:10:10.123456".parse().unwrap();
    /// instant.modify("-10 min -10 seconds -123456 micro").unwrap();
    /// assert_eq!(instant.format("U.u"), "1439028000.000000");
    /// ```
    pub fn modify(&mut self, offset: &str) -> Result<&mut Self> {
        let offset = relative::parse(offset)?;

        let mut next = self.clone();
        if let Some(micros) = offset.microseconds {
            next.shift_microseconds(micros)?;
        }
        if !offset.calendar.is_zero() {
            next.base = offset.calendar.apply(&next.base)?;
        }

        *self = next;
        Ok(self)
    }

    fn apply_interval(&mut self, interval: &Interval, forward: bool) -> Result<&mut Self> {
        let calendar = if forward {
            interval.calendar_offset()
        } else {
            -interval.calendar_offset()
        };

        let mut next = self.clone();
        next.base = calendar.apply(&next.base)?;
        let micros = i64::from(interval.microseconds());
        if forward {
            next.add_microseconds(micros)?;
        } else {
            next.sub_microseconds(micros)?;
        }

        *self = next;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DtmsError;
    use crate::instant::Instant;
    use crate::interval::Interval;

    fn sample() -> Instant {
        "2015-08-08 10:10:10.123456".parse().unwrap()
    }

    fn after_add(interval: &str) -> String {
        let mut instant = sample();
        instant.add(&interval.parse().unwrap()).unwrap();
        instant.format("U.u")
    }

    fn after_subtract(interval: &str) -> String {
        let mut instant = sample();
        instant.subtract(&interval.parse().unwrap()).unwrap();
        instant.format("U.u")
    }

    fn after_modify(offset: &str) -> String {
        let mut instant = sample();
        instant.modify(offset).unwrap();
        instant.format("U.u")
    }

    #[test]
    fn add_forward_intervals() {
        assert_eq!(after_add("PT0.000000S"), "1439028610.123456");
        assert_eq!(after_add("PT1.123456S"), "1439028611.246912");
        assert_eq!(after_add("PT1.999999S"), "1439028612.123455");
        assert_eq!(after_add("PT1.876544S"), "1439028612.000000");
    }

    #[test]
    fn add_inverted_intervals() {
        assert_eq!(after_add("-PT0.000000S"), "1439028610.123456");
        assert_eq!(after_add("-PT1.123456S"), "1439028609.000000");
        assert_eq!(after_add("-PT1.999999S"), "1439028608.123457");
        assert_eq!(after_add("-PT1.876544S"), "1439028608.246912");
    }

    #[test]
    fn subtract_forward_intervals() {
        assert_eq!(after_subtract("PT0.000000S"), "1439028610.123456");
        assert_eq!(after_subtract("PT1.123456S"), "1439028609.000000");
        assert_eq!(after_subtract("PT1.999999S"), "1439028608.123457");
        assert_eq!(after_subtract("PT1.876544S"), "1439028608.246912");
    }

    #[test]
    fn subtract_inverted_intervals() {
        assert_eq!(after_subtract("-PT0.000000S"), "1439028610.123456");
        assert_eq!(after_subtract("-PT1.123456S"), "1439028611.246912");
        assert_eq!(after_subtract("-PT1.999999S"), "1439028612.123455");
        assert_eq!(after_subtract("-PT1.876544S"), "1439028612.000000");
    }

    #[test]
    fn add_calendar_components() {
        let mut instant = sample();
        instant
            .add(&Interval::new(0, 1, 2, 3, 0, 0).with_microseconds(1).unwrap())
            .unwrap();
        assert_eq!(instant.to_string(), "2015-09-10T13:10:10.123457Z");
    }

    #[test]
    fn add_then_subtract_chains() {
        let interval: Interval = "P1DT0.500000S".parse().unwrap();
        let mut instant = sample();
        instant.add(&interval).unwrap().subtract(&interval).unwrap();
        assert_eq!(instant, sample());
    }

    #[test]
    fn modify_microsecond_spellings() {
        for offset in [
            "+10 microseconds",
            "+10 microsecond",
            "+10 micro",
            "+10 mic",
            "+10microseconds",
            "+10microsecond",
            "+10micro",
            "+10mic",
        ] {
            assert_eq!(after_modify(offset), "1439028610.123466", "{offset}");
        }
        for offset in ["-10 microseconds", "-10 microsecond", "-10 micro", "-10 mic"] {
            assert_eq!(after_modify(offset), "1439028610.123446", "{offset}");
        }
    }

    #[test]
    fn modify_carries_and_borrows() {
        assert_eq!(after_modify("+999999 micro"), "1439028611.123455");
        assert_eq!(after_modify("-999999 micro"), "1439028609.123457");
        assert_eq!(after_modify("+1999999 micro"), "1439028612.123455");
        assert_eq!(after_modify("-1999999 micro"), "1439028608.123457");
    }

    #[test]
    fn modify_mixed_offsets() {
        assert_eq!(
            after_modify("+10 min +10 seconds +123456 micro"),
            "1439029220.246912"
        );
        assert_eq!(
            after_modify("-10 min -10 seconds -123456 micro"),
            "1439028000.000000"
        );
        assert_eq!(after_modify("+1 day"), "1439115010.123456");
    }

    #[test]
    fn modify_failure_leaves_instant_untouched() {
        let mut instant = sample();
        assert!(matches!(
            instant.modify("+1 blorp +5 micro"),
            Err(DtmsError::InvalidModifier(_))
        ));
        assert_eq!(instant, sample());
    }
}
