// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Carry/borrow between the microsecond fraction and the whole-second base.
//!
//! Both operations take a non-negative amount and fold the result back into
//! `0..1_000_000` with Euclidean division, moving the base instant by the
//! carried (or borrowed) whole seconds. The fraction is integer throughout.

use crate::calendar::CalendarOffset;
use crate::error::{DtmsError, Result};
use crate::instant::Instant;
use crate::interval::MICROS_PER_SECOND;

const MICROS: i64 = MICROS_PER_SECOND as i64;

impl Instant {
    /// Move forward by `amount` microseconds, carrying into whole seconds.
    ///
    /// Fails with [`DtmsError::InvalidArgument`] when `amount` is negative,
    /// before anything is touched.
    ///
    /// ```
    /// use dtms::Instant;
    ///
    /// let mut instant: Instant = "2015-08-08 10:10:10.123456".parse().unwrap();
    /// instant.add_microseconds(999_999).unwrap();
    /// assert_eq!(instant.format("U.u"), "1439028611.123455");
    /// ```
    pub fn add_microseconds(&mut self, amount: i64) -> Result<()> {
        if amount < 0 {
            return Err(DtmsError::negative_microseconds());
        }
        let total = i64::from(self.microseconds)
            .checked_add(amount)
            .ok_or(DtmsError::OutOfRange)?;
        self.settle(total)
    }

    /// Move backward by `amount` microseconds, borrowing from whole seconds.
    ///
    /// Fails with [`DtmsError::InvalidArgument`] when `amount` is negative,
    /// before anything is touched.
    pub fn sub_microseconds(&mut self, amount: i64) -> Result<()> {
        if amount < 0 {
            return Err(DtmsError::negative_microseconds());
        }
        let total = i64::from(self.microseconds)
            .checked_sub(amount)
            .ok_or(DtmsError::OutOfRange)?;
        self.settle(total)
    }

    /// Apply a signed microsecond shift, routing to add or sub by sign.
    pub(crate) fn shift_microseconds(&mut self, delta: i64) -> Result<()> {
        if delta < 0 {
            self.sub_microseconds(delta.checked_neg().ok_or(DtmsError::OutOfRange)?)
        } else {
            self.add_microseconds(delta)
        }
    }

    /// Split `total` microseconds into whole seconds and a normalized
    /// fraction, then commit both.
    fn settle(&mut self, total: i64) -> Result<()> {
        let seconds = total.div_euclid(MICROS);
        let remainder = total.rem_euclid(MICROS);

        let base = if seconds == 0 {
            self.base
        } else {
            CalendarOffset::seconds(seconds).apply(&self.base)?
        };
        log::trace!(
            "settle {total}us on {}: {seconds:+}s, fraction {remainder}",
            self.base
        );

        self.base = base;
        // rem_euclid keeps the value in 0..MICROS, which always fits a u32.
        self.microseconds = u32::try_from(remainder).map_err(|_| DtmsError::OutOfRange)?;
        Ok(())
    }
}
