// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Explicit construction-time configuration.
//!
//! There is no process-wide default timezone: every constructor that needs a
//! zone either receives one or a [`Settings`] value. `Settings::default()`
//! resolves to UTC.

use crate::error::{DtmsError, Result};
use chrono_tz::Tz;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Defaults applied when a constructor is not given an explicit timezone.
///
/// # Examples
///
/// ```
/// use dtms::{Instant, Settings};
///
/// let settings = Settings::from_name("Europe/Madrid").unwrap();
/// let instant = Instant::now_with(&settings);
/// assert_eq!(instant.timezone(), chrono_tz::Europe::Madrid);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    timezone: Tz,
}

impl Default for Settings {
    fn default() -> Self {
        Self { timezone: Tz::UTC }
    }
}

impl Settings {
    pub const fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Build settings from an IANA zone identifier such as `"America/Bogota"`.
    pub fn from_name(name: &str) -> Result<Self> {
        let timezone: Tz = name
            .parse()
            .map_err(|_| DtmsError::UnknownTimezone(name.to_string()))?;
        Ok(Self::new(timezone))
    }

    /// Zone used for construction when none is passed explicitly.
    #[inline]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    #[must_use]
    pub const fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_utc() {
        assert_eq!(Settings::default().timezone(), Tz::UTC);
    }

    #[test]
    fn from_name_resolves_iana_ids() {
        let settings = Settings::from_name("Asia/Tokyo").unwrap();
        assert_eq!(settings.timezone(), chrono_tz::Asia::Tokyo);
    }

    #[test]
    fn from_name_rejects_unknown_ids() {
        let err = Settings::from_name("Mars/Olympus_Mons").unwrap_err();
        assert_eq!(err, DtmsError::UnknownTimezone("Mars/Olympus_Mons".into()));
    }

    #[test]
    fn with_timezone_replaces_zone() {
        let settings = Settings::default().with_timezone(chrono_tz::Europe::Berlin);
        assert_eq!(settings.timezone(), chrono_tz::Europe::Berlin);
    }
}
