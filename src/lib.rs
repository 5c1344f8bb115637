// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Microsecond-precision timestamps
//!
//! This crate layers a microsecond fraction on top of a whole-second calendar
//! engine built on `chrono` and `chrono-tz`.
//!
//! # Core types
//!
//! - [`Instant`] — a zoned calendar instant plus a microsecond fraction kept in
//!   `0..1_000_000`.
//! - [`Interval`] — a signed calendar duration (years … seconds) with a
//!   microsecond component and an `invert` flag.
//! - [`Settings`] — explicit construction-time configuration (default zone).
//! - [`ToInstant`] — operands accepted by [`Instant::diff`].
//!
//! # Operations
//!
//! | Operation | Method |
//! |-----------|--------|
//! | capture the clock | [`Instant::now`], [`Instant::now_with`] |
//! | parse with a template | [`Instant::parse`], [`Instant::parse_with`] |
//! | carry / borrow | [`Instant::add_microseconds`], [`Instant::sub_microseconds`] |
//! | interval arithmetic | [`Instant::add`], [`Instant::subtract`] |
//! | relative offsets | [`Instant::modify`] |
//! | difference | [`Instant::diff`], `&a - &b` |
//! | rendering | [`Instant::format`], [`Interval::format`], `Display` |
//!
//! ```
//! use dtms::{Instant, Interval};
//!
//! let mut start: Instant = "2015-08-08 10:10:10.123456".parse().unwrap();
//! let end = start.clone();
//! start.add(&Interval::parse("PT1.999999S").unwrap()).unwrap();
//! assert_eq!(start.format("U.u"), "1439028612.123455");
//! assert_eq!(end.diff(&start, false).unwrap().format("%RPT%sS"), "+PT1.999999S");
//! ```
//!
//! # Base calendar engine
//!
//! The [`calendar`] module is the whole-second engine the microsecond layer
//! delegates to. Month arithmetic keeps the day of month and spills past the
//! end of a short month into the next one (`2015-01-31 + 1 month` is
//! `2015-03-03`). Differences are measured on the wall clock of the first
//! operand's zone.

mod arithmetic;
pub mod calendar;
mod carry;
mod diff;
mod error;
mod instant;
mod interval;
mod relative;
mod settings;
mod template;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use calendar::{CalendarDiff, CalendarOffset};
pub use chrono_tz::Tz;
pub use diff::ToInstant;
pub use error::{DtmsError, Result};
pub use instant::Instant;
pub use interval::Interval;
pub use settings::Settings;
