use chrono::TimeZone;
use dtms::{Instant, Interval, Tz};
use proptest::prelude::*;
use qtty::Seconds;

fn instant_from(
    (year, month, day, hour, minute, second, micros): (i32, u32, u32, u32, u32, u32, u32),
) -> Instant {
    let base = Tz::UTC
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .unwrap();
    let mut instant = Instant::from(base);
    instant.set_microseconds(micros);
    instant
}

fn arb_instant() -> impl Strategy<Value = Instant> {
    (
        1970i32..2100,
        1u32..=12,
        1u32..=28,
        0u32..=23,
        0u32..=59,
        0u32..=59,
        0u32..=999_999,
    )
        .prop_map(instant_from)
}

/// Instants inside August 2015, so no breakdown ever counts a whole month.
fn arb_instant_in_month() -> impl Strategy<Value = Instant> {
    (1u32..=31, 0u32..=23, 0u32..=59, 0u32..=59, 0u32..=999_999).prop_map(
        |(day, hour, minute, second, micros)| {
            instant_from((2015, 8, day, hour, minute, second, micros))
        },
    )
}

/// A pair of instants anywhere in 2015 sharing one microsecond fraction, so
/// a difference between them never borrows a second.
fn arb_pair_in_year() -> impl Strategy<Value = (Instant, Instant)> {
    (0i64..365 * 86_400, 0i64..365 * 86_400, 0u32..=999_999).prop_map(|(a, b, micros)| {
        let at = |offset: i64| {
            let base = Tz::UTC.timestamp_opt(1_420_070_400 + offset, 0).unwrap();
            let mut instant = Instant::from(base);
            instant.set_microseconds(micros);
            instant
        };
        (at(a), at(b))
    })
}

fn arb_interval() -> impl Strategy<Value = Interval> {
    (
        0u32..50,
        0u32..12,
        0u32..400,
        0u32..24,
        0u32..60,
        0u32..60,
        0u32..=999_999,
        any::<bool>(),
    )
        .prop_map(|(y, mo, d, h, mi, s, micros, invert)| {
            let interval = Interval::new(y, mo, d, h, mi, s)
                .with_microseconds(micros)
                .unwrap();
            if invert {
                interval.inverted()
            } else {
                interval
            }
        })
}

proptest! {
    #[test]
    fn add_then_sub_microseconds_restores_instant(
        start in arb_instant(),
        amount in 0i64..=1_000_000_000_000,
    ) {
        let mut instant = start.clone();
        instant.add_microseconds(amount).unwrap();
        prop_assert!(instant.microseconds() < 1_000_000);
        instant.sub_microseconds(amount).unwrap();
        prop_assert_eq!(instant, start);
    }

    #[test]
    fn fraction_stays_below_one_second(
        start in arb_instant(),
        amount in 0i64..=10_000_000,
        backward in any::<bool>(),
    ) {
        let mut instant = start;
        if backward {
            instant.sub_microseconds(amount).unwrap();
        } else {
            instant.add_microseconds(amount).unwrap();
        }
        let fraction = instant.fraction();
        prop_assert!(fraction >= Seconds::new(0.0));
        prop_assert!(fraction < Seconds::new(1.0));
    }

    #[test]
    fn diff_is_antisymmetric_within_a_month(
        a in arb_instant_in_month(),
        b in arb_instant_in_month(),
    ) {
        let forward = a.diff(&b, false).unwrap();
        let backward = b.diff(&a, false).unwrap();
        prop_assert_eq!(forward.abs(), backward.abs());
        if a != b {
            prop_assert_ne!(forward.is_inverted(), backward.is_inverted());
        }
    }

    #[test]
    fn diff_is_antisymmetric_across_month_ends((a, b) in arb_pair_in_year()) {
        let forward = a.diff(&b, false).unwrap();
        let backward = b.diff(&a, false).unwrap();
        prop_assert_eq!(forward.abs(), backward.abs());
        if a != b {
            prop_assert_ne!(forward.is_inverted(), backward.is_inverted());
        }
    }

    #[test]
    fn diff_with_itself_is_zero(x in arb_instant()) {
        let interval = x.diff(&x, false).unwrap();
        prop_assert!(interval.is_zero());
        prop_assert!(!interval.is_inverted());
    }

    #[test]
    fn absolute_diff_ignores_direction(x in arb_instant(), y in arb_instant()) {
        let forward = x.diff(&y, true).unwrap();
        let backward = y.diff(&x, true).unwrap();
        prop_assert!(!forward.is_inverted());
        prop_assert!(!backward.is_inverted());
        if x.timestamp().abs_diff(y.timestamp()) < 28 * 86_400 {
            prop_assert_eq!(forward, backward);
        }
    }

    #[test]
    fn diff_then_add_reaches_target_within_a_month(
        a in arb_instant_in_month(),
        b in arb_instant_in_month(),
    ) {
        let interval = a.diff(&b, false).unwrap();
        let mut moved = a.clone();
        moved.add(&interval).unwrap();
        prop_assert_eq!(moved, b);
    }

    #[test]
    fn canonical_text_roundtrips(x in arb_instant()) {
        let parsed: Instant = x.to_string().parse().unwrap();
        prop_assert_eq!(parsed, x);
    }

    #[test]
    fn interval_text_roundtrips(interval in arb_interval()) {
        let parsed: Interval = interval.to_string().parse().unwrap();
        prop_assert_eq!(parsed, interval);
    }
}
