//! Which dates and time slots can actually be picked.
//!
//! Pure functions of (today, selected date): recomputed fresh on every call,
//! no cached state.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

use super::catalog::{slot_start, ALL_TIME_SLOTS};

/// How many selectable dates the picker offers.
pub const DEFAULT_HORIZON: usize = 14;

/// The selectable appointment dates: walks forward from the day after
/// `today`, skipping Sundays, until `horizon` dates are collected.
///
/// Same-day booking is intentionally not offered; the time-of-day filter in
/// [`valid_slots_for`] still applies if a caller passes today explicitly.
pub fn available_dates(today: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(horizon);
    let mut day = today;
    while dates.len() < horizon {
        day = match day.succ_opt() {
            Some(next) => next,
            None => break, // calendar overflow, not reachable with real input
        };
        if day.weekday() != Weekday::Sun {
            dates.push(day);
        }
    }
    dates
}

/// The slots a citizen may pick for `date`, given the current moment.
///
/// Saturdays are morning-only (start hour < 12). When `date` is today,
/// only slots starting strictly after `now`'s time-of-day remain. Both
/// filters compose.
pub fn valid_slots_for(date: NaiveDate, now: NaiveDateTime) -> Vec<&'static str> {
    ALL_TIME_SLOTS
        .iter()
        .copied()
        .filter(|slot| {
            let start = match slot_start(slot) {
                Some(start) => start,
                None => return false,
            };
            if date.weekday() == Weekday::Sat && start.hour() >= 12 {
                return false;
            }
            if date == now.date() && start <= now.time() {
                return false;
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(date: NaiveDate, h: u32, min: u32) -> NaiveDateTime {
        date.and_time(NaiveTime::from_hms_opt(h, min, 0).unwrap())
    }

    #[test]
    fn horizon_count_no_sundays_strictly_increasing() {
        // Property holds from any weekday start
        for offset in 0..7 {
            let today = day(2026, 8, 3) + chrono::Duration::days(offset);
            let dates = available_dates(today, DEFAULT_HORIZON);
            assert_eq!(dates.len(), DEFAULT_HORIZON);
            assert!(dates.iter().all(|d| d.weekday() != Weekday::Sun));
            for pair in dates.windows(2) {
                assert!(pair[0] < pair[1]);
            }
        }
    }

    #[test]
    fn dates_start_tomorrow() {
        // Tuesday → first offer is Wednesday
        let today = day(2026, 8, 4);
        let dates = available_dates(today, DEFAULT_HORIZON);
        assert_eq!(dates[0], day(2026, 8, 5));
        assert!(!dates.contains(&today));
    }

    #[test]
    fn saturday_start_skips_to_monday_past_sunday() {
        // Saturday → tomorrow is Sunday, first offer is Monday
        let saturday = day(2026, 8, 8);
        let dates = available_dates(saturday, 3);
        assert_eq!(dates, vec![day(2026, 8, 10), day(2026, 8, 11), day(2026, 8, 12)]);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let today = day(2026, 8, 4);
        assert_eq!(
            available_dates(today, DEFAULT_HORIZON),
            available_dates(today, DEFAULT_HORIZON)
        );
    }

    #[test]
    fn weekday_offers_all_fifteen_slots() {
        // A future Wednesday, "now" is some other day
        let now = at(day(2026, 8, 4), 9, 0);
        let slots = valid_slots_for(day(2026, 8, 12), now);
        assert_eq!(slots.len(), 15);
    }

    #[test]
    fn saturday_keeps_only_morning_slots() {
        let now = at(day(2026, 8, 4), 9, 0);
        let saturday = day(2026, 8, 15);
        let slots = valid_slots_for(saturday, now);
        assert_eq!(slots.len(), 8);
        for slot in slots {
            assert!(slot_start(slot).unwrap().hour() < 12, "{slot} is afternoon");
        }
    }

    #[test]
    fn today_excludes_started_slots() {
        let today = day(2026, 8, 5); // Wednesday
        let now = at(today, 10, 0);
        let slots = valid_slots_for(today, now);
        // 10:00 itself is gone (start ≤ now); 10:30 onward remain
        assert!(!slots.contains(&"09:30 - 10:00"));
        assert!(!slots.contains(&"10:00 - 10:30"));
        assert!(slots.contains(&"10:30 - 11:00"));
        assert_eq!(slots.first().copied(), Some("10:30 - 11:00"));
    }

    #[test]
    fn saturday_today_composes_both_filters() {
        let saturday = day(2026, 8, 8);
        let now = at(saturday, 9, 15);
        let slots = valid_slots_for(saturday, now);
        // Morning only AND strictly after 09:15
        assert_eq!(
            slots,
            vec![
                "09:30 - 10:00",
                "10:00 - 10:30",
                "10:30 - 11:00",
                "11:00 - 11:30"
            ]
        );
    }

    #[test]
    fn today_late_evening_has_no_slots() {
        let today = day(2026, 8, 5);
        let now = at(today, 18, 0);
        assert!(valid_slots_for(today, now).is_empty());
    }
}
