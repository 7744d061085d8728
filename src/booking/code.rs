//! Appointment code derivation.
//!
//! The code is presentational: it compresses the appointment date and slot
//! into something a citizen can read out at the counter, plus a random
//! disambiguator. It is NOT unique — the (date, slot) pair does the routing.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

use super::catalog::slot_start;

/// Shown while the draft has no slot yet.
pub const PENDING_CODE: &str = "TT-PENDING";

/// Derive the appointment code `TT-{DD}{MM}-{HHMM}-{rand}`.
///
/// `rand` is an integer in `[1, 100]` drawn from the injected generator so
/// tests can pin it. An unparsable slot yields [`PENDING_CODE`] rather than
/// an error — the guards upstream only admit catalog slots.
pub fn generate_code<R: Rng>(date: NaiveDate, time_slot: &str, rng: &mut R) -> String {
    let start = match slot_start(time_slot) {
        Some(start) => start,
        None => return PENDING_CODE.to_string(),
    };
    let suffix: u32 = rng.gen_range(1..=100);
    format!(
        "TT-{:02}{:02}-{}-{}",
        date.day(),
        date.month(),
        start.format("%H%M"),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn code_embeds_day_month_and_slot_start() {
        let mut rng = StepRng::new(0, 0);
        let code = generate_code(day(2026, 8, 5), "08:00 - 08:30", &mut rng);
        assert!(code.starts_with("TT-0508-0800-"), "{code}");
    }

    #[test]
    fn same_inputs_same_rng_same_code() {
        let a = generate_code(
            day(2026, 8, 5),
            "14:30 - 15:00",
            &mut StdRng::seed_from_u64(7),
        );
        let b = generate_code(
            day(2026, 8, 5),
            "14:30 - 15:00",
            &mut StdRng::seed_from_u64(7),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn rng_changes_only_the_suffix() {
        let a = generate_code(
            day(2026, 8, 5),
            "14:30 - 15:00",
            &mut StdRng::seed_from_u64(1),
        );
        let b = generate_code(
            day(2026, 8, 5),
            "14:30 - 15:00",
            &mut StdRng::seed_from_u64(2),
        );
        let prefix = "TT-0508-1430-";
        assert!(a.starts_with(prefix));
        assert!(b.starts_with(prefix));
    }

    #[test]
    fn suffix_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let code = generate_code(day(2026, 12, 31), "07:30 - 08:00", &mut rng);
            let suffix: u32 = code.rsplit('-').next().unwrap().parse().unwrap();
            assert!((1..=100).contains(&suffix), "suffix {suffix} out of range");
        }
    }

    #[test]
    fn day_and_month_are_zero_padded() {
        let mut rng = StepRng::new(0, 0);
        let code = generate_code(day(2026, 1, 2), "07:30 - 08:00", &mut rng);
        assert!(code.starts_with("TT-0201-0730-"), "{code}");
    }

    #[test]
    fn unparsable_slot_yields_pending() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(generate_code(day(2026, 8, 5), "", &mut rng), PENDING_CODE);
    }
}
