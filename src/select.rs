// Selection engine — picks one index out of a pool.
//
// Random mode is a uniform draw. Daily mode hashes the local calendar day
// plus a per-category seed, so the pick is stable until local midnight and
// the three categories stay decorrelated. The fold reproduces JS 32-bit
// signed overflow semantics bit for bit, which is why it runs over UTF-16
// code units in wrapping i32 arithmetic.

use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;

use crate::settings::Mode;

/// Render a date the way JS `Date.toDateString()` does:
/// "<Weekday-abbrev> <Month-abbrev> <zero-padded-day> <Year>", English names,
/// e.g. "Mon Aug 25 2026". Locale-independent; the hash is sensitive to the
/// exact character sequence.
pub fn day_key(date: NaiveDate) -> String {
    format!(
        "{} {} {:02} {}",
        date.format("%a"),
        date.format("%b"),
        date.day(),
        date.year()
    )
}

/// Fold a string into a 32-bit signed accumulator:
/// hash = hash * 31 + code_unit, wrapping, starting from 0.
fn fold_hash(input: &str) -> i32 {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    hash
}

/// Deterministic index for one calendar day. Stable for repeated calls on
/// the same `date` and `seed`; changes across days and across seeds.
pub fn day_based_index(pool_size: usize, seed: &str, date: NaiveDate) -> usize {
    debug_assert!(pool_size > 0, "day_based_index requires a non-empty pool");
    let key = format!("{}{}", day_key(date), seed);
    fold_hash(&key).unsigned_abs() as usize % pool_size
}

/// Choose an index in [0, pool_size) under the given mode. Callers must not
/// invoke this with an empty pool; they substitute a fallback value instead.
pub fn select_index(pool_size: usize, mode: Mode, seed: &str) -> usize {
    debug_assert!(pool_size > 0, "select_index requires a non-empty pool");
    match mode {
        Mode::Random => rand::thread_rng().gen_range(0..pool_size),
        Mode::Daily => day_based_index(pool_size, seed, Local::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SEED_BACKGROUND, SEED_DISPLAYED, SEED_QUOTE};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_key_format() {
        // JS toDateString zero-pads the day of month
        assert_eq!(day_key(date(2025, 8, 2)), "Sat Aug 02 2025");
        assert_eq!(day_key(date(2026, 8, 25)), "Tue Aug 25 2026");
        assert_eq!(day_key(date(2024, 12, 31)), "Tue Dec 31 2024");
    }

    #[test]
    fn test_fold_hash_known_values() {
        assert_eq!(fold_hash(""), 0);
        assert_eq!(fold_hash("A"), 65);
        // 97 * 31 + 98
        assert_eq!(fold_hash("ab"), 3105);
    }

    #[test]
    fn test_daily_is_deterministic_within_a_day() {
        let d = date(2026, 8, 25);
        for n in 1..64 {
            let first = day_based_index(n, SEED_QUOTE, d);
            for _ in 0..10 {
                assert_eq!(day_based_index(n, SEED_QUOTE, d), first);
            }
        }
    }

    #[test]
    fn test_daily_depends_on_seed() {
        let d = date(2026, 8, 25);
        let differs = (2..64).any(|n| {
            day_based_index(n, SEED_QUOTE, d) != day_based_index(n, SEED_BACKGROUND, d)
        });
        assert!(differs, "distinct seeds must decorrelate selections");

        let differs = (2..64).any(|n| {
            day_based_index(n, SEED_BACKGROUND, d) != day_based_index(n, SEED_DISPLAYED, d)
        });
        assert!(differs);
    }

    #[test]
    fn test_daily_depends_on_date() {
        let monday = date(2026, 8, 24);
        let tuesday = date(2026, 8, 25);
        let monday_picks: Vec<usize> = (1..=64)
            .map(|n| day_based_index(n, SEED_QUOTE, monday))
            .collect();
        let tuesday_picks: Vec<usize> = (1..=64)
            .map(|n| day_based_index(n, SEED_QUOTE, tuesday))
            .collect();
        assert_ne!(monday_picks, tuesday_picks, "hash must not be date-invariant");
    }

    #[test]
    fn test_range_bound_all_modes() {
        for n in 1..40 {
            for _ in 0..20 {
                assert!(select_index(n, Mode::Random, SEED_QUOTE) < n);
                assert!(select_index(n, Mode::Daily, SEED_QUOTE) < n);
            }
        }
    }

    #[test]
    fn test_pool_of_one_always_selects_zero() {
        assert_eq!(select_index(1, Mode::Random, SEED_QUOTE), 0);
        assert_eq!(select_index(1, Mode::Daily, SEED_QUOTE), 0);
    }
}
