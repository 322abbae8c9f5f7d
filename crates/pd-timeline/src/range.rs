//! Year-range filtering for milestone timelines

use pd_core::clock::Clock;
use pd_core::traits::Dated;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimelineError {
    #[error("Invalid year range: start year {start_year} is after end year {end_year}")]
    InvalidRange { start_year: i32, end_year: i32 },
}

/// Inclusive `[start_year, end_year]` bound for a timeline view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRange {
    start_year: i32,
    end_year: i32,
}

impl YearRange {
    pub fn new(start_year: i32, end_year: i32) -> Result<Self, TimelineError> {
        if start_year > end_year {
            return Err(TimelineError::InvalidRange { start_year, end_year });
        }
        Ok(Self { start_year, end_year })
    }

    pub fn single(year: i32) -> Self {
        Self {
            start_year: year,
            end_year: year,
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start_year <= year && year <= self.end_year
    }
}

/// Milestones dated within `[start_year, end_year]`, ascending by date.
///
/// The sort is stable, so milestones sharing a date keep their input order.
pub fn filter_milestones_by_year_range<T: Dated>(
    milestones: &[T],
    start_year: i32,
    end_year: i32,
) -> Result<Vec<&T>, TimelineError> {
    let range = YearRange::new(start_year, end_year)?;
    Ok(filter_by_range(milestones, &range))
}

/// Same as [`filter_milestones_by_year_range`] for an already-validated range
pub fn filter_by_range<'a, T: Dated>(milestones: &'a [T], range: &YearRange) -> Vec<&'a T> {
    let mut selected: Vec<&T> = milestones
        .iter()
        .filter(|m| range.contains(m.year()))
        .collect();
    selected.sort_by_key(|m| m.date());
    selected
}

/// The span of years covered by `milestones`.
///
/// An empty collection yields the clock's current year for both bounds.
pub fn get_year_range<T: Dated>(milestones: &[T], clock: &dyn Clock) -> YearRange {
    let mut years = milestones.iter().map(|m| m.year());
    let Some(first) = years.next() else {
        return YearRange::single(clock.current_year());
    };

    let (start_year, end_year) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    YearRange { start_year, end_year }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Utc};
    use pd_core::clock::{FixedClock, SystemClock};
    use pd_models::Milestone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn milestone(title: &str, d: NaiveDate) -> Milestone {
        Milestone::new(1, title, d)
    }

    fn titles(items: &[&Milestone]) -> Vec<String> {
        items.iter().map(|m| m.title.clone()).collect()
    }

    #[test]
    fn test_filters_to_inclusive_range() {
        let milestones = vec![
            milestone("2027", date(2027, 1, 1)),
            milestone("2024", date(2024, 12, 31)),
            milestone("2026", date(2026, 12, 31)),
            milestone("2025", date(2025, 1, 1)),
        ];

        let filtered = filter_milestones_by_year_range(&milestones, 2025, 2026).unwrap();
        assert_eq!(titles(&filtered), vec!["2025", "2026"]);
    }

    #[test]
    fn test_output_sorted_for_any_input_order() {
        let base = vec![
            milestone("a", date(2025, 3, 1)),
            milestone("b", date(2025, 1, 9)),
            milestone("c", date(2026, 7, 4)),
            milestone("d", date(2025, 11, 30)),
        ];

        for rotation in 0..base.len() {
            let mut input = base.clone();
            input.rotate_left(rotation);
            let filtered = filter_milestones_by_year_range(&input, 2025, 2026).unwrap();
            assert!(filtered.windows(2).all(|w| w[0].date <= w[1].date));
            assert_eq!(titles(&filtered), vec!["b", "a", "d", "c"]);
        }
    }

    #[test]
    fn test_same_date_keeps_input_order() {
        let milestones = vec![
            milestone("second day", date(2025, 4, 2)),
            milestone("first", date(2025, 4, 1)),
            milestone("also first", date(2025, 4, 1)),
        ];
        let filtered = filter_milestones_by_year_range(&milestones, 2025, 2025).unwrap();
        assert_eq!(titles(&filtered), vec!["first", "also first", "second day"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let milestones = vec![
            milestone("x", date(2023, 5, 5)),
            milestone("y", date(2025, 5, 5)),
            milestone("z", date(2025, 2, 2)),
        ];
        let once: Vec<Milestone> = filter_milestones_by_year_range(&milestones, 2024, 2025)
            .unwrap()
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<Milestone> = filter_milestones_by_year_range(&once, 2024, 2025)
            .unwrap()
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reversed_range_is_an_error() {
        let milestones = vec![milestone("x", date(2025, 5, 5))];
        let err = filter_milestones_by_year_range(&milestones, 2026, 2025).unwrap_err();
        assert_eq!(
            err,
            TimelineError::InvalidRange {
                start_year: 2026,
                end_year: 2025
            }
        );
        assert!(YearRange::new(2026, 2025).is_err());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let milestones = vec![
            milestone("late", date(2025, 9, 1)),
            milestone("early", date(2025, 1, 1)),
        ];
        let before = milestones.clone();
        let _ = filter_milestones_by_year_range(&milestones, 2025, 2025).unwrap();
        assert_eq!(milestones, before);
    }

    #[test]
    fn test_year_range_spans_min_and_max() {
        let milestones = vec![
            milestone("a", date(2026, 2, 1)),
            milestone("b", date(2024, 8, 1)),
            milestone("c", date(2025, 1, 1)),
        ];
        let clock = FixedClock::on(2030, 1, 1).unwrap();
        assert_eq!(get_year_range(&milestones, &clock), YearRange::new(2024, 2026).unwrap());
    }

    #[test]
    fn test_year_range_single_milestone() {
        let milestones = vec![milestone("a", date(2019, 2, 1))];
        let clock = FixedClock::on(2030, 1, 1).unwrap();
        assert_eq!(get_year_range(&milestones, &clock), YearRange::single(2019));
    }

    #[test]
    fn test_empty_year_range_uses_clock() {
        let empty: Vec<Milestone> = vec![];
        let clock = FixedClock::on(2031, 6, 1).unwrap();
        assert_eq!(get_year_range(&empty, &clock), YearRange::single(2031));
    }

    #[test]
    fn test_empty_year_range_matches_real_year() {
        let empty: Vec<Milestone> = vec![];
        let year = Utc::now().year();
        assert_eq!(get_year_range(&empty, &SystemClock), YearRange::single(year));
    }

    #[test]
    fn test_works_on_plain_dates() {
        let dates = vec![date(2025, 5, 1), date(2022, 1, 1)];
        let filtered = filter_milestones_by_year_range(&dates, 2025, 2025).unwrap();
        assert_eq!(filtered, vec![&date(2025, 5, 1)]);
    }

    #[test]
    fn test_year_range_helpers() {
        let range = YearRange::new(2024, 2026).unwrap();
        assert!(range.contains(2025));
        assert!(!range.contains(2027));
        let json = serde_json::to_value(range).unwrap();
        assert_eq!(json["startYear"], 2024);
        assert_eq!(json["endYear"], 2026);
    }
}
