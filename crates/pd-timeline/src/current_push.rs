//! Current push selection
//!
//! Windows are compared by UTC calendar day: a push is current from the first
//! moment of its start date through the last moment of its end date.

use chrono::NaiveDate;
use pd_core::clock::Clock;
use pd_models::Push;

/// The push in progress according to `clock`, if any
pub fn current_push<'a>(pushes: &'a [Push], clock: &dyn Clock) -> Option<&'a Push> {
    current_push_on(pushes, clock.today())
}

/// The push in progress on `today`, if any.
///
/// Among pushes whose window contains `today`, the most recently started
/// wins; equal start dates go to the higher sequence index.
pub fn current_push_on(pushes: &[Push], today: NaiveDate) -> Option<&Push> {
    pushes
        .iter()
        .filter(|push| push.contains(today))
        .max_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then(a.sequence_index.cmp(&b.sequence_index))
        })
}

/// Whole days left in the push counting from `today`.
///
/// Zero on the final day, negative once the push has ended.
pub fn days_remaining(push: &Push, today: NaiveDate) -> i64 {
    (push.end_date - today).num_days()
}
