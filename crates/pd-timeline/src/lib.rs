//! # pd-timeline
//!
//! Derived timeline data for project views:
//!
//! - `current_push`: which push is in progress today
//! - `range`: year-range filtering of milestones and the default range
//! - `format`: date and range labels

pub mod current_push;
pub mod format;
pub mod range;

pub use current_push::{current_push, current_push_on, days_remaining};
pub use format::{format_date, format_date_range, format_year_range, push_label};
pub use range::{filter_by_range, filter_milestones_by_year_range, get_year_range, TimelineError, YearRange};
