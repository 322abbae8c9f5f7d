//! Core traits shared by models and the timeline helpers

use chrono::{Datelike, NaiveDate};

/// Primary key type
pub type Id = i64;

/// Trait for entities that belong to a project
pub trait ProjectScoped {
    fn project_id(&self) -> Id;
}

/// Trait for records placed on a timeline by a single calendar date
pub trait Dated {
    fn date(&self) -> NaiveDate;

    fn year(&self) -> i32 {
        // `NaiveDate` is itself `Dated`, so `Datelike::year` must be named.
        Datelike::year(&self.date())
    }
}

impl Dated for NaiveDate {
    fn date(&self) -> NaiveDate {
        *self
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }
}

/// Stored record kinds, named in not-found and conflict errors
pub trait Entity: Send + Sync {
    const TYPE_NAME: &'static str;
}
