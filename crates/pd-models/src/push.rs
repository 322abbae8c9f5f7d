//! Push model
//!
//! A push is a time-boxed work period within a project, identified by its
//! sequence number and an inclusive date window.

use chrono::NaiveDate;
use pd_core::traits::{Entity, Id, ProjectScoped};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Push entity
///
/// `sequence_index` is strictly increasing per project but may have gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_window"))]
pub struct Push {
    pub id: Option<Id>,

    /// Owning project
    pub project_id: Id,

    /// Position within the project's sequence of pushes (1-based)
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub sequence_index: u32,

    /// Optional display name
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    /// First day of the push (inclusive)
    pub start_date: NaiveDate,

    /// Last day of the push (inclusive)
    pub end_date: NaiveDate,
}

fn validate_window(push: &Push) -> Result<(), ValidationError> {
    if push.start_date > push.end_date {
        let mut error = ValidationError::new("date_window");
        error.message = Some("Start date must be on or before end date".into());
        return Err(error);
    }
    Ok(())
}

impl ProjectScoped for Push {
    fn project_id(&self) -> Id {
        self.project_id
    }
}

impl Entity for Push {
    const TYPE_NAME: &'static str = "Push";
}

impl Push {
    /// Create a new, unsaved push
    pub fn new(project_id: Id, sequence_index: u32, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: None,
            project_id,
            sequence_index,
            name: None,
            start_date,
            end_date,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether `date` falls inside the window, both ends inclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// DTO for creating a push
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePushDto {
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub sequence_index: u32,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CreatePushDto {
    pub fn into_push(self, project_id: Id) -> Push {
        Push {
            id: None,
            project_id,
            sequence_index: self.sequence_index,
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
