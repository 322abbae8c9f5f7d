//! Milestone model
//!
//! A dated, categorized event on a project's timeline.

use chrono::NaiveDate;
use pd_core::traits::{Dated, Entity, Id, ProjectScoped};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Milestone category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneCategory {
    Policy,
    Communications,
    Event,
    Funding,
    Report,
    #[default]
    Other,
}

/// Milestone status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneStatus {
    #[default]
    Planned,
    InProgress,
    Done,
    AtRisk,
    Cancelled,
}

/// Milestone entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Option<Id>,

    /// Owning project
    pub project_id: Id,

    #[validate(length(min = 1, max = 255))]
    pub title: String,

    pub date: NaiveDate,

    #[serde(default)]
    pub category: MilestoneCategory,

    #[serde(default)]
    pub status: MilestoneStatus,

    /// Push this milestone is delivered in
    pub push_id: Option<Id>,

    /// Objective this milestone contributes to
    pub objective_id: Option<Id>,

    /// Department leading the work
    pub lead_department_id: Option<Id>,
}

impl ProjectScoped for Milestone {
    fn project_id(&self) -> Id {
        self.project_id
    }
}

impl Dated for Milestone {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Entity for Milestone {
    const TYPE_NAME: &'static str = "Milestone";
}

impl Milestone {
    /// Create a new, unsaved milestone with default category and status
    pub fn new(project_id: Id, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: None,
            project_id,
            title: title.into(),
            date,
            category: MilestoneCategory::default(),
            status: MilestoneStatus::default(),
            push_id: None,
            objective_id: None,
            lead_department_id: None,
        }
    }

    pub fn with_category(mut self, category: MilestoneCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_status(mut self, status: MilestoneStatus) -> Self {
        self.status = status;
        self
    }
}

/// DTO for creating a milestone
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestoneDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: MilestoneCategory,
    #[serde(default)]
    pub status: MilestoneStatus,
    pub push_id: Option<Id>,
    pub objective_id: Option<Id>,
    pub lead_department_id: Option<Id>,
}

impl CreateMilestoneDto {
    pub fn into_milestone(self, project_id: Id) -> Milestone {
        Milestone {
            id: None,
            project_id,
            title: self.title,
            date: self.date,
            category: self.category,
            status: self.status,
            push_id: self.push_id,
            objective_id: self.objective_id,
            lead_department_id: self.lead_department_id,
        }
    }
}
