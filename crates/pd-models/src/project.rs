//! Project model
//!
//! The aggregate that owns pushes and milestones.

use pd_core::error::PdError;
use pd_core::result::PdResult;
use pd_core::traits::{Entity, Id};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Active,
    Paused,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Completed => "COMPLETED",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Archived projects are read-only
    pub fn is_writable(&self) -> bool {
        !matches!(self, Self::Archived)
    }
}

/// Project entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Option<Id>,

    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    pub status: ProjectStatus,
}

impl Entity for Project {
    const TYPE_NAME: &'static str = "Project";
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            status: ProjectStatus::Active,
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    /// `Conflict` unless pushes and milestones may still be added
    pub fn ensure_writable(&self) -> PdResult<()> {
        if self.status.is_writable() {
            return Ok(());
        }
        let name = match self.id {
            Some(id) => format!("{} {}", Self::TYPE_NAME, id),
            None => format!("{} {:?}", Self::TYPE_NAME, self.name),
        };
        Err(PdError::conflict(format!(
            "{} is {} and cannot be changed",
            name,
            self.status.as_str()
        )))
    }
}
