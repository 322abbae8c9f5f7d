//! # pd-models
//!
//! Domain models for the project dashboard.
//!
//! Projects own their pushes and milestones. Models carry `validator` rules;
//! `validation::validate` converts failures into `pd_core::ValidationErrors`.

pub use pd_core::traits::{Dated, Entity, Id, ProjectScoped};

pub mod milestone;
pub mod project;
pub mod push;
pub mod role;
pub mod validation;

pub use milestone::{CreateMilestoneDto, Milestone, MilestoneCategory, MilestoneStatus};
pub use project::{Project, ProjectStatus};
pub use push::{CreatePushDto, Push};
pub use role::Role;
pub use validation::validate;
