//! Project storage seam
//!
//! Loaders only ever see records already scoped to one project.

use async_trait::async_trait;
use parking_lot::RwLock;
use pd_core::traits::{Entity, Id, ProjectScoped};
use pd_models::{Milestone, Project, Push};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Id },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Storage error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found<T: Entity>(id: Id) -> Self {
        StoreError::NotFound { entity: T::TYPE_NAME, id }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn find_project(&self, id: Id) -> StoreResult<Option<Project>>;

    async fn pushes_for(&self, project_id: Id) -> StoreResult<Vec<Push>>;

    async fn milestones_for(&self, project_id: Id) -> StoreResult<Vec<Milestone>>;

    async fn insert_project(&self, project: Project) -> StoreResult<Project>;

    /// Store a push; its sequence must exceed every existing one in the project
    async fn insert_push(&self, push: Push) -> StoreResult<Push>;

    async fn insert_milestone(&self, milestone: Milestone) -> StoreResult<Milestone>;
}

#[derive(Default)]
struct Tables {
    next_id: Id,
    projects: BTreeMap<Id, Project>,
    pushes: Vec<Push>,
    milestones: Vec<Milestone>,
}

impl Tables {
    fn allocate_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn require_project(&self, id: Id) -> StoreResult<()> {
        if self.projects.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::not_found::<Project>(id))
        }
    }
}

fn scoped_to<T: ProjectScoped + Clone>(rows: &[T], project_id: Id) -> Vec<T> {
    rows.iter()
        .filter(|row| row.project_id() == project_id)
        .cloned()
        .collect()
}

/// In-memory store used by the development server and tests
#[derive(Default)]
pub struct MemoryProjectStore {
    tables: RwLock<Tables>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn find_project(&self, id: Id) -> StoreResult<Option<Project>> {
        Ok(self.tables.read().projects.get(&id).cloned())
    }

    async fn pushes_for(&self, project_id: Id) -> StoreResult<Vec<Push>> {
        Ok(scoped_to(&self.tables.read().pushes, project_id))
    }

    async fn milestones_for(&self, project_id: Id) -> StoreResult<Vec<Milestone>> {
        Ok(scoped_to(&self.tables.read().milestones, project_id))
    }

    async fn insert_project(&self, mut project: Project) -> StoreResult<Project> {
        let mut tables = self.tables.write();
        let id = match project.id {
            Some(id) if tables.projects.contains_key(&id) => {
                return Err(StoreError::Conflict(format!(
                    "{} {} already exists",
                    Project::TYPE_NAME,
                    id
                )));
            }
            Some(id) => {
                tables.next_id = tables.next_id.max(id);
                id
            }
            None => tables.allocate_id(),
        };
        project.id = Some(id);
        tables.projects.insert(id, project.clone());
        Ok(project)
    }

    async fn insert_push(&self, mut push: Push) -> StoreResult<Push> {
        let mut tables = self.tables.write();
        tables.require_project(push.project_id())?;

        let latest = tables
            .pushes
            .iter()
            .filter(|p| p.project_id() == push.project_id())
            .map(|p| p.sequence_index)
            .max();
        if let Some(latest) = latest {
            if push.sequence_index <= latest {
                return Err(StoreError::Conflict(format!(
                    "{} sequence index must be greater than {}",
                    Push::TYPE_NAME,
                    latest
                )));
            }
        }

        push.id = Some(tables.allocate_id());
        tables.pushes.push(push.clone());
        Ok(push)
    }

    async fn insert_milestone(&self, mut milestone: Milestone) -> StoreResult<Milestone> {
        let mut tables = self.tables.write();
        tables.require_project(milestone.project_id())?;

        milestone.id = Some(tables.allocate_id());
        tables.milestones.push(milestone.clone());
        Ok(milestone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_records_are_scoped_to_project() {
        let store = MemoryProjectStore::new();
        let a = store.insert_project(Project::new("A")).await.unwrap();
        let b = store.insert_project(Project::new("B")).await.unwrap();
        let (a, b) = (a.id.unwrap(), b.id.unwrap());

        store
            .insert_milestone(Milestone::new(a, "A1", date(2025, 1, 1)))
            .await
            .unwrap();
        store
            .insert_milestone(Milestone::new(b, "B1", date(2025, 1, 1)))
            .await
            .unwrap();

        let milestones = store.milestones_for(a).await.unwrap();
        assert_eq!(milestones.len(), 1);
        assert_eq!(milestones[0].title, "A1");

        store
            .insert_push(Push::new(b, 1, date(2025, 1, 1), date(2025, 2, 1)))
            .await
            .unwrap();
        assert!(store.pushes_for(a).await.unwrap().is_empty());
        assert_eq!(store.pushes_for(b).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sequence_must_increase() {
        let store = MemoryProjectStore::new();
        let project = store.insert_project(Project::new("A")).await.unwrap().id.unwrap();

        store
            .insert_push(Push::new(project, 3, date(2025, 1, 1), date(2025, 2, 1)))
            .await
            .unwrap();
        let err = store
            .insert_push(Push::new(project, 3, date(2025, 3, 1), date(2025, 4, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Gaps are allowed.
        store
            .insert_push(Push::new(project, 7, date(2025, 3, 1), date(2025, 4, 1)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_insert_requires_project() {
        let store = MemoryProjectStore::new();
        let err = store
            .insert_milestone(Milestone::new(42, "Orphan", date(2025, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "Project", id: 42 }));
    }

    #[tokio::test]
    async fn test_explicit_project_ids() {
        let store = MemoryProjectStore::new();
        store.insert_project(Project::new("A").with_id(10)).await.unwrap();
        let next = store.insert_project(Project::new("B")).await.unwrap();
        assert_eq!(next.id, Some(11));
        let err = store.insert_project(Project::new("C").with_id(10)).await.unwrap_err();
        assert_eq!(err.to_string(), "Conflict: Project 10 already exists");
    }
}
