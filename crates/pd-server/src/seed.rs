//! Development seed data
//!
//! Sign-in users come from `DEV_USERS` (`email:ROLE` pairs, comma separated).
//! A demo project is laid out around the clock's current date so there is
//! always a push in progress.

use anyhow::Context;
use chrono::{Duration, NaiveDate};
use pd_api::ProjectStore;
use pd_auth::MemoryIdentityProvider;
use pd_models::{Milestone, MilestoneCategory, MilestoneStatus, Project, Push, Role};
use tracing::info;

pub const DEFAULT_DEV_USERS: &str = "admin@localhost:ADMIN,editor@localhost:EDITOR,viewer@localhost:VIEWER";

/// Parse `email:ROLE,email:ROLE`
pub fn parse_dev_users(spec: &str) -> anyhow::Result<Vec<(String, Role)>> {
    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> anyhow::Result<(String, Role)> {
            let (email, role) = entry
                .rsplit_once(':')
                .with_context(|| format!("expected email:ROLE, got {:?}", entry))?;
            let role: Role = role.parse()?;
            Ok((email.trim().to_string(), role))
        })
        .collect()
}

pub fn seed_users(identity: &MemoryIdentityProvider, users: &[(String, Role)]) {
    for (email, role) in users {
        let user = identity.add_user(email.as_str(), *role);
        info!(email = %user.email, role = %user.role, "Seeded dev user");
    }
}

/// Demo project with a running push and milestones across three years
pub async fn seed_demo_project(store: &dyn ProjectStore, today: NaiveDate) -> anyhow::Result<Project> {
    let project = store
        .insert_project(Project::new("Demo Campaign"))
        .await
        .context("inserting demo project")?;
    let project_id = project.id.context("store did not assign a project id")?;

    let pushes = [
        Push::new(project_id, 1, today - Duration::days(120), today - Duration::days(60))
            .with_name("Research"),
        Push::new(project_id, 2, today - Duration::days(14), today + Duration::days(30))
            .with_name("Outreach"),
    ];
    for push in pushes {
        store.insert_push(push).await.context("inserting demo push")?;
    }

    let milestones = [
        Milestone::new(project_id, "Kickoff", today - Duration::days(400))
            .with_category(MilestoneCategory::Event)
            .with_status(MilestoneStatus::Done),
        Milestone::new(project_id, "Stakeholder briefing", today - Duration::days(30))
            .with_category(MilestoneCategory::Communications)
            .with_status(MilestoneStatus::Done),
        Milestone::new(project_id, "Funding decision", today + Duration::days(10))
            .with_category(MilestoneCategory::Funding)
            .with_status(MilestoneStatus::InProgress),
        Milestone::new(project_id, "Annual report", today + Duration::days(200))
            .with_category(MilestoneCategory::Report),
    ];
    let count = milestones.len();
    for milestone in milestones {
        store
            .insert_milestone(milestone)
            .await
            .context("inserting demo milestone")?;
    }

    info!(project_id, milestones = count, "Seeded demo project");
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_api::MemoryProjectStore;

    #[test]
    fn test_parse_dev_users() {
        let users = parse_dev_users(" a@x.org:admin, b@x.org:VIEWER ,").unwrap();
        assert_eq!(
            users,
            vec![
                ("a@x.org".to_string(), Role::Admin),
                ("b@x.org".to_string(), Role::Viewer),
            ]
        );
        assert_eq!(parse_dev_users(DEFAULT_DEV_USERS).unwrap().len(), 3);
    }

    #[test]
    fn test_parse_dev_users_rejects_bad_entries() {
        assert!(parse_dev_users("no-role-here").is_err());
        assert!(parse_dev_users("a@x.org:owner").is_err());
    }

    #[tokio::test]
    async fn test_demo_project_has_current_push() {
        let store = MemoryProjectStore::new();
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let project = seed_demo_project(&store, today).await.unwrap();
        let id = project.id.unwrap();

        let pushes = store.pushes_for(id).await.unwrap();
        let running: Vec<_> = pushes.iter().filter(|p| p.contains(today)).collect();
        assert_eq!(running.len(), 1);
        assert_eq!(running[0].sequence_index, 2);
        assert_eq!(store.milestones_for(id).await.unwrap().len(), 4);
    }
}
