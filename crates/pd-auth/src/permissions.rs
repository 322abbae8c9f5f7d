//! Permission system
//!
//! Role-based access control as pure predicates over `(role, action)`.

use pd_models::Role;
use thiserror::Error;

use crate::session::Session;

/// Authorization errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    Required,
    #[error("Session expired")]
    Expired,
    #[error("{role} may not {action}")]
    Forbidden { role: Role, action: Action },
}

/// Something a signed-in user may attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ViewProjects,
    EditProject,
    ManagePushes,
    ManageMilestones,
    ManageBudget,
    ManageCommunications,
    ManagePeople,
    ViewAuditLog,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::ViewProjects,
        Action::EditProject,
        Action::ManagePushes,
        Action::ManageMilestones,
        Action::ManageBudget,
        Action::ManageCommunications,
        Action::ManagePeople,
        Action::ViewAuditLog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewProjects => "view projects",
            Self::EditProject => "edit projects",
            Self::ManagePushes => "manage pushes",
            Self::ManageMilestones => "manage milestones",
            Self::ManageBudget => "manage budget lines",
            Self::ManageCommunications => "manage communications plans",
            Self::ManagePeople => "manage people",
            Self::ViewAuditLog => "view the audit log",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `role` may perform `action`
pub fn can(role: Role, action: Action) -> bool {
    match role {
        Role::Admin => true,
        Role::Editor => !matches!(action, Action::ManagePeople | Action::ViewAuditLog),
        Role::Viewer => matches!(action, Action::ViewProjects),
    }
}

/// `Ok(())` when the session's role may perform `action`
pub fn require(session: &Session, action: Action) -> Result<(), AuthError> {
    if can(session.role, action) {
        Ok(())
    } else {
        tracing::debug!(user_id = %session.user_id, role = %session.role, %action, "Permission denied");
        Err(AuthError::Forbidden {
            role: session.role,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_core::clock::FixedClock;
    use uuid::Uuid;

    #[test]
    fn test_admin_can_do_everything() {
        for action in Action::ALL {
            assert!(can(Role::Admin, action), "{:?}", action);
        }
    }

    #[test]
    fn test_editor_manages_content_only() {
        assert!(can(Role::Editor, Action::ViewProjects));
        assert!(can(Role::Editor, Action::EditProject));
        assert!(can(Role::Editor, Action::ManagePushes));
        assert!(can(Role::Editor, Action::ManageMilestones));
        assert!(can(Role::Editor, Action::ManageBudget));
        assert!(can(Role::Editor, Action::ManageCommunications));
        assert!(!can(Role::Editor, Action::ManagePeople));
        assert!(!can(Role::Editor, Action::ViewAuditLog));
    }

    #[test]
    fn test_viewer_only_views() {
        for action in Action::ALL {
            assert_eq!(can(Role::Viewer, action), action == Action::ViewProjects);
        }
    }

    #[test]
    fn test_permissions_grow_with_role() {
        for action in Action::ALL {
            if can(Role::Viewer, action) {
                assert!(can(Role::Editor, action));
            }
            if can(Role::Editor, action) {
                assert!(can(Role::Admin, action));
            }
        }
    }

    #[test]
    fn test_require() {
        let clock = FixedClock::on(2026, 1, 1).unwrap();
        let session = Session::new(Uuid::new_v4(), "v@example.org", Role::Viewer, 3600, &clock);

        assert!(require(&session, Action::ViewProjects).is_ok());
        let err = require(&session, Action::ManageMilestones).unwrap_err();
        assert_eq!(err.to_string(), "VIEWER may not manage milestones");
    }
}
