//! Session identity and viewer context.
//!
//! Authentication itself is delegated to the external auth service; at login
//! it stores serialized [`AuthenticatedUser`] claims in the identity cookie.
//! This module only interprets those claims.

use serde::{Deserialize, Serialize};

use crate::ADMIN_ROLE;
use crate::domain::project::Project;
use crate::domain::types::UserId;

/// Claims carried by the identity cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Subject identifier from the auth service.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

impl AuthenticatedUser {
    /// The subject as a domain [`UserId`].
    pub fn user_id(&self) -> Result<UserId, crate::domain::types::TypeConstraintError> {
        UserId::new(self.sub.as_str())
    }
}

/// Identity and role of the current browser session, used by visibility and
/// authorization checks. Built once per request from the optional session
/// identity and the configured admin list.
#[derive(Debug, Clone, Default)]
pub struct ViewerContext {
    pub user_id: Option<UserId>,
    pub is_admin: bool,
}

impl ViewerContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(user: Option<&AuthenticatedUser>, admin_emails: &[String]) -> Self {
        match user {
            Some(user) => {
                let is_admin = user.roles.iter().any(|r| r == ADMIN_ROLE)
                    || admin_emails.iter().any(|e| e == &user.email);
                Self {
                    user_id: user.user_id().ok(),
                    is_admin,
                }
            }
            None => Self::anonymous(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    fn owns(&self, owner: &UserId) -> bool {
        self.user_id.as_ref() == Some(owner)
    }

    /// Hidden projects are visible only to their owner or an admin.
    pub fn can_view(&self, project: &Project) -> bool {
        !project.is_hidden || self.is_admin || self.owns(&project.owner_id)
    }

    /// Editing and visibility toggles are allowed to the owner or an admin.
    pub fn can_edit(&self, project: &Project) -> bool {
        self.is_admin || self.owns(&project.owner_id)
    }

    /// Comment deletion is allowed to the author or an admin; content edits
    /// are author-only and checked separately.
    pub fn can_delete_comment(&self, author: &UserId) -> bool {
        self.is_admin || self.owns(author)
    }

    pub fn is_author(&self, author: &UserId) -> bool {
        self.owns(author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(sub: &str, email: &str, roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: sub.into(),
            email: email.into(),
            name: "Test".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: i64::MAX,
        }
    }

    #[test]
    fn admin_role_grants_admin() {
        let viewer = ViewerContext::new(Some(&user("1", "a@b.c", &["admin"])), &[]);
        assert!(viewer.is_admin);
    }

    #[test]
    fn configured_email_grants_admin() {
        let viewer =
            ViewerContext::new(Some(&user("1", "dean@academy.ru", &[])), &["dean@academy.ru".into()]);
        assert!(viewer.is_admin);
    }

    #[test]
    fn anonymous_viewer_has_no_rights() {
        let viewer = ViewerContext::new(None, &["dean@academy.ru".into()]);
        assert!(!viewer.is_admin);
        assert!(!viewer.is_authenticated());
    }
}
