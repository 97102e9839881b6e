//! The authenticated caller, resolved from JWT claims.

use mongodb::bson::oid::ObjectId;

use crate::constants::DEFAULT_MANAGER_ROLE_NAME;
use crate::models::{Role, UserProfile};

/// Caller profile together with its role, loaded once per request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub profile: UserProfile,
    pub role: Option<Role>,
}

impl CurrentUser {
    pub fn id(&self) -> ObjectId {
        self.profile.id
    }

    pub fn tenant_id(&self) -> ObjectId {
        self.profile.tenant_id
    }

    pub fn is_staff(&self) -> bool {
        self.profile.is_staff || self.profile.is_superuser
    }

    /// Superusers hold every permission; others only what their role lists.
    pub fn has_perm(&self, codename: &str) -> bool {
        if self.profile.is_superuser {
            return true;
        }
        self.role
            .as_ref()
            .map(|role| role.has_permission(codename))
            .unwrap_or(false)
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role.as_ref().map(|role| role.name.as_str())
    }

    pub fn is_manager(&self) -> bool {
        self.role_name() == Some(DEFAULT_MANAGER_ROLE_NAME)
    }

    /// True when the caller is `target`'s assigned manager.
    pub fn manages(&self, target: &UserProfile) -> bool {
        target.manager_id == Some(self.profile.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{manager_permissions, PERM_CHANGE_ROLE, PERM_LIST_USERPROFILE};
    use crate::models::user::fixtures::profile;

    fn role(tenant_id: ObjectId, name: &str, permissions: Vec<String>) -> Role {
        Role {
            id: ObjectId::new(),
            tenant_id,
            name: name.to_string(),
            permissions,
            created_at: mongodb::bson::DateTime::now(),
        }
    }

    #[test]
    fn test_permissions_follow_role() {
        let tenant = ObjectId::new();
        let user = CurrentUser {
            profile: profile(tenant, "Mia", "Park"),
            role: Some(role(tenant, "Manager", manager_permissions())),
        };
        assert!(user.has_perm(PERM_LIST_USERPROFILE));
        assert!(!user.has_perm(PERM_CHANGE_ROLE));
        assert!(user.is_manager());
        assert!(!user.is_staff());
    }

    #[test]
    fn test_no_role_means_no_permissions() {
        let user = CurrentUser {
            profile: profile(ObjectId::new(), "Sam", "Lee"),
            role: None,
        };
        assert!(!user.has_perm(PERM_LIST_USERPROFILE));
        assert_eq!(user.role_name(), None);
    }

    #[test]
    fn test_superuser_has_every_permission() {
        let mut p = profile(ObjectId::new(), "Root", "User");
        p.is_superuser = true;
        let user = CurrentUser { profile: p, role: None };
        assert!(user.has_perm(PERM_CHANGE_ROLE));
        assert!(user.is_staff());
    }

    #[test]
    fn test_manages() {
        let tenant = ObjectId::new();
        let manager = CurrentUser {
            profile: profile(tenant, "Mia", "Park"),
            role: None,
        };
        let mut rep = profile(tenant, "Rob", "Diaz");
        assert!(!manager.manages(&rep));
        rep.manager_id = Some(manager.id());
        assert!(manager.manages(&rep));
    }
}
