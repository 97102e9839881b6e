//! Role names and permission codenames.

pub const DEFAULT_ADMIN_ROLE_NAME: &str = "Admin";
pub const DEFAULT_MANAGER_ROLE_NAME: &str = "Manager";
pub const DEFAULT_SALES_ROLE_NAME: &str = "Sales";

pub const DEFAULT_ROLE_NAMES: [&str; 3] = [
    DEFAULT_ADMIN_ROLE_NAME,
    DEFAULT_MANAGER_ROLE_NAME,
    DEFAULT_SALES_ROLE_NAME,
];

// Role model
pub const PERM_ADD_ROLE: &str = "add_role";
pub const PERM_CHANGE_ROLE: &str = "change_role";
pub const PERM_DELETE_ROLE: &str = "delete_role";
pub const PERM_VIEW_ROLE: &str = "view_role";

// UserProfile model
pub const PERM_ADD_USERPROFILE: &str = "add_userprofile";
pub const PERM_CHANGE_USERPROFILE: &str = "change_userprofile";
pub const PERM_VIEW_USERPROFILE: &str = "view_userprofile";
pub const PERM_LIST_USERPROFILE: &str = "list_userprofile";

// Contact model
pub const PERM_ADD_CONTACT: &str = "add_contact";
pub const PERM_CHANGE_CONTACT: &str = "change_contact";
pub const PERM_DELETE_CONTACT: &str = "delete_contact";
pub const PERM_VIEW_CONTACT: &str = "view_contact";

// ContactAssociate model
pub const PERM_ADD_CONTACTASSOCIATE: &str = "add_contactassociate";
pub const PERM_CHANGE_CONTACTASSOCIATE: &str = "change_contactassociate";
pub const PERM_DELETE_CONTACTASSOCIATE: &str = "delete_contactassociate";
pub const PERM_VIEW_CONTACTASSOCIATE: &str = "view_contactassociate";

// ContactNote model
pub const PERM_ADD_CONTACTNOTE: &str = "add_contactnote";
pub const PERM_CHANGE_CONTACTNOTE: &str = "change_contactnote";
pub const PERM_DELETE_CONTACTNOTE: &str = "delete_contactnote";
pub const PERM_VIEW_CONTACTNOTE: &str = "view_contactnote";

// ContactTimeline model
pub const PERM_VIEW_CONTACTTIMELINE: &str = "view_contacttimeline";

/// Every codename a role may carry.
pub const ALL_PERMISSIONS: [&str; 21] = [
    PERM_ADD_ROLE,
    PERM_CHANGE_ROLE,
    PERM_DELETE_ROLE,
    PERM_VIEW_ROLE,
    PERM_ADD_USERPROFILE,
    PERM_CHANGE_USERPROFILE,
    PERM_VIEW_USERPROFILE,
    PERM_LIST_USERPROFILE,
    PERM_ADD_CONTACT,
    PERM_CHANGE_CONTACT,
    PERM_DELETE_CONTACT,
    PERM_VIEW_CONTACT,
    PERM_ADD_CONTACTASSOCIATE,
    PERM_CHANGE_CONTACTASSOCIATE,
    PERM_DELETE_CONTACTASSOCIATE,
    PERM_VIEW_CONTACTASSOCIATE,
    PERM_ADD_CONTACTNOTE,
    PERM_CHANGE_CONTACTNOTE,
    PERM_DELETE_CONTACTNOTE,
    PERM_VIEW_CONTACTNOTE,
    PERM_VIEW_CONTACTTIMELINE,
];

/// Permissions granted to a tenant's default Admin role.
pub fn admin_permissions() -> Vec<String> {
    ALL_PERMISSIONS.iter().map(|p| p.to_string()).collect()
}

/// Permissions granted to a tenant's default Manager role.
pub fn manager_permissions() -> Vec<String> {
    vec![PERM_LIST_USERPROFILE.to_string()]
}

/// Sales users start without model permissions.
pub fn sales_permissions() -> Vec<String> {
    Vec::new()
}

pub fn is_known_permission(codename: &str) -> bool {
    ALL_PERMISSIONS.contains(&codename)
}

pub fn is_default_role(name: &str) -> bool {
    DEFAULT_ROLE_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_every_permission() {
        let perms = admin_permissions();
        assert_eq!(perms.len(), ALL_PERMISSIONS.len());
        assert!(perms.iter().any(|p| p == PERM_VIEW_CONTACTTIMELINE));
    }

    #[test]
    fn test_manager_can_only_list_profiles() {
        assert_eq!(manager_permissions(), vec![PERM_LIST_USERPROFILE.to_string()]);
        assert!(sales_permissions().is_empty());
    }

    #[test]
    fn test_known_permission() {
        assert!(is_known_permission("change_contact"));
        assert!(!is_known_permission("launch_rockets"));
    }

    #[test]
    fn test_default_roles() {
        assert!(is_default_role("Admin"));
        assert!(is_default_role("Sales"));
        assert!(!is_default_role("admin"));
        assert!(!is_default_role("Dispatch"));
    }
}
