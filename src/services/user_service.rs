//! User profile service: caller resolution, profile management and notes.

use log::{debug, info, warn};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::Database;
use std::sync::Arc;

use crate::config::CONFIG;
use crate::constants::{
    CODE_ACCOUNT_DEACTIVATED, CODE_EMAIL_EXISTS, CODE_INVALID_MANAGER, CODE_INVALID_SUBORDINATE,
    CODE_INVALID_TOKEN, CODE_ROLE_NOT_FOUND, CODE_STAFF_REQUIRED, CODE_USER_NOT_FOUND,
    CODE_WRONG_PASSWORD, DEFAULT_ADMIN_ROLE_NAME, DEFAULT_MANAGER_ROLE_NAME,
    DEFAULT_SALES_ROLE_NAME, ERR_ACCOUNT_DEACTIVATED, ERR_EMAIL_IN_USE, ERR_FAILED_FETCH_USER,
    ERR_INVALID_TOKEN, ERR_MANAGER_ROLE_REQUIRED, ERR_ROLE_NOT_FOUND, ERR_SALES_ROLE_REQUIRED,
    ERR_STAFF_ONLY, ERR_USER_NOT_FOUND, ERR_WRONG_PASSWORD, PERM_CHANGE_ROLE,
    PERM_CHANGE_USERPROFILE, PERM_LIST_USERPROFILE, PERM_VIEW_USERPROFILE,
};
use crate::errors::ApiError;
use crate::middleware::not_found_unless;
use crate::models::{
    AddNoteRequest, AssignManagerRequest, AssignRoleRequest, ChangePasswordRequest, Claims,
    CreateProfileRequest, CurrentUser, Page, UpdateProfileRequest, UserNote, UserNoteResponse,
    UserProfile, UserResponse,
};
use crate::repositories::{search_filter, RoleRepository, UserRepository};
use crate::services::auth_service::{hash_password, verify_password};
use crate::services::TenantService;
use crate::utils::mask_email;
use crate::validators::validate_password_match;

pub struct UserService {
    repository: Arc<UserRepository>,
    roles: Arc<RoleRepository>,
}

/// Build a fresh, active profile with no role.
pub fn new_profile(
    tenant_id: ObjectId,
    email: &str,
    first_name: String,
    last_name: String,
    password_hash: String,
) -> UserProfile {
    let now = mongodb::bson::DateTime::now();
    UserProfile {
        id: ObjectId::new(),
        tenant_id,
        email: email.trim().to_lowercase(),
        first_name,
        last_name,
        password_hash,
        is_active: true,
        is_staff: false,
        is_superuser: false,
        total_contacts_locked: 0,
        total_customers: 0,
        role_id: None,
        manager_id: None,
        created_at: now,
        updated_at: now,
        last_login: None,
    }
}

/// Staff, the user themself, or the user's manager.
fn can_view_notes(caller: &CurrentUser, target: &UserProfile) -> bool {
    caller.is_staff() || caller.id() == target.id || caller.manages(target)
}

impl UserService {
    pub fn new(db: &Database) -> Self {
        Self {
            repository: Arc::new(UserRepository::new(db)),
            roles: Arc::new(RoleRepository::new(db)),
        }
    }

    /// Resolve the authenticated caller with their role.
    pub async fn current_user(&self, claims: &Claims) -> Result<CurrentUser, ApiError> {
        let user_id = claims.user_id()?;
        let tenant_id = claims.tenant_object_id()?;

        let profile = self
            .repository
            .find_in_tenant(tenant_id, user_id)
            .await?
            .ok_or_else(|| {
                warn!("Token for unknown user {}", claims.sub);
                ApiError::unauthorized(CODE_INVALID_TOKEN, ERR_INVALID_TOKEN)
            })?;

        if !profile.is_active {
            return Err(ApiError::unauthorized(
                CODE_ACCOUNT_DEACTIVATED,
                ERR_ACCOUNT_DEACTIVATED,
            ));
        }

        let role = match profile.role_id {
            Some(role_id) => self.roles.find_in_tenant(tenant_id, role_id).await?,
            None => None,
        };
        Ok(CurrentUser { profile, role })
    }

    async fn target(&self, caller: &CurrentUser, id: &str) -> Result<UserProfile, ApiError> {
        let id = ObjectId::parse_str(id)?;
        self.repository
            .find_in_tenant(caller.tenant_id(), id)
            .await?
            .ok_or_else(|| ApiError::not_found(CODE_USER_NOT_FOUND, ERR_USER_NOT_FOUND))
    }

    async fn role_name(&self, profile: &UserProfile) -> Result<Option<String>, ApiError> {
        match profile.role_id {
            Some(role_id) => Ok(self
                .roles
                .find_in_tenant(profile.tenant_id, role_id)
                .await?
                .map(|role| role.name)),
            None => Ok(None),
        }
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), ApiError> {
        if self.repository.find_by_email(email).await?.is_some() {
            return Err(ApiError::bad_request(CODE_EMAIL_EXISTS, ERR_EMAIL_IN_USE));
        }
        Ok(())
    }

    async fn reload(&self, id: ObjectId) -> Result<UserProfile, ApiError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::internal(ERR_FAILED_FETCH_USER))
    }

    /// Profiles of the caller's tenant. Managers without staff rights only
    /// see their own reports.
    pub async fn list_profiles(
        &self,
        caller: &CurrentUser,
        page: Page,
        search: Option<&str>,
    ) -> Result<(Vec<UserResponse>, u64), ApiError> {
        not_found_unless(caller.has_perm(PERM_LIST_USERPROFILE))?;

        let mut filter = doc! { "tenant_id": caller.tenant_id() };
        if !caller.is_staff() && caller.is_manager() {
            filter.insert("manager_id", caller.id());
        }
        if let Some(term) = search {
            filter.extend(search_filter(term, &["email", "first_name", "last_name"]));
        }
        debug!("Listing profiles with filter: {:?}", filter);

        let total = self.repository.count(filter.clone()).await?;
        let users = self
            .repository
            .find_with_filter(filter, page.skip(), page.limit())
            .await?;
        Ok((users.into_iter().map(UserResponse::from).collect(), total))
    }

    pub async fn create_profile(
        &self,
        caller: &CurrentUser,
        req: CreateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        if !caller.is_staff() {
            return Err(ApiError::unauthorized(CODE_STAFF_REQUIRED, ERR_STAFF_ONLY));
        }
        validate_password_match(&req.password, &req.confirm_password)?;
        self.ensure_email_free(&req.email).await?;

        let profile = new_profile(
            caller.tenant_id(),
            &req.email,
            req.first_name,
            req.last_name,
            hash_password(&req.password)?,
        );
        self.repository.insert(&profile).await.map_err(|err| match err {
            ApiError::Conflict { .. } => ApiError::bad_request(CODE_EMAIL_EXISTS, ERR_EMAIL_IN_USE),
            other => other,
        })?;

        info!(
            "User {} created {} in tenant {}",
            caller.id(),
            mask_email(&profile.email),
            profile.tenant_id
        );
        Ok(profile)
    }

    pub async fn get_profile(&self, caller: &CurrentUser, id: &str) -> Result<UserProfile, ApiError> {
        let target = self.target(caller, id).await?;
        not_found_unless(
            caller.has_perm(PERM_VIEW_USERPROFILE)
                || caller.id() == target.id
                || caller.manages(&target),
        )?;
        Ok(target)
    }

    pub async fn update_profile(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        let target = self.target(caller, id).await?;
        not_found_unless(caller.is_staff() || caller.id() == target.id)?;

        let mut set = Document::new();
        if let Some(email) = req.email {
            let email = email.trim().to_lowercase();
            if email != target.email {
                self.ensure_email_free(&email).await?;
                set.insert("email", email);
            }
        }
        if let Some(first_name) = req.first_name {
            set.insert("first_name", first_name);
        }
        if let Some(last_name) = req.last_name {
            set.insert("last_name", last_name);
        }
        if let Some(is_active) = req.is_active {
            if caller.is_staff() {
                set.insert("is_active", is_active);
            } else {
                warn!("Ignoring is_active change by non-staff user {}", caller.id());
            }
        }

        if !set.is_empty() {
            self.repository.update(target.id, set).await?;
        }
        self.reload(target.id).await
    }

    /// `old_password` is checked against the caller's own password.
    pub async fn update_password(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        let target = self.target(caller, id).await?;
        not_found_unless(caller.is_staff() || caller.id() == target.id)?;

        if !verify_password(&req.old_password, &caller.profile.password_hash)? {
            return Err(ApiError::bad_request(CODE_WRONG_PASSWORD, ERR_WRONG_PASSWORD));
        }
        validate_password_match(&req.new_password, &req.confirm_password)?;

        self.repository
            .update_password(target.id, &hash_password(&req.new_password)?)
            .await?;
        info!("Password updated for user {} by {}", target.id, caller.id());
        Ok(())
    }

    pub async fn update_role(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: AssignRoleRequest,
    ) -> Result<(), ApiError> {
        not_found_unless(caller.has_perm(PERM_CHANGE_ROLE))?;
        let target = self.target(caller, id).await?;

        let role = self
            .roles
            .find_by_name(caller.tenant_id(), req.role.trim())
            .await?
            .ok_or_else(|| ApiError::not_found(CODE_ROLE_NOT_FOUND, ERR_ROLE_NOT_FOUND))?;

        self.repository
            .update(target.id, doc! { "role_id": role.id })
            .await?;
        info!("User {} assigned role {} to {}", caller.id(), role.name, target.id);
        Ok(())
    }

    pub async fn assign_manager(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: AssignManagerRequest,
    ) -> Result<(), ApiError> {
        not_found_unless(caller.has_perm(PERM_CHANGE_USERPROFILE))?;
        let target = self.target(caller, id).await?;
        let manager = self.target(caller, &req.manager_id).await?;

        if self.role_name(&manager).await?.as_deref() != Some(DEFAULT_MANAGER_ROLE_NAME) {
            return Err(ApiError::bad_request(
                CODE_INVALID_MANAGER,
                ERR_MANAGER_ROLE_REQUIRED,
            ));
        }
        if self.role_name(&target).await?.as_deref() != Some(DEFAULT_SALES_ROLE_NAME) {
            return Err(ApiError::bad_request(
                CODE_INVALID_SUBORDINATE,
                ERR_SALES_ROLE_REQUIRED,
            ));
        }

        self.repository
            .update(target.id, doc! { "manager_id": manager.id })
            .await?;
        info!("User {} now reports to {}", target.id, manager.id);
        Ok(())
    }

    pub async fn get_notes(
        &self,
        caller: &CurrentUser,
        id: &str,
        page: Page,
    ) -> Result<(Vec<UserNoteResponse>, u64), ApiError> {
        let target = self.target(caller, id).await?;
        not_found_unless(can_view_notes(caller, &target))?;

        let total = self.repository.count_notes(target.id).await?;
        let notes = self
            .repository
            .find_notes(target.id, page.skip(), page.limit())
            .await?;
        Ok((notes.into_iter().map(UserNoteResponse::from).collect(), total))
    }

    pub async fn add_note(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: AddNoteRequest,
    ) -> Result<UserNote, ApiError> {
        let target = self.target(caller, id).await?;
        not_found_unless(can_view_notes(caller, &target))?;

        let note = UserNote {
            id: ObjectId::new(),
            tenant_id: target.tenant_id,
            user_id: target.id,
            created_on: mongodb::bson::DateTime::now(),
            note: req.note,
        };
        self.repository.insert_note(&note).await?;
        Ok(note)
    }

    /// Create the configured tenant and superuser when no superuser exists yet.
    pub async fn seed_admin(&self, tenants: &TenantService) -> Result<(), ApiError> {
        if self.repository.superuser_exists().await? {
            debug!("Superuser already present, skipping seed");
            return Ok(());
        }
        if self
            .repository
            .find_by_email(&CONFIG.admin_email)
            .await?
            .is_some()
        {
            warn!(
                "Seed admin email {} belongs to an existing user, skipping seed",
                mask_email(&CONFIG.admin_email)
            );
            return Ok(());
        }

        let tenant = tenants
            .ensure(&CONFIG.admin_tenant_name, &CONFIG.admin_tenant_subdomain)
            .await?;
        let admin_role = self
            .roles
            .find_by_name(tenant.id, DEFAULT_ADMIN_ROLE_NAME)
            .await?;

        let mut profile = new_profile(
            tenant.id,
            &CONFIG.admin_email,
            CONFIG.admin_first_name.clone(),
            CONFIG.admin_last_name.clone(),
            hash_password(&CONFIG.admin_password)?,
        );
        profile.is_staff = true;
        profile.is_superuser = true;
        profile.role_id = admin_role.map(|role| role.id);
        self.repository.insert(&profile).await?;

        info!(
            "Seeded superuser {} in tenant {}",
            mask_email(&profile.email),
            tenant.subdomain_prefix
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::fixtures::profile;

    #[test]
    fn test_new_profile_normalises_email() {
        let p = new_profile(
            ObjectId::new(),
            "  Dana@Example.COM ",
            "Dana".into(),
            "Reyes".into(),
            "hash".into(),
        );
        assert_eq!(p.email, "dana@example.com");
        assert!(p.is_active);
        assert!(!p.is_staff);
        assert_eq!(p.total_contacts_locked, 0);
        assert!(p.role_id.is_none());
    }

    #[test]
    fn test_note_access() {
        let tenant = ObjectId::new();
        let manager = CurrentUser {
            profile: profile(tenant, "Mia", "Park"),
            role: None,
        };
        let mut rep = profile(tenant, "Rob", "Diaz");
        assert!(!can_view_notes(&manager, &rep));

        rep.manager_id = Some(manager.id());
        assert!(can_view_notes(&manager, &rep));

        let myself = CurrentUser {
            profile: rep.clone(),
            role: None,
        };
        assert!(can_view_notes(&myself, &rep));

        let mut staff = profile(tenant, "Sue", "Kim");
        staff.is_staff = true;
        let staff = CurrentUser { profile: staff, role: None };
        assert!(can_view_notes(&staff, &profile(tenant, "Al", "Ng")));
    }
}
