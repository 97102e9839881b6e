//! Role management within a tenant.

use log::{info, warn};
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Database;
use std::sync::Arc;

use crate::constants::{
    is_default_role, CODE_ROLE_EXISTS, CODE_ROLE_IN_USE, CODE_ROLE_NOT_FOUND,
    CODE_ROLE_PROTECTED, ERR_CANNOT_DELETE_DEFAULT_ROLES, ERR_CANNOT_UPDATE_ADMIN_ROLE,
    ERR_ROLE_EXISTS, ERR_ROLE_IN_USE, ERR_ROLE_NOT_FOUND, PERM_ADD_ROLE, PERM_CHANGE_ROLE,
    PERM_DELETE_ROLE, PERM_VIEW_ROLE,
};
use crate::errors::ApiError;
use crate::middleware::require_perm;
use crate::models::{CreateRoleRequest, CurrentUser, Role, UpdateRoleRequest};
use crate::repositories::{RoleRepository, UserRepository};
use crate::validators::parse_permissions;

pub struct RoleService {
    repository: Arc<RoleRepository>,
    users: Arc<UserRepository>,
}

impl RoleService {
    pub fn new(db: &Database) -> Self {
        Self {
            repository: Arc::new(RoleRepository::new(db)),
            users: Arc::new(UserRepository::new(db)),
        }
    }

    async fn find(&self, caller: &CurrentUser, id: &str) -> Result<Role, ApiError> {
        let id = ObjectId::parse_str(id)?;
        self.repository
            .find_in_tenant(caller.tenant_id(), id)
            .await?
            .ok_or_else(|| ApiError::not_found(CODE_ROLE_NOT_FOUND, ERR_ROLE_NOT_FOUND))
    }

    pub async fn list(&self, caller: &CurrentUser) -> Result<Vec<Role>, ApiError> {
        require_perm(caller, PERM_VIEW_ROLE)?;
        self.repository.find_by_tenant(caller.tenant_id()).await
    }

    pub async fn get(&self, caller: &CurrentUser, id: &str) -> Result<Role, ApiError> {
        require_perm(caller, PERM_VIEW_ROLE)?;
        self.find(caller, id).await
    }

    pub async fn create(&self, caller: &CurrentUser, req: CreateRoleRequest) -> Result<Role, ApiError> {
        require_perm(caller, PERM_ADD_ROLE)?;
        let permissions = parse_permissions(&req.permissions)?;
        let name = req.name.trim().to_string();

        let exists = || ApiError::bad_request(CODE_ROLE_EXISTS, ERR_ROLE_EXISTS);
        if self
            .repository
            .find_by_name(caller.tenant_id(), &name)
            .await?
            .is_some()
        {
            return Err(exists());
        }

        let role = Role {
            id: ObjectId::new(),
            tenant_id: caller.tenant_id(),
            name,
            permissions,
            created_at: mongodb::bson::DateTime::now(),
        };
        self.repository.insert(&role).await.map_err(|err| match err {
            ApiError::Conflict { .. } => exists(),
            other => other,
        })?;

        info!("Role {} created in tenant {}", role.name, role.tenant_id);
        Ok(role)
    }

    /// Replace the permission list. The name never changes.
    pub async fn update(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: UpdateRoleRequest,
    ) -> Result<Role, ApiError> {
        require_perm(caller, PERM_CHANGE_ROLE)?;
        let mut role = self.find(caller, id).await?;
        if role.is_admin_role() {
            return Err(ApiError::bad_request(
                CODE_ROLE_PROTECTED,
                ERR_CANNOT_UPDATE_ADMIN_ROLE,
            ));
        }

        role.permissions = parse_permissions(&req.permissions)?;
        self.repository
            .update_permissions(role.id, &role.permissions)
            .await?;
        info!("Role {} permissions updated by {}", role.name, caller.id());
        Ok(role)
    }

    pub async fn delete(&self, caller: &CurrentUser, id: &str) -> Result<(), ApiError> {
        require_perm(caller, PERM_DELETE_ROLE)?;
        let role = self.find(caller, id).await?;
        if is_default_role(&role.name) {
            return Err(ApiError::bad_request(
                CODE_ROLE_PROTECTED,
                ERR_CANNOT_DELETE_DEFAULT_ROLES,
            ));
        }

        let holders = self.users.count(doc! { "role_id": role.id }).await?;
        if holders > 0 {
            warn!("Role {} still assigned to {} users", role.name, holders);
            return Err(ApiError::conflict(CODE_ROLE_IN_USE, ERR_ROLE_IN_USE));
        }

        self.repository.delete(role.id).await?;
        info!("Role {} deleted by {}", role.name, caller.id());
        Ok(())
    }
}
