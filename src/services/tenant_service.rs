//! Tenant administration: creation with default roles and cascade deletion.

use log::{info, warn};
use mongodb::bson::{oid::ObjectId, Document};
use mongodb::{Client, ClientSession, Database};
use std::sync::Arc;

use crate::constants::{
    admin_permissions, manager_permissions, sales_permissions, CODE_CONFLICT,
    CODE_TENANT_NOT_FOUND, DEFAULT_ADMIN_ROLE_NAME, DEFAULT_MANAGER_ROLE_NAME,
    DEFAULT_SALES_ROLE_NAME, ERR_SUBDOMAIN_EXISTS, ERR_TENANT_NOT_FOUND,
};
use crate::errors::ApiError;
use crate::models::{
    CreateTenantRequest, Page, Role, Tenant, UpdateTenantRequest, DEFAULT_LOCK_EXPIRY_DAYS,
    DEFAULT_MAX_PROSPECTS_PER_USER, DEFAULT_PROSPECT_COOLDOWN_DAYS,
};
use crate::repositories::{RoleRepository, TenantRepository};

pub struct TenantService {
    client: Client,
    repository: Arc<TenantRepository>,
    roles: Arc<RoleRepository>,
}

/// The Admin, Manager and Sales roles every tenant starts with.
pub fn default_roles(tenant_id: ObjectId) -> Vec<Role> {
    let now = mongodb::bson::DateTime::now();
    [
        (DEFAULT_ADMIN_ROLE_NAME, admin_permissions()),
        (DEFAULT_MANAGER_ROLE_NAME, manager_permissions()),
        (DEFAULT_SALES_ROLE_NAME, sales_permissions()),
    ]
    .into_iter()
    .map(|(name, permissions)| Role {
        id: ObjectId::new(),
        tenant_id,
        name: name.to_string(),
        permissions,
        created_at: now,
    })
    .collect()
}

impl TenantService {
    pub fn new(client: &Client, db: &Database) -> Self {
        Self {
            client: client.clone(),
            repository: Arc::new(TenantRepository::new(db)),
            roles: Arc::new(RoleRepository::new(db)),
        }
    }

    pub async fn list(&self, page: Page) -> Result<(Vec<Tenant>, u64), ApiError> {
        let total = self.repository.count().await?;
        let tenants = self.repository.find_page(page.skip(), page.limit()).await?;
        Ok((tenants, total))
    }

    pub async fn get(&self, id: ObjectId) -> Result<Tenant, ApiError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(CODE_TENANT_NOT_FOUND, ERR_TENANT_NOT_FOUND))
    }

    /// Create a tenant and its default roles in one transaction.
    pub async fn create(&self, req: CreateTenantRequest) -> Result<Tenant, ApiError> {
        if self
            .repository
            .find_by_subdomain(&req.subdomain_prefix)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict(CODE_CONFLICT, ERR_SUBDOMAIN_EXISTS));
        }

        let tenant = Tenant {
            id: ObjectId::new(),
            name: req.name,
            subdomain_prefix: req.subdomain_prefix,
            max_prospects_per_user: req
                .max_prospects_per_user
                .unwrap_or(DEFAULT_MAX_PROSPECTS_PER_USER),
            prospect_cooldown_days: req
                .prospect_cooldown_days
                .unwrap_or(DEFAULT_PROSPECT_COOLDOWN_DAYS),
            lock_expiry_days: req.lock_expiry_days.unwrap_or(DEFAULT_LOCK_EXPIRY_DAYS),
            created_at: mongodb::bson::DateTime::now(),
        };

        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        match self.insert_with_roles(&tenant, &mut session).await {
            Ok(()) => session.commit_transaction().await?,
            Err(err) => {
                let _ = session.abort_transaction().await;
                return Err(match err {
                    ApiError::Conflict { .. } => {
                        ApiError::conflict(CODE_CONFLICT, ERR_SUBDOMAIN_EXISTS)
                    }
                    other => other,
                });
            }
        }

        info!("Created tenant {} ({})", tenant.name, tenant.subdomain_prefix);
        Ok(tenant)
    }

    async fn insert_with_roles(
        &self,
        tenant: &Tenant,
        session: &mut ClientSession,
    ) -> Result<(), ApiError> {
        self.repository.insert(tenant, session).await?;
        self.roles
            .insert_many_in(&default_roles(tenant.id), session)
            .await
    }

    pub async fn update(&self, id: ObjectId, req: UpdateTenantRequest) -> Result<Tenant, ApiError> {
        let mut set = Document::new();
        if let Some(name) = req.name {
            set.insert("name", name);
        }
        if let Some(max) = req.max_prospects_per_user {
            set.insert("max_prospects_per_user", max);
        }
        if let Some(days) = req.prospect_cooldown_days {
            set.insert("prospect_cooldown_days", days);
        }
        if let Some(days) = req.lock_expiry_days {
            set.insert("lock_expiry_days", days);
        }

        if !set.is_empty() && !self.repository.update(id, set).await? {
            return Err(ApiError::not_found(CODE_TENANT_NOT_FOUND, ERR_TENANT_NOT_FOUND));
        }
        self.get(id).await
    }

    /// Delete the tenant with every user, role, contact and integration it owns.
    pub async fn delete(&self, id: ObjectId) -> Result<(), ApiError> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        match self.repository.delete_cascade(id, &mut session).await {
            Ok(true) => {
                session.commit_transaction().await?;
                info!("Deleted tenant {}", id);
                Ok(())
            }
            Ok(false) => {
                let _ = session.abort_transaction().await;
                warn!("Tenant {} not found for deletion", id);
                Err(ApiError::not_found(CODE_TENANT_NOT_FOUND, ERR_TENANT_NOT_FOUND))
            }
            Err(err) => {
                let _ = session.abort_transaction().await;
                Err(err)
            }
        }
    }

    /// Look up a tenant by prefix, creating it when missing. Used by start-up seeding.
    pub async fn ensure(&self, name: &str, subdomain_prefix: &str) -> Result<Tenant, ApiError> {
        if let Some(tenant) = self.repository.find_by_subdomain(subdomain_prefix).await? {
            return Ok(tenant);
        }
        self.create(CreateTenantRequest {
            name: name.to_string(),
            subdomain_prefix: subdomain_prefix.to_string(),
            max_prospects_per_user: None,
            prospect_cooldown_days: None,
            lock_expiry_days: None,
        })
        .await
    }

    pub async fn find_all(&self) -> Result<Vec<Tenant>, ApiError> {
        self.repository.find_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ALL_PERMISSIONS, PERM_LIST_USERPROFILE};

    #[test]
    fn test_default_roles() {
        let tenant = ObjectId::new();
        let roles = default_roles(tenant);
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Admin", "Manager", "Sales"]);
        assert!(roles.iter().all(|r| r.tenant_id == tenant));
        assert_eq!(roles[0].permissions.len(), ALL_PERMISSIONS.len());
        assert_eq!(roles[1].permissions, vec![PERM_LIST_USERPROFILE.to_string()]);
        assert!(roles[2].permissions.is_empty());
    }
}
