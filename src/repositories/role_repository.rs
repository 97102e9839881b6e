use futures::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{ClientSession, Collection, Database, IndexModel};

use crate::constants::COLLECTION_ROLES;
use crate::errors::ApiError;
use crate::models::Role;

pub struct RoleRepository {
    collection: Collection<Role>,
}

impl RoleRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_ROLES),
        }
    }

    /// Role names are unique within a tenant.
    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for roles collection...");
        let index = IndexModel::builder()
            .keys(doc! { "tenant_id": 1, "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    pub async fn insert(&self, role: &Role) -> Result<(), ApiError> {
        self.collection.insert_one(role).await?;
        Ok(())
    }

    pub async fn insert_many_in(
        &self,
        roles: &[Role],
        session: &mut ClientSession,
    ) -> Result<(), ApiError> {
        self.collection
            .insert_many(roles)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Role>, ApiError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_in_tenant(
        &self,
        tenant_id: ObjectId,
        id: ObjectId,
    ) -> Result<Option<Role>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id, "tenant_id": tenant_id })
            .await?)
    }

    pub async fn find_by_name(
        &self,
        tenant_id: ObjectId,
        name: &str,
    ) -> Result<Option<Role>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "tenant_id": tenant_id, "name": name })
            .await?)
    }

    pub async fn find_by_tenant(&self, tenant_id: ObjectId) -> Result<Vec<Role>, ApiError> {
        let cursor = self
            .collection
            .find(doc! { "tenant_id": tenant_id })
            .sort(doc! { "name": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update_permissions(
        &self,
        id: ObjectId,
        permissions: &[String],
    ) -> Result<(), ApiError> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "permissions": permissions.to_vec() } },
            )
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool, ApiError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
