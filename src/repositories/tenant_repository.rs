//! Tenant repository, including the cross-collection cascade delete.

use futures::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use mongodb::{ClientSession, Collection, Database, IndexModel};

use crate::constants::{
    COLLECTION_CONTACTS, COLLECTION_CONTACT_ASSOCIATES, COLLECTION_CONTACT_NOTES,
    COLLECTION_CONTACT_TIMELINE, COLLECTION_GOTO_CONFIGS, COLLECTION_GOTO_USERS,
    COLLECTION_PASSWORD_RESET_TOKENS, COLLECTION_ROLES, COLLECTION_TENANTS, COLLECTION_USERS,
    COLLECTION_USER_NOTES,
};
use crate::errors::ApiError;
use crate::models::Tenant;

/// Every collection whose documents carry a `tenant_id`.
const TENANT_SCOPED_COLLECTIONS: [&str; 10] = [
    COLLECTION_USERS,
    COLLECTION_USER_NOTES,
    COLLECTION_ROLES,
    COLLECTION_CONTACTS,
    COLLECTION_CONTACT_ASSOCIATES,
    COLLECTION_CONTACT_NOTES,
    COLLECTION_CONTACT_TIMELINE,
    COLLECTION_GOTO_CONFIGS,
    COLLECTION_GOTO_USERS,
    COLLECTION_PASSWORD_RESET_TOKENS,
];

pub struct TenantRepository {
    db: Database,
    collection: Collection<Tenant>,
}

impl TenantRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection(COLLECTION_TENANTS),
        }
    }

    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for tenants collection...");
        let index = IndexModel::builder()
            .keys(doc! { "subdomain_prefix": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    pub async fn insert(
        &self,
        tenant: &Tenant,
        session: &mut ClientSession,
    ) -> Result<(), ApiError> {
        self.collection.insert_one(tenant).session(&mut *session).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Tenant>, ApiError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_subdomain(&self, prefix: &str) -> Result<Option<Tenant>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "subdomain_prefix": prefix })
            .await?)
    }

    pub async fn find_page(&self, skip: u64, limit: i64) -> Result<Vec<Tenant>, ApiError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// All tenants, for the periodic job.
    pub async fn find_all(&self) -> Result<Vec<Tenant>, ApiError> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self) -> Result<u64, ApiError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    pub async fn update(&self, id: ObjectId, set: Document) -> Result<bool, ApiError> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    /// Remove the tenant and every document scoped to it.
    pub async fn delete_cascade(
        &self,
        id: ObjectId,
        session: &mut ClientSession,
    ) -> Result<bool, ApiError> {
        for name in TENANT_SCOPED_COLLECTIONS {
            let removed = self
                .db
                .collection::<Document>(name)
                .delete_many(doc! { "tenant_id": id })
                .session(&mut *session)
                .await?;
            if removed.deleted_count > 0 {
                info!("Removed {} documents from {}", removed.deleted_count, name);
            }
        }
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .session(&mut *session)
            .await?;
        Ok(result.deleted_count > 0)
    }
}
