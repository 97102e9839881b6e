use log::info;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::constants::{COLLECTION_GOTO_CONFIGS, COLLECTION_GOTO_USERS};
use crate::errors::ApiError;
use crate::models::{GoToConnectConfig, GoToConnectUser};

pub struct GoToConnectRepository {
    configs: Collection<GoToConnectConfig>,
    users: Collection<GoToConnectUser>,
}

impl GoToConnectRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            configs: db.collection(COLLECTION_GOTO_CONFIGS),
            users: db.collection(COLLECTION_GOTO_USERS),
        }
    }

    /// One integration per tenant, one token set per user.
    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for GoToConnect collections...");
        let unique = || IndexOptions::builder().unique(true).build();
        self.configs
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "tenant_id": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;
        self.users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "user_id": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;
        Ok(())
    }

    pub async fn find_config(
        &self,
        tenant_id: ObjectId,
    ) -> Result<Option<GoToConnectConfig>, ApiError> {
        Ok(self
            .configs
            .find_one(doc! { "tenant_id": tenant_id })
            .await?)
    }

    /// Create or update the tenant's integration with the provided fields.
    pub async fn upsert_config(&self, tenant_id: ObjectId, set: Document) -> Result<(), ApiError> {
        self.configs
            .update_one(
                doc! { "tenant_id": tenant_id },
                doc! {
                    "$set": set,
                    "$setOnInsert": { "_id": ObjectId::new() },
                },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    pub async fn find_user(&self, user_id: ObjectId) -> Result<Option<GoToConnectUser>, ApiError> {
        Ok(self.users.find_one(doc! { "user_id": user_id }).await?)
    }

    /// Store fresh tokens for a user, keeping any selected line.
    pub async fn upsert_tokens(
        &self,
        tenant_id: ObjectId,
        user_id: ObjectId,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), ApiError> {
        self.users
            .update_one(
                doc! { "user_id": user_id },
                doc! {
                    "$set": {
                        "tenant_id": tenant_id,
                        "access_token": access_token,
                        "refresh_token": refresh_token,
                    },
                    "$setOnInsert": { "_id": ObjectId::new() },
                },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    pub async fn set_line(&self, user_id: ObjectId, line_id: &str) -> Result<bool, ApiError> {
        let result = self
            .users
            .update_one(
                doc! { "user_id": user_id },
                doc! { "$set": { "line_id": line_id } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}
