use std::time::Duration;

use log::info;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::constants::COLLECTION_PASSWORD_RESET_TOKENS;
use crate::errors::ApiError;
use crate::models::PasswordResetToken;

pub struct PasswordResetRepository {
    collection: Collection<PasswordResetToken>,
}

impl PasswordResetRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_PASSWORD_RESET_TOKENS),
        }
    }

    /// Unique `key`, and a TTL index so the server drops expired tokens.
    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for password reset tokens...");
        self.collection
            .create_indexes(vec![
                IndexModel::builder()
                    .keys(doc! { "key": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "expires_at": 1 })
                    .options(
                        IndexOptions::builder()
                            .expire_after(Duration::from_secs(0))
                            .build(),
                    )
                    .build(),
            ])
            .await?;
        Ok(())
    }

    pub async fn insert(&self, token: &PasswordResetToken) -> Result<(), ApiError> {
        self.collection.insert_one(token).await?;
        Ok(())
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<PasswordResetToken>, ApiError> {
        Ok(self.collection.find_one(doc! { "key": key }).await?)
    }

    pub async fn delete_for_user(&self, user_id: ObjectId) -> Result<u64, ApiError> {
        let result = self
            .collection
            .delete_many(doc! { "user_id": user_id })
            .await?;
        Ok(result.deleted_count)
    }
}
