//! User profile repository (profiles and their notes).

use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use mongodb::{ClientSession, Collection, Database, IndexModel};

use crate::constants::{COLLECTION_USERS, COLLECTION_USER_NOTES};
use crate::errors::ApiError;
use crate::models::{UserNote, UserProfile};
use crate::services::lifecycle::{Counter, CounterChange};

pub struct UserRepository {
    collection: Collection<UserProfile>,
    notes: Collection<UserNote>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_USERS),
            notes: db.collection(COLLECTION_USER_NOTES),
        }
    }

    /// Indexes:
    /// - unique `email`
    /// - `tenant_id` + `manager_id` for the manager-scoped listing
    /// - `tenant_id` + `role_id` for role usage checks
    /// - notes by `user_id`, newest first
    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for user profile collections...");

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "tenant_id": 1, "manager_id": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "tenant_id": 1, "role_id": 1 })
                .build(),
        ];
        self.collection.create_indexes(indexes).await?;

        self.notes
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "user_id": 1, "created_on": -1 })
                    .build(),
            )
            .await?;
        Ok(())
    }

    pub async fn insert(&self, user: &UserProfile) -> Result<(), ApiError> {
        self.collection.insert_one(user).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<UserProfile>, ApiError> {
        debug!("Repository: Finding user by ID: {}", id);
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_in_tenant(
        &self,
        tenant_id: ObjectId,
        id: ObjectId,
    ) -> Result<Option<UserProfile>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id, "tenant_id": tenant_id })
            .await?)
    }

    /// Emails are stored lower-cased.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "email": email.to_lowercase() })
            .await?)
    }

    pub async fn find_with_filter(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<UserProfile>, ApiError> {
        debug!("Repository: Finding users with filter: {:?}", filter);
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, ApiError> {
        Ok(self.collection.count_documents(filter).await?)
    }

    pub async fn superuser_exists(&self) -> Result<bool, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "is_superuser": true })
            .await?
            .is_some())
    }

    /// `$set` the given fields and bump `updated_at`.
    pub async fn update(&self, id: ObjectId, mut set: Document) -> Result<(), ApiError> {
        set.insert("updated_at", mongodb::bson::DateTime::now());
        self.collection
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(())
    }

    pub async fn update_password(&self, id: ObjectId, password_hash: &str) -> Result<(), ApiError> {
        self.update(id, doc! { "password_hash": password_hash }).await
    }

    pub async fn update_last_login(&self, id: ObjectId) -> Result<(), ApiError> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "last_login": mongodb::bson::DateTime::now() } },
            )
            .await?;
        Ok(())
    }

    /// Apply a lifecycle counter change. Returns `false` when the guard in
    /// [`counter_filter`] kept the profile from matching.
    pub async fn apply_counter(
        &self,
        change: &CounterChange,
        prospect_limit: Option<i32>,
        session: &mut ClientSession,
    ) -> Result<bool, ApiError> {
        let field = change.counter.field();
        let result = self
            .collection
            .update_one(
                counter_filter(change, prospect_limit),
                doc! { "$inc": { field: change.delta } },
            )
            .session(&mut *session)
            .await?;
        Ok(result.matched_count == 1)
    }

    pub async fn insert_note(&self, note: &UserNote) -> Result<(), ApiError> {
        self.notes.insert_one(note).await?;
        Ok(())
    }

    pub async fn find_notes(
        &self,
        user_id: ObjectId,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<UserNote>, ApiError> {
        let cursor = self
            .notes
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_on": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count_notes(&self, user_id: ObjectId) -> Result<u64, ApiError> {
        Ok(self
            .notes
            .count_documents(doc! { "user_id": user_id })
            .await?)
    }
}

/// Decrements never take a counter below zero. Growing the locked counter
/// with a limit only matches while the result stays within it.
pub(crate) fn counter_filter(change: &CounterChange, prospect_limit: Option<i32>) -> Document {
    let field = change.counter.field();
    let mut filter = doc! { "_id": change.user_id };
    if change.delta < 0 {
        filter.insert(field, doc! { "$gte": -change.delta });
    } else if let (Counter::ContactsLocked, Some(limit)) = (change.counter, prospect_limit) {
        filter.insert(field, doc! { "$lte": limit - change.delta });
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(counter: Counter, delta: i32) -> CounterChange {
        CounterChange {
            user_id: ObjectId::new(),
            counter,
            delta,
        }
    }

    #[test]
    fn test_counter_filter_caps_locked_prospects() {
        let lock = change(Counter::ContactsLocked, 1);
        let filter = counter_filter(&lock, Some(3));
        assert_eq!(filter.get_object_id("_id").unwrap(), lock.user_id);
        assert_eq!(
            filter.get_document("total_contacts_locked").unwrap(),
            &doc! { "$lte": 2 }
        );
    }

    #[test]
    fn test_counter_filter_without_limit() {
        let lock = change(Counter::ContactsLocked, 1);
        assert!(!counter_filter(&lock, None).contains_key("total_contacts_locked"));

        let customer = change(Counter::Customers, 1);
        assert!(!counter_filter(&customer, Some(3)).contains_key("total_customers"));
    }

    #[test]
    fn test_counter_filter_never_goes_negative() {
        let release = change(Counter::ContactsLocked, -1);
        assert_eq!(
            counter_filter(&release, Some(3))
                .get_document("total_contacts_locked")
                .unwrap(),
            &doc! { "$gte": 1 }
        );
    }
}
