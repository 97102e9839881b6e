//! Contact repository: contacts plus their associates, notes and timeline.

use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::{ClientSession, Collection, Database, IndexModel};

use crate::constants::{
    COLLECTION_CONTACTS, COLLECTION_CONTACT_ASSOCIATES, COLLECTION_CONTACT_NOTES,
    COLLECTION_CONTACT_TIMELINE,
};
use crate::errors::ApiError;
use crate::models::{Contact, ContactAssociate, ContactNote, ContactTimeline, Lifecycle};

pub struct ContactRepository {
    contacts: Collection<Contact>,
    associates: Collection<ContactAssociate>,
    notes: Collection<ContactNote>,
    timeline: Collection<ContactTimeline>,
}

impl ContactRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            contacts: db.collection(COLLECTION_CONTACTS),
            associates: db.collection(COLLECTION_CONTACT_ASSOCIATES),
            notes: db.collection(COLLECTION_CONTACT_NOTES),
            timeline: db.collection(COLLECTION_CONTACT_TIMELINE),
        }
    }

    /// Indexes:
    /// - unique `name` per tenant
    /// - `locked_by` and `customer_of` for the "my" listings
    /// - unique, sparse associate `phone_number` and `email`
    /// - children by `contact_id`, newest first
    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for contact collections...");

        self.contacts
            .create_indexes(vec![
                IndexModel::builder()
                    .keys(doc! { "tenant_id": 1, "name": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "tenant_id": 1, "locked_by": 1 })
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "tenant_id": 1, "customer_of": 1 })
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "tenant_id": 1, "is_locked": 1, "locked_on": 1 })
                    .build(),
            ])
            .await?;

        let unique_sparse = || IndexOptions::builder().unique(true).sparse(true).build();
        self.associates
            .create_indexes(vec![
                IndexModel::builder()
                    .keys(doc! { "phone_number": 1 })
                    .options(unique_sparse())
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique_sparse())
                    .build(),
                IndexModel::builder().keys(doc! { "contact_id": 1 }).build(),
            ])
            .await?;

        let by_contact = || {
            IndexModel::builder()
                .keys(doc! { "contact_id": 1, "created_on": -1 })
                .build()
        };
        self.notes.create_index(by_contact()).await?;
        self.timeline.create_index(by_contact()).await?;
        Ok(())
    }

    pub async fn insert(&self, contact: &Contact) -> Result<(), ApiError> {
        self.contacts.insert_one(contact).await?;
        Ok(())
    }

    pub async fn find_in_tenant(
        &self,
        tenant_id: ObjectId,
        id: ObjectId,
    ) -> Result<Option<Contact>, ApiError> {
        Ok(self
            .contacts
            .find_one(doc! { "_id": id, "tenant_id": tenant_id })
            .await?)
    }

    pub async fn find_with_filter(
        &self,
        filter: Document,
        sort: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Contact>, ApiError> {
        debug!("Repository: Finding contacts with filter: {:?}", filter);
        let cursor = self
            .contacts
            .find(filter)
            .sort(sort)
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, ApiError> {
        Ok(self.contacts.count_documents(filter).await?)
    }

    /// Locked prospects of a tenant locked before `cutoff`.
    pub async fn find_locked_before(
        &self,
        tenant_id: ObjectId,
        cutoff: mongodb::bson::DateTime,
    ) -> Result<Vec<Contact>, ApiError> {
        let cursor = self
            .contacts
            .find(doc! {
                "tenant_id": tenant_id,
                "is_locked": true,
                "lifecycle_status": Lifecycle::Prospect.to_string(),
                "locked_by": { "$ne": null },
                "locked_on": { "$lte": cutoff },
            })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update_fields(
        &self,
        tenant_id: ObjectId,
        id: ObjectId,
        set: Document,
    ) -> Result<(), ApiError> {
        if set.is_empty() {
            return Ok(());
        }
        self.contacts
            .update_one(doc! { "_id": id, "tenant_id": tenant_id }, doc! { "$set": set })
            .await?;
        Ok(())
    }

    /// Write the lifecycle fields of `contact` only if they still match
    /// `expected`. Returns `false` when another request changed them first.
    pub async fn update_lifecycle_if_unchanged(
        &self,
        contact: &Contact,
        expected: &Contact,
        session: &mut ClientSession,
    ) -> Result<bool, ApiError> {
        let result = self
            .contacts
            .update_one(lifecycle_guard(expected), lifecycle_update(contact))
            .session(&mut *session)
            .await?;
        Ok(result.matched_count == 1)
    }

    pub async fn insert_events(
        &self,
        events: &[ContactTimeline],
        session: &mut ClientSession,
    ) -> Result<(), ApiError> {
        if events.is_empty() {
            return Ok(());
        }
        self.timeline
            .insert_many(events)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    /// Delete a contact with its associates, notes and timeline.
    pub async fn delete_cascade(
        &self,
        id: ObjectId,
        session: &mut ClientSession,
    ) -> Result<bool, ApiError> {
        let children = doc! { "contact_id": id };
        self.associates
            .delete_many(children.clone())
            .session(&mut *session)
            .await?;
        self.notes
            .delete_many(children.clone())
            .session(&mut *session)
            .await?;
        self.timeline
            .delete_many(children)
            .session(&mut *session)
            .await?;
        let result = self
            .contacts
            .delete_one(doc! { "_id": id })
            .session(&mut *session)
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn insert_note(&self, note: &ContactNote) -> Result<(), ApiError> {
        self.notes.insert_one(note).await?;
        Ok(())
    }

    pub async fn find_notes(&self, contact_id: ObjectId) -> Result<Vec<ContactNote>, ApiError> {
        let cursor = self
            .notes
            .find(doc! { "contact_id": contact_id })
            .sort(doc! { "created_on": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_timeline(
        &self,
        contact_id: ObjectId,
    ) -> Result<Vec<ContactTimeline>, ApiError> {
        let cursor = self
            .timeline
            .find(doc! { "contact_id": contact_id })
            .sort(doc! { "created_on": -1, "_id": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn insert_associate(&self, associate: &ContactAssociate) -> Result<(), ApiError> {
        self.associates.insert_one(associate).await?;
        Ok(())
    }

    pub async fn find_associates(
        &self,
        contact_id: ObjectId,
    ) -> Result<Vec<ContactAssociate>, ApiError> {
        let cursor = self
            .associates
            .find(doc! { "contact_id": contact_id })
            .sort(doc! { "name": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn delete_associate(
        &self,
        contact_id: ObjectId,
        id: ObjectId,
    ) -> Result<bool, ApiError> {
        let result = self
            .associates
            .delete_one(doc! { "_id": id, "contact_id": contact_id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}

/// Optional lifecycle fields, in the order they are guarded and written.
fn optional_lifecycle_fields(contact: &Contact) -> [(&'static str, Bson); 6] {
    [
        ("locked_on", contact.locked_on.into()),
        ("locked_by", contact.locked_by.into()),
        ("customer_of", contact.customer_of.into()),
        ("last_locked_by", contact.last_locked_by.into()),
        ("unlocked_on", contact.unlocked_on.into()),
        ("lifecycle_updated_on", contact.lifecycle_updated_on.into()),
    ]
}

/// Matches the contact only while every lifecycle field still holds the value
/// it had when `expected` was read. A `null` matches a missing field.
pub(crate) fn lifecycle_guard(expected: &Contact) -> Document {
    let mut filter = doc! {
        "_id": expected.id,
        "tenant_id": expected.tenant_id,
        "is_locked": expected.is_locked,
        "lifecycle_status": expected.lifecycle_status.to_string(),
    };
    for (field, value) in optional_lifecycle_fields(expected) {
        filter.insert(field, value);
    }
    filter
}

/// `$set` the lifecycle fields of `contact` and `$unset` the empty ones,
/// leaving profile fields edited concurrently untouched.
pub(crate) fn lifecycle_update(contact: &Contact) -> Document {
    let mut set = doc! {
        "is_locked": contact.is_locked,
        "lifecycle_status": contact.lifecycle_status.to_string(),
    };
    let mut unset = Document::new();
    for (field, value) in optional_lifecycle_fields(contact) {
        match value {
            Bson::Null => {
                unset.insert(field, "");
            }
            value => {
                set.insert(field, value);
            }
        }
    }
    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::fixtures::contact;

    #[test]
    fn test_lifecycle_guard_covers_holder_and_release_time() {
        let mut before = contact(ObjectId::new(), "Acme Freight");
        let holder = ObjectId::new();
        before.is_locked = true;
        before.locked_by = Some(holder);
        before.lifecycle_status = Lifecycle::Prospect;

        let guard = lifecycle_guard(&before);
        assert_eq!(guard.get_object_id("_id").unwrap(), before.id);
        assert!(guard.get_bool("is_locked").unwrap());
        assert_eq!(guard.get_str("lifecycle_status").unwrap(), "PROSPECT");
        assert_eq!(guard.get_object_id("locked_by").unwrap(), holder);
        assert_eq!(guard.get("unlocked_on"), Some(&Bson::Null));
        assert_eq!(guard.get("customer_of"), Some(&Bson::Null));
    }

    #[test]
    fn test_lifecycle_guard_tells_apart_lock_cycles() {
        let mut first = contact(ObjectId::new(), "Acme Freight");
        first.is_locked = true;
        first.locked_by = Some(ObjectId::new());
        let mut second = first.clone();
        second.locked_by = Some(ObjectId::new());

        assert_ne!(lifecycle_guard(&first), lifecycle_guard(&second));
    }

    #[test]
    fn test_lifecycle_update_touches_only_lifecycle_fields() {
        let mut c = contact(ObjectId::new(), "Acme Freight");
        let holder = ObjectId::new();
        c.is_locked = true;
        c.locked_by = Some(holder);
        c.locked_on = Some(mongodb::bson::DateTime::now());

        let update = lifecycle_update(&c);
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_object_id("locked_by").unwrap(), holder);
        assert!(set.contains_key("locked_on"));
        for profile_field in ["name", "address_1", "city", "email", "rating"] {
            assert!(!set.contains_key(profile_field));
        }

        let unset = update.get_document("$unset").unwrap();
        assert!(unset.contains_key("customer_of"));
        assert!(unset.contains_key("unlocked_on"));
        assert!(!unset.contains_key("locked_by"));
    }
}
