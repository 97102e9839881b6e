//! Contact documents and their children (associates, notes, timeline).

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Sales lifecycle of a contact.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lifecycle {
    #[default]
    Lead,
    Prospect,
    Customer,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Lead => write!(f, "LEAD"),
            Lifecycle::Prospect => write!(f, "PROSPECT"),
            Lifecycle::Customer => write!(f, "CUSTOMER"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
pub enum TimeZone {
    #[default]
    EST,
    CST,
    PST,
}

/// Contact document stored in MongoDB.
///
/// `locked_by` is only set while the contact is locked. After an unlock the
/// previous holder moves to `last_locked_by` and `unlocked_on` starts the
/// re-lock cooldown for that user.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tenant_id: ObjectId,

    // Contact info
    pub name: String,
    pub address_1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub timezone: TimeZone,

    // Create info
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    pub created_on: mongodb::bson::DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_updated_on: Option<mongodb::bson::DateTime>,

    // Quality info
    #[serde(default)]
    pub lifecycle_status: Lifecycle,
    pub rating: i32,

    // Lifecycle info
    #[serde(default)]
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_on: Option<mongodb::bson::DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_by: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_of: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_locked_by: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_on: Option<mongodb::bson::DateTime>,
}

impl Contact {
    /// True when someone other than `user_id` holds the lock.
    pub fn is_locked_by_other(&self, user_id: ObjectId) -> bool {
        self.is_locked && matches!(self.locked_by, Some(holder) if holder != user_id)
    }
}

/// A person reachable at a contact's organization.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContactAssociate {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tenant_id: ObjectId,
    pub contact_id: ObjectId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number_ext: Option<i32>,
    pub designation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContactNote {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tenant_id: ObjectId,
    pub contact_id: ObjectId,
    pub created_on: mongodb::bson::DateTime,
    pub body: String,
}

/// Audit entry appended by lifecycle transitions.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContactTimeline {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tenant_id: ObjectId,
    pub contact_id: ObjectId,
    pub created_on: mongodb::bson::DateTime,
    pub title: String,
}

impl ContactTimeline {
    pub fn for_contact(contact: &Contact, title: String, now: mongodb::bson::DateTime) -> Self {
        Self {
            id: ObjectId::new(),
            tenant_id: contact.tenant_id,
            contact_id: contact.id,
            created_on: now,
            title,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn contact(tenant_id: ObjectId, name: &str) -> Contact {
        Contact {
            id: ObjectId::new(),
            tenant_id,
            name: name.to_string(),
            address_1: "1 Dock Rd".to_string(),
            address_2: None,
            city: "Savannah".to_string(),
            state: "GA".to_string(),
            zip_code: "31401".to_string(),
            email: None,
            logo: None,
            timezone: TimeZone::EST,
            created_by: None,
            created_on: mongodb::bson::DateTime::now(),
            lifecycle_updated_on: None,
            lifecycle_status: Lifecycle::Lead,
            rating: 1,
            is_locked: false,
            locked_on: None,
            locked_by: None,
            customer_of: None,
            last_locked_by: None,
            unlocked_on: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::contact;
    use super::*;

    #[test]
    fn test_lifecycle_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Lifecycle::Prospect).unwrap(), "\"PROSPECT\"");
        let parsed: Lifecycle = serde_json::from_str("\"CUSTOMER\"").unwrap();
        assert_eq!(parsed, Lifecycle::Customer);
        assert_eq!(Lifecycle::default(), Lifecycle::Lead);
    }

    #[test]
    fn test_locked_by_other() {
        let me = ObjectId::new();
        let other = ObjectId::new();
        let mut c = contact(ObjectId::new(), "Acme Freight");
        assert!(!c.is_locked_by_other(me));

        c.is_locked = true;
        c.locked_by = Some(other);
        assert!(c.is_locked_by_other(me));
        assert!(!c.is_locked_by_other(other));

        // Customers are locked without a holder and stay visible.
        c.locked_by = None;
        assert!(!c.is_locked_by_other(me));
    }
}
