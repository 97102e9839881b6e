//! Contact response models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    Contact, ContactAssociate, ContactNote, ContactTimeline, Lifecycle, TimeZone,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    pub id: String,
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
    pub timezone: TimeZone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub created_on: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_updated_on: Option<DateTime<Utc>>,
    pub lifecycle_status: Lifecycle,
    pub rating: i32,
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_of: Option<String>,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id.to_hex(),
            name: contact.name,
            address_1: contact.address_1,
            address_2: contact.address_2,
            city: contact.city,
            state: contact.state,
            zip_code: contact.zip_code,
            email: contact.email,
            logo: contact.logo,
            timezone: contact.timezone,
            created_by: contact.created_by.map(|id| id.to_hex()),
            created_on: contact.created_on.to_chrono(),
            lifecycle_updated_on: contact.lifecycle_updated_on.map(|dt| dt.to_chrono()),
            lifecycle_status: contact.lifecycle_status,
            rating: contact.rating,
            is_locked: contact.is_locked,
            locked_on: contact.locked_on.map(|dt| dt.to_chrono()),
            locked_by: contact.locked_by.map(|id| id.to_hex()),
            customer_of: contact.customer_of.map(|id| id.to_hex()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactNoteResponse {
    pub created_on: DateTime<Utc>,
    pub body: String,
}

impl From<ContactNote> for ContactNoteResponse {
    fn from(note: ContactNote) -> Self {
        Self {
            created_on: note.created_on.to_chrono(),
            body: note.body,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactTimelineResponse {
    pub created_on: DateTime<Utc>,
    #[schema(example = "Contact Locked By: Dana Reyes <dana@example.com>")]
    pub title: String,
}

impl From<ContactTimeline> for ContactTimelineResponse {
    fn from(event: ContactTimeline) -> Self {
        Self {
            created_on: event.created_on.to_chrono(),
            title: event.title,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactAssociateResponse {
    pub id: String,
    pub contact_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number_ext: Option<i32>,
    pub designation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<ContactAssociate> for ContactAssociateResponse {
    fn from(associate: ContactAssociate) -> Self {
        Self {
            id: associate.id.to_hex(),
            contact_id: associate.contact_id.to_hex(),
            name: associate.name,
            phone_number: associate.phone_number,
            phone_number_ext: associate.phone_number_ext,
            designation: associate.designation,
            email: associate.email,
        }
    }
}
