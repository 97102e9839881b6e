//! Contact request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::TimeZone;
use crate::validators::{validate_not_blank, validate_state_code};

/// Request payload for creating a contact. Lifecycle and lock fields are server-controlled.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateContactRequest {
    #[validate(
        length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Acme Freight")]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Address must be between 1 and 255 characters"))]
    #[schema(example = "100 Harbor Way")]
    pub address_1: String,
    #[validate(length(max = 255, message = "Address line 2 must be at most 255 characters"))]
    pub address_2: Option<String>,
    #[validate(length(min = 1, max = 100, message = "City must be between 1 and 100 characters"))]
    #[schema(example = "Savannah")]
    pub city: String,
    #[validate(custom(function = "validate_state_code"))]
    #[schema(example = "GA")]
    pub state: String,
    #[validate(length(min = 1, max = 10, message = "Zip code must be between 1 and 10 characters"))]
    #[schema(example = "31401")]
    pub zip_code: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 255, message = "Logo must be at most 255 characters"))]
    pub logo: Option<String>,
    pub timezone: Option<TimeZone>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
}

/// Partial update of the editable contact fields.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateContactRequest {
    #[validate(
        length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Address must be between 1 and 255 characters"))]
    pub address_1: Option<String>,
    #[validate(length(max = 255, message = "Address line 2 must be at most 255 characters"))]
    pub address_2: Option<String>,
    #[validate(length(min = 1, max = 100, message = "City must be between 1 and 100 characters"))]
    pub city: Option<String>,
    #[validate(custom(function = "validate_state_code"))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 10, message = "Zip code must be between 1 and 10 characters"))]
    pub zip_code: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 255, message = "Logo must be at most 255 characters"))]
    pub logo: Option<String>,
    pub timezone: Option<TimeZone>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddContactNoteRequest {
    #[validate(length(min = 1, message = "Note must not be empty"))]
    #[schema(example = "Asked for a reefer quote for March")]
    pub note: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAssociateRequest {
    #[validate(
        length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Jordan Blake")]
    pub name: String,
    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7 and 20 characters"))]
    #[schema(example = "+19125550100")]
    pub phone_number: Option<String>,
    #[validate(range(min = 0, message = "Extension cannot be negative"))]
    pub phone_number_ext: Option<i32>,
    #[validate(length(min = 1, max = 100, message = "Designation must be between 1 and 100 characters"))]
    #[schema(example = "Shipping Manager")]
    pub designation: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str) -> CreateContactRequest {
        CreateContactRequest {
            name: name.to_string(),
            address_1: "100 Harbor Way".to_string(),
            address_2: None,
            city: "Savannah".to_string(),
            state: "GA".to_string(),
            zip_code: "31401".to_string(),
            email: None,
            logo: None,
            timezone: None,
            rating: None,
        }
    }

    #[test]
    fn test_whitespace_name_is_rejected() {
        assert!(create("Acme Freight").validate().is_ok());
        let errors = create("   ").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_whitespace_name_update_is_rejected() {
        let req = UpdateContactRequest {
            name: Some(" \t ".to_string()),
            address_1: None,
            address_2: None,
            city: None,
            state: None,
            zip_code: None,
            email: None,
            logo: None,
            timezone: None,
            rating: None,
        };
        assert!(req.validate().is_err());
    }
}
