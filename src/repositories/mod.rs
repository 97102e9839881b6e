//! Repository layer for database operations.
//!
//! Services hold the business rules; repositories own the collections,
//! the indexes and the query shapes.

pub mod contact_repository;
pub mod gotoconnect_repository;
pub mod password_reset_repository;
pub mod role_repository;
pub mod tenant_repository;
pub mod user_repository;

pub use contact_repository::ContactRepository;
pub use gotoconnect_repository::GoToConnectRepository;
pub use password_reset_repository::PasswordResetRepository;
pub use role_repository::RoleRepository;
pub use tenant_repository::TenantRepository;
pub use user_repository::UserRepository;

use log::info;
use mongodb::bson::{doc, Document, Regex};
use mongodb::Database;

use crate::errors::ApiError;

/// Create the unique and lookup indexes of every collection.
pub async fn create_indexes(db: &Database) -> Result<(), ApiError> {
    TenantRepository::new(db).create_indexes().await?;
    UserRepository::new(db).create_indexes().await?;
    RoleRepository::new(db).create_indexes().await?;
    ContactRepository::new(db).create_indexes().await?;
    GoToConnectRepository::new(db).create_indexes().await?;
    PasswordResetRepository::new(db).create_indexes().await?;
    info!("Database indexes ensured");
    Ok(())
}

/// Case-insensitive `$or` over `fields` matching `term` literally.
pub fn search_filter(term: &str, fields: &[&str]) -> Document {
    let pattern = Regex {
        pattern: regex::escape(term),
        options: "i".to_string(),
    };
    let clauses: Vec<Document> = fields
        .iter()
        .map(|field| doc! { *field: { "$regex": pattern.clone() } })
        .collect();
    doc! { "$or": clauses }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_search_filter_escapes_term() {
        let filter = search_filter("a.c", &["name", "city"]);
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 2);
        let first = clauses[0].as_document().unwrap();
        match first.get_document("name").unwrap().get("$regex") {
            Some(Bson::RegularExpression(regex)) => {
                assert_eq!(regex.pattern, "a\\.c");
                assert_eq!(regex.options, "i");
            }
            other => panic!("expected a regular expression, got {:?}", other),
        }
    }
}
