//! GoToConnect integration documents.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// OAuth client registered by a tenant with GoToConnect.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoToConnectConfig {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tenant_id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// Tokens obtained for one user through the authorization code flow.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoToConnectUser {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tenant_id: ObjectId,
    pub user_id: ObjectId,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
}
