use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Token endpoint reply from GoToConnect.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct GoToTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub principal: Option<String>,
}

/// Token metadata returned to the caller after connecting; the tokens stay server-side.
#[derive(Debug, Serialize, ToSchema)]
pub struct GoToConnectionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
}

impl From<GoToTokenResponse> for GoToConnectionResponse {
    fn from(token: GoToTokenResponse) -> Self {
        Self {
            token_type: token.token_type,
            expires_in: token.expires_in,
            scope: token.scope,
            principal: token.principal,
        }
    }
}
