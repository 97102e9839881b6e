//! GoToConnect request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddIntegrationRequest {
    #[validate(length(min = 1, max = 255, message = "Client id must be between 1 and 255 characters"))]
    pub client_id: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Client secret must be between 1 and 255 characters"))]
    pub client_secret: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SelectLineRequest {
    #[validate(length(min = 1, max = 255, message = "Line id must be between 1 and 255 characters"))]
    pub line_id: String,
}

/// Query string sent back by GoToConnect after authorization.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallQuery {
    pub call_to: String,
}
