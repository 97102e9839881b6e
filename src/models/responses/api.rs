//! Generic API response models.

use serde::Serialize;
use utoipa::ToSchema;

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn message(message: &str) -> ApiResponse<()> {
        ApiResponse {
            success: true,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Error response structure
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Whether the request was successful (always false for errors)
    #[schema(example = false)]
    pub success: bool,
    /// Machine-readable error code
    #[schema(example = "CONTACT_ALREADY_LOCKED")]
    pub code: String,
    /// Error message
    #[schema(example = "Contact is already locked!")]
    pub message: String,
    /// Detailed validation errors (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status
    #[schema(example = "OK")]
    pub status: String,
    /// Status message
    #[schema(example = "Server is running")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_only_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::message("Contact deleted")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Contact deleted");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_envelope_carries_data() {
        let json = serde_json::to_value(ApiResponse::success("Roles", vec!["Admin", "Sales"])).unwrap();
        assert_eq!(json["data"][1], "Sales");
    }
}
