use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use mongodb::error::{ErrorKind, WriteFailure};
use std::fmt;

use crate::constants::{
    CODE_CONFLICT, CODE_INTERNAL_ERROR, CODE_INVALID_ID, CODE_INVALID_TOKEN,
    CODE_UPSTREAM_ERROR, CODE_VALIDATION_FAILED, ERR_GOTO_UPSTREAM,
};
use crate::models::ErrorResponse;

/// MongoDB server code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    Unauthorized { code: String, message: String },
    Forbidden { code: String, message: String },
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    InternalServerError { code: String, message: String },
    BadGateway { code: String, message: String },
    ValidationError { code: String, errors: Vec<String> },
}

impl ApiError {
    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: &str, message: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn forbidden(code: &str, message: impl Into<String>) -> Self {
        ApiError::Forbidden {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(code: &str, message: impl Into<String>) -> Self {
        ApiError::NotFound {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(code: &str, message: impl Into<String>) -> Self {
        ApiError::Conflict {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::InternalServerError {
            code: CODE_INTERNAL_ERROR.to_string(),
            message: message.into(),
        }
    }

    pub fn validation(errors: Vec<String>) -> Self {
        ApiError::ValidationError {
            code: CODE_VALIDATION_FAILED.to_string(),
            errors,
        }
    }

    /// Machine-readable code carried by every variant.
    pub fn code(&self) -> &str {
        match self {
            ApiError::BadRequest { code, .. }
            | ApiError::Unauthorized { code, .. }
            | ApiError::Forbidden { code, .. }
            | ApiError::NotFound { code, .. }
            | ApiError::Conflict { code, .. }
            | ApiError::InternalServerError { code, .. }
            | ApiError::BadGateway { code, .. }
            | ApiError::ValidationError { code, .. } => code,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest { code, message } => {
                write!(f, "Bad Request [{}]: {}", code, message)
            }
            ApiError::Unauthorized { code, message } => {
                write!(f, "Unauthorized [{}]: {}", code, message)
            }
            ApiError::Forbidden { code, message } => {
                write!(f, "Forbidden [{}]: {}", code, message)
            }
            ApiError::NotFound { code, message } => {
                write!(f, "Not Found [{}]: {}", code, message)
            }
            ApiError::Conflict { code, message } => {
                write!(f, "Conflict [{}]: {}", code, message)
            }
            ApiError::InternalServerError { code, message } => {
                write!(f, "Internal Server Error [{}]: {}", code, message)
            }
            ApiError::BadGateway { code, message } => {
                write!(f, "Bad Gateway [{}]: {}", code, message)
            }
            ApiError::ValidationError { code, errors } => {
                write!(f, "Validation Error [{}]: {:?}", code, errors)
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } | ApiError::ValidationError { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::ValidationError { code, errors } => ErrorResponse {
                success: false,
                code: code.clone(),
                message: "Validation failed".to_string(),
                errors: Some(errors.clone()),
            },
            ApiError::BadRequest { code, message }
            | ApiError::Unauthorized { code, message }
            | ApiError::Forbidden { code, message }
            | ApiError::NotFound { code, message }
            | ApiError::Conflict { code, message }
            | ApiError::InternalServerError { code, message }
            | ApiError::BadGateway { code, message } => ErrorResponse {
                success: false,
                code: code.clone(),
                message: message.clone(),
                errors: None,
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// True when the driver error was raised by a unique index.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            return ApiError::Conflict {
                code: CODE_CONFLICT.to_string(),
                message: "Resource already exists".to_string(),
            };
        }
        error!("Database error: {}", err);
        ApiError::InternalServerError {
            code: CODE_INTERNAL_ERROR.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::InternalServerError {
            code: CODE_INTERNAL_ERROR.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ApiError::Unauthorized {
            code: CODE_INVALID_TOKEN.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<bson::oid::Error> for ApiError {
    fn from(_: bson::oid::Error) -> Self {
        ApiError::BadRequest {
            code: CODE_INVALID_ID.to_string(),
            message: crate::constants::ERR_INVALID_ID.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        error!("GoToConnect request failed: {}", err);
        ApiError::BadGateway {
            code: CODE_UPSTREAM_ERROR.to_string(),
            message: ERR_GOTO_UPSTREAM.to_string(),
        }
    }
}

impl From<lettre::error::Error> for ApiError {
    fn from(err: lettre::error::Error) -> Self {
        error!("Failed to build e-mail: {}", err);
        ApiError::internal(err.to_string())
    }
}

impl From<lettre::address::AddressError> for ApiError {
    fn from(err: lettre::address::AddressError) -> Self {
        error!("Invalid e-mail address: {}", err);
        ApiError::internal(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for ApiError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        error!("SMTP delivery failed: {}", err);
        ApiError::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::conflict("X", "locked").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::forbidden("X", "nope").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::validation(vec!["bad".into()]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::internal("boom").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_error_body_carries_code() {
        let response = ApiError::conflict("CONTACT_ALREADY_LOCKED", "Contact is already locked!")
            .error_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "CONTACT_ALREADY_LOCKED");
        assert_eq!(json["message"], "Contact is already locked!");
        assert!(json.get("errors").is_none());
    }

    #[actix_web::test]
    async fn test_validation_body_lists_errors() {
        let response = ApiError::validation(vec!["Invalid email format".into()]).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0], "Invalid email format");
    }

    #[test]
    fn test_invalid_object_id_is_bad_request() {
        let err: ApiError = bson::oid::ObjectId::parse_str("nope").unwrap_err().into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), CODE_INVALID_ID);
    }
}
