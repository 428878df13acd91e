//! JSON bodies returned by the submission endpoints

use crate::models::{FieldError, ValidationErrors};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub const INVALID_REQUEST: &str = "Invalid request data";
pub const CONFIGURATION_ERROR: &str = "Server configuration error";
pub const BODY_TOO_LARGE: &str = "Request body too large";

/// `{success, message, errors?}` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ApiResponse {
    pub fn ok<S: Into<String>>(message: S) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            message: INVALID_REQUEST.to_string(),
            errors: errors.into_errors(),
        }
    }

    /// Pair the body with its status code
    pub fn with_status(self, status: StatusCode) -> Reply {
        Reply { status, body: self }
    }
}

/// A status code plus an [`ApiResponse`]
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: ApiResponse,
}

impl Reply {
    pub fn success<S: Into<String>>(message: S) -> Self {
        ApiResponse::ok(message).with_status(StatusCode::OK)
    }

    pub fn invalid(errors: ValidationErrors) -> Self {
        ApiResponse::invalid(errors).with_status(StatusCode::BAD_REQUEST)
    }

    pub fn configuration_error() -> Self {
        ApiResponse::failure(CONFIGURATION_ERROR).with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn too_large() -> Self {
        ApiResponse::failure(BODY_TOO_LARGE).with_status(StatusCode::PAYLOAD_TOO_LARGE)
    }

    pub fn server_error<S: Into<String>>(message: S) -> Self {
        ApiResponse::failure(message).with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_omitted_when_empty() {
        let json = serde_json::to_value(ApiResponse::ok("Message sent successfully")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "Message sent successfully"}));
    }

    #[test]
    fn test_invalid_lists_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.push("plan", "Plan selection is required");

        let reply = Reply::invalid(errors);
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);

        let json = serde_json::to_value(&reply.body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], INVALID_REQUEST);
        assert_eq!(json["errors"][0]["field"], "plan");
    }

    #[test]
    fn test_configuration_error_is_generic() {
        let reply = Reply::configuration_error();
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.body.message, CONFIGURATION_ERROR);
        assert!(reply.body.errors.is_empty());
    }
}
