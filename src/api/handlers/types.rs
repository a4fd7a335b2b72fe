//! Request/response types for the API endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// `POST /register` form body. Fields are optional so that absent ones map to a 400.
#[derive(ToSchema, Deserialize, Default)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Deserialize, IntoParams, Debug)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    /// Account email address.
    pub email: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SecurityQuestionResponse {
    pub security_question: String,
}

#[derive(ToSchema, Deserialize)]
pub struct VerifyAnswerRequest {
    pub email: Option<String>,
    pub security_answer: Option<String>,
}

/// Outcome of an answer check, or of a profile update.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SuccessResponse {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// `PUT /profile` body. Demographic fields default to empty.
#[derive(ToSchema, Deserialize, Default)]
#[serde(default)]
pub struct ProfileRequest {
    pub email: String,
    /// Current account password; required to change the profile.
    #[schema(format = Password)]
    pub password: String,
    pub security_question: String,
    pub security_answer: String,
    pub phone: String,
    pub dob: String,
    pub gender: String,
    pub stream: String,
    pub degree: String,
    pub course: String,
    pub state: String,
    pub city: String,
    pub college: String,
    pub role: String,
}

/// `GET /profile` response; never includes the answer hash.
#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ProfileResponse {
    pub email: String,
    pub username: String,
    pub security_question: String,
    pub phone: String,
    pub dob: String,
    pub gender: String,
    pub stream: String,
    pub degree: String,
    pub course: String,
    pub state: String,
    pub city: String,
    pub college: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn failed_success_response_carries_error() -> Result<()> {
        let value = serde_json::to_value(SuccessResponse::failed("Incorrect answer"))?;
        assert_eq!(
            value,
            serde_json::json!({"success": false, "error": "Incorrect answer"})
        );
        Ok(())
    }

    #[test]
    fn ok_success_response_omits_error() -> Result<()> {
        let value = serde_json::to_value(SuccessResponse::ok())?;
        assert_eq!(value, serde_json::json!({"success": true}));
        Ok(())
    }

    #[test]
    fn profile_request_defaults_missing_fields() -> Result<()> {
        let request: ProfileRequest = serde_json::from_value(serde_json::json!({
            "email": "a@example.com",
            "security_question": "Favourite colour?",
            "security_answer": "Blue",
        }))?;
        assert_eq!(request.city, "");
        assert_eq!(request.role, "");
        Ok(())
    }
}
