use super::{
    INVALID_CREDENTIALS, normalize_email,
    security_question::{internal_error, not_found},
    types::{EmailQuery, ErrorResponse, ProfileRequest, ProfileResponse, SuccessResponse},
};
use crate::{
    credentials::{hash_secret_blocking, normalize_answer, verify_secret_blocking},
    store::{Profile, SharedStore, StoreError},
};
use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use tracing::{error, info, instrument};

impl ProfileRequest {
    /// (field name, value, max chars), matching the column widths in sql/schema.sql
    fn field_limits(&self) -> [(&'static str, &str, usize); 12] {
        [
            ("security_question", &self.security_question, 255),
            ("security_answer", &self.security_answer, 255),
            ("phone", &self.phone, 20),
            ("dob", &self.dob, 20),
            ("gender", &self.gender, 20),
            ("stream", &self.stream, 100),
            ("degree", &self.degree, 100),
            ("course", &self.course, 100),
            ("state", &self.state, 100),
            ("city", &self.city, 100),
            ("college", &self.college, 100),
            ("role", &self.role, 50),
        ]
    }

    /// First field exceeding its column width, as a client-facing message.
    fn length_error(&self) -> Option<String> {
        self.field_limits().into_iter().find_map(|(name, value, max)| {
            (value.chars().count() > max).then(|| format!("{name} must be at most {max} characters"))
        })
    }
}

fn bad_request(error: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error))).into_response()
}

fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new(INVALID_CREDENTIALS)),
    )
        .into_response()
}

#[utoipa::path(
    put,
    path = "/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile created or replaced", body = SuccessResponse),
        (status = 400, description = "Missing or oversized field", body = ErrorResponse),
        (status = 401, description = "Missing or wrong account password", body = ErrorResponse),
        (status = 404, description = "Unknown account", body = ErrorResponse),
        (status = 500, description = "Account store failure", body = ErrorResponse),
    ),
    tag = "profile"
)]
#[instrument(skip_all)]
pub async fn put_profile(
    store: Extension<SharedStore>,
    payload: Option<Json<ProfileRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return bad_request("Invalid profile payload");
    };

    let email = normalize_email(&request.email);
    if email.is_empty() {
        return bad_request("email is required");
    }
    if request.security_question.trim().is_empty() || request.security_answer.trim().is_empty() {
        return bad_request("security_question and security_answer are required");
    }
    if let Some(message) = request.length_error() {
        return bad_request(message);
    }

    let account = match store.find_account_by_email(&email).await {
        Ok(Some(account)) => account,
        Ok(None) => return not_found(),
        Err(e) => {
            error!("Error looking up account: {:?}", e);
            return internal_error();
        }
    };

    // only the account owner may replace the recovery answer
    if request.password.is_empty() {
        return invalid_credentials();
    }
    let password = SecretString::from(request.password);
    match verify_secret_blocking(password, account.password_hash).await {
        Ok(true) => {}
        Ok(false) => {
            info!(account_id = %account.id, "profile update rejected: wrong password");
            return invalid_credentials();
        }
        Err(e) => {
            error!("Error verifying account password: {:?}", e);
            return internal_error();
        }
    }

    let answer = SecretString::from(normalize_answer(&request.security_answer));
    let security_answer_hash = match hash_secret_blocking(answer).await {
        Ok(hash) => hash,
        Err(e) => {
            error!("Error hashing security answer: {:?}", e);
            return internal_error();
        }
    };

    let profile = Profile {
        account_id: account.id,
        phone: request.phone,
        dob: request.dob,
        gender: request.gender,
        stream: request.stream,
        degree: request.degree,
        course: request.course,
        state: request.state,
        city: request.city,
        college: request.college,
        role: request.role,
        security_question: request.security_question.trim().to_string(),
        security_answer_hash,
    };

    match store.upsert_profile(profile).await {
        Ok(()) => {
            info!(account_id = %account.id, "profile saved");
            (StatusCode::OK, Json(SuccessResponse::ok())).into_response()
        }
        // account removed between lookup and write
        Err(StoreError::NotFound) => not_found(),
        Err(e) => {
            error!("Error saving profile: {:?}", e);
            internal_error()
        }
    }
}

#[utoipa::path(
    get,
    path = "/profile",
    params(EmailQuery),
    responses(
        (status = 200, description = "Profile without the security answer", body = ProfileResponse),
        (status = 404, description = "Unknown account or no profile", body = ErrorResponse),
        (status = 500, description = "Account store failure", body = ErrorResponse),
    ),
    tag = "profile"
)]
#[instrument(skip_all)]
pub async fn get_profile(store: Extension<SharedStore>, Query(query): Query<EmailQuery>) -> Response {
    let Some(email) = query.email.as_deref().map(normalize_email) else {
        return not_found();
    };

    let account = match store.find_account_by_email(&email).await {
        Ok(Some(account)) => account,
        Ok(None) => return not_found(),
        Err(e) => {
            error!("Error looking up account: {:?}", e);
            return internal_error();
        }
    };

    let profile = match store.find_profile(account.id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return not_found(),
        Err(e) => {
            error!("Error looking up profile: {:?}", e);
            return internal_error();
        }
    };

    let response = ProfileResponse {
        email: account.email,
        username: account.username,
        security_question: profile.security_question,
        phone: profile.phone,
        dob: profile.dob,
        gender: profile.gender,
        stream: profile.stream,
        degree: profile.degree,
        course: profile.course,
        state: profile.state,
        city: profile.city,
        college: profile.college,
        role: profile.role,
    };

    (StatusCode::OK, Json(response)).into_response()
}
