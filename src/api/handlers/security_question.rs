//! Security-question lookup and answer verification.
//!
//! Both endpoints resolve the account by normalized email and then its profile.
//! A missing account and a missing profile are indistinguishable to the caller
//! (`404 User not found`). Answers are compared after trimming and case-folding,
//! against the Argon2 hash stored when the profile was written. There is no
//! attempt counter.

use super::{
    INTERNAL_ERROR, USER_NOT_FOUND, normalize_email, present,
    types::{
        EmailQuery, ErrorResponse, SecurityQuestionResponse, SuccessResponse, VerifyAnswerRequest,
    },
};
use crate::{
    credentials::{normalize_answer, verify_secret_blocking},
    store::{AccountStore, Profile, SharedStore, StoreError},
};
use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use tracing::{debug, error, instrument};

/// Resolve email -> account -> profile.
async fn lookup_profile(
    store: &dyn AccountStore,
    email: &str,
) -> Result<Option<Profile>, StoreError> {
    let Some(account) = store.find_account_by_email(email).await? else {
        return Ok(None);
    };
    store.find_profile(account.id).await
}

#[utoipa::path(
    get,
    path = "/get-security-question",
    params(EmailQuery),
    responses(
        (status = 200, description = "Stored security question", body = SecurityQuestionResponse),
        (status = 404, description = "Unknown account or no profile", body = ErrorResponse),
        (status = 500, description = "Account store failure", body = ErrorResponse),
    ),
    tag = "recovery"
)]
#[instrument(skip_all)]
pub async fn get_security_question(
    store: Extension<SharedStore>,
    Query(query): Query<EmailQuery>,
) -> Response {
    let Some(email) = present(query.email.as_ref()).map(normalize_email) else {
        return not_found();
    };

    match lookup_profile(store.0.as_ref(), &email).await {
        Ok(Some(profile)) => (
            StatusCode::OK,
            Json(SecurityQuestionResponse {
                security_question: profile.security_question,
            }),
        )
            .into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            error!("Error looking up security question: {:?}", e);
            internal_error()
        }
    }
}

#[utoipa::path(
    post,
    path = "/verify-security-answer",
    request_body = VerifyAnswerRequest,
    responses(
        (status = 200, description = "Answer matches", body = SuccessResponse),
        (status = 400, description = "Incorrect answer or missing fields", body = SuccessResponse),
        (status = 404, description = "Unknown account or no profile", body = ErrorResponse),
        (status = 500, description = "Account store failure", body = ErrorResponse),
    ),
    tag = "recovery"
)]
#[instrument(skip_all)]
pub async fn verify_security_answer(
    store: Extension<SharedStore>,
    payload: Option<Json<VerifyAnswerRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return missing_fields();
    };

    // An empty answer is still an answer; it simply will not match.
    let (Some(email), Some(answer)) = (present(request.email.as_ref()), request.security_answer)
    else {
        return missing_fields();
    };
    let email = normalize_email(email);

    let profile = match lookup_profile(store.0.as_ref(), &email).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return not_found(),
        Err(e) => {
            error!("Error looking up profile: {:?}", e);
            return internal_error();
        }
    };

    if profile.security_answer_hash.is_empty() {
        debug!("profile has no security answer set");
        return incorrect_answer();
    }

    let candidate = SecretString::from(normalize_answer(&answer));
    match verify_secret_blocking(candidate, profile.security_answer_hash).await {
        Ok(true) => (StatusCode::OK, Json(SuccessResponse::ok())).into_response(),
        Ok(false) => incorrect_answer(),
        Err(e) => {
            error!("Error verifying security answer: {:?}", e);
            internal_error()
        }
    }
}

fn incorrect_answer() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(SuccessResponse::failed("Incorrect answer")),
    )
        .into_response()
}

fn missing_fields() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(SuccessResponse::failed("Missing email or security_answer")),
    )
        .into_response()
}

pub(super) fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(USER_NOT_FOUND))).into_response()
}

pub(super) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(INTERNAL_ERROR)),
    )
        .into_response()
}
