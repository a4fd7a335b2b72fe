use super::{
    normalize_email, present,
    types::{MessageResponse, RegisterForm},
    valid_email,
};
use crate::{
    credentials::{PasswordPolicy, hash_secret_blocking, policy::describe},
    store::{NewAccount, SharedStore},
};
use axum::{Form, Json, extract::Extension, http::StatusCode, response::IntoResponse};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

// column widths in sql/schema.sql
const MAX_USERNAME_CHARS: usize = 150;
const MAX_EMAIL_CHARS: usize = 254;

#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Missing or oversized field, invalid email, or weak password", body = MessageResponse),
        (status = 405, description = "Only POST is allowed", body = MessageResponse),
        (status = 500, description = "Account store failure", body = MessageResponse),
    ),
    tag = "register"
)]
#[instrument(skip_all)]
pub async fn register(
    store: Extension<SharedStore>,
    policy: Extension<Arc<PasswordPolicy>>,
    payload: Option<Form<RegisterForm>>,
) -> impl IntoResponse {
    let Some(Form(form)) = payload else {
        return bad_request("All fields are required.");
    };

    let (Some(username), Some(password), Some(email)) = (
        present(form.username.as_ref()),
        present(form.password.as_ref()),
        present(form.email.as_ref()),
    ) else {
        return bad_request("All fields are required.");
    };

    let username = username.trim().to_string();
    let email = normalize_email(email);

    if username.chars().count() > MAX_USERNAME_CHARS {
        return bad_request(format!(
            "Username must be at most {MAX_USERNAME_CHARS} characters."
        ));
    }

    if !valid_email(&email) {
        return bad_request("Invalid email address.");
    }

    if email.chars().count() > MAX_EMAIL_CHARS {
        return bad_request(format!("Email must be at most {MAX_EMAIL_CHARS} characters."));
    }

    if let Err(violations) = policy.validate(password, &username, &email) {
        debug!(violations = violations.len(), "password rejected by policy");
        return bad_request(format!("Password error: {}", describe(&violations)));
    }

    let password_hash = match hash_secret_blocking(SecretString::from(password)).await {
        Ok(hash) => hash,
        Err(e) => {
            error!("Error hashing password: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Error creating user: could not hash password")),
            );
        }
    };

    let new = NewAccount {
        username,
        email,
        password_hash,
    };

    match store.create_account(new).await {
        Ok(account) => {
            info!(account_id = %account.id, "account created");
            (
                StatusCode::CREATED,
                Json(MessageResponse::new("User created successfully!")),
            )
        }
        Err(e) => {
            error!("Error creating account: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new(format!("Error creating user: {e}"))),
            )
        }
    }
}

/// Any verb other than POST on `/register`.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(MessageResponse::new("Invalid method. Only POST is allowed.")),
    )
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<MessageResponse>) {
    (StatusCode::BAD_REQUEST, Json(MessageResponse::new(message)))
}
