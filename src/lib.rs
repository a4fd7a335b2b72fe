//! # Gatekeep (Account Registration & Recovery)
//!
//! `gatekeep` creates accounts from a username, email, and password, and lets
//! a user prove ownership of an account by answering the security question
//! stored on their profile.
//!
//! ## Registration
//!
//! `POST /register` takes a form body. All three fields are required, the email
//! must look like an address, and the password must pass the configured
//! [`credentials::PasswordPolicy`]. Passwords are stored as Argon2id PHC
//! strings; emails are trimmed and lowercased before they are stored or compared.
//!
//! ## Security questions
//!
//! `GET /get-security-question` returns the question for an email and
//! `POST /verify-security-answer` checks an answer. Answers are trimmed and
//! case-folded, then hashed, so `" Blue "` matches a stored `"blue"`. Profiles
//! (and with them the question and answer) are written through `PUT /profile`.
//!
//! ## Persistence
//!
//! Handlers go through the [`store::AccountStore`] trait. `PostgreSQL` is the
//! production backend; an in-memory store backs tests and local runs.

pub mod api;
pub mod cli;
pub mod credentials;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
