//! Credential handling: password policy and secret hashing.

pub mod hashing;
pub mod policy;

pub use self::hashing::{
    hash_secret, hash_secret_blocking, normalize_answer, verify_secret, verify_secret_blocking,
};
pub use self::policy::{PasswordPolicy, PolicyViolation};
