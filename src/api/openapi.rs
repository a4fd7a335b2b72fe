use super::handlers::{health, profile, register, security_question};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec.
/// Routes added outside (the non-POST verbs on `/register`, `OPTIONS /health`)
/// are not documented.
pub(crate) fn api_router() -> OpenApiRouter {
    OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(register::register))
        .routes(routes!(security_question::get_security_question))
        .routes(routes!(security_question::verify_security_answer))
        .routes(routes!(profile::put_profile, profile::get_profile))
}

fn tags() -> Vec<Tag> {
    let mut register_tag = Tag::new("register");
    register_tag.description = Some("Account registration".to_string());

    let mut recovery_tag = Tag::new("recovery");
    recovery_tag.description = Some("Security-question password recovery".to_string());

    let mut profile_tag = Tag::new("profile");
    profile_tag.description = Some("Profile and security question management".to_string());

    vec![register_tag, recovery_tag, profile_tag]
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();

    OpenApiBuilder::new().info(info).tags(Some(tags())).build()
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    if let Some(start) = author.find('<') {
        let name = author[..start].trim();
        let email = author[start + 1..].trim_end_matches('>').trim();
        let name = if name.is_empty() { None } else { Some(name) };
        let email = if email.is_empty() { None } else { Some(email) };
        (name, email)
    } else {
        let name = author.trim();
        (if name.is_empty() { None } else { Some(name) }, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));

        let contact = spec.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Team Gatekeep"));
            assert_eq!(contact.email.as_deref(), Some("team@gatekeep.dev"));
        }

        let license = spec.info.license;
        assert!(license.is_some());
        if let Some(license) = license {
            assert_eq!(license.identifier.as_deref(), Some("BSD-3-Clause"));
        }
    }

    #[test]
    fn openapi_documents_every_endpoint() {
        let spec = openapi();
        for path in [
            "/health",
            "/register",
            "/get-security-question",
            "/verify-security-answer",
            "/profile",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
        let tags = spec.tags.unwrap_or_default();
        let names: Vec<&str> = tags.iter().map(|tag| tag.name.as_str()).collect();
        assert_eq!(names, ["register", "recovery", "profile"]);
    }

    #[test]
    fn parse_author_splits_name_and_email() {
        assert_eq!(
            parse_author("Jane Doe <jane@example.com>"),
            (Some("Jane Doe"), Some("jane@example.com"))
        );
        assert_eq!(parse_author("Jane Doe"), (Some("Jane Doe"), None));
    }
}
