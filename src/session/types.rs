use axum::http::{header::AUTHORIZATION, HeaderMap};

/// The resolved caller of a protected route, inserted by `require_auth`
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub token: String,
}

/// Pulls the session token out of the `Authorization` header.
///
/// Accepts both `Bearer <token>` and a bare token.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };

    (!token.is_empty()).then(|| token.to_string())
}
