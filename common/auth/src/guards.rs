use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use crate::claims::Claims;
use crate::error::{AuthError, AuthResult};
use crate::verifier::JwtVerifier;

/// Per-route state for [`require_permission`]: the verifier plus the single
/// permission string that route demands.
#[derive(Clone)]
pub struct PermissionGuard {
    verifier: Arc<JwtVerifier>,
    permission: &'static str,
}

impl PermissionGuard {
    pub fn new(verifier: Arc<JwtVerifier>, permission: &'static str) -> Self {
        Self {
            verifier,
            permission,
        }
    }
}

/// Middleware that authenticates the bearer token and checks the route's
/// required permission before any path or body extraction happens.
///
/// Layer it per route with `middleware::from_fn_with_state`:
///
/// ```ignore
/// post(create_drink.layer(middleware::from_fn_with_state(
///     PermissionGuard::new(verifier.clone(), "post:drinks"),
///     require_permission,
/// )))
/// ```
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?;
    let token = parse_bearer(header)?;
    let claims = guard.verifier.verify(&token)?;
    ensure_permission(&claims, guard.permission)?;
    Ok(next.run(req).await)
}

/// The header must be exactly two whitespace-separated parts, the first
/// literally `Bearer`. Both a missing scheme and trailing extra parts are
/// rejected.
pub fn parse_bearer(value: &HeaderValue) -> AuthResult<String> {
    let raw = value.to_str().map_err(|_| AuthError::InvalidAuthorization)?;

    let mut parts = raw.split_whitespace();
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(AuthError::InvalidAuthorization),
    };

    if scheme != "Bearer" {
        return Err(AuthError::InvalidAuthorization);
    }

    Ok(token.to_owned())
}

/// A token with no permissions claim at all is a malformed credential (400);
/// a token whose set lacks the required permission is a refusal (403).
pub fn ensure_permission(claims: &Claims, required: &str) -> AuthResult<()> {
    let permissions = claims
        .permissions
        .as_deref()
        .ok_or(AuthError::MissingPermissions)?;

    if permissions.iter().any(|value| value == required) {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermission(required.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims_with(permissions: Option<Vec<String>>) -> Claims {
        Claims {
            subject: Some("auth0|barista".into()),
            permissions,
            expires_at: Utc::now(),
            issued_at: None,
            issuer: "https://issuer.test/".into(),
            audience: vec!["drinks".into()],
        }
    }

    #[test]
    fn parse_bearer_accepts_valid_token() {
        let header = HeaderValue::from_static("Bearer abc.def.ghi");
        let token = parse_bearer(&header).expect("token");
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn parse_bearer_rejects_wrong_scheme() {
        let header = HeaderValue::from_static("Basic credentials");
        let err = parse_bearer(&header).expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidAuthorization));
    }

    #[test]
    fn parse_bearer_rejects_missing_token() {
        let header = HeaderValue::from_static("Bearer");
        let err = parse_bearer(&header).expect_err("should reject bare scheme");
        assert!(matches!(err, AuthError::InvalidAuthorization));
    }

    #[test]
    fn parse_bearer_rejects_extra_parts() {
        let header = HeaderValue::from_static("Bearer abc def");
        let err = parse_bearer(&header).expect_err("should reject three parts");
        assert!(matches!(err, AuthError::InvalidAuthorization));
    }

    #[test]
    fn ensure_permission_accepts_member() {
        let claims = claims_with(Some(vec!["get:drinks-detail".into()]));
        assert!(ensure_permission(&claims, "get:drinks-detail").is_ok());
    }

    #[test]
    fn ensure_permission_distinguishes_absent_claim_from_missing_permission() {
        let claims = claims_with(None);
        let err = ensure_permission(&claims, "post:drinks").expect_err("no claim");
        assert!(matches!(err, AuthError::MissingPermissions));

        let claims = claims_with(Some(vec!["get:drinks-detail".into()]));
        let err = ensure_permission(&claims, "post:drinks").expect_err("not granted");
        assert!(matches!(err, AuthError::InsufficientPermission(_)));
    }
}
