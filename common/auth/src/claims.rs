use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Application-focused representation of verified JWT claims.
///
/// `permissions` stays an `Option` so a token that carries no permissions
/// claim at all can be told apart from one carrying an empty set; the two
/// cases map to different failure modes in [`crate::guards::ensure_permission`].
#[derive(Debug, Clone, Serialize)]
pub struct Claims {
    pub subject: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
    pub issuer: String,
    pub audience: Vec<String>,
}

impl Claims {
    /// Convenience helper for permission checks.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|permissions| permissions.iter().any(|value| value == permission))
    }
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    permissions: Option<Vec<String>>,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
    iss: String,
    #[serde(default)]
    aud: Option<AudienceRepr>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AudienceRepr {
    Single(String),
    Many(Vec<String>),
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or_else(|| AuthError::InvalidClaim("exp", value.exp.to_string()))?;

        let issued_at = match value.iat {
            Some(iat) => Some(
                Utc.timestamp_opt(iat, 0)
                    .single()
                    .ok_or_else(|| AuthError::InvalidClaim("iat", iat.to_string()))?,
            ),
            None => None,
        };

        let audience = match value.aud {
            Some(AudienceRepr::Single(item)) => vec![item],
            Some(AudienceRepr::Many(items)) => items,
            None => Vec::new(),
        };

        Ok(Self {
            subject: value.sub,
            permissions: value.permissions,
            expires_at,
            issued_at,
            issuer: value.iss,
            audience,
        })
    }
}

impl TryFrom<serde_json::Value> for Claims {
    type Error = AuthError;

    fn try_from(value: serde_json::Value) -> AuthResult<Self> {
        let repr: ClaimsRepr =
            serde_json::from_value(value).map_err(|err| AuthError::InvalidJson(err.to_string()))?;
        Claims::try_from(repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_permissions_claim() {
        let claims = Claims::try_from(json!({
            "sub": "auth0|barista",
            "iss": "https://issuer.test/",
            "aud": "drinks",
            "exp": 4102444800i64,
            "permissions": ["get:drinks-detail", "post:drinks"],
        }))
        .expect("claims");

        assert!(claims.has_permission("post:drinks"));
        assert!(!claims.has_permission("delete:drinks"));
        assert_eq!(claims.audience, vec!["drinks".to_string()]);
    }

    #[test]
    fn missing_permissions_claim_is_none_not_empty() {
        let claims = Claims::try_from(json!({
            "iss": "https://issuer.test/",
            "aud": ["drinks", "other"],
            "exp": 4102444800i64,
        }))
        .expect("claims");

        assert!(claims.permissions.is_none());
        assert!(!claims.has_permission("get:drinks-detail"));
        assert_eq!(claims.audience.len(), 2);
    }

    #[test]
    fn rejects_payload_without_exp() {
        let err = Claims::try_from(json!({"iss": "https://issuer.test/"}))
            .expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidJson(_)));
    }
}
