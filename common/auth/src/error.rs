use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingAuthorization,
    #[error("authorization header must be of the form 'Bearer <token>'")]
    InvalidAuthorization,
    #[error("token missing kid header")]
    MissingKeyId,
    #[error("no decoding key registered for kid '{0}'")]
    UnknownKeyId(String),
    #[error("failed to decode token header: {0}")]
    InvalidHeader(String),
    #[error("token is expired")]
    TokenExpired,
    #[error("token claims do not match this API: {0}")]
    ClaimsMismatch(String),
    #[error("token verification failed: {0}")]
    Verification(String),
    #[error("invalid claim '{0}' with value '{1}'")]
    InvalidClaim(&'static str, String),
    #[error("malformed claim payload: {0}")]
    InvalidJson(String),
    #[error("token carries no permissions claim")]
    MissingPermissions,
    #[error("permission '{0}' not granted")]
    InsufficientPermission(String),
    #[error("failed to parse decoding key for kid '{0}': {1}")]
    KeyParse(String, String),
    #[error("failed to fetch JWKS: {0}")]
    JwksFetch(String),
    #[error("failed to parse JWKS response: {0}")]
    JwksDecode(String),
    #[error("JWKS entry missing key id (kid)")]
    JwksMissingKid,
    #[error("JWKS key '{0}' missing required RSA components")]
    JwksMissingComponents(String),
    #[error("JWKS key '{kid}' uses unsupported key type '{kty}'")]
    JwksUnsupportedKey { kid: String, kty: String },
    #[error("JWKS key '{kid}' uses unsupported alg '{alg}'")]
    JwksUnsupportedAlg { kid: String, alg: String },
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match value.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
                Self::ClaimsMismatch(value.to_string())
            }
            _ => Self::Verification(value.to_string()),
        }
    }
}

/// The uniform failure envelope every error response of this API uses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: status.as_u16(),
            message: message.into(),
        }
    }
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthorization
            | AuthError::InvalidAuthorization
            | AuthError::MissingKeyId
            | AuthError::UnknownKeyId(_)
            | AuthError::InvalidHeader(_)
            | AuthError::TokenExpired
            | AuthError::ClaimsMismatch(_)
            | AuthError::Verification(_) => StatusCode::UNAUTHORIZED,
            AuthError::InvalidClaim(_, _)
            | AuthError::InvalidJson(_)
            | AuthError::MissingPermissions
            | AuthError::KeyParse(_, _) => StatusCode::BAD_REQUEST,
            AuthError::InsufficientPermission(_) => StatusCode::FORBIDDEN,
            AuthError::JwksFetch(_)
            | AuthError::JwksDecode(_)
            | AuthError::JwksMissingKid
            | AuthError::JwksMissingComponents(_)
            | AuthError::JwksUnsupportedKey { .. }
            | AuthError::JwksUnsupportedAlg { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody::new(status, self.to_string());
        (status, Json(body)).into_response()
    }
}
