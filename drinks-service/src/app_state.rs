use std::sync::Arc;

use common_auth::JwtVerifier;
use sqlx::PgPool;

/// Shared application state used by handlers and the router builder.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_verifier: Arc<JwtVerifier>,
}

impl AppState {
    pub fn new(db: PgPool, jwt_verifier: Arc<JwtVerifier>) -> Self {
        Self { db, jwt_verifier }
    }
}
