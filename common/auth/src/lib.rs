pub mod claims;
pub mod config;
pub mod error;
pub mod guards;
pub mod jwks;
pub mod verifier;

pub use claims::Claims;
pub use config::JwtConfig;
pub use error::{AuthError, AuthResult};
pub use guards::{ensure_permission, parse_bearer, require_permission, PermissionGuard};
pub use jwks::JwksFetcher;
pub use verifier::{InMemoryKeyStore, JwtVerifier, JwtVerifierBuilder};
