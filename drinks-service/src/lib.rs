pub mod api_error;
pub mod app_state;
pub mod drink_handlers;
pub mod drink_store;
pub mod recipe;

pub use api_error::ApiError;

use axum::handler::Handler;
use axum::middleware;
use axum::routing::{get, patch};
use axum::Router;
use common_auth::{require_permission, PermissionGuard};

use app_state::AppState;
use drink_handlers::{
    create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink,
    PERM_DELETE_DRINKS, PERM_GET_DRINKS_DETAIL, PERM_PATCH_DRINKS, PERM_POST_DRINKS,
};

async fn health() -> &'static str {
    "ok"
}

/// Build the full route table. Guarded handlers get a per-route permission
/// layer so the auth check runs before any path or body extraction.
pub fn app(state: AppState) -> Router {
    let verifier = state.jwt_verifier.clone();

    Router::new()
        .route("/healthz", get(health))
        .route(
            "/drinks",
            get(list_drinks).post(create_drink.layer(middleware::from_fn_with_state(
                PermissionGuard::new(verifier.clone(), PERM_POST_DRINKS),
                require_permission,
            ))),
        )
        .route(
            "/drinks-detail",
            get(list_drinks_detail.layer(middleware::from_fn_with_state(
                PermissionGuard::new(verifier.clone(), PERM_GET_DRINKS_DETAIL),
                require_permission,
            ))),
        )
        .route(
            "/drinks/:id",
            patch(update_drink.layer(middleware::from_fn_with_state(
                PermissionGuard::new(verifier.clone(), PERM_PATCH_DRINKS),
                require_permission,
            )))
            .delete(delete_drink.layer(middleware::from_fn_with_state(
                PermissionGuard::new(verifier, PERM_DELETE_DRINKS),
                require_permission,
            ))),
        )
        .with_state(state)
}
