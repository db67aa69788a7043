use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api_error::ApiError;
use crate::app_state::AppState;
use crate::drink_store::{self, LongDrink, ShortDrink};
use crate::recipe::Ingredient;

pub const PERM_GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const PERM_POST_DRINKS: &str = "post:drinks";
pub const PERM_PATCH_DRINKS: &str = "patch:drinks";
pub const PERM_DELETE_DRINKS: &str = "delete:drinks";

#[derive(Serialize)]
pub struct DrinksResponse<T: Serialize> {
    pub success: bool,
    pub drinks: Vec<T>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i32,
}

#[derive(Deserialize)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Only `title` and `recipe` are mutable; anything else in the body is
/// ignored, and omitted fields keep their stored values.
#[derive(Deserialize)]
pub struct UpdateDrink {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
}

fn unknown_id(id: i32) -> ApiError {
    ApiError::NotFound(format!("no drink with id {id}"))
}

// A non-numeric id segment never matches a row, same as the original
// integer-typed route.
fn resolve_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::NotFound("drink id must be an integer".into()))?;
    Ok(id)
}

fn resolve_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = body.map_err(|rejection| ApiError::Unprocessable(rejection.body_text()))?;
    Ok(value)
}

/// GET /drinks — public menu, short form.
pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<ShortDrink>>, ApiError> {
    let drinks = drink_store::list_all(&state.db).await?;
    Ok(Json(DrinksResponse {
        success: true,
        drinks: drinks.iter().map(|drink| drink.short()).collect(),
    }))
}

/// GET /drinks-detail — full recipes, guarded by `get:drinks-detail`.
pub async fn list_drinks_detail(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<LongDrink>>, ApiError> {
    let drinks = drink_store::list_all(&state.db).await?;
    Ok(Json(DrinksResponse {
        success: true,
        drinks: drinks.iter().map(|drink| drink.long()).collect(),
    }))
}

/// POST /drinks — guarded by `post:drinks`. 422 on a malformed body, 409 on
/// a duplicate title.
pub async fn create_drink(
    State(state): State<AppState>,
    body: Result<Json<NewDrink>, JsonRejection>,
) -> Result<Json<DrinksResponse<LongDrink>>, ApiError> {
    let new_drink = resolve_body(body)?;

    if drink_store::find_by_title(&state.db, &new_drink.title)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(format!(
            "drink '{}' already exists",
            new_drink.title
        )));
    }

    let drink = drink_store::insert(&state.db, &new_drink.title, &new_drink.recipe).await?;
    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

/// PATCH /drinks/{id} — guarded by `patch:drinks`. 404 on an unknown id.
pub async fn update_drink(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<UpdateDrink>, JsonRejection>,
) -> Result<Json<DrinksResponse<LongDrink>>, ApiError> {
    let id = resolve_id(id)?;
    let update = resolve_body(body)?;

    let existing = drink_store::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| unknown_id(id))?;

    let title = update.title.as_deref().unwrap_or(&existing.title);
    let recipe = update.recipe.as_deref().unwrap_or(&existing.recipe);

    let drink = drink_store::update(&state.db, &existing, title, recipe).await?;
    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

/// DELETE /drinks/{id} — guarded by `delete:drinks`. 404 on an unknown id.
pub async fn delete_drink(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = resolve_id(id)?;

    let existing = drink_store::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| unknown_id(id))?;

    drink_store::delete(&state.db, &existing).await?;
    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}
