use sqlx::PgPool;
use thiserror::Error;

use crate::recipe::{self, Ingredient, ShortIngredient};

/// Raw row shape of the drinks table; recipe is the serialized TEXT column.
#[derive(Debug, sqlx::FromRow)]
struct DrinkRow {
    id: i32,
    title: String,
    recipe: String,
}

/// A drink with its recipe decoded.
#[derive(Debug, Clone)]
pub struct Drink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Public/anonymous projection: ingredient names withheld.
#[derive(Debug, serde::Serialize)]
pub struct ShortDrink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

/// Full projection, for callers holding the detail permission.
#[derive(Debug, serde::Serialize)]
pub struct LongDrink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    pub fn short(&self) -> ShortDrink {
        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.iter().map(ShortIngredient::from).collect(),
        }
    }

    pub fn long(&self) -> LongDrink {
        LongDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("drink '{0}' already exists")]
    DuplicateTitle(String),
    #[error("failed to encode recipe: {0}")]
    EncodeRecipe(serde_json::Error),
    #[error("stored recipe for drink {0} is not valid: {1}")]
    DecodeRecipe(i32, serde_json::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

fn row_to_drink(row: DrinkRow) -> Result<Drink, StoreError> {
    let recipe = recipe::decode(&row.recipe).map_err(|err| StoreError::DecodeRecipe(row.id, err))?;
    Ok(Drink {
        id: row.id,
        title: row.title,
        recipe,
    })
}

fn map_write_err(err: sqlx::Error, title: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateTitle(title.to_string())
        }
        _ => StoreError::Database(err),
    }
}

pub async fn list_all(db: &PgPool) -> Result<Vec<Drink>, StoreError> {
    let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks")
        .fetch_all(db)
        .await?;
    rows.into_iter().map(row_to_drink).collect()
}

pub async fn find_by_title(db: &PgPool, title: &str) -> Result<Option<Drink>, StoreError> {
    let row = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks WHERE title = $1")
        .bind(title)
        .fetch_optional(db)
        .await?;
    row.map(row_to_drink).transpose()
}

pub async fn find_by_id(db: &PgPool, id: i32) -> Result<Option<Drink>, StoreError> {
    let row = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    row.map(row_to_drink).transpose()
}

pub async fn insert(db: &PgPool, title: &str, recipe: &[Ingredient]) -> Result<Drink, StoreError> {
    let encoded = recipe::encode(recipe).map_err(StoreError::EncodeRecipe)?;
    let row = sqlx::query_as::<_, DrinkRow>(
        "INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
    )
    .bind(title)
    .bind(encoded)
    .fetch_one(db)
    .await
    .map_err(|err| map_write_err(err, title))?;
    row_to_drink(row)
}

pub async fn update(
    db: &PgPool,
    drink: &Drink,
    title: &str,
    recipe: &[Ingredient],
) -> Result<Drink, StoreError> {
    let encoded = recipe::encode(recipe).map_err(StoreError::EncodeRecipe)?;
    let row = sqlx::query_as::<_, DrinkRow>(
        "UPDATE drinks SET title = $1, recipe = $2 WHERE id = $3 RETURNING id, title, recipe",
    )
    .bind(title)
    .bind(encoded)
    .bind(drink.id)
    .fetch_one(db)
    .await
    .map_err(|err| map_write_err(err, title))?;
    row_to_drink(row)
}

pub async fn delete(db: &PgPool, drink: &Drink) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM drinks WHERE id = $1")
        .bind(drink.id)
        .execute(db)
        .await?;
    Ok(())
}
