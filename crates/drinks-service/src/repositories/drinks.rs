use crate::errors::ApiError;
use crate::models::DrinkRow;
use sqlx::PgPool;

fn store_fault(context: &str, e: &sqlx::Error) -> ApiError {
    ApiError::Database(format!("{context}: {e}"))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Fetch all drinks, oldest first.
pub async fn get_all(pool: &PgPool) -> Result<Vec<DrinkRow>, ApiError> {
    sqlx::query_as::<_, DrinkRow>(
        r#"
        SELECT id, title, recipe
        FROM drinks
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| store_fault("Failed to fetch drinks", &e))
}

/// Fetch one drink by id.
pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<DrinkRow>, ApiError> {
    sqlx::query_as::<_, DrinkRow>(
        r#"
        SELECT id, title, recipe
        FROM drinks
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| store_fault("Failed to fetch drink by id", &e))
}

/// Insert a new drink; the store assigns the id.
///
/// A duplicate title surfaces as [`ApiError::Conflict`].
pub async fn insert(pool: &PgPool, title: &str, recipe: &str) -> Result<DrinkRow, ApiError> {
    sqlx::query_as::<_, DrinkRow>(
        r#"
        INSERT INTO drinks (title, recipe)
        VALUES ($1, $2)
        RETURNING id, title, recipe
        "#,
    )
    .bind(title)
    .bind(recipe)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict
        } else {
            store_fault("Failed to insert drink", &e)
        }
    })
}

/// Overwrite a drink's fields in place.
///
/// The caller resolves the row first; an id that vanished between the lookup
/// and the write maps to [`ApiError::NotFound`].
pub async fn update(
    pool: &PgPool,
    id: i32,
    title: &str,
    recipe: &str,
) -> Result<DrinkRow, ApiError> {
    sqlx::query_as::<_, DrinkRow>(
        r#"
        UPDATE drinks
        SET title = $2, recipe = $3
        WHERE id = $1
        RETURNING id, title, recipe
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(recipe)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict
        } else if matches!(e, sqlx::Error::RowNotFound) {
            ApiError::NotFound
        } else {
            store_fault("Failed to update drink", &e)
        }
    })
}

/// Hard-delete a drink. Returns the number of rows removed (0 or 1); ids
/// are never reused since the sequence only moves forward.
pub async fn delete(pool: &PgPool, id: i32) -> Result<u64, ApiError> {
    let result = sqlx::query(
        r#"
        DELETE FROM drinks
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| store_fault("Failed to delete drink", &e))?;

    Ok(result.rows_affected())
}
