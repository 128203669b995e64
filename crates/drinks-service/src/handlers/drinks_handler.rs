use crate::auth::keys::KeyStore;
use crate::config::Config;
use crate::errors::ApiError;
use crate::middleware::auth::BearerClaims;
use crate::models::{
    CreateDrink, Drink, DrinkCreatedResponse, DrinkDeletedResponse, DrinkListResponse, DrinkRow,
    DrinkSummary, UpdateDrink,
};
use crate::repositories::drinks;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use sqlx::PgPool;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub keys: KeyStore,
}

fn to_domain(row: DrinkRow) -> Result<Drink, ApiError> {
    let id = row.id;
    Drink::try_from(row)
        .map_err(|e| ApiError::Database(format!("Corrupt recipe column for drink {id}: {e}")))
}

/// Handle list-summary.
///
/// GET /drinks — public; short representation only.
pub async fn list_drinks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DrinkListResponse<DrinkSummary>>, ApiError> {
    let rows = drinks::get_all(&state.pool).await?;
    let drinks: Vec<Drink> = rows
        .into_iter()
        .map(to_domain)
        .collect::<Result<_, _>>()?;

    Ok(Json(DrinkListResponse {
        success: true,
        drinks: drinks.iter().map(Drink::short).collect(),
    }))
}

/// Handle list-detail.
///
/// GET /drinks-detail — requires `get:drinks-detail`; long representation.
pub async fn list_drinks_detail(
    State(state): State<Arc<AppState>>,
    claims: BearerClaims,
) -> Result<Json<DrinkListResponse<Drink>>, ApiError> {
    claims.0.require_permission("get:drinks-detail")?;

    let rows = drinks::get_all(&state.pool).await?;
    let drinks: Vec<Drink> = rows
        .into_iter()
        .map(to_domain)
        .collect::<Result<_, _>>()?;

    Ok(Json(DrinkListResponse {
        success: true,
        drinks,
    }))
}

/// Handle create.
///
/// POST /drinks — requires `post:drinks`. Returns the new drink's long
/// representation as a single object.
///
/// Validation and persist failures answer 401 `invalid_claims` for
/// compatibility with the original API; only duplicate titles are carved
/// out as 409 since the store distinguishes them.
// TODO: migrate the legacy 401s below to 422 once API consumers stop
// special-casing the create-failure status.
pub async fn create_drink(
    State(state): State<Arc<AppState>>,
    claims: BearerClaims,
    body: Result<Json<CreateDrink>, JsonRejection>,
) -> Result<Json<DrinkCreatedResponse>, ApiError> {
    claims.0.require_permission("post:drinks")?;

    let Json(body) = body.map_err(|_| ApiError::InvalidClaims)?;

    let title = body
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or(ApiError::InvalidClaims)?;
    let recipe = body.recipe.ok_or(ApiError::InvalidClaims)?;
    let recipe_text = recipe.to_storage().map_err(|_| ApiError::InvalidClaims)?;

    let row = drinks::insert(&state.pool, &title, &recipe_text)
        .await
        .map_err(|e| match e {
            ApiError::Conflict => ApiError::Conflict,
            ApiError::Database(detail) => {
                tracing::error!(target: "drinks.handlers", detail = %detail, "create failed");
                ApiError::InvalidClaims
            }
            other => other,
        })?;

    Ok(Json(DrinkCreatedResponse {
        success: true,
        drinks: to_domain(row)?,
    }))
}

/// Handle update.
///
/// PATCH /drinks/{id} — requires `patch:drinks`. Only fields present in
/// the body overwrite; `null` values violate the column invariants and are
/// rejected. Returns a one-element list with the long representation.
pub async fn update_drink(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    claims: BearerClaims,
    body: Result<Json<UpdateDrink>, JsonRejection>,
) -> Result<Json<DrinkListResponse<Drink>>, ApiError> {
    claims.0.require_permission("patch:drinks")?;

    // Non-integer ids never matched a route in the original; keep 404.
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let Json(body) = body.map_err(|_| ApiError::Unprocessable)?;

    let row = drinks::get_by_id(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let title = match body.title {
        Some(Some(t)) if !t.trim().is_empty() => t,
        Some(_) => return Err(ApiError::Unprocessable),
        None => row.title,
    };
    let recipe_text = match body.recipe {
        Some(Some(recipe)) => recipe.to_storage().map_err(|_| ApiError::Unprocessable)?,
        Some(None) => return Err(ApiError::Unprocessable),
        None => row.recipe,
    };

    let updated = drinks::update(&state.pool, id, &title, &recipe_text)
        .await
        .map_err(|e| match e {
            ApiError::Database(detail) => {
                tracing::error!(target: "drinks.handlers", detail = %detail, "update failed");
                ApiError::Unprocessable
            }
            other => other,
        })?;

    Ok(Json(DrinkListResponse {
        success: true,
        drinks: vec![to_domain(updated).map_err(|_| ApiError::Unprocessable)?],
    }))
}

/// Handle delete.
///
/// DELETE /drinks/{id} — requires `delete:drinks`. Returns the deleted id.
pub async fn delete_drink(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    claims: BearerClaims,
) -> Result<Json<DrinkDeletedResponse>, ApiError> {
    claims.0.require_permission("delete:drinks")?;

    let Path(id) = id.map_err(|_| ApiError::NotFound)?;

    drinks::get_by_id(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let removed = drinks::delete(&state.pool, id).await.map_err(|e| match e {
        ApiError::Database(detail) => {
            tracing::error!(target: "drinks.handlers", detail = %detail, "delete failed");
            ApiError::Unprocessable
        }
        other => other,
    })?;

    // Row vanished between the lookup and the delete.
    if removed == 0 {
        return Err(ApiError::NotFound);
    }

    Ok(Json(DrinkDeletedResponse {
        success: true,
        delete: id,
    }))
}
