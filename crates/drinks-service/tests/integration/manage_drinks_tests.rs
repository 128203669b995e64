//! E2E tests for drink management: create, update, delete.
//!
//! These routes preserve the original API's status conventions: create
//! failures answer 401 `invalid_claims`, update/delete failures answer 422,
//! missing rows answer 404, and duplicate titles answer 409.
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<feature>_<scenario>_<expected_result>`

use drinks_test_utils::server_harness::TestDrinksServer;
use reqwest::StatusCode;
use serde_json::json;
use sqlx::PgPool;

// ============================================================================
// Create Tests
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_drink_happy_path(pool: PgPool) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestDrinksServer::spawn(pool).await?;
    let token = server.token(&["post:drinks"]);

    // Act
    let response = server
        .client()
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "title": "Latte",
            "recipe": [
                {"name": "Milk", "color": "grey", "parts": 1},
                {"name": "Espresso", "color": "brown", "parts": 2}
            ]
        }))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK, "Create should succeed");
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], true);

    let drink = &body["drinks"];
    assert!(drink["id"].as_i64().unwrap_or(0) > 0);
    assert_eq!(drink["title"], "Latte");
    assert_eq!(drink["recipe"][0]["name"], "Milk");
    assert_eq!(drink["recipe"][1]["parts"], 2);

    Ok(())
}

/// A single-object recipe is normalized to a one-element list.
#[sqlx::test(migrations = "../../migrations")]
async fn test_create_drink_accepts_single_object_recipe(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let token = server.token(&["post:drinks"]);

    let response = server
        .client()
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "title": "Espresso",
            "recipe": {"name": "espresso", "color": "brown", "parts": 1}
        }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    let recipe = body["drinks"]["recipe"]
        .as_array()
        .expect("recipe should be normalized to a list");
    assert_eq!(recipe.len(), 1);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_drink_without_permission_returns_403(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let token = server.token(&["get:drinks-detail"]);

    let response = server
        .client()
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({"title": "Latte", "recipe": []}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

/// Missing title answers the legacy 401 `invalid_claims`, not 422.
#[sqlx::test(migrations = "../../migrations")]
async fn test_create_drink_missing_title_returns_legacy_401(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let token = server.token(&["post:drinks"]);

    let response = server
        .client()
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "recipe": [{"name": "milk", "color": "white", "parts": 1}]
        }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["code"], "invalid_claims");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_drink_malformed_body_returns_legacy_401(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let token = server.token(&["post:drinks"]);

    let response = server
        .client()
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["code"], "invalid_claims");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_drink_duplicate_title_returns_409(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let token = server.token(&["post:drinks"]);
    let drink = json!({
        "title": "Mocha",
        "recipe": [{"name": "cocoa", "color": "brown", "parts": 1}]
    });

    let first = server
        .client()
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&drink)
        .send()
        .await?;
    assert_eq!(first.status(), StatusCode::OK);

    let second = server
        .client()
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&drink)
        .send()
        .await?;

    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = second.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 409);
    assert_eq!(body["message"], "duplicate resource");

    Ok(())
}

// ============================================================================
// Update Tests
// ============================================================================

async fn create_via_api(
    server: &TestDrinksServer,
    title: &str,
) -> Result<i64, anyhow::Error> {
    let token = server.token(&["post:drinks"]);
    let response = server
        .client()
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "title": title,
            "recipe": [{"name": "water", "color": "blue", "parts": 1}]
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    body["drinks"]["id"]
        .as_i64()
        .ok_or_else(|| anyhow::anyhow!("create response missing id"))
}

/// A title-only patch must leave the stored recipe untouched.
#[sqlx::test(migrations = "../../migrations")]
async fn test_update_drink_title_only_preserves_recipe(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let id = create_via_api(&server, "Water4").await?;
    let token = server.token(&["patch:drinks"]);

    let response = server
        .client()
        .patch(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({"title": "Water5"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], true);

    // Update responds with a one-element list.
    let drinks = body["drinks"].as_array().expect("drinks should be a list");
    assert_eq!(drinks.len(), 1);
    assert_eq!(drinks[0]["title"], "Water5");
    assert_eq!(drinks[0]["recipe"][0]["name"], "water");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_drink_unknown_id_returns_404(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let token = server.token(&["patch:drinks"]);

    let response = server
        .client()
        .patch(format!("{}/drinks/9999", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({"title": "Ghost"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "resource not found");

    Ok(())
}

/// An explicit `"title": null` is distinct from an absent field and is
/// rejected, since the column cannot be nulled.
#[sqlx::test(migrations = "../../migrations")]
async fn test_update_drink_explicit_null_title_returns_422(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let id = create_via_api(&server, "Tonic").await?;
    let token = server.token(&["patch:drinks"]);

    let response = server
        .client()
        .patch(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({"title": null}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_drink_malformed_body_returns_422(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let id = create_via_api(&server, "Cola").await?;
    let token = server.token(&["patch:drinks"]);

    let response = server
        .client()
        .patch(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_drink_duplicate_title_returns_409(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    create_via_api(&server, "Original").await?;
    let id = create_via_api(&server, "Renamed").await?;
    let token = server.token(&["patch:drinks"]);

    let response = server
        .client()
        .patch(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({"title": "Original"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_drink_without_permission_returns_403(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let id = create_via_api(&server, "Fizz").await?;
    let token = server.token(&["post:drinks"]);

    let response = server
        .client()
        .patch(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({"title": "Fizz2"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

// ============================================================================
// Delete Tests
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_drink_returns_deleted_id(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let id = create_via_api(&server, "Short Lived").await?;
    let token = server.token(&["delete:drinks"]);

    let response = server
        .client()
        .delete(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["delete"], id);

    Ok(())
}

/// Deleting twice: the second attempt finds nothing and answers 404.
#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_drink_twice_returns_404(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let id = create_via_api(&server, "Ephemeral").await?;
    let token = server.token(&["delete:drinks"]);

    let first = server
        .client()
        .delete(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await?;
    assert_eq!(first.status(), StatusCode::OK);

    let second = server
        .client()
        .delete(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await?;

    assert_eq!(second.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// A deleted drink also disappears from the public listing.
#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_drink_removes_it_from_listing(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let id = create_via_api(&server, "Gone Soon").await?;
    let token = server.token(&["delete:drinks"]);

    server
        .client()
        .delete(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await?;

    let listing = server
        .client()
        .get(format!("{}/drinks", server.url()))
        .send()
        .await?;
    let body: serde_json::Value = listing.json().await?;
    assert_eq!(body["drinks"], json!([]));

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_drink_without_permission_returns_403(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestDrinksServer::spawn(pool).await?;
    let id = create_via_api(&server, "Protected").await?;
    let token = server.token(&["patch:drinks"]);

    let response = server
        .client()
        .delete(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}
