//! HTTP-level integration tests for the category endpoints.
//!
//! Each test gets a fresh database with migrations applied.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use common::{create_category, create_company, id_of, seed, test_server};

// ---------------------------------------------------------------------------
// Basic CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list(pool: PgPool) {
    let server = test_server(pool);
    seed(&server).await;

    let response = server.get("/api/categories/").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Vec<Value>>().len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_retrieve(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .get(&format!("/api/categories/{}/", fx.category1))
        .await;
    response.assert_status(StatusCode::OK);

    let body = response.json::<Value>();
    assert_eq!(body["name"], "Category 1");
    assert_eq!(body["company"], fx.company1.to_string());
    assert!(body["parent_category"].is_null());
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .post("/api/categories/")
        .json(&json!({ "company": fx.company1, "name": "New Category" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["name"], "New Category");

    let list = server.get("/api/categories/").await;
    assert_eq!(list.json::<Vec<Value>>().len(), 4);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_ignores_client_supplied_id(pool: PgPool) {
    let server = test_server(pool);
    let company = create_company(&server).await;
    let requested_id = Uuid::new_v4();

    let response = server
        .post("/api/categories/")
        .json(&json!({ "id": requested_id, "company": company, "name": "Books" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_ne!(id_of(&response.json::<Value>()), requested_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;
    let url = format!("/api/categories/{}/", fx.category1);

    let response = server
        .put(&url)
        .json(&json!({ "company": fx.company1, "name": "Updated Category 1" }))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["name"], "Updated Category 1");

    let reloaded = server.get(&url).await.json::<Value>();
    assert_eq!(reloaded["name"], "Updated Category 1");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_put_without_parent_clears_it(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .put(&format!("/api/categories/{}/", fx.category2))
        .json(&json!({ "company": fx.company1, "name": "Category 2" }))
        .await;
    response.assert_status(StatusCode::OK);
    assert!(response.json::<Value>()["parent_category"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_partial_update_keeps_other_fields(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .patch(&format!("/api/categories/{}/", fx.category2))
        .json(&json!({ "name": "Partially Updated" }))
        .await;
    response.assert_status(StatusCode::OK);

    let body = response.json::<Value>();
    assert_eq!(body["name"], "Partially Updated");
    assert_eq!(body["company"], fx.company1.to_string());
    assert_eq!(body["parent_category"], fx.category1.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_partial_update_null_parent_clears_it(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .patch(&format!("/api/categories/{}/", fx.category2))
        .json(&json!({ "parent_category": null }))
        .await;
    response.assert_status(StatusCode::OK);

    let body = response.json::<Value>();
    assert!(body["parent_category"].is_null());
    assert_eq!(body["name"], "Category 2");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_destroy(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;
    let url = format!("/api/categories/{}/", fx.category3);

    let response = server.delete(&url).await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.text().is_empty());

    server.get(&url).await.assert_status(StatusCode::NOT_FOUND);
    let list = server.get("/api/categories/").await;
    assert_eq!(list.json::<Vec<Value>>().len(), 2);
}

// ---------------------------------------------------------------------------
// Hierarchy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_parent(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .post("/api/categories/")
        .json(&json!({
            "company": fx.company1,
            "name": "Child Category",
            "parent_category": fx.category1,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>()["parent_category"],
        fx.category1.to_string()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_retrieve_with_parent(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let body = server
        .get(&format!("/api/categories/{}/", fx.category2))
        .await
        .json::<Value>();
    assert_eq!(body["name"], "Category 2");
    assert_eq!(body["parent_category"], fx.category1.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_parent_category(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .put(&format!("/api/categories/{}/", fx.category1))
        .json(&json!({
            "company": fx.company1,
            "name": "Category 1",
            "parent_category": fx.category2,
        }))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["parent_category"],
        fx.category2.to_string()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_parent_detaches_children(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    server
        .delete(&format!("/api/categories/{}/", fx.category1))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let child = server
        .get(&format!("/api/categories/{}/", fx.category2))
        .await;
    child.assert_status(StatusCode::OK);
    assert!(child.json::<Value>()["parent_category"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters_by_company_and_parent(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let by_company = server
        .get(&format!("/api/categories/?company={}", fx.company1))
        .await
        .json::<Vec<Value>>();
    assert_eq!(by_company.len(), 2);
    assert!(by_company
        .iter()
        .all(|c| c["company"] == fx.company1.to_string()));

    let children = server
        .get(&format!("/api/categories/?parent_category={}", fx.category1))
        .await
        .json::<Vec<Value>>();
    assert_eq!(children.len(), 1);
    assert_eq!(id_of(&children[0]), fx.category2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_as_tree(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let tree = server
        .get(&format!("/api/categories/?company={}&tree=true", fx.company1))
        .await
        .json::<Vec<Value>>();
    assert_eq!(tree.len(), 1);
    assert_eq!(id_of(&tree[0]), fx.category1);

    let children = tree[0]["children"].as_array().expect("children array");
    assert_eq!(children.len(), 1);
    assert_eq!(id_of(&children[0]), fx.category2);
}

// ---------------------------------------------------------------------------
// Name uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_duplicate_name_different_company(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .post("/api/categories/")
        .json(&json!({ "company": fx.company2, "name": "Category 1" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["name"], "Category 1");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_duplicate_name_same_company(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .post("/api/categories/")
        .json(&json!({ "company": fx.company1, "name": "Category 1" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("name").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_check_uses_trimmed_name(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .post("/api/categories/")
        .json(&json!({ "company": fx.company1, "name": "  Category 1  " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_duplicate_name_validation(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .put(&format!("/api/categories/{}/", fx.category1))
        .json(&json!({ "company": fx.company1, "name": "Category 2" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_keeping_own_name_is_not_a_duplicate(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .put(&format!("/api/categories/{}/", fx.category1))
        .json(&json!({ "company": fx.company1, "name": "Category 1" }))
        .await;
    response.assert_status(StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Parent rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_parent_from_different_company(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .post("/api/categories/")
        .json(&json!({
            "company": fx.company2,
            "name": "Invalid Child",
            "parent_category": fx.category1,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("parent_category").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_parent_different_company_validation(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .put(&format!("/api/categories/{}/", fx.category1))
        .json(&json!({
            "company": fx.company1,
            "name": "Category 1",
            "parent_category": fx.category3,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("parent_category").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_self_reference_validation(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .put(&format!("/api/categories/{}/", fx.category1))
        .json(&json!({
            "company": fx.company1,
            "name": "Category 1",
            "parent_category": fx.category1,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("parent_category").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_patch_self_reference_validation(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .patch(&format!("/api/categories/{}/", fx.category2))
        .json(&json!({ "parent_category": fx.category2 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("parent_category").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_patch_company_away_from_parent_is_rejected(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .patch(&format!("/api/categories/{}/", fx.category2))
        .json(&json!({ "company": fx.company2 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("parent_category").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_patch_company_of_category_with_children_is_rejected(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;
    let url = format!("/api/categories/{}/", fx.category1);

    let response = server
        .patch(&url)
        .json(&json!({ "company": fx.company2 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("company").is_some());

    let parent = server.get(&url).await.json::<Value>();
    assert_eq!(parent["company"], fx.company1.to_string());

    let child = server
        .get(&format!("/api/categories/{}/", fx.category2))
        .await
        .json::<Value>();
    assert_eq!(child["company"], parent["company"]);
    assert_eq!(child["parent_category"], fx.category1.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_put_company_of_category_with_children_is_rejected(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .put(&format!("/api/categories/{}/", fx.category1))
        .json(&json!({ "company": fx.company2, "name": "Category 1" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("company").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_childless_category_can_move_company(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;

    let response = server
        .patch(&format!("/api/categories/{}/", fx.category3))
        .json(&json!({ "company": fx.company1 }))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["company"], fx.company1.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_storage_keeps_parent_in_same_company(pool: PgPool) {
    let server = test_server(pool.clone());
    let fx = seed(&server).await;

    let moved = sqlx::query("UPDATE categories SET company_id = $1 WHERE id = $2")
        .bind(fx.company2)
        .bind(fx.category1)
        .execute(&pool)
        .await
        .unwrap_err();
    let db_err = moved.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23514"));
    assert_eq!(db_err.constraint(), Some("categories_children_same_company"));

    let linked = sqlx::query("UPDATE categories SET parent_category_id = $1 WHERE id = $2")
        .bind(fx.category1)
        .bind(fx.category3)
        .execute(&pool)
        .await
        .unwrap_err();
    let db_err = linked.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("categories_parent_same_company"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_patch_null_company_is_rejected(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;
    let url = format!("/api/categories/{}/", fx.category3);

    let response = server
        .patch(&url)
        .json(&json!({ "company": null }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("company").is_some());

    let body = server.get(&url).await.json::<Value>();
    assert_eq!(body["company"], fx.company2.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_unknown_company(pool: PgPool) {
    let server = test_server(pool);

    let response = server
        .post("/api/categories/")
        .json(&json!({ "company": Uuid::new_v4(), "name": "Orphan" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("company").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_unknown_parent(pool: PgPool) {
    let server = test_server(pool);
    let company = create_company(&server).await;

    let response = server
        .post("/api/categories/")
        .json(&json!({
            "company": company,
            "name": "Child",
            "parent_category": Uuid::new_v4(),
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("parent_category").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_validation_does_not_mutate(pool: PgPool) {
    let server = test_server(pool);
    let fx = seed(&server).await;
    let url = format!("/api/categories/{}/", fx.category1);

    server
        .put(&url)
        .json(&json!({
            "company": fx.company1,
            "name": "Renamed",
            "parent_category": fx.category3,
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let body = server.get(&url).await.json::<Value>();
    assert_eq!(body["name"], "Category 1");
    assert!(body["parent_category"].is_null());
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_with_malformed_filter_returns_detail(pool: PgPool) {
    let server = test_server(pool);

    let response = server.get("/api/categories/?company=not-a-uuid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["detail"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_padded_max_length_name(pool: PgPool) {
    let server = test_server(pool);
    let company = create_company(&server).await;
    let name = "x".repeat(255);

    let response = server
        .post("/api/categories/")
        .json(&json!({ "company": company, "name": format!("  {}  ", name) }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["name"], name);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_blank_name(pool: PgPool) {
    let server = test_server(pool);
    let company = create_company(&server).await;

    let response = server
        .post("/api/categories/")
        .json(&json!({ "company": company, "name": "   " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>().get("name").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_missing_fields(pool: PgPool) {
    let server = test_server(pool);

    let response = server
        .post("/api/categories/")
        .json(&json!({ "name": "No company" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Existence checks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_retrieve_nonexistent(pool: PgPool) {
    let server = test_server(pool);

    let response = server
        .get(&format!("/api/categories/{}/", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_destroy_nonexistent(pool: PgPool) {
    let server = test_server(pool);

    let response = server
        .delete(&format!("/api/categories/{}/", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_nonexistent(pool: PgPool) {
    let server = test_server(pool);
    let company = create_company(&server).await;

    let response = server
        .put(&format!("/api/categories/{}/", Uuid::new_v4()))
        .json(&json!({ "company": company, "name": "Ghost" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_malformed_id_is_not_found(pool: PgPool) {
    let server = test_server(pool);

    let response = server.get("/api/categories/not-a-uuid/").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["detail"], "Not found.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_created_child_is_listed_under_its_parent(pool: PgPool) {
    let server = test_server(pool);
    let company = create_company(&server).await;
    let root = create_category(&server, company, "Root", None).await;
    let child = create_category(&server, company, "Leaf", Some(root)).await;

    let children = server
        .get(&format!("/api/categories/?parent_category={}", root))
        .await
        .json::<Vec<Value>>();
    assert_eq!(children.len(), 1);
    assert_eq!(id_of(&children[0]), child);
}
