#![allow(dead_code)]

use axum::http::StatusCode;
use axum_test::TestServer;
use category_api::app;
use category_api::core::config::AppConfig;
use fake::faker::company::en::CompanyName;
use fake::Fake;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

/// Build a test server over the same router and middleware stack the binary uses
pub fn test_server(pool: PgPool) -> TestServer {
    let app = app::build_app(pool, &AppConfig::default());
    TestServer::new(app).expect("failed to build test server")
}

pub fn id_of(body: &Value) -> Uuid {
    body["id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("response carries a UUID id")
}

pub async fn create_company(server: &TestServer) -> Uuid {
    let name: String = CompanyName().fake();
    let response = server
        .post("/api/companies/")
        .json(&json!({ "name": name }))
        .await;
    response.assert_status(StatusCode::CREATED);
    id_of(&response.json::<Value>())
}

pub async fn create_category(
    server: &TestServer,
    company: Uuid,
    name: &str,
    parent: Option<Uuid>,
) -> Uuid {
    let response = server
        .post("/api/categories/")
        .json(&json!({
            "company": company,
            "name": name,
            "parent_category": parent,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    id_of(&response.json::<Value>())
}

/// Two companies with three categories:
/// `category2` is a child of `category1` (both in `company1`), `category3` is in `company2`.
pub struct Fixture {
    pub company1: Uuid,
    pub company2: Uuid,
    pub category1: Uuid,
    pub category2: Uuid,
    pub category3: Uuid,
}

pub async fn seed(server: &TestServer) -> Fixture {
    let company1 = create_company(server).await;
    let company2 = create_company(server).await;
    let category1 = create_category(server, company1, "Category 1", None).await;
    let category2 = create_category(server, company1, "Category 2", Some(category1)).await;
    let category3 = create_category(server, company2, "Category 3", None).await;

    Fixture {
        company1,
        company2,
        category1,
        category2,
        category3,
    }
}
