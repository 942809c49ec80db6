//! In-memory Kitchen backend.
//!
//! Serves the subset of the REST API the SDK and CLI talk to, backed by a
//! seeded in-memory store. Besides the API it exposes knobs that tests use
//! to force the interesting auth paths (expired access tokens, slow or
//! rejected refreshes) and counters to observe them.
//!
//! | Route                                        | Purpose                     |
//! |----------------------------------------------|-----------------------------|
//! | `POST /api/auth/register/`                   | create user (+ restaurant)  |
//! | `POST /api/auth/token/`                      | login                       |
//! | `POST /api/auth/token/refresh/`              | refresh access token        |
//! | `GET  /api/auth/me/`                         | current user                |
//! | `GET  /api/auth/my-restaurants/`             | active restaurant           |
//! | `GET/POST /api/auth/users/`                  | team members                |
//! | `GET/POST /api/inventory/items/`             | inventory                   |
//! | `GET  /api/inventory/items/low_stock/`       | items below reorder level   |
//! | `GET/POST /api/menu/categories/`             | menu categories (paginated) |
//! | `GET  /api/menu/items/`                      | menu items                  |
//! | `GET/POST /api/menu/recipe-lines/`           | recipe lines                |
//! | `PATCH/DELETE /api/menu/recipe-lines/{id}/`  | one recipe line             |
//! | `GET  /api/forecasting/demand/`              | demand forecast             |
//! | `GET  /api/forecasting/history/`             | forecast vs actual          |
//! | `GET  /api/forecasting/ingredients_plan/`    | ingredient requirements     |
//! | `GET  /api/sales/sales/summary/`             | daily sales summary         |
//! | `POST /api/import/csv/`                      | CSV import (multipart)      |
//! | `GET  /api/purchases/invoices/export-csv/`   | CSV export                  |
//! | `/__mock/echo/`, `/__mock/empty/`, ...       | diagnostics                 |

mod auth;
mod catalog;
mod diagnostics;
mod error;
mod planning;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{any, get, patch, post};
use axum::Router;
use kitchen_models::{
    Category, InventoryItem, MenuItem, RecipeLine, RestaurantDetails, StockUnit, TeamRole,
    Tokens,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub use crate::error::MockError;

/// Email of the seeded account.
pub const DEMO_EMAIL: &str = "chef@kitchen.test";
/// Password of the seeded account.
pub const DEMO_PASSWORD: &str = "password";
/// Id of the seeded restaurant.
pub const DEMO_RESTAURANT_ID: i64 = 1;
/// Slug of the seeded restaurant.
pub const DEMO_RESTAURANT_SLUG: &str = "demo-bistro";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: TeamRole,
    pub is_active: bool,
    pub restaurant_id: i64,
}

#[derive(Debug, Default)]
struct Knobs {
    refresh_delay: Duration,
    reject_refresh: bool,
    omit_access_on_refresh: bool,
    legacy_login: bool,
    legacy_register: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Store {
    pub users: Vec<User>,
    pub restaurants: Vec<RestaurantDetails>,
    pub categories: Vec<Category>,
    pub menu_items: Vec<MenuItem>,
    pub inventory: Vec<InventoryItem>,
    pub recipe_lines: Vec<RecipeLine>,
    access_tokens: HashMap<String, i64>,
    refresh_tokens: HashMap<String, i64>,
    next_id: i64,
    knobs: Knobs,
    refresh_calls: usize,
    hits: HashMap<String, usize>,
}

impl Store {
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn issue_access(&mut self, user_id: i64) -> String {
        let token = format!("access-{}", Uuid::new_v4().simple());
        self.access_tokens.insert(token.clone(), user_id);
        token
    }

    pub fn issue_tokens(&mut self, user_id: i64) -> Tokens {
        let refresh = format!("refresh-{}", Uuid::new_v4().simple());
        self.refresh_tokens.insert(refresh.clone(), user_id);
        Tokens {
            access: self.issue_access(user_id),
            refresh,
        }
    }

    pub fn restaurant(&self, id: i64) -> Option<&RestaurantDetails> {
        self.restaurants.iter().find(|r| r.id == id)
    }

    fn seeded() -> Self {
        let mut store = Self {
            next_id: 100,
            ..Self::default()
        };
        store.restaurants.push(RestaurantDetails {
            id: DEMO_RESTAURANT_ID,
            name: "Demo Bistro".into(),
            slug: DEMO_RESTAURANT_SLUG.into(),
            is_active: Some(true),
            subscription_tier: Some("free".into()),
            created_at: None,
            updated_at: None,
        });
        store.users.push(User {
            id: 1,
            username: "chef".into(),
            email: DEMO_EMAIL.into(),
            password: DEMO_PASSWORD.into(),
            first_name: "Demo".into(),
            last_name: "Chef".into(),
            role: TeamRole::Owner,
            is_active: true,
            restaurant_id: DEMO_RESTAURANT_ID,
        });
        store.categories.push(Category {
            id: 1,
            name: "Mains".into(),
            slug: "mains".into(),
        });
        store.menu_items.push(MenuItem {
            id: 1,
            category: 1,
            category_name: "Mains".into(),
            name: "Roast Chicken".into(),
            slug: "roast-chicken".into(),
            description: String::new(),
            price: "18.50".into(),
            is_available: true,
        });
        store.inventory.extend([
            InventoryItem {
                id: 1,
                name: "Chicken".into(),
                sku: "CHK-1".into(),
                unit: StockUnit::Kg,
                current_stock: "2.000".into(),
                reorder_level: "5.000".into(),
                cost_per_unit: "7.20".into(),
                is_active: true,
            },
            InventoryItem {
                id: 2,
                name: "Rosemary".into(),
                sku: "HRB-7".into(),
                unit: StockUnit::G,
                current_stock: "800.000".into(),
                reorder_level: "100.000".into(),
                cost_per_unit: "0.04".into(),
                is_active: true,
            },
        ]);
        store.recipe_lines.push(RecipeLine {
            id: 1,
            menu_item: 1,
            ingredient: 1,
            ingredient_name: "Chicken".into(),
            ingredient_unit: "KG".into(),
            ingredient_sku: "CHK-1".into(),
            qty: "0.400".into(),
        });
        store
    }
}

/// Handle to a mock backend. Clones share state.
#[derive(Clone)]
pub struct MockKitchen {
    store: Arc<Mutex<Store>>,
}

impl MockKitchen {
    /// A backend seeded with one restaurant, one owner account and a few
    /// menu and inventory rows.
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::seeded())),
        }
    }

    pub(crate) fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a valid token pair for the seeded account without going
    /// through login.
    pub fn issue_tokens(&self) -> Tokens {
        self.store().issue_tokens(1)
    }

    /// Invalidate every access token issued so far. Refresh tokens stay
    /// valid.
    pub fn expire_access_tokens(&self) {
        self.store().access_tokens.clear();
    }

    /// Delay every refresh response by `delay`.
    pub fn set_refresh_delay(&self, delay: Duration) {
        self.store().knobs.refresh_delay = delay;
    }

    /// Answer every refresh with `401`.
    pub fn reject_refresh(&self, reject: bool) {
        self.store().knobs.reject_refresh = reject;
    }

    /// Answer refreshes with `200 {}`.
    pub fn omit_access_on_refresh(&self, omit: bool) {
        self.store().knobs.omit_access_on_refresh = omit;
    }

    /// Reject `restaurant_slug` on login with `400`, like older backends.
    pub fn legacy_login(&self, legacy: bool) {
        self.store().knobs.legacy_login = legacy;
    }

    /// Reject restaurant fields on registration with `400`, like older
    /// backends.
    pub fn legacy_register(&self, legacy: bool) {
        self.store().knobs.legacy_register = legacy;
    }

    /// Number of refresh requests received.
    pub fn refresh_calls(&self) -> usize {
        self.store().refresh_calls
    }

    /// Number of requests received for `path` (query string excluded).
    pub fn hits(&self, path: &str) -> usize {
        self.store().hits.get(path).copied().unwrap_or(0)
    }

    /// Resolve the bearer token in `headers` to a user.
    pub(crate) fn authenticate(&self, headers: &HeaderMap) -> Result<User, MockError> {
        let token = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                MockError::Unauthorized("Authentication credentials were not provided.".into())
            })?;

        let store = self.store();
        store
            .access_tokens
            .get(token)
            .and_then(|id| store.users.iter().find(|u| u.id == *id))
            .cloned()
            .ok_or_else(|| MockError::Unauthorized("Given token not valid for any token type".into()))
    }
}

impl Default for MockKitchen {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

async fn count_hits(State(mock): State<MockKitchen>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    *mock.store().hits.entry(path).or_insert(0) += 1;
    next.run(request).await
}

/// Build the router over `mock`.
pub fn router(mock: MockKitchen) -> Router {
    Router::new()
        .route("/api/auth/register/", post(auth::register))
        .route("/api/auth/token/", post(auth::login))
        .route("/api/auth/token/refresh/", post(auth::refresh))
        .route("/api/auth/me/", get(auth::me))
        .route("/api/auth/my-restaurants/", get(auth::my_restaurant))
        .route(
            "/api/auth/users/",
            get(auth::list_users).post(auth::create_user),
        )
        .route(
            "/api/inventory/items/",
            get(catalog::list_inventory).post(catalog::create_inventory_item),
        )
        .route("/api/inventory/items/low_stock/", get(catalog::low_stock))
        .route(
            "/api/menu/categories/",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route("/api/menu/items/", get(catalog::list_menu_items))
        .route(
            "/api/menu/recipe-lines/",
            get(planning::list_recipe_lines).post(planning::create_recipe_line),
        )
        .route(
            "/api/menu/recipe-lines/{id}/",
            patch(planning::update_recipe_line).delete(planning::delete_recipe_line),
        )
        .route("/api/forecasting/demand/", get(planning::demand))
        .route("/api/forecasting/history/", get(planning::history))
        .route(
            "/api/forecasting/ingredients_plan/",
            get(planning::ingredients_plan),
        )
        .route("/api/sales/sales/summary/", get(catalog::sales_summary))
        .route("/api/import/csv/", post(catalog::import_csv))
        .route(
            "/api/purchases/invoices/export-csv/",
            get(catalog::export_purchases),
        )
        .route("/__mock/echo/", any(diagnostics::echo))
        .route("/__mock/empty/", any(diagnostics::empty))
        .route("/__mock/not-json/", any(diagnostics::not_json))
        .route("/__mock/always-401/", any(diagnostics::always_unauthorized))
        .layer(middleware::from_fn_with_state(mock.clone(), count_hits))
        .with_state(mock)
}

/// Serve `mock` on an ephemeral loopback port.
pub async fn spawn(mock: MockKitchen) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = router(mock);

    let handle = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!(error = %err, "mock server stopped");
        }
    });
    tracing::debug!(address = %addr, "mock kitchen listening");
    Ok((addr, handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server(mock: &MockKitchen) -> TestServer {
        TestServer::new(router(mock.clone())).unwrap()
    }

    #[tokio::test]
    async fn login_returns_tokens_and_tenant() {
        let mock = MockKitchen::new();
        let server = server(&mock);

        let response = server
            .post("/api/auth/token/")
            .json(&json!({"email": DEMO_EMAIL, "password": DEMO_PASSWORD}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["access"].as_str().unwrap().starts_with("access-"));
        assert!(body["refresh"].as_str().unwrap().starts_with("refresh-"));
        assert_eq!(body["restaurant_id"], DEMO_RESTAURANT_ID);
        assert_eq!(body["restaurant"]["slug"], DEMO_RESTAURANT_SLUG);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let server = server(&MockKitchen::new());
        let response = server
            .post("/api/auth/token/")
            .json(&json!({"email": DEMO_EMAIL, "password": "nope"}))
            .await;
        response.assert_status_unauthorized();
        let body: Value = response.json();
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn legacy_login_rejects_restaurant_slug() {
        let mock = MockKitchen::new();
        mock.legacy_login(true);
        let server = server(&mock);

        server
            .post("/api/auth/token/")
            .json(&json!({
                "email": DEMO_EMAIL,
                "password": DEMO_PASSWORD,
                "restaurant_slug": DEMO_RESTAURANT_SLUG
            }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn refresh_issues_new_access_and_counts_calls() {
        let mock = MockKitchen::new();
        let tokens = mock.issue_tokens();
        let server = server(&mock);

        let response = server
            .post("/api/auth/token/refresh/")
            .json(&json!({"refresh": tokens.refresh}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_ne!(body["access"], tokens.access);
        assert_eq!(mock.refresh_calls(), 1);

        mock.reject_refresh(true);
        server
            .post("/api/auth/token/refresh/")
            .json(&json!({"refresh": tokens.refresh}))
            .await
            .assert_status_unauthorized();
        assert_eq!(mock.refresh_calls(), 2);
    }

    #[tokio::test]
    async fn expired_access_is_rejected() {
        let mock = MockKitchen::new();
        let tokens = mock.issue_tokens();
        let server = server(&mock);

        server
            .get("/api/auth/me/")
            .authorization_bearer(&tokens.access)
            .await
            .assert_status_ok();

        mock.expire_access_tokens();
        server
            .get("/api/auth/me/")
            .authorization_bearer(&tokens.access)
            .await
            .assert_status_unauthorized();
        assert_eq!(mock.hits("/api/auth/me/"), 2);
    }

    #[tokio::test]
    async fn categories_are_paginated_and_inventory_is_plain() {
        let mock = MockKitchen::new();
        let tokens = mock.issue_tokens();
        let server = server(&mock);

        let categories: Value = server
            .get("/api/menu/categories/")
            .authorization_bearer(&tokens.access)
            .await
            .json();
        assert_eq!(categories["count"], 1);
        assert_eq!(categories["results"][0]["slug"], "mains");

        let inventory: Value = server
            .get("/api/inventory/items/")
            .authorization_bearer(&tokens.access)
            .await
            .json();
        assert_eq!(inventory.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn low_stock_lists_items_at_or_below_reorder_level() {
        let mock = MockKitchen::new();
        let tokens = mock.issue_tokens();
        let server = server(&mock);

        let items: Value = server
            .get("/api/inventory/items/low_stock/")
            .authorization_bearer(&tokens.access)
            .await
            .json();
        let names: Vec<&str> = items
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Chicken"]);
    }

    #[tokio::test]
    async fn empty_endpoint_has_no_body() {
        let server = server(&MockKitchen::new());
        let response = server.get("/__mock/empty/").await;
        response.assert_status_ok();
        assert!(response.as_bytes().is_empty());
    }

    #[tokio::test]
    async fn export_rejects_inverted_range_with_text() {
        let mock = MockKitchen::new();
        let tokens = mock.issue_tokens();
        let server = server(&mock);

        let response = server
            .get("/api/purchases/invoices/export-csv/")
            .add_query_param("from", "2026-02-01")
            .add_query_param("to", "2026-01-01")
            .authorization_bearer(&tokens.access)
            .await;
        response.assert_status_bad_request();
        assert_eq!(response.text(), "`from` must not be after `to`.");
    }

    #[tokio::test]
    async fn ingredient_plan_applies_recipes() {
        let mock = MockKitchen::new();
        let tokens = mock.issue_tokens();
        let server = server(&mock);

        let response = server
            .get("/api/forecasting/ingredients_plan/")
            .add_query_param("scope", "tomorrow")
            .authorization_bearer(&tokens.access)
            .await;
        response.assert_status_ok();
        let plan: Value = response.json();
        assert_eq!(plan["horizon_days"], 1);
        assert_eq!(plan["ingredients"][0]["ingredient_name"], "Chicken");
        assert_eq!(plan["ingredients"][0]["required_qty"], "0.800");
        assert_eq!(plan["ingredients"][0]["status"], "LOW");
    }

    #[tokio::test]
    async fn deleting_unknown_recipe_line_is_not_found() {
        let mock = MockKitchen::new();
        let tokens = mock.issue_tokens();
        let server = server(&mock);

        server
            .delete("/api/menu/recipe-lines/999/")
            .authorization_bearer(&tokens.access)
            .await
            .assert_status(axum::http::StatusCode::NOT_FOUND);
    }
}
