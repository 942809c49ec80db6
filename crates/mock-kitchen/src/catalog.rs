//! Restaurant data handlers: inventory, menu, sales, import and export.

use std::collections::HashMap;

use axum::extract::{Multipart, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use kitchen_models::{
    Category, DailySalesSummary, ExportMode, ImportKind, ImportReport, InventoryItem, MenuItem,
    NewCategory, NewInventoryItem,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::MockError;
use crate::MockKitchen;

fn quantity(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// `GET /api/inventory/items/`, plain array ordered by name.
pub async fn list_inventory(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
) -> Result<Json<Vec<InventoryItem>>, MockError> {
    mock.authenticate(&headers)?;
    let mut items = mock.store().inventory.clone();
    items.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(items))
}

/// `POST /api/inventory/items/`
pub async fn create_inventory_item(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Json(payload): Json<NewInventoryItem>,
) -> Result<impl IntoResponse, MockError> {
    mock.authenticate(&headers)?;
    if payload.name.trim().is_empty() {
        return Err(MockError::BadRequest("Name is required.".into()));
    }

    let mut store = mock.store();
    if store.inventory.iter().any(|i| i.sku == payload.sku) {
        return Err(MockError::BadRequest(
            "inventory item with this sku already exists.".into(),
        ));
    }
    let item = InventoryItem {
        id: store.next_id(),
        name: payload.name,
        sku: payload.sku,
        unit: payload.unit,
        current_stock: payload.current_stock.unwrap_or_else(|| "0.000".into()),
        reorder_level: payload.reorder_level.unwrap_or_else(|| "0.000".into()),
        cost_per_unit: payload.cost_per_unit.unwrap_or_else(|| "0.00".into()),
        is_active: true,
    };
    store.inventory.push(item.clone());
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /api/inventory/items/low_stock/`: items at or below their reorder
/// level.
pub async fn low_stock(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
) -> Result<Json<Vec<InventoryItem>>, MockError> {
    mock.authenticate(&headers)?;
    let items = mock
        .store()
        .inventory
        .iter()
        .filter(|i| i.is_active && quantity(&i.current_stock) <= quantity(&i.reorder_level))
        .cloned()
        .collect();
    Ok(Json(items))
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

/// `GET /api/menu/categories/`, paginated.
pub async fn list_categories(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
) -> Result<Json<Value>, MockError> {
    mock.authenticate(&headers)?;
    let categories = mock.store().categories.clone();
    Ok(Json(json!({
        "count": categories.len(),
        "next": null,
        "previous": null,
        "results": categories,
    })))
}

/// `POST /api/menu/categories/`
pub async fn create_category(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Json(payload): Json<NewCategory>,
) -> Result<impl IntoResponse, MockError> {
    mock.authenticate(&headers)?;
    let mut store = mock.store();
    if store.categories.iter().any(|c| c.slug == payload.slug) {
        return Err(MockError::BadRequest(
            "category with this slug already exists.".into(),
        ));
    }
    let category = Category {
        id: store.next_id(),
        name: payload.name,
        slug: payload.slug,
    };
    store.categories.push(category.clone());
    Ok((StatusCode::CREATED, Json(category)))
}

#[derive(Debug, Deserialize)]
pub struct MenuItemQuery {
    category: Option<i64>,
    search: Option<String>,
    is_available: Option<bool>,
}

/// `GET /api/menu/items/?category=&search=&is_available=`
pub async fn list_menu_items(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Query(query): Query<MenuItemQuery>,
) -> Result<Json<Vec<MenuItem>>, MockError> {
    mock.authenticate(&headers)?;
    let search = query.search.map(|s| s.to_lowercase());
    let items = mock
        .store()
        .menu_items
        .iter()
        .filter(|i| query.category.is_none_or(|c| i.category == c))
        .filter(|i| query.is_available.is_none_or(|a| i.is_available == a))
        .filter(|i| {
            search
                .as_deref()
                .is_none_or(|s| i.name.to_lowercase().contains(s))
        })
        .cloned()
        .collect();
    Ok(Json(items))
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

/// `GET /api/sales/sales/summary/?days=N`: one row per day, oldest first.
pub async fn sales_summary(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<DailySalesSummary>>, MockError> {
    mock.authenticate(&headers)?;
    let days: i64 = match params.get("days") {
        Some(raw) => raw
            .parse()
            .ok()
            .filter(|d| (1..=365).contains(d))
            .ok_or_else(|| MockError::BadRequest("days must be between 1 and 365.".into()))?,
        None => 7,
    };

    let today = Utc::now().date_naive();
    let rows = (0..days)
        .rev()
        .map(|offset| DailySalesSummary {
            date: (today - Duration::days(offset)).to_string(),
            count: 0,
            total: "0.00".into(),
        })
        .collect();
    Ok(Json(rows))
}

// ---------------------------------------------------------------------------
// Import / export
// ---------------------------------------------------------------------------

/// `POST /api/import/csv/` with `kind`, `dry_run` and `file` fields.
///
/// Every non-blank row after the header counts as created. Category rows
/// are stored unless `dry_run` is set.
pub async fn import_csv(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<ImportReport>, MockError> {
    mock.authenticate(&headers)?;

    let mut kind = None;
    let mut dry_run = false;
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| MockError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let text = field
            .text()
            .await
            .map_err(|e| MockError::BadRequest(e.body_text()))?;
        match name.as_str() {
            "kind" => kind = Some(text),
            "dry_run" => dry_run = text == "true",
            "file" => file = Some(text),
            _ => {}
        }
    }

    let kind: ImportKind = kind
        .ok_or_else(|| MockError::BadRequest("kind is required.".into()))?
        .parse()
        .map_err(|_| MockError::BadRequest("Unknown import kind.".into()))?;
    let file = file.ok_or_else(|| MockError::BadRequest("file is required.".into()))?;

    let rows: Vec<&str> = file
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .collect();

    if kind == ImportKind::Categories && !dry_run {
        let mut store = mock.store();
        for row in &rows {
            let name = row.split(',').next().unwrap_or_default().trim().to_string();
            let category = Category {
                id: store.next_id(),
                slug: name.to_lowercase().replace(' ', "-"),
                name,
            };
            store.categories.push(category);
        }
    }

    Ok(Json(ImportReport {
        created: u32::try_from(rows.len()).unwrap_or(u32::MAX),
        updated: 0,
        errors: Vec::new(),
        kind: Some(kind.to_string()),
        dry_run,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    from: NaiveDate,
    to: NaiveDate,
    #[serde(default = "default_mode")]
    mode: ExportMode,
}

fn default_mode() -> ExportMode {
    ExportMode::Invoices
}

/// `GET /api/purchases/invoices/export-csv/?from=&to=&mode=`
///
/// Errors are plain text, as the real export endpoint sends them.
pub async fn export_purchases(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> Result<Response, MockError> {
    mock.authenticate(&headers)?;
    if query.from > query.to {
        return Ok((StatusCode::BAD_REQUEST, "`from` must not be after `to`.").into_response());
    }

    let header_row = match query.mode {
        ExportMode::Invoices => "invoice_no,invoice_date,supplier,status,total\n",
        ExportMode::Lines => "invoice_no,invoice_date,supplier,item,sku,qty,unit_cost,line_total\n",
    };
    let disposition = format!(
        "attachment; filename=\"purchases_{}_{}_{}.csv\"",
        query.mode, query.from, query.to
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        header_row,
    )
        .into_response())
}
