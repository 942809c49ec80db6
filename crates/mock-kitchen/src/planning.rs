//! Recipe lines and forecasting handlers.
//!
//! The forecast is a flat two units per menu item per day; the ingredient
//! plan applies the stored recipes to it.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use kitchen_models::{
    ForecastHistory, ForecastHistoryItem, ForecastPoint, ForecastScope, IngredientContribution,
    IngredientPlan, MissingRecipe, NewRecipeLine, PlannedIngredient, RecipeLine,
    RecipeLineUpdate, StockStatus,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::MockError;
use crate::{MockKitchen, Store};

/// Units each menu item is forecast to sell per day.
const DAILY_UNITS: f64 = 2.0;

fn quantity(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

fn positive_qty(raw: &str) -> Result<String, MockError> {
    match raw.trim().parse::<f64>() {
        Ok(qty) if qty > 0.0 => Ok(format!("{qty:.3}")),
        _ => Err(MockError::BadRequest(
            "Ensure this value is greater than 0.".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Recipe lines
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RecipeLineQuery {
    menu_item: Option<i64>,
    ordering: Option<String>,
}

/// `GET /api/menu/recipe-lines/?menu_item=&ordering=`
pub async fn list_recipe_lines(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Query(query): Query<RecipeLineQuery>,
) -> Result<Json<Vec<RecipeLine>>, MockError> {
    mock.authenticate(&headers)?;
    let mut lines: Vec<RecipeLine> = mock
        .store()
        .recipe_lines
        .iter()
        .filter(|l| query.menu_item.is_none_or(|m| l.menu_item == m))
        .cloned()
        .collect();
    match query.ordering.as_deref() {
        Some("-id") => lines.sort_by(|a, b| b.id.cmp(&a.id)),
        _ => lines.sort_by_key(|l| l.id),
    }
    Ok(Json(lines))
}

fn fill_ingredient(store: &Store, line: &mut RecipeLine) -> Result<(), MockError> {
    let item = store
        .inventory
        .iter()
        .find(|i| i.id == line.ingredient)
        .ok_or_else(|| {
            MockError::BadRequest(format!(
                "Invalid pk \"{}\" - object does not exist.",
                line.ingredient
            ))
        })?;
    line.ingredient_name.clone_from(&item.name);
    line.ingredient_unit = item.unit.to_string();
    line.ingredient_sku.clone_from(&item.sku);
    Ok(())
}

/// `POST /api/menu/recipe-lines/`
pub async fn create_recipe_line(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Json(payload): Json<NewRecipeLine>,
) -> Result<impl IntoResponse, MockError> {
    mock.authenticate(&headers)?;
    let qty = positive_qty(&payload.qty)?;

    let mut store = mock.store();
    if !store.menu_items.iter().any(|m| m.id == payload.menu_item) {
        return Err(MockError::BadRequest(format!(
            "Invalid pk \"{}\" - object does not exist.",
            payload.menu_item
        )));
    }
    if store
        .recipe_lines
        .iter()
        .any(|l| l.menu_item == payload.menu_item && l.ingredient == payload.ingredient)
    {
        return Err(MockError::BadRequest(
            "The fields menu_item, ingredient must make a unique set.".into(),
        ));
    }

    let mut line = RecipeLine {
        id: store.next_id(),
        menu_item: payload.menu_item,
        ingredient: payload.ingredient,
        ingredient_name: String::new(),
        ingredient_unit: String::new(),
        ingredient_sku: String::new(),
        qty,
    };
    fill_ingredient(&store, &mut line)?;
    store.recipe_lines.push(line.clone());
    Ok((StatusCode::CREATED, Json(line)))
}

/// `PATCH /api/menu/recipe-lines/{id}/`
pub async fn update_recipe_line(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(update): Json<RecipeLineUpdate>,
) -> Result<Json<RecipeLine>, MockError> {
    mock.authenticate(&headers)?;
    let mut store = mock.store();
    let mut line = store
        .recipe_lines
        .iter()
        .find(|l| l.id == id)
        .cloned()
        .ok_or(MockError::NotFound)?;

    if let Some(qty) = update.qty {
        line.qty = positive_qty(&qty)?;
    }
    if let Some(ingredient) = update.ingredient {
        line.ingredient = ingredient;
        fill_ingredient(&store, &mut line)?;
    }
    if let Some(slot) = store.recipe_lines.iter_mut().find(|l| l.id == id) {
        *slot = line.clone();
    }
    Ok(Json(line))
}

/// `DELETE /api/menu/recipe-lines/{id}/`
pub async fn delete_recipe_line(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, MockError> {
    mock.authenticate(&headers)?;
    let mut store = mock.store();
    let before = store.recipe_lines.len();
    store.recipe_lines.retain(|l| l.id != id);
    if store.recipe_lines.len() == before {
        return Err(MockError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Forecasting
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DemandQuery {
    horizon_days: Option<u32>,
    top_n: Option<usize>,
}

/// `GET /api/forecasting/demand/?horizon_days=&top_n=`
pub async fn demand(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Query(query): Query<DemandQuery>,
) -> Result<Json<Value>, MockError> {
    mock.authenticate(&headers)?;
    let horizon = query.horizon_days.unwrap_or(7);
    let items: Vec<Value> = mock
        .store()
        .menu_items
        .iter()
        .take(query.top_n.unwrap_or(50))
        .map(|m| {
            json!({
                "menu_item_id": m.id,
                "menu_item_name": m.name,
                "predicted_units": DAILY_UNITS * f64::from(horizon),
            })
        })
        .collect();
    Ok(Json(json!({ "horizon_days": horizon, "items": items })))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    days: Option<u32>,
    top_n: Option<usize>,
}

/// `GET /api/forecasting/history/?days=&top_n=`: forecast against (zero)
/// actual sales.
pub async fn history(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ForecastHistory>, MockError> {
    mock.authenticate(&headers)?;
    let days = query.days.unwrap_or(14);
    if !(1..=90).contains(&days) {
        return Err(MockError::BadRequest("days must be between 1 and 90.".into()));
    }

    let end = Utc::now().date_naive() - Duration::days(1);
    let start = end - Duration::days(i64::from(days) - 1);
    let daily: Vec<ForecastPoint> = (0..i64::from(days))
        .map(|offset| ForecastPoint {
            date: (start + Duration::days(offset)).to_string(),
            yhat: DAILY_UNITS,
            actual: 0.0,
        })
        .collect();

    let items = mock
        .store()
        .menu_items
        .iter()
        .take(query.top_n.unwrap_or(10))
        .map(|m| ForecastHistoryItem {
            menu_item_id: m.id,
            menu_item_name: m.name.clone(),
            yesterday_actual: 0.0,
            yesterday_pred: DAILY_UNITS,
            yesterday_diff: -DAILY_UNITS,
            daily: daily.clone(),
        })
        .collect();

    Ok(Json(ForecastHistory {
        start_date: start.to_string(),
        end_date: end.to_string(),
        days,
        items,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    scope: Option<ForecastScope>,
    horizon_days: Option<u32>,
    top_n: Option<usize>,
}

/// `GET /api/forecasting/ingredients_plan/?scope=&horizon_days=&top_n=`
pub async fn ingredients_plan(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Query(query): Query<PlanQuery>,
) -> Result<Json<IngredientPlan>, MockError> {
    mock.authenticate(&headers)?;
    let scope = query.scope.unwrap_or(ForecastScope::Tomorrow);
    let horizon = query.horizon_days.unwrap_or(match scope {
        ForecastScope::Tomorrow => 1,
        ForecastScope::Next7 => 7,
    });
    let units = DAILY_UNITS * f64::from(horizon);

    let store = mock.store();
    let menu_items: Vec<_> = store
        .menu_items
        .iter()
        .take(query.top_n.unwrap_or(50))
        .collect();

    let items_missing_recipes = menu_items
        .iter()
        .filter(|m| !store.recipe_lines.iter().any(|l| l.menu_item == m.id))
        .map(|m| MissingRecipe {
            menu_item_id: m.id,
            menu_item_name: m.name.clone(),
        })
        .collect();

    let mut ingredients: Vec<PlannedIngredient> = Vec::new();
    for item in &store.inventory {
        let contributes: Vec<IngredientContribution> = menu_items
            .iter()
            .filter_map(|m| {
                let line = store
                    .recipe_lines
                    .iter()
                    .find(|l| l.menu_item == m.id && l.ingredient == item.id)?;
                Some(IngredientContribution {
                    menu_item_id: m.id,
                    menu_item_name: m.name.clone(),
                    predicted_units: units,
                    per_unit_qty: line.qty.clone(),
                    required_qty: format!("{:.3}", quantity(&line.qty) * units),
                })
            })
            .collect();
        if contributes.is_empty() {
            continue;
        }

        let required: f64 = contributes.iter().map(|c| quantity(&c.required_qty)).sum();
        let stock = quantity(&item.current_stock);
        let reorder = quantity(&item.reorder_level);
        let remaining = stock - required;
        let status = if remaining <= 0.0 {
            StockStatus::Out
        } else if remaining <= reorder {
            StockStatus::Low
        } else {
            StockStatus::Ok
        };

        ingredients.push(PlannedIngredient {
            ingredient_id: item.id,
            ingredient_name: item.name.clone(),
            sku: item.sku.clone(),
            unit: item.unit.to_string(),
            current_stock: item.current_stock.clone(),
            reorder_level: item.reorder_level.clone(),
            required_qty: format!("{required:.3}"),
            projected_remaining: format!("{remaining:.3}"),
            status,
            suggested_purchase_qty: format!("{:.3}", (reorder - remaining).max(0.0)),
            contributes: Some(contributes),
        });
    }

    Ok(Json(IngredientPlan {
        scope,
        horizon_days: horizon,
        start_date: (Utc::now().date_naive() + Duration::days(1)).to_string(),
        items_missing_recipes,
        ingredients,
    }))
}
