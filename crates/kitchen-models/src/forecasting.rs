//! Demand forecasts and ingredient plans.
//!
//! The forecasting model runs on the backend; these types only carry its
//! output.

use serde::{Deserialize, Serialize};

/// Window covered by an ingredient plan.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString,
)]
pub enum ForecastScope {
    /// The next day only.
    #[serde(rename = "tomorrow")]
    #[strum(serialize = "tomorrow")]
    Tomorrow,
    /// The next seven days.
    #[serde(rename = "next7")]
    #[strum(serialize = "next7")]
    Next7,
}

/// Projected stock state of an ingredient.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum StockStatus {
    /// Enough stock for the window.
    Ok,
    /// Projected below the reorder level.
    Low,
    /// Projected to run out.
    Out,
}

/// A menu item that has no recipe and was skipped by the planner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MissingRecipe {
    /// Menu item id.
    pub menu_item_id: i64,
    /// Menu item name.
    pub menu_item_name: String,
}

/// How much of an ingredient a single menu item contributes to the plan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IngredientContribution {
    /// Menu item id.
    pub menu_item_id: i64,
    /// Menu item name.
    pub menu_item_name: String,
    /// Units forecast to sell.
    pub predicted_units: f64,
    /// Ingredient quantity per unit.
    pub per_unit_qty: String,
    /// Total ingredient quantity required.
    pub required_qty: String,
}

/// One ingredient row of an ingredient plan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlannedIngredient {
    /// Inventory item id.
    pub ingredient_id: i64,
    /// Ingredient name.
    pub ingredient_name: String,
    /// SKU.
    pub sku: String,
    /// Counting unit.
    pub unit: String,
    /// Stock on hand.
    pub current_stock: String,
    /// Reorder threshold.
    pub reorder_level: String,
    /// Quantity required over the window.
    pub required_qty: String,
    /// Stock left after the window.
    pub projected_remaining: String,
    /// Projected state.
    pub status: StockStatus,
    /// Quantity the planner suggests buying.
    pub suggested_purchase_qty: String,
    /// Per-menu-item breakdown, when requested.
    #[serde(default)]
    pub contributes: Option<Vec<IngredientContribution>>,
}

/// Response of `GET /api/forecasting/ingredients_plan/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IngredientPlan {
    /// Window label.
    pub scope: ForecastScope,
    /// Days covered.
    pub horizon_days: u32,
    /// First day covered (`YYYY-MM-DD`).
    pub start_date: String,
    /// Menu items skipped for lack of a recipe.
    #[serde(default)]
    pub items_missing_recipes: Vec<MissingRecipe>,
    /// Ingredient rows.
    #[serde(default)]
    pub ingredients: Vec<PlannedIngredient>,
}

/// One day of a forecast-vs-actual series.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    /// Day (`YYYY-MM-DD`).
    pub date: String,
    /// Forecast units.
    pub yhat: f64,
    /// Actual units.
    pub actual: f64,
}

/// Forecast accuracy of a single menu item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastHistoryItem {
    /// Menu item id.
    pub menu_item_id: i64,
    /// Menu item name.
    pub menu_item_name: String,
    /// Units actually sold yesterday.
    pub yesterday_actual: f64,
    /// Units forecast for yesterday.
    pub yesterday_pred: f64,
    /// Difference between the two.
    pub yesterday_diff: f64,
    /// Daily series.
    #[serde(default)]
    pub daily: Vec<ForecastPoint>,
}

/// Response of `GET /api/forecasting/history/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastHistory {
    /// First day (`YYYY-MM-DD`).
    pub start_date: String,
    /// Last day (`YYYY-MM-DD`).
    pub end_date: String,
    /// Number of days.
    pub days: u32,
    /// Per-item series.
    #[serde(default)]
    pub items: Vec<ForecastHistoryItem>,
}
