//! Inventory items and stock movements.

use serde::{Deserialize, Serialize};

/// Unit in which an inventory item is counted.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum StockUnit {
    /// Pieces.
    Pcs,
    /// Kilograms.
    Kg,
    /// Grams.
    G,
    /// Litres.
    L,
    /// Millilitres.
    Ml,
}

/// A stocked ingredient or consumable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    /// Item id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Stock-keeping unit code.
    pub sku: String,
    /// Counting unit.
    pub unit: StockUnit,
    /// Decimal quantity on hand.
    pub current_stock: String,
    /// Level under which the item is reported as low.
    pub reorder_level: String,
    /// Decimal cost of one unit.
    pub cost_per_unit: String,
    /// Whether the item is still tracked.
    pub is_active: bool,
}

/// Body of `POST /api/inventory/items/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewInventoryItem {
    /// Display name.
    pub name: String,
    /// Stock-keeping unit code.
    pub sku: String,
    /// Counting unit.
    pub unit: StockUnit,
    /// Opening stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stock: Option<String>,
    /// Reorder threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reorder_level: Option<String>,
    /// Unit cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_unit: Option<String>,
}

/// Direction of a stock movement.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum MovementType {
    /// Stock received.
    In,
    /// Stock consumed or wasted.
    Out,
    /// Stock count correction.
    Adjust,
}

/// A recorded change of stock for one item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    /// Movement id.
    pub id: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Inventory item id.
    pub item: i64,
    /// Item name.
    #[serde(default)]
    pub item_name: String,
    /// Item SKU.
    #[serde(default)]
    pub item_sku: String,
    /// Direction.
    pub movement_type: MovementType,
    /// Decimal quantity.
    pub quantity: String,
    /// Reason code.
    #[serde(default)]
    pub reason: String,
    /// Free-form note.
    #[serde(default)]
    pub note: String,
    /// E-mail of the user who recorded the movement.
    #[serde(default)]
    pub created_by_email: String,
}

/// Body of `POST /api/inventory/movements/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewStockMovement {
    /// Inventory item id.
    pub item: i64,
    /// Direction.
    pub movement_type: MovementType,
    /// Decimal quantity.
    pub quantity: String,
    /// Reason code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
