//! Suppliers and purchase invoices.

use serde::{Deserialize, Serialize};

use crate::forecasting::ForecastScope;

/// A supplier of inventory items.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Supplier {
    /// Supplier id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Contact e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Whether the supplier is in use.
    pub is_active: bool,
}

/// Body of `POST /api/purchases/suppliers/`. New suppliers are always
/// created active.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewSupplier {
    /// Display name.
    pub name: String,
    /// Contact e-mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Always `true` on creation.
    pub is_active: bool,
}

impl NewSupplier {
    /// An active supplier with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            is_active: true,
        }
    }
}

/// Lifecycle state of a purchase invoice.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum InvoiceStatus {
    /// Editable, stock not yet received.
    Draft,
    /// Posted; stock movements recorded.
    Posted,
    /// Cancelled.
    Void,
}

/// One line of a purchase invoice as returned by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PurchaseLine {
    /// Line id.
    pub id: i64,
    /// Inventory item id.
    pub item: i64,
    /// Item name.
    #[serde(default)]
    pub item_name: String,
    /// Item SKU.
    #[serde(default)]
    pub item_sku: Option<String>,
    /// Decimal quantity.
    pub qty: String,
    /// Decimal unit cost.
    pub unit_cost: String,
    /// Decimal line total.
    pub line_total: String,
}

/// A supplier invoice.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PurchaseInvoice {
    /// Invoice id.
    pub id: i64,
    /// Supplier id.
    pub supplier: i64,
    /// Supplier name.
    #[serde(default)]
    pub supplier_name: String,
    /// Supplier's invoice number.
    #[serde(default)]
    pub invoice_no: String,
    /// Invoice date (`YYYY-MM-DD`).
    pub invoice_date: String,
    /// Sum of line totals.
    pub subtotal: String,
    /// Discount amount.
    pub discount: String,
    /// Tax amount.
    pub tax: String,
    /// Grand total.
    pub total: String,
    /// Free-form note.
    #[serde(default)]
    pub note: String,
    /// Status label.
    pub status: String,
    /// Invoice lines.
    #[serde(default)]
    pub lines: Vec<PurchaseLine>,
}

/// A line of a new purchase invoice.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PurchaseLineInput {
    /// Inventory item id.
    pub item: i64,
    /// Decimal quantity.
    pub quantity: String,
    /// Decimal unit price.
    pub unit_price: String,
}

/// Body of `POST /api/purchases/invoices/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewPurchaseInvoice {
    /// Supplier id.
    pub supplier: i64,
    /// Supplier's invoice number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_no: Option<String>,
    /// Invoice date (`YYYY-MM-DD`).
    pub invoice_date: String,
    /// Discount amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    /// Initial status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    /// Tax amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<String>,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Invoice lines.
    pub lines: Vec<PurchaseLineInput>,
}

/// Body of `POST /api/purchases/invoices/from-forecast/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ForecastDraftRequest {
    /// Supplier the draft is addressed to.
    pub supplier: i64,
    /// Forecast window.
    pub scope: ForecastScope,
    /// Days of demand to cover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_days: Option<u32>,
    /// Number of menu items considered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
    /// Also include ingredients whose projected stock is fine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_ok: Option<bool>,
    /// Invoice date (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Identifier returned when a resource is created.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedId {
    /// New resource id.
    pub id: i64,
}

/// Granularity of the purchases CSV export.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExportMode {
    /// One row per invoice.
    Invoices,
    /// One row per invoice line.
    Lines,
}

/// Parameters of `GET /api/purchases/invoices/export-csv/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseExport {
    /// First day included (`YYYY-MM-DD`).
    pub from: String,
    /// Last day included (`YYYY-MM-DD`).
    pub to: String,
    /// Row granularity.
    pub mode: ExportMode,
}

impl PurchaseExport {
    /// Encode as a query string (without the leading `?`).
    pub fn query(&self) -> String {
        format!("from={}&to={}&mode={}", self.from, self.to, self.mode)
    }
}
