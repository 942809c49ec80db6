//! Point-of-sale tickets.

use serde::{Deserialize, Serialize};

/// How a sale was paid.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Card terminal.
    Card,
    /// Online payment.
    Online,
}

/// One line of a new sale.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleItemInput {
    /// Menu item sold.
    pub menu_item: i64,
    /// Units sold.
    pub qty: u32,
}

/// Body of `POST /api/sales/sales/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    /// Customer name printed on the ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Discount amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    /// Tax amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Status label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Lines sold.
    pub items: Vec<SaleItemInput>,
}

/// A recorded sale.
///
/// The backend has shipped several sale serialisers; only `id` is
/// guaranteed, everything else is optional.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sale {
    /// Sale id.
    pub id: i64,
    /// Customer name.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Payment method.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Status label.
    #[serde(default)]
    pub status: Option<String>,
    /// Grand total.
    #[serde(default, alias = "total_amount")]
    pub total: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Remaining fields, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One day of `GET /api/sales/sales/summary/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailySalesSummary {
    /// Day (`YYYY-MM-DD`).
    pub date: String,
    /// Number of sales.
    pub count: u32,
    /// Decimal revenue.
    pub total: String,
}
