//! Suppliers, purchase invoices and the purchases CSV export.

use kitchen_models::{
    CreatedId, ForecastDraftRequest, NewPurchaseInvoice, NewSupplier, PurchaseExport,
    PurchaseInvoice, Supplier,
};
use serde_json::json;

use crate::client::{with_query, KitchenClient};
use crate::error::SdkError;
use crate::request::RequestOptions;

const SUPPLIERS_PATH: &str = "/api/purchases/suppliers/";
const INVOICES_PATH: &str = "/api/purchases/invoices/";
const FROM_FORECAST_PATH: &str = "/api/purchases/invoices/from-forecast/";
const EXPORT_PATH: &str = "/api/purchases/invoices/export-csv/";

fn invoice_path(id: i64) -> String {
    format!("{INVOICES_PATH}{id}/")
}

impl KitchenClient {
    /// Suppliers, by name.
    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, SdkError> {
        let path = with_query(SUPPLIERS_PATH, [("ordering", Some("name".to_string()))]);
        self.get_list(&path).await
    }

    /// Create a supplier.
    pub async fn create_supplier(&self, supplier: &NewSupplier) -> Result<Supplier, SdkError> {
        self.send(RequestOptions::post(), SUPPLIERS_PATH, supplier)
            .await
    }

    /// Purchase invoices, newest first.
    pub async fn list_purchase_invoices(&self) -> Result<Vec<PurchaseInvoice>, SdkError> {
        let path = with_query(
            INVOICES_PATH,
            [("ordering", Some("-invoice_date".to_string()))],
        );
        self.get_list(&path).await
    }

    /// Record a purchase invoice.
    pub async fn create_purchase_invoice(
        &self,
        invoice: &NewPurchaseInvoice,
    ) -> Result<PurchaseInvoice, SdkError> {
        self.send(RequestOptions::post(), INVOICES_PATH, invoice)
            .await
    }

    /// One purchase invoice with its lines.
    pub async fn get_purchase_invoice(&self, id: i64) -> Result<PurchaseInvoice, SdkError> {
        self.get(&invoice_path(id)).await
    }

    /// Void a posted invoice, reversing its stock movements.
    pub async fn void_purchase_invoice(
        &self,
        id: i64,
        reason: Option<&str>,
    ) -> Result<PurchaseInvoice, SdkError> {
        let path = format!("{}void/", invoice_path(id));
        let body = json!({ "reason": reason.unwrap_or_default() });
        self.send(RequestOptions::post(), &path, &body).await
    }

    /// Draft an invoice from the ingredient plan.
    pub async fn purchase_draft_from_forecast(
        &self,
        request: &ForecastDraftRequest,
    ) -> Result<CreatedId, SdkError> {
        self.send(RequestOptions::post(), FROM_FORECAST_PATH, request)
            .await
    }

    /// Purchases between two dates as CSV bytes.
    pub async fn export_purchases_csv(&self, export: &PurchaseExport) -> Result<Vec<u8>, SdkError> {
        let path = with_query(
            EXPORT_PATH,
            [
                ("from", Some(export.from.clone())),
                ("to", Some(export.to.clone())),
                ("mode", Some(export.mode.to_string())),
            ],
        );
        self.get_bytes(&path).await
    }
}
