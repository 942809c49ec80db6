//! Sales tickets and the daily summary.

use kitchen_models::{DailySalesSummary, NewSale, Sale};

use crate::client::{with_query, KitchenClient};
use crate::error::SdkError;
use crate::request::RequestOptions;

const SALES_PATH: &str = "/api/sales/sales/";
const SUMMARY_PATH: &str = "/api/sales/sales/summary/";

impl KitchenClient {
    /// Record a sale. Stock is deducted by the backend.
    pub async fn create_sale(&self, sale: &NewSale) -> Result<Sale, SdkError> {
        self.send(RequestOptions::post(), SALES_PATH, sale).await
    }

    /// Sales, newest first.
    pub async fn list_sales(&self) -> Result<Vec<Sale>, SdkError> {
        let path = with_query(SALES_PATH, [("ordering", Some("-created_at".to_string()))]);
        self.get_list(&path).await
    }

    /// One sale.
    pub async fn get_sale(&self, id: i64) -> Result<Sale, SdkError> {
        self.get(&format!("{SALES_PATH}{id}/")).await
    }

    /// Sales count and revenue per day over the last `days` days.
    pub async fn sales_summary(&self, days: u32) -> Result<Vec<DailySalesSummary>, SdkError> {
        let path = with_query(SUMMARY_PATH, [("days", Some(days.to_string()))]);
        self.get_list(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_kitchen::MockKitchen;

    use crate::config::ClientConfig;
    use crate::store::Session;

    #[tokio::test]
    async fn summary_has_one_row_per_day() {
        let mock = MockKitchen::new();
        let (addr, _server) = mock_kitchen::spawn(mock.clone()).await.unwrap();
        let client = KitchenClient::new(
            ClientConfig::new(format!("http://{addr}")),
            Session::in_memory(),
        )
        .unwrap();
        client.session().set_tokens(&mock.issue_tokens()).unwrap();

        let rows = client.sales_summary(3).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].date < rows[2].date);

        let err = client.sales_summary(0).await.unwrap_err();
        assert_eq!(err.status(), 400);
    }
}
