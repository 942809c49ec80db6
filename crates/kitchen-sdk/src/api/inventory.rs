//! Inventory items and stock movements.

use kitchen_models::{InventoryItem, NewInventoryItem, NewStockMovement, StockMovement};

use crate::client::{with_query, KitchenClient};
use crate::error::SdkError;
use crate::request::RequestOptions;

const ITEMS_PATH: &str = "/api/inventory/items/";
const LOW_STOCK_PATH: &str = "/api/inventory/items/low_stock/";
const MOVEMENTS_PATH: &str = "/api/inventory/movements/";

impl KitchenClient {
    /// All inventory items, by name.
    pub async fn list_inventory_items(&self) -> Result<Vec<InventoryItem>, SdkError> {
        let path = with_query(ITEMS_PATH, [("ordering", Some("name".to_string()))]);
        self.get_list(&path).await
    }

    /// Create an inventory item.
    pub async fn create_inventory_item(
        &self,
        item: &NewInventoryItem,
    ) -> Result<InventoryItem, SdkError> {
        self.send(RequestOptions::post(), ITEMS_PATH, item).await
    }

    /// Record stock coming in, going out or being corrected.
    pub async fn create_stock_movement(
        &self,
        movement: &NewStockMovement,
    ) -> Result<StockMovement, SdkError> {
        self.send(RequestOptions::post(), MOVEMENTS_PATH, movement)
            .await
    }

    /// Movements of one item, newest first.
    pub async fn list_movements(&self, item: i64) -> Result<Vec<StockMovement>, SdkError> {
        let path = with_query(
            MOVEMENTS_PATH,
            [
                ("item", Some(item.to_string())),
                ("ordering", Some("-created_at".to_string())),
            ],
        );
        self.get_list(&path).await
    }

    /// Items at or below their reorder level.
    pub async fn low_stock_items(&self) -> Result<Vec<InventoryItem>, SdkError> {
        self.get_list(LOW_STOCK_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_models::StockUnit;
    use mock_kitchen::MockKitchen;

    use crate::config::ClientConfig;
    use crate::store::Session;

    async fn signed_in(mock: &MockKitchen) -> KitchenClient {
        let (addr, _server) = mock_kitchen::spawn(mock.clone()).await.unwrap();
        let client = KitchenClient::new(
            ClientConfig::new(format!("http://{addr}")),
            Session::in_memory(),
        )
        .unwrap();
        client.session().set_tokens(&mock.issue_tokens()).unwrap();
        client
    }

    #[tokio::test]
    async fn created_item_is_listed_by_name() {
        let mock = MockKitchen::new();
        let client = signed_in(&mock).await;

        let created = client
            .create_inventory_item(&NewInventoryItem {
                name: "Butter".into(),
                sku: "DRY-2".into(),
                unit: StockUnit::Kg,
                current_stock: Some("1.000".into()),
                reorder_level: Some("2.000".into()),
                cost_per_unit: None,
            })
            .await
            .unwrap();
        assert_eq!(created.cost_per_unit, "0.00");

        let names: Vec<String> = client
            .list_inventory_items()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Butter", "Chicken", "Rosemary"]);

        let low: Vec<String> = client
            .low_stock_items()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.sku)
            .collect();
        assert_eq!(low, vec!["CHK-1", "DRY-2"]);
    }

    #[tokio::test]
    async fn expired_session_recovers_transparently() {
        let mock = MockKitchen::new();
        mock.set_refresh_delay(std::time::Duration::from_millis(150));
        let client = signed_in(&mock).await;
        mock.expire_access_tokens();

        let (a, b) = tokio::join!(client.list_inventory_items(), client.low_stock_items());
        assert_eq!(a.unwrap().len(), 2);
        assert_eq!(b.unwrap().len(), 1);
        assert_eq!(mock.refresh_calls(), 1);
    }
}
