//! Demand forecasts and ingredient planning.

use kitchen_models::{ForecastHistory, ForecastScope, IngredientPlan};
use serde_json::Value;

use crate::client::{with_query, KitchenClient};
use crate::error::SdkError;

const DEMAND_PATH: &str = "/api/forecasting/demand/";
const HISTORY_PATH: &str = "/api/forecasting/history/";
const INGREDIENTS_PLAN_PATH: &str = "/api/forecasting/ingredients_plan/";

impl KitchenClient {
    /// Predicted demand per menu item over the next `horizon_days` days.
    ///
    /// The payload shape depends on the forecasting model deployed, so it
    /// is returned as JSON.
    pub async fn demand_forecast(&self, horizon_days: u32, top_n: u32) -> Result<Value, SdkError> {
        let path = with_query(
            DEMAND_PATH,
            [
                ("horizon_days", Some(horizon_days.to_string())),
                ("top_n", Some(top_n.to_string())),
            ],
        );
        self.get(&path).await
    }

    /// Predictions against actual sales for the last `days` days.
    pub async fn forecast_history(&self, days: u32, top_n: u32) -> Result<ForecastHistory, SdkError> {
        let path = with_query(
            HISTORY_PATH,
            [
                ("days", Some(days.to_string())),
                ("top_n", Some(top_n.to_string())),
            ],
        );
        self.get(&path).await
    }

    /// Ingredient requirements for the forecast window. `horizon_days`
    /// overrides the window implied by `scope`.
    pub async fn ingredient_plan(
        &self,
        scope: ForecastScope,
        horizon_days: Option<u32>,
        top_n: u32,
    ) -> Result<IngredientPlan, SdkError> {
        let path = with_query(
            INGREDIENTS_PLAN_PATH,
            [
                ("scope", Some(scope.to_string())),
                ("horizon_days", horizon_days.map(|d| d.to_string())),
                ("top_n", Some(top_n.to_string())),
            ],
        );
        self.get(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_models::StockStatus;
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
    async fn ingredient_plan_follows_scope_and_override() {
        let mock = MockKitchen::new();
        let client = signed_in(&mock).await;

        let tomorrow = client
            .ingredient_plan(ForecastScope::Tomorrow, None, 50)
            .await
            .unwrap();
        assert_eq!(tomorrow.scope, ForecastScope::Tomorrow);
        assert_eq!(tomorrow.horizon_days, 1);
        let chicken = &tomorrow.ingredients[0];
        assert_eq!(chicken.required_qty, "0.800");
        assert_eq!(chicken.status, StockStatus::Low);

        let three_days = client
            .ingredient_plan(ForecastScope::Next7, Some(3), 50)
            .await
            .unwrap();
        assert_eq!(three_days.scope, ForecastScope::Next7);
        assert_eq!(three_days.horizon_days, 3);
        assert_eq!(three_days.ingredients[0].required_qty, "2.400");
    }

    #[tokio::test]
    async fn demand_and_history_pass_their_windows() {
        let mock = MockKitchen::new();
        let client = signed_in(&mock).await;

        let demand = client.demand_forecast(5, 10).await.unwrap();
        assert_eq!(demand["horizon_days"], 5);
        assert_eq!(demand["items"][0]["menu_item_name"], "Roast Chicken");

        let history = client.forecast_history(7, 10).await.unwrap();
        assert_eq!(history.days, 7);
        assert_eq!(history.items.len(), 1);
        assert_eq!(history.items[0].daily.len(), 7);

        let err = client.forecast_history(0, 10).await.unwrap_err();
        assert_eq!(err.status(), 400);
    }
}
