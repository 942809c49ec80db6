//! Recipe lines: ingredient quantities per menu item.

use kitchen_models::{NewRecipeLine, RecipeLine, RecipeLineUpdate};

use crate::client::{with_query, KitchenClient};
use crate::error::SdkError;
use crate::request::RequestOptions;

const RECIPE_LINES_PATH: &str = "/api/menu/recipe-lines/";

fn recipe_line_path(id: i64) -> String {
    format!("{RECIPE_LINES_PATH}{id}/")
}

impl KitchenClient {
    /// Recipe of a menu item.
    pub async fn list_recipe_lines(&self, menu_item: i64) -> Result<Vec<RecipeLine>, SdkError> {
        let path = with_query(
            RECIPE_LINES_PATH,
            [
                ("menu_item", Some(menu_item.to_string())),
                ("ordering", Some("id".to_string())),
            ],
        );
        self.get_list(&path).await
    }

    /// Add an ingredient to a recipe.
    pub async fn create_recipe_line(&self, line: &NewRecipeLine) -> Result<RecipeLine, SdkError> {
        self.send(RequestOptions::post(), RECIPE_LINES_PATH, line)
            .await
    }

    /// Change the quantity or ingredient of a recipe line.
    pub async fn update_recipe_line(
        &self,
        id: i64,
        update: &RecipeLineUpdate,
    ) -> Result<RecipeLine, SdkError> {
        self.send(RequestOptions::patch(), &recipe_line_path(id), update)
            .await
    }

    /// Remove a recipe line.
    pub async fn delete_recipe_line(&self, id: i64) -> Result<(), SdkError> {
        self.delete_resource(&recipe_line_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_kitchen::MockKitchen;

    use crate::config::ClientConfig;
    use crate::store::Session;

    #[tokio::test]
    async fn recipe_line_lifecycle() {
        let mock = MockKitchen::new();
        let (addr, _server) = mock_kitchen::spawn(mock.clone()).await.unwrap();
        let client = KitchenClient::new(
            ClientConfig::new(format!("http://{addr}")),
            Session::in_memory(),
        )
        .unwrap();
        client.session().set_tokens(&mock.issue_tokens()).unwrap();

        let created = client
            .create_recipe_line(&NewRecipeLine {
                menu_item: 1,
                ingredient: 2,
                qty: "5".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.ingredient_name, "Rosemary");
        assert_eq!(created.qty, "5.000");

        let lines = client.list_recipe_lines(1).await.unwrap();
        let ids: Vec<i64> = lines.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, created.id]);
        assert!(client.list_recipe_lines(999).await.unwrap().is_empty());

        let updated = client
            .update_recipe_line(
                created.id,
                &RecipeLineUpdate {
                    qty: Some("2.5".into()),
                    ingredient: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.qty, "2.500");

        client.delete_recipe_line(created.id).await.unwrap();
        assert_eq!(client.list_recipe_lines(1).await.unwrap().len(), 1);

        let err = client.delete_recipe_line(created.id).await.unwrap_err();
        assert_eq!(err.status(), 404);
    }
}
