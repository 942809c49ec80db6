//! Menu categories and items.

use kitchen_models::{Category, MenuItem, MenuItemFilter, NewCategory, NewMenuItem};

use crate::client::{with_query, KitchenClient};
use crate::error::SdkError;
use crate::request::RequestOptions;

const CATEGORIES_PATH: &str = "/api/menu/categories/";
const ITEMS_PATH: &str = "/api/menu/items/";

impl KitchenClient {
    /// Active menu categories.
    pub async fn list_categories(&self) -> Result<Vec<Category>, SdkError> {
        let path = with_query(CATEGORIES_PATH, [("is_active", Some("true".to_string()))]);
        self.get_list(&path).await
    }

    /// Create a category.
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, SdkError> {
        self.send(RequestOptions::post(), CATEGORIES_PATH, category)
            .await
    }

    /// Available menu items, optionally narrowed by category and name.
    pub async fn list_menu_items(&self, filter: &MenuItemFilter) -> Result<Vec<MenuItem>, SdkError> {
        let path = with_query(
            ITEMS_PATH,
            [
                ("is_available", Some("true".to_string())),
                ("category", filter.category.map(|id| id.to_string())),
                (
                    "search",
                    filter
                        .search
                        .as_deref()
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from),
                ),
            ],
        );
        self.get_list(&path).await
    }

    /// Create a menu item.
    pub async fn create_menu_item(&self, item: &NewMenuItem) -> Result<MenuItem, SdkError> {
        self.send(RequestOptions::post(), ITEMS_PATH, item).await
    }
}
