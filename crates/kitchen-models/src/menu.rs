//! Menu categories, menu items and recipes.

use serde::{Deserialize, Serialize};

/// A menu category.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// Body of `POST /api/menu/categories/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Position in the menu; `0` when not given.
    #[serde(default)]
    pub sort_order: i32,
    /// Whether the category is shown; `true` when not given.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewCategory {
    /// A new active category at the head of the menu.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            sort_order: 0,
            is_active: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A sellable menu item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Item id.
    pub id: i64,
    /// Owning category id.
    pub category: i64,
    /// Owning category name.
    #[serde(default)]
    pub category_name: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Decimal price.
    pub price: String,
    /// Whether the item can currently be ordered.
    pub is_available: bool,
}

/// Body of `POST /api/menu/items/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewMenuItem {
    /// Owning category id.
    pub category: i64,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Decimal price.
    pub price: String,
    /// Availability flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

/// Filters for `GET /api/menu/items/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItemFilter {
    /// Only items of this category.
    pub category: Option<i64>,
    /// Free-text search.
    pub search: Option<String>,
}

/// One ingredient line of a menu item's recipe.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeLine {
    /// Line id.
    pub id: i64,
    /// Menu item this line belongs to.
    pub menu_item: i64,
    /// Inventory item consumed.
    pub ingredient: i64,
    /// Ingredient name.
    #[serde(default)]
    pub ingredient_name: String,
    /// Ingredient unit.
    #[serde(default)]
    pub ingredient_unit: String,
    /// Ingredient SKU.
    #[serde(default)]
    pub ingredient_sku: String,
    /// Quantity consumed per one menu item.
    pub qty: String,
}

/// Body of `POST /api/menu/recipe-lines/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewRecipeLine {
    /// Menu item id.
    pub menu_item: i64,
    /// Inventory item id.
    pub ingredient: i64,
    /// Quantity per menu item.
    pub qty: String,
}

/// Body of `PATCH /api/menu/recipe-lines/{id}/`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeLineUpdate {
    /// New quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<String>,
    /// New ingredient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_category_defaults() {
        let cat = NewCategory::new("Desserts", "desserts");
        let value = serde_json::to_value(&cat).unwrap();
        assert_eq!(
            value,
            json!({"name": "Desserts", "slug": "desserts", "sort_order": 0, "is_active": true})
        );

        let parsed: NewCategory =
            serde_json::from_value(json!({"name": "A", "slug": "a"})).unwrap();
        assert!(parsed.is_active);
        assert_eq!(parsed.sort_order, 0);
    }

    #[test]
    fn recipe_update_serializes_only_set_fields() {
        let update = RecipeLineUpdate {
            qty: Some("0.250".into()),
            ingredient: None,
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"qty": "0.250"}));
    }
}
