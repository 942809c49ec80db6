//! Bulk CSV import.

use serde::{Deserialize, Serialize};

/// Which table a CSV file populates.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImportKind {
    /// Menu categories.
    Categories,
    /// Menu items.
    MenuItems,
    /// Inventory ingredients.
    Ingredients,
    /// Recipe lines.
    Recipes,
}

/// Response of `POST /api/import/csv/`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Rows created.
    #[serde(default)]
    pub created: u32,
    /// Rows updated.
    #[serde(default)]
    pub updated: u32,
    /// Per-row errors, verbatim.
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    /// Kind that was imported.
    #[serde(default)]
    pub kind: Option<String>,
    /// Whether nothing was written.
    #[serde(default)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_format() {
        assert_eq!(ImportKind::MenuItems.to_string(), "menu_items");
        assert_eq!("recipes".parse::<ImportKind>().unwrap(), ImportKind::Recipes);
    }

    #[test]
    fn empty_report_parses() {
        let report: ImportReport = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(report, ImportReport::default());
    }
}
