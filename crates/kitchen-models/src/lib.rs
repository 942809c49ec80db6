#![deny(missing_docs)]

//! # Kitchen Models
//!
//! Wire types exchanged with the Kitchen restaurant-management API.
//!
//! The backend owns all business rules; these types only describe the JSON
//! shapes it accepts and returns. Decimal amounts (prices, quantities, stock
//! levels) are kept as strings exactly as the backend serialises them.
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`auth`] | Tokens, login / register payloads, the current-user profile |
//! | [`tenant`] | Restaurant references and the normalised [`RestaurantSlug`] |
//! | [`menu`] | Categories, menu items, recipe lines |
//! | [`inventory`] | Inventory items and stock movements |
//! | [`purchases`] | Suppliers, purchase invoices, CSV export parameters |
//! | [`sales`] | Sales, sale lines, daily summaries |
//! | [`forecasting`] | Demand forecasts and ingredient plans |
//! | [`team`] | Team members and roles |
//! | [`imports`] | CSV import kinds and import reports |
//! | [`list`] | Helpers for paginated and non-paginated list responses |

pub mod auth;
pub mod error;
pub mod forecasting;
pub mod imports;
pub mod inventory;
pub mod list;
pub mod menu;
pub mod purchases;
pub mod sales;
pub mod team;
pub mod tenant;

// Re-export all public types at crate root for convenience.
pub use auth::*;
pub use error::*;
pub use forecasting::*;
pub use imports::*;
pub use inventory::*;
pub use list::*;
pub use menu::*;
pub use purchases::*;
pub use sales::*;
pub use team::*;
pub use tenant::*;
