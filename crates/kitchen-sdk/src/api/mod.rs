//! Backend operations, one module per area.
//!
//! | Module        | Endpoints                                  |
//! |---------------|--------------------------------------------|
//! | `auth`        | `/api/auth/register/`, `token/`, `me/`, …  |
//! | `menu`        | `/api/menu/categories/`, `/api/menu/items/`|
//! | `recipes`     | `/api/menu/recipe-lines/`                  |
//! | `inventory`   | `/api/inventory/items/`, `movements/`      |
//! | `purchases`   | `/api/purchases/suppliers/`, `invoices/`   |
//! | `sales`       | `/api/sales/sales/`                        |
//! | `forecasting` | `/api/forecasting/…`                       |
//! | `team`        | `/api/auth/users/`                         |
//! | `imports`     | `/api/import/csv/`                         |

mod auth;
mod forecasting;
mod imports;
mod inventory;
mod menu;
mod purchases;
mod recipes;
mod sales;
mod team;

pub use auth::{LOGIN_PATH, ME_PATH, REGISTER_PATH};
