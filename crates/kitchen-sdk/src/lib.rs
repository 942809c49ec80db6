//! # Kitchen SDK
//!
//! Authenticated HTTP client for the **Kitchen** restaurant-management
//! backend.
//!
//! The SDK provides:
//!
//! * [`Gateway`]: the request pipeline. Attaches the bearer token and the
//!   active restaurant, and on `401` performs one shared token refresh
//!   followed by a single retry.
//! * [`KitchenClient`]: one typed method per backend operation, built on the
//!   gateway.
//! * [`Session`] over a [`CredentialStore`] ([`MemoryStore`],
//!   [`FileStore`]): where tokens and the active restaurant are kept.
//! * [`SdkError`]: unified error type for all SDK operations.
//!
//! Wire types from [`kitchen_models`] are re-exported for convenience.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use kitchen_sdk::{ClientConfig, FileStore, KitchenClient, Session};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), kitchen_sdk::SdkError> {
//! let store = FileStore::new(FileStore::default_path().unwrap_or_default());
//! let client = KitchenClient::new(ClientConfig::from_env(), Session::new(Arc::new(store)))?;
//!
//! // Reuses the stored session; refreshes the access token if it expired.
//! let me = client.me().await?;
//! println!("signed in as {}", me.email);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod request;
pub mod response;
pub mod single_flight;
pub mod store;

pub use client::KitchenClient;
pub use config::ClientConfig;
pub use error::{RefreshError, SdkError};
pub use gateway::Gateway;
pub use request::{MultipartForm, RequestBody, RequestOptions};
pub use single_flight::SingleFlight;
pub use store::{CredentialStore, FileStore, MemoryStore, Session};

pub use kitchen_models;
