//! Typed client for the Kitchen REST API.
//!
//! [`KitchenClient`] owns a [`Gateway`] and adds one method per backend
//! operation. The methods live in the `api` modules, grouped by area; this
//! module holds the shared plumbing.
//!
//! # Typical usage
//!
//! ```rust,no_run
//! use kitchen_models::LoginPayload;
//! use kitchen_sdk::{ClientConfig, KitchenClient, Session};
//!
//! # async fn run() -> Result<(), kitchen_sdk::SdkError> {
//! let client = KitchenClient::new(ClientConfig::from_env(), Session::in_memory())?;
//! client
//!     .login(&LoginPayload {
//!         email: "chef@kitchen.test".into(),
//!         password: "password".into(),
//!         restaurant_slug: Some("demo-bistro".into()),
//!     })
//!     .await?;
//!
//! for item in client.low_stock_items().await? {
//!     println!("{} is running low", item.name);
//! }
//! # Ok(())
//! # }
//! ```

use kitchen_models::unwrap_list;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::SdkError;
use crate::gateway::Gateway;
use crate::request::RequestOptions;
use crate::response::{read_bytes, read_json};
use crate::store::Session;

/// Client for one signed-in (or signing-in) user.
#[derive(Clone)]
pub struct KitchenClient {
    pub(crate) gateway: Gateway,
}

impl KitchenClient {
    /// Build a client for `config` backed by `session`.
    pub fn new(config: ClientConfig, session: Session) -> Result<Self, SdkError> {
        Ok(Self::from_gateway(Gateway::new(config, session)?))
    }

    /// Wrap an existing gateway.
    pub fn from_gateway(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// The underlying gateway, for requests without a typed wrapper.
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// The session this client reads and writes.
    pub fn session(&self) -> &Session {
        self.gateway.session()
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    pub(crate) async fn fetch_json(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, SdkError> {
        let response = self.gateway.auth_fetch(path, options).await?;
        read_json(response).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        let body = self.fetch_json(path, RequestOptions::get()).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, SdkError> {
        let body = self.fetch_json(path, RequestOptions::get()).await?;
        Ok(unwrap_list(body)?)
    }

    pub(crate) async fn send<B, T>(
        &self,
        options: RequestOptions,
        path: &str,
        payload: &B,
    ) -> Result<T, SdkError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.fetch_json(path, options.json(payload)?).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub(crate) async fn delete_resource(&self, path: &str) -> Result<(), SdkError> {
        self.fetch_json(path, RequestOptions::delete()).await?;
        Ok(())
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, SdkError> {
        let response = self.gateway.auth_fetch(path, RequestOptions::get()).await?;
        read_bytes(response).await
    }
}

/// Append the present `params` to `path` as a query string.
pub(crate) fn with_query<'a, I>(path: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<String>)>,
{
    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut empty = true;
    for (key, value) in params {
        if let Some(value) = value {
            query.append_pair(key, &value);
            empty = false;
        }
    }
    if empty {
        path.to_string()
    } else {
        format!("{path}?{}", query.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_skips_absent_values_and_encodes() {
        let path = with_query(
            "/api/menu/items/",
            [
                ("is_available", Some("true".to_string())),
                ("category", None),
                ("search", Some("crème brûlée".to_string())),
            ],
        );
        assert_eq!(
            path,
            "/api/menu/items/?is_available=true&search=cr%C3%A8me+br%C3%BBl%C3%A9e"
        );
    }

    #[test]
    fn absent_params_leave_path_alone() {
        assert_eq!(with_query("/api/x/", [("search", None::<String>)]), "/api/x/");
    }
}
