//! Authenticated request gateway.
//!
//! Every call to a protected endpoint goes through [`Gateway::auth_fetch`].
//! It attaches the stored bearer token and the active restaurant, and on a
//! `401` performs one shared token refresh followed by a single retry.
//!
//! ```text
//!   auth_fetch ──► send(access) ──► 2xx/4xx/5xx ──────────────► response
//!                       │
//!                       └─ 401 ──► refresh (single flight)
//!                                    ├─ Ok(new) ──► send(new) ──► response
//!                                    └─ Err ─────► session cleared,
//!                                                  original 401 returned
//! ```

use std::sync::Arc;

use kitchen_models::{RefreshRequest, TenantContext};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{RefreshError, SdkError};
use crate::request::{RequestBody, RequestOptions};
use crate::response::read_json;
use crate::single_flight::SingleFlight;
use crate::store::Session;

/// Token refresh endpoint.
pub const REFRESH_PATH: &str = "/api/auth/token/refresh/";

/// Sends requests to the backend on behalf of one session.
///
/// Cloning is cheap; clones share the HTTP connection pool, the session and
/// the refresh slot.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    config: ClientConfig,
    session: Session,
    refresh: SingleFlight<Result<String, RefreshError>>,
}

impl Gateway {
    /// Build a gateway for `config`, reading and writing credentials through
    /// `session`.
    pub fn new(config: ClientConfig, session: Session) -> Result<Self, SdkError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| SdkError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                config,
                session,
                refresh: SingleFlight::new(),
            }),
        })
    }

    /// The session this gateway authenticates with.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// The configuration this gateway was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Send an authenticated request.
    ///
    /// Any status other than `401` is returned as is. On `401` the access
    /// token is refreshed (sharing a refresh already in progress) and the
    /// request is retried once; the retry's response is returned whatever
    /// its status. If the refresh fails the session is cleared and the
    /// original `401` response is returned.
    ///
    /// A `401` for a token that has since been replaced in the session
    /// (another caller refreshed meanwhile) is retried with the stored
    /// token without starting a new refresh.
    pub async fn auth_fetch(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, SdkError> {
        let url = self.inner.config.endpoint(path);
        let session = &self.inner.session;

        let access = session.access_token()?;
        let tenant = session.tenant()?;
        let response = send(&self.inner.http, &url, &options, access.as_deref(), &tenant).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        if let Some(current) = session.access_token()? {
            if access.as_deref() != Some(current.as_str()) {
                debug!(%url, "access token replaced while in flight, retrying");
                let tenant = session.tenant()?;
                return send(&self.inner.http, &url, &options, Some(&current), &tenant).await;
            }
        }

        debug!(%url, "access token rejected, refreshing");
        match self.refresh_access_token().await {
            Ok(access) => {
                let tenant = session.tenant()?;
                send(&self.inner.http, &url, &options, Some(&access), &tenant).await
            }
            Err(err) => {
                debug!(%url, error = %err, "returning original 401");
                Ok(response)
            }
        }
    }

    /// Obtain a new access token, joining a refresh already in progress.
    ///
    /// All callers that overlap with one refresh receive the same outcome.
    /// The new token is persisted, or the session cleared, exactly once per
    /// refresh.
    pub async fn refresh_access_token(&self) -> Result<String, RefreshError> {
        let http = self.inner.http.clone();
        let url = self.inner.config.endpoint(REFRESH_PATH);
        let session = self.inner.session.clone();

        self.inner
            .refresh
            .run(move || refresh_once(http, url, session))
            .await
    }

    /// Whether a token refresh is currently in progress.
    pub fn is_refreshing(&self) -> bool {
        self.inner.refresh.in_flight()
    }

    /// Send an unauthenticated JSON request and parse the response.
    ///
    /// Used by the login, register and refresh flows. No bearer or tenant
    /// header is attached unless the caller sets one.
    pub async fn request_json(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, SdkError> {
        let url = self.inner.config.endpoint(path);
        let response = send(
            &self.inner.http,
            &url,
            &options,
            None,
            &TenantContext::default(),
        )
        .await?;
        read_json(response).await
    }
}

async fn send(
    http: &reqwest::Client,
    url: &str,
    options: &RequestOptions,
    access: Option<&str>,
    tenant: &TenantContext,
) -> Result<Response, SdkError> {
    let headers = options.prepare_headers(access, tenant)?;
    let request = http
        .request(options.method().clone(), url)
        .headers(headers);
    let request = match options.body() {
        RequestBody::Empty => request,
        RequestBody::Json(bytes) => request.body(bytes.clone()),
        RequestBody::Multipart(form) => request.multipart(form.to_form()),
    };

    let response = request.send().await.map_err(|source| {
        if source.is_builder() {
            SdkError::Config(format!("invalid request to {url}: {source}"))
        } else {
            SdkError::Network {
                url: url.to_string(),
                source,
            }
        }
    })?;

    debug!(
        method = %options.method(),
        %url,
        status = response.status().as_u16(),
        authenticated = access.is_some(),
        "request completed"
    );
    Ok(response)
}

async fn refresh_once(
    http: reqwest::Client,
    url: String,
    session: Session,
) -> Result<String, RefreshError> {
    let outcome = exchange_refresh_token(&http, &url, &session).await;
    match &outcome {
        Ok(_) => info!("access token refreshed"),
        Err(err) => {
            warn!(error = %err, "token refresh failed, clearing session");
            if let Err(clear_err) = session.clear() {
                warn!(error = %clear_err, "failed to clear session");
            }
        }
    }
    outcome
}

async fn exchange_refresh_token(
    http: &reqwest::Client,
    url: &str,
    session: &Session,
) -> Result<String, RefreshError> {
    let refresh = session
        .refresh_token()?
        .ok_or(RefreshError::MissingRefreshToken)?;

    let options = RequestOptions::post().json(&RefreshRequest { refresh })?;
    let response = send(http, url, &options, None, &TenantContext::default()).await?;
    let body = read_json(response).await?;

    let access = body
        .get("access")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or(RefreshError::MissingAccessToken)?
        .to_string();

    session.set_access_token(&access)?;
    Ok(access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use kitchen_models::{RestaurantSlug, Tokens};
    use mock_kitchen::MockKitchen;
    use reqwest::header::{HeaderValue, CONTENT_TYPE};

    use crate::request::MultipartForm;
    use crate::store::{CredentialStore, MemoryStore, ACCESS_KEY};

    async fn start(mock: &MockKitchen) -> (Gateway, tokio::task::JoinHandle<()>) {
        let (addr, handle) = mock_kitchen::spawn(mock.clone()).await.unwrap();
        let gateway =
            Gateway::new(ClientConfig::new(format!("http://{addr}")), Session::in_memory())
                .unwrap();
        (gateway, handle)
    }

    fn sign_in(gateway: &Gateway, mock: &MockKitchen) -> Tokens {
        let tokens = mock.issue_tokens();
        gateway.session().set_tokens(&tokens).unwrap();
        tokens
    }

    async fn echo(gateway: &Gateway, options: RequestOptions) -> Value {
        let response = gateway.auth_fetch("/__mock/echo/", options).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        read_json(response).await.unwrap()
    }

    #[tokio::test]
    async fn valid_token_is_sent_without_refresh() {
        let mock = MockKitchen::new();
        let (gateway, _server) = start(&mock).await;
        let tokens = sign_in(&gateway, &mock);

        let body = echo(&gateway, RequestOptions::get()).await;
        assert_eq!(body["authorization"], format!("Bearer {}", tokens.access));
        assert_eq!(body["content_type"], "application/json");
        assert_eq!(mock.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn expired_access_is_refreshed_and_retried() {
        let mock = MockKitchen::new();
        let (gateway, _server) = start(&mock).await;
        let old = sign_in(&gateway, &mock);
        mock.expire_access_tokens();

        let body = echo(&gateway, RequestOptions::get()).await;
        let stored = gateway.session().access_token().unwrap().unwrap();
        assert_ne!(stored, old.access);
        assert_eq!(body["authorization"], format!("Bearer {stored}"));
        assert_eq!(mock.refresh_calls(), 1);
        assert_eq!(mock.hits("/__mock/echo/"), 2);
        assert_eq!(
            gateway.session().refresh_token().unwrap().as_deref(),
            Some(old.refresh.as_str())
        );
    }

    #[tokio::test]
    async fn concurrent_401s_share_one_refresh() {
        let mock = MockKitchen::new();
        mock.set_refresh_delay(Duration::from_millis(150));
        let (gateway, _server) = start(&mock).await;
        sign_in(&gateway, &mock);
        mock.expire_access_tokens();

        let mut handles = Vec::new();
        for _ in 0..6 {
            let gateway = gateway.clone();
            handles.push(tokio::spawn(async move {
                let response = gateway
                    .auth_fetch("/__mock/echo/", RequestOptions::get())
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                let body = read_json(response).await.unwrap();
                body["authorization"].as_str().unwrap().to_string()
            }));
        }

        let mut bearers = Vec::new();
        for handle in handles {
            bearers.push(handle.await.unwrap());
        }
        assert_eq!(mock.refresh_calls(), 1);
        bearers.dedup();
        assert_eq!(bearers.len(), 1);
        let stored = gateway.session().access_token().unwrap().unwrap();
        assert_eq!(bearers[0], format!("Bearer {stored}"));
        assert!(!gateway.is_refreshing());
    }

    #[tokio::test]
    async fn concurrent_failures_observe_the_same_outcome() {
        let mock = MockKitchen::new();
        mock.set_refresh_delay(Duration::from_millis(100));
        mock.reject_refresh(true);
        let (gateway, _server) = start(&mock).await;
        sign_in(&gateway, &mock);
        mock.expire_access_tokens();

        let (a, b, c) = tokio::join!(
            gateway.refresh_access_token(),
            gateway.refresh_access_token(),
            gateway.refresh_access_token(),
        );
        assert!(matches!(a, Err(RefreshError::Rejected { status: 401, .. })));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(mock.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_clears_pair_and_returns_original_401() {
        let mock = MockKitchen::new();
        mock.reject_refresh(true);
        let (gateway, _server) = start(&mock).await;
        sign_in(&gateway, &mock);
        gateway.session().set_active_restaurant_id(Some(1)).unwrap();
        mock.expire_access_tokens();

        let response = gateway
            .auth_fetch("/__mock/echo/", RequestOptions::get())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let err = read_json(response).await.unwrap_err();
        assert_eq!(err.status(), 401);

        assert_eq!(mock.refresh_calls(), 1);
        assert_eq!(mock.hits("/__mock/echo/"), 1);
        let session = gateway.session();
        assert_eq!(session.access_token().unwrap(), None);
        assert_eq!(session.refresh_token().unwrap(), None);
        assert_eq!(session.active_restaurant_id().unwrap(), None);
    }

    #[tokio::test]
    async fn missing_refresh_token_skips_the_network() {
        let mock = MockKitchen::new();
        let (gateway, _server) = start(&mock).await;
        gateway.session().set_access_token("stale").unwrap();

        let response = gateway
            .auth_fetch("/__mock/echo/", RequestOptions::get())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(mock.refresh_calls(), 0);
        assert_eq!(gateway.session().access_token().unwrap(), None);
        assert_eq!(
            gateway.refresh_access_token().await,
            Err(RefreshError::MissingRefreshToken)
        );
    }

    #[tokio::test]
    async fn refresh_without_access_field_fails() {
        let mock = MockKitchen::new();
        mock.omit_access_on_refresh(true);
        let (gateway, _server) = start(&mock).await;
        sign_in(&gateway, &mock);

        assert_eq!(
            gateway.refresh_access_token().await,
            Err(RefreshError::MissingAccessToken)
        );
        assert!(!gateway.session().is_authenticated().unwrap());
    }

    #[tokio::test]
    async fn second_401_is_returned_without_another_retry() {
        let mock = MockKitchen::new();
        let (gateway, _server) = start(&mock).await;
        sign_in(&gateway, &mock);

        let response = gateway
            .auth_fetch("/__mock/always-401/", RequestOptions::get())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(mock.refresh_calls(), 1);
        assert_eq!(mock.hits("/__mock/always-401/"), 2);
        assert!(gateway.session().is_authenticated().unwrap());
    }

    #[tokio::test]
    async fn tenant_headers_are_attached() {
        let mock = MockKitchen::new();
        let (gateway, _server) = start(&mock).await;
        sign_in(&gateway, &mock);
        gateway
            .session()
            .set_tenant(&TenantContext {
                restaurant_id: Some(1),
                restaurant_slug: Some(RestaurantSlug::new("demo-bistro").unwrap()),
            })
            .unwrap();

        let body = echo(&gateway, RequestOptions::get()).await;
        assert_eq!(body["restaurant_id"], "1");
        assert_eq!(body["restaurant_slug"], "demo-bistro");
    }

    #[tokio::test]
    async fn explicit_content_type_survives_the_retry() {
        let mock = MockKitchen::new();
        let (gateway, _server) = start(&mock).await;
        sign_in(&gateway, &mock);
        mock.expire_access_tokens();

        let options = RequestOptions::post()
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .json(&"hello")
            .unwrap();
        let body = echo(&gateway, options).await;
        assert_eq!(body["content_type"], "text/plain");
        assert_eq!(body["method"], "POST");
    }

    #[tokio::test]
    async fn multipart_body_keeps_transport_content_type() {
        let mock = MockKitchen::new();
        let (gateway, _server) = start(&mock).await;
        sign_in(&gateway, &mock);

        let form = MultipartForm::new().text("kind", "categories");
        let body = echo(&gateway, RequestOptions::post().multipart(form)).await;
        let content_type = body["content_type"].as_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[tokio::test]
    async fn empty_success_body_reads_as_empty_object() {
        let mock = MockKitchen::new();
        let (gateway, _server) = start(&mock).await;
        sign_in(&gateway, &mock);

        let response = gateway
            .auth_fetch("/__mock/empty/", RequestOptions::get())
            .await
            .unwrap();
        assert_eq!(read_json(response).await.unwrap(), serde_json::json!({}));

        let response = gateway
            .auth_fetch("/__mock/not-json/", RequestOptions::get())
            .await
            .unwrap();
        assert_eq!(read_json(response).await.unwrap(), serde_json::json!({}));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let gateway =
            Gateway::new(ClientConfig::new("http://127.0.0.1:9"), Session::in_memory()).unwrap();
        let err = gateway
            .request_json("/api/auth/token/", RequestOptions::post())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Network { .. }));
        assert_eq!(err.status(), 0);
    }

    /// Hands out a stale access token on the first read, as if another
    /// caller refreshed while the first request was in flight.
    struct RefreshedMeanwhile {
        inner: MemoryStore,
        stale_served: AtomicBool,
    }

    impl CredentialStore for RefreshedMeanwhile {
        fn get(&self, key: &str) -> Result<Option<String>, SdkError> {
            if key == ACCESS_KEY && !self.stale_served.swap(true, Ordering::SeqCst) {
                return Ok(Some("access-superseded".into()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), SdkError> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), SdkError> {
            self.inner.remove(key)
        }
    }

    #[tokio::test]
    async fn superseded_token_is_retried_without_refresh() {
        let mock = MockKitchen::new();
        let (addr, _server) = mock_kitchen::spawn(mock.clone()).await.unwrap();
        let store = RefreshedMeanwhile {
            inner: MemoryStore::new(),
            stale_served: AtomicBool::new(false),
        };
        let gateway = Gateway::new(
            ClientConfig::new(format!("http://{addr}")),
            Session::new(Arc::new(store)),
        )
        .unwrap();
        let tokens = sign_in(&gateway, &mock);

        let body = echo(&gateway, RequestOptions::get()).await;
        assert_eq!(body["authorization"], format!("Bearer {}", tokens.access));
        assert_eq!(mock.refresh_calls(), 0);
        assert_eq!(mock.hits("/__mock/echo/"), 2);
    }
}
