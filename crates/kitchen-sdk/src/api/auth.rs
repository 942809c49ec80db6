//! Sign-up, sign-in and the current user.

use kitchen_models::{
    LoginPayload, LoginResponse, MeResponse, RegisterPayload, RegisterResponse,
    RestaurantDetails,
};
use tracing::{debug, info, warn};

use crate::client::KitchenClient;
use crate::error::SdkError;
use crate::request::RequestOptions;
use crate::response::read_json;

/// Registration endpoint.
pub const REGISTER_PATH: &str = "/api/auth/register/";
/// Login endpoint.
pub const LOGIN_PATH: &str = "/api/auth/token/";
/// Current-user endpoint.
pub const ME_PATH: &str = "/api/auth/me/";
const MY_RESTAURANTS_PATH: &str = "/api/auth/my-restaurants/";

impl KitchenClient {
    /// Create an account.
    ///
    /// Older backends reject the restaurant onboarding fields with `400`;
    /// in that case the request is repeated once without them.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<RegisterResponse, SdkError> {
        let first = self
            .gateway
            .request_json(REGISTER_PATH, RequestOptions::post().json(payload)?)
            .await;

        let body = match first {
            Err(err) if err.status() == 400 && payload.has_tenant_fields() => {
                debug!(error = %err, "registration rejected, retrying without restaurant fields");
                self.gateway
                    .request_json(REGISTER_PATH, RequestOptions::post().json(&payload.legacy())?)
                    .await?
            }
            other => other?,
        };
        Ok(serde_json::from_value(body)?)
    }

    /// Sign in and store the token pair and active restaurant.
    ///
    /// When a restaurant slug is given and the backend answers `400` or
    /// `401`, sign-in is retried once with e-mail and password only and the
    /// requested slug becomes the active restaurant, whatever the backend
    /// answers.
    pub async fn login(&self, payload: &LoginPayload) -> Result<LoginResponse, SdkError> {
        let requested = payload
            .restaurant_slug
            .as_deref()
            .filter(|slug| !slug.trim().is_empty());

        let first = self
            .gateway
            .request_json(LOGIN_PATH, RequestOptions::post().json(payload)?)
            .await;

        let (body, fallback_slug) = match (first, requested) {
            (Err(err), Some(slug)) if matches!(err.status(), 400 | 401) => {
                debug!(status = err.status(), "login with restaurant slug rejected, retrying without it");
                let body = self
                    .gateway
                    .request_json(
                        LOGIN_PATH,
                        RequestOptions::post().json(&payload.without_tenant())?,
                    )
                    .await?;
                (body, Some(slug))
            }
            (other, _) => (other?, None),
        };

        let response: LoginResponse = serde_json::from_value(body)?;

        let session = self.session();
        session.clear()?;
        session.set_tokens(&response.tokens())?;
        match fallback_slug {
            Some(slug) => session.set_active_restaurant_slug(Some(slug))?,
            None => session.set_tenant(&response.tenant(requested))?,
        }
        let tenant = session.tenant()?;

        info!(
            restaurant_id = ?tenant.restaurant_id,
            restaurant_slug = ?tenant.restaurant_slug.as_ref().map(|s| s.as_str()),
            "logged in"
        );
        Ok(response)
    }

    /// Forget the stored tokens and active restaurant.
    pub fn logout(&self) -> Result<(), SdkError> {
        self.session().clear()?;
        info!("logged out");
        Ok(())
    }

    /// Profile of the signed-in user.
    ///
    /// Refreshes the stored active restaurant from the profile. If the
    /// backend rejects the request, the session is cleared.
    pub async fn me(&self) -> Result<MeResponse, SdkError> {
        let response = self.gateway.auth_fetch(ME_PATH, RequestOptions::get()).await?;
        let body = match read_json(response).await {
            Ok(body) => body,
            Err(err) => {
                if matches!(err, SdkError::Http { .. }) {
                    warn!(status = err.status(), "profile request failed, clearing session");
                    self.session().clear()?;
                }
                return Err(err);
            }
        };

        let me: MeResponse = serde_json::from_value(body)?;
        self.session().set_tenant(&me.tenant())?;
        Ok(me)
    }

    /// The restaurant of the signed-in user.
    pub async fn my_restaurant(&self) -> Result<RestaurantDetails, SdkError> {
        self.get(MY_RESTAURANTS_PATH).await
    }
}
