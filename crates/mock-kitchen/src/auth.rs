//! Account, token and team handlers.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use kitchen_models::{
    LoginPayload, LoginResponse, MeResponse, NewTeamMember, RefreshRequest, RegisterPayload,
    RegisterResponse, RestaurantDetails, RestaurantRef, RestaurantSlug, TeamMember, TeamRole,
};
use serde_json::{json, Value};
use tracing::info;

use crate::error::MockError;
use crate::{MockKitchen, Store, User, DEMO_RESTAURANT_ID};

fn restaurant_ref(store: &Store, id: i64) -> Option<RestaurantRef> {
    store.restaurant(id).map(|r| RestaurantRef {
        id: Some(r.id),
        name: Some(r.name.clone()),
        slug: Some(r.slug.clone()),
    })
}

fn team_member(store: &Store, user: &User) -> TeamMember {
    TeamMember {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: Some(user.first_name.clone()),
        last_name: Some(user.last_name.clone()),
        role: user.role,
        is_active: Some(user.is_active),
        restaurant_id: Some(user.restaurant_id),
        restaurant_slug: store.restaurant(user.restaurant_id).map(|r| r.slug.clone()),
    }
}

/// `POST /api/auth/register/`
pub async fn register(
    State(mock): State<MockKitchen>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, MockError> {
    let mut store = mock.store();

    if store.knobs.legacy_register && payload.has_tenant_fields() {
        return Err(MockError::BadRequest(
            "Unknown fields: restaurant_name, restaurant_slug.".into(),
        ));
    }
    if payload.password != payload.password2 {
        return Err(MockError::BadRequest("Passwords do not match.".into()));
    }
    if store.users.iter().any(|u| u.email == payload.email) {
        return Err(MockError::BadRequest(
            "A user with that email already exists.".into(),
        ));
    }

    let (restaurant_id, role) = match &payload.restaurant_name {
        Some(name) => {
            let raw_slug = payload
                .restaurant_slug
                .clone()
                .unwrap_or_else(|| name.replace(' ', "-"));
            let slug = RestaurantSlug::new(&raw_slug)
                .map_err(|e| MockError::BadRequest(e.to_string()))?;
            if store.restaurants.iter().any(|r| r.slug == slug.as_str()) {
                return Err(MockError::BadRequest("Restaurant slug is taken.".into()));
            }
            let id = store.next_id();
            store.restaurants.push(RestaurantDetails {
                id,
                name: name.clone(),
                slug: slug.into(),
                is_active: Some(true),
                subscription_tier: Some("free".into()),
                created_at: Some(chrono::Utc::now().to_rfc3339()),
                updated_at: None,
            });
            (id, TeamRole::Owner)
        }
        None => (DEMO_RESTAURANT_ID, TeamRole::Staff),
    };

    let id = store.next_id();
    let username = payload.username.clone().unwrap_or_else(|| {
        payload
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string()
    });
    store.users.push(User {
        id,
        username: username.clone(),
        email: payload.email.clone(),
        password: payload.password.clone(),
        first_name: payload.first_name.clone().unwrap_or_default(),
        last_name: payload.last_name.clone().unwrap_or_default(),
        role,
        is_active: true,
        restaurant_id,
    });
    info!(user_id = id, restaurant_id, "user registered");

    let body = RegisterResponse {
        id: Some(id),
        username: Some(username),
        email: Some(payload.email),
        role: Some(role.to_string()),
        restaurant: restaurant_ref(&store, restaurant_id),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

/// `POST /api/auth/token/`
pub async fn login(
    State(mock): State<MockKitchen>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, MockError> {
    let mut store = mock.store();

    if store.knobs.legacy_login && payload.restaurant_slug.is_some() {
        return Err(MockError::BadRequest(
            "Unknown field: restaurant_slug.".into(),
        ));
    }

    let user = store
        .users
        .iter()
        .find(|u| u.email == payload.email && u.password == payload.password && u.is_active)
        .cloned()
        .ok_or_else(|| {
            MockError::Unauthorized("No active account found with the given credentials".into())
        })?;

    if let Some(requested) = payload.restaurant_slug.as_deref() {
        let requested = RestaurantSlug::new(requested).ok();
        let actual = store.restaurant(user.restaurant_id).map(|r| r.slug.as_str());
        if requested.as_ref().map(RestaurantSlug::as_str) != actual {
            return Err(MockError::Unauthorized(
                "No active account found for this restaurant".into(),
            ));
        }
    }

    let tokens = store.issue_tokens(user.id);
    info!(user_id = user.id, "login");

    Ok(Json(LoginResponse {
        access: tokens.access,
        refresh: tokens.refresh,
        restaurant_id: Some(user.restaurant_id),
        restaurant_slug: store.restaurant(user.restaurant_id).map(|r| r.slug.clone()),
        restaurant: restaurant_ref(&store, user.restaurant_id),
    }))
}

/// `POST /api/auth/token/refresh/`
pub async fn refresh(
    State(mock): State<MockKitchen>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<Value>, MockError> {
    let delay = {
        let mut store = mock.store();
        store.refresh_calls += 1;
        store.knobs.refresh_delay
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let mut store = mock.store();
    let user_id = store
        .refresh_tokens
        .get(&payload.refresh)
        .copied()
        .filter(|_| !store.knobs.reject_refresh)
        .ok_or_else(|| MockError::Unauthorized("Token is invalid or expired".into()))?;

    if store.knobs.omit_access_on_refresh {
        return Ok(Json(json!({})));
    }
    let access = store.issue_access(user_id);
    Ok(Json(json!({ "access": access })))
}

/// `GET /api/auth/me/`
pub async fn me(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, MockError> {
    let user = mock.authenticate(&headers)?;
    let store = mock.store();
    Ok(Json(MeResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        role: Some(user.role.to_string()),
        first_name: Some(user.first_name.clone()),
        last_name: Some(user.last_name.clone()),
        restaurant: restaurant_ref(&store, user.restaurant_id),
        restaurant_id: Some(user.restaurant_id),
        restaurant_slug: store.restaurant(user.restaurant_id).map(|r| r.slug.clone()),
    }))
}

/// `GET /api/auth/my-restaurants/`
pub async fn my_restaurant(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
) -> Result<Json<RestaurantDetails>, MockError> {
    let user = mock.authenticate(&headers)?;
    let store = mock.store();
    store
        .restaurant(user.restaurant_id)
        .cloned()
        .map(Json)
        .ok_or(MockError::NotFound)
}

/// `GET /api/auth/users/`, paginated.
pub async fn list_users(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
) -> Result<Json<Value>, MockError> {
    let user = mock.authenticate(&headers)?;
    let store = mock.store();
    let mut members: Vec<TeamMember> = store
        .users
        .iter()
        .filter(|u| u.restaurant_id == user.restaurant_id)
        .map(|u| team_member(&store, u))
        .collect();
    members.sort_by(|a, b| b.id.cmp(&a.id));

    Ok(Json(json!({
        "count": members.len(),
        "next": null,
        "previous": null,
        "results": members,
    })))
}

/// `POST /api/auth/users/`
pub async fn create_user(
    State(mock): State<MockKitchen>,
    headers: HeaderMap,
    Json(payload): Json<NewTeamMember>,
) -> Result<impl IntoResponse, MockError> {
    let caller = mock.authenticate(&headers)?;
    if !matches!(caller.role, TeamRole::Owner | TeamRole::Manager) {
        return Err(MockError::BadRequest(
            "You do not have permission to perform this action.".into(),
        ));
    }
    if !payload.role.is_assignable() {
        return Err(MockError::BadRequest(format!(
            "Role {} cannot be assigned.",
            payload.role
        )));
    }
    if payload.password != payload.password2 {
        return Err(MockError::BadRequest("Passwords do not match.".into()));
    }

    let mut store = mock.store();
    let user = User {
        id: store.next_id(),
        username: payload.username,
        email: payload.email,
        password: payload.password,
        first_name: payload.first_name.unwrap_or_default(),
        last_name: payload.last_name.unwrap_or_default(),
        role: payload.role,
        is_active: true,
        restaurant_id: caller.restaurant_id,
    };
    let member = team_member(&store, &user);
    store.users.push(user);
    Ok((StatusCode::CREATED, Json(member)))
}
