use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{
    dto::{SyncProfileRequest, UserProfile},
    services::{create_profile, fetch_profile, sync_profile, ProfileError},
};
use crate::{auth::AuthUser, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(put_profile))
        .route("/profile/sync", post(sync_on_sign_in))
}

#[instrument(skip(state), fields(uid = %user.uid))]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    fetch_profile(state.store.as_ref(), &user.uid)
        .await
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Profile not found".into()))
}

#[instrument(skip(state, body), fields(uid = %user.uid))]
pub async fn put_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    let Value::Object(data) = body else {
        warn!("profile body is not a JSON object");
        return Err((StatusCode::BAD_REQUEST, "Profile must be a JSON object".into()));
    };

    create_profile(state.store.as_ref(), &user.uid, data)
        .await
        .map(Json)
        .map_err(|e| {
            let status = match e {
                ProfileError::PermissionDenied => StatusCode::FORBIDDEN,
                ProfileError::Write(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
}

#[instrument(skip(state, body), fields(uid = %user.uid))]
pub async fn sync_on_sign_in(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<SyncProfileRequest>, JsonRejection>,
) -> Json<UserProfile> {
    // The seed is optional; a bad one falls back to the token's claims.
    let mut seed = match body {
        Ok(Json(seed)) => seed,
        Err(JsonRejection::MissingJsonContentType(_)) => SyncProfileRequest::default(),
        Err(e) => {
            warn!(error = %e, "ignoring unreadable sync body");
            SyncProfileRequest::default()
        }
    };
    if seed.name.is_none() {
        seed.name = user.name;
    }
    if seed.email.is_none() {
        seed.email = user.email;
    }

    let profile = sync_profile(state.store.as_ref(), &user.uid, seed).await;
    info!("profile synced");
    Json(profile)
}
