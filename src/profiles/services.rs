use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{error, info, warn};

use super::dto::{SyncProfileRequest, UserProfile};
use crate::store::{Document, DocumentStore, StoreError};

pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Permission denied: please check the document store access rules.")]
    PermissionDenied,
    #[error("Failed to create user profile: {0}")]
    Write(String),
}

/// Writes `data` plus `uid` as the complete profile document for `uid`.
pub async fn create_profile(
    store: &dyn DocumentStore,
    uid: &str,
    mut data: Document,
) -> Result<UserProfile, ProfileError> {
    data.insert("uid".into(), Value::String(uid.to_string()));

    match store.set(USERS_COLLECTION, uid, data.clone()).await {
        Ok(()) => {
            info!(%uid, "user profile created");
            Ok(UserProfile::from_document(uid, data))
        }
        Err(StoreError::PermissionDenied(msg)) => {
            error!(%uid, error = %msg, code = "permission-denied", "create user profile failed");
            Err(ProfileError::PermissionDenied)
        }
        Err(StoreError::Backend(msg)) => {
            error!(%uid, error = %msg, "create user profile failed");
            Err(ProfileError::Write(msg))
        }
    }
}

/// Reads the profile for `uid`. Store failures are logged and reported as
/// `None` so callers can fall back to a default profile.
pub async fn fetch_profile(store: &dyn DocumentStore, uid: &str) -> Option<UserProfile> {
    match store.get(USERS_COLLECTION, uid).await {
        Ok(Some(snap)) => Some(UserProfile::from_document(&snap.id, snap.data)),
        Ok(None) => {
            info!(%uid, "no user document found");
            None
        }
        Err(e) => {
            warn!(%uid, error = %e, "fetch user profile failed; treating as absent");
            None
        }
    }
}

/// Sign-in hook: returns the stored profile, or writes and returns a default
/// one. A failed write still yields the default profile.
pub async fn sync_profile(
    store: &dyn DocumentStore,
    uid: &str,
    seed: SyncProfileRequest,
) -> UserProfile {
    if let Some(profile) = fetch_profile(store, uid).await {
        return profile;
    }

    let data = default_profile_data(seed);
    match create_profile(store, uid, data.clone()).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(%uid, error = %e, "default profile not persisted");
            UserProfile::from_document(uid, data)
        }
    }
}

fn default_profile_data(seed: SyncProfileRequest) -> Document {
    let mut data = Document::new();
    data.insert("name".into(), Value::String(seed.name.unwrap_or_default()));
    if let Some(email) = seed.email {
        data.insert("email".into(), Value::String(email));
    }
    if let Ok(now) = OffsetDateTime::now_utc().format(&Rfc3339) {
        data.insert("createdAt".into(), Value::String(now));
    }
    data
}
