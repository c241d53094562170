//! Shared doubles for unit and router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use time::{Duration, OffsetDateTime};

use crate::auth::Claims;
use crate::config::{AppConfig, FlowConfig, JwtConfig, StoreBackend};
use crate::diet::flow::DietPlanFlow;
use crate::state::AppState;
use crate::store::{Document, DocumentSnapshot, DocumentStore, StoreError};

pub fn test_jwt() -> JwtConfig {
    JwtConfig {
        secret: "test-secret".into(),
        issuer: "dietplanner".into(),
        audience: "dietplanner-users".into(),
    }
}

pub fn sign_token(cfg: &JwtConfig, uid: &str) -> String {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: uid.to_string(),
        iat: now.unix_timestamp() as usize,
        exp: (now + Duration::minutes(5)).unix_timestamp() as usize,
        iss: cfg.issuer.clone(),
        aud: cfg.audience.clone(),
        email: None,
        name: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.secret.as_bytes()),
    )
    .expect("sign test token")
}

pub fn bearer(uid: &str) -> String {
    format!("Bearer {}", sign_token(&test_jwt(), uid))
}

pub fn test_state(store: Arc<dyn DocumentStore>, flow: Arc<dyn DietPlanFlow>) -> AppState {
    let config = Arc::new(AppConfig {
        store_backend: StoreBackend::Memory,
        database_url: None,
        flow: FlowConfig {
            url: "http://flow.invalid/dietPlannerFlow".into(),
            api_key: None,
        },
        jwt: test_jwt(),
    });
    AppState::from_parts(config, store, flow)
}

/// Store whose every call fails with the configured error.
pub struct FailingStore {
    permission: bool,
    message: String,
}

impl FailingStore {
    pub fn permission_denied() -> Self {
        Self {
            permission: true,
            message: "missing or insufficient permissions".into(),
        }
    }

    pub fn backend(message: &str) -> Self {
        Self {
            permission: false,
            message: message.into(),
        }
    }

    fn error(&self) -> StoreError {
        if self.permission {
            StoreError::PermissionDenied(self.message.clone())
        } else {
            StoreError::Backend(self.message.clone())
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _c: &str, _id: &str) -> Result<Option<DocumentSnapshot>, StoreError> {
        Err(self.error())
    }

    async fn set(&self, _c: &str, _id: &str, _data: Document) -> Result<(), StoreError> {
        Err(self.error())
    }
}

/// Flow double returning a canned response and recording what it was sent.
pub struct StubFlow {
    response: Result<Value, String>,
    calls: Mutex<Vec<Value>>,
}

impl StubFlow {
    pub fn ok(value: Value) -> Self {
        Self {
            response: Ok(value),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::ok(json!({}))
    }

    pub fn calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DietPlanFlow for StubFlow {
    async fn run(&self, request: &Value) -> anyhow::Result<Value> {
        self.calls.lock().unwrap().push(request.clone());
        self.response.clone().map_err(|m| anyhow::anyhow!(m))
    }
}
