use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::Document;

/// A user's profile document. `uid` is always present; everything else is
/// whatever the caller stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UserProfile {
    pub fn from_document(id: &str, mut data: Document) -> Self {
        let uid = match data.remove("uid") {
            Some(Value::String(uid)) => uid,
            _ => id.to_string(),
        };
        Self { uid, fields: data }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Seed values for the default profile written on first sign-in.
#[derive(Debug, Default, Deserialize)]
pub struct SyncProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
