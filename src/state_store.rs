use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::kv::{KeyValueStore, StoreError};

pub const KEY_PREFIX: &str = "tripState_";

/// User corrections for one trip, stored apart from the CSV record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_name: Option<String>,
}

impl TripOverride {
    /// An empty stored status does not count as an override.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|status| !status.is_empty())
    }

    pub fn assigned_name(&self) -> &str {
        self.assigned_name.as_deref().unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.assigned_name.is_none()
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            status: string_field(object, OverrideField::Status),
            assigned_name: string_field(object, OverrideField::AssignedName),
        }
    }
}

fn string_field(object: &Map<String, Value>, field: OverrideField) -> Option<String> {
    object
        .get(field.as_str())
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideField {
    Status,
    AssignedName,
}

impl OverrideField {
    pub fn as_str(self) -> &'static str {
        match self {
            OverrideField::Status => "status",
            OverrideField::AssignedName => "assignedName",
        }
    }
}

/// Key namespace for stored overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideScope {
    Global,
    File(String),
}

/// Read side used by classification and rendering.
pub trait OverrideSource {
    fn lookup(&self, trip_id: &str) -> TripOverride;
}

pub struct TripStateStore<S> {
    kv: S,
    scope: OverrideScope,
}

impl<S: KeyValueStore> TripStateStore<S> {
    pub fn new(kv: S) -> Self {
        Self::with_scope(kv, OverrideScope::Global)
    }

    pub fn with_scope(kv: S, scope: OverrideScope) -> Self {
        Self { kv, scope }
    }

    pub fn key_for(&self, trip_id: &str) -> String {
        match &self.scope {
            OverrideScope::Global => format!("{KEY_PREFIX}{trip_id}"),
            OverrideScope::File(digest) => format!("{KEY_PREFIX}{digest}_{trip_id}"),
        }
    }

    /// Never fails: missing, unreadable, or malformed records read as empty.
    pub fn get(&self, trip_id: &str) -> TripOverride {
        TripOverride::from_object(&self.load_object(&self.key_for(trip_id)))
    }

    /// Read-modify-write of a single field; other stored fields are kept.
    pub fn set(&self, trip_id: &str, field: OverrideField, value: &str) -> Result<(), StoreError> {
        let key = self.key_for(trip_id);
        let mut object = self.load_object(&key);
        object.insert(field.as_str().to_string(), Value::String(value.to_string()));
        let encoded = serde_json::to_string(&Value::Object(object))?;
        self.kv.set(&key, &encoded)?;
        debug!(trip_id, field = field.as_str(), value, "stored trip override");
        Ok(())
    }

    fn load_object(&self, key: &str) -> Map<String, Value> {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Map::new(),
            Err(err) => {
                warn!(key, error = %err, "could not read trip override; using empty");
                return Map::new();
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(object)) => object,
            Ok(_) | Err(_) => {
                warn!(key, "malformed trip override; using empty");
                Map::new()
            }
        }
    }

    #[cfg(test)]
    pub fn kv(&self) -> &S {
        &self.kv
    }
}

impl<S: KeyValueStore> OverrideSource for TripStateStore<S> {
    fn lookup(&self, trip_id: &str) -> TripOverride {
        self.get(trip_id)
    }
}

#[cfg(test)]
#[path = "state_store_tests.rs"]
mod tests;
