use tracing::info;

use crate::kv::{KeyValueStore, StoreError};
use crate::state_store::{OverrideField, TripOverride, TripStateStore};

/// A user action on the board, decoupled from whatever produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardIntent {
    /// A tile was dropped on another status row.
    Relocate {
        trip_id: String,
        target_status: String,
    },
    /// The assignee input was confirmed.
    Assign { trip_id: String, name: String },
}

impl BoardIntent {
    pub fn trip_id(&self) -> &str {
        match self {
            BoardIntent::Relocate { trip_id, .. } | BoardIntent::Assign { trip_id, .. } => trip_id,
        }
    }
}

/// Writes the intent through to the store and returns the stored override.
/// The caller re-renders; nothing is moved locally.
pub fn apply_intent<S: KeyValueStore>(
    store: &TripStateStore<S>,
    intent: &BoardIntent,
) -> Result<TripOverride, StoreError> {
    match intent {
        BoardIntent::Relocate {
            trip_id,
            target_status,
        } => {
            store.set(trip_id, OverrideField::Status, target_status)?;
            info!(trip_id = %trip_id, status = %target_status, "trip relocated");
        }
        BoardIntent::Assign { trip_id, name } => {
            store.set(trip_id, OverrideField::AssignedName, name.trim())?;
            info!(trip_id = %trip_id, name = %name.trim(), "trip assigned");
        }
    }
    Ok(store.get(intent.trip_id()))
}
