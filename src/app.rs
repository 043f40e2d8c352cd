use std::error::Error;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use time::PrimitiveDateTime;
use tracing::debug;

use crate::board::{build_grid, build_list, GridView, ListView, TripCard};
use crate::config::{BoardConfig, ConfigError, ScopeMode};
use crate::domain::trip::Trip;
use crate::intents::{apply_intent, BoardIntent};
use crate::kv::{SqliteKvStore, StoreError};
use crate::metrics::{build_panel, MetricsPanel};
use crate::pipeline::{select_working_set, DateRange};
use crate::repository::{IngestError, TripRepository};
use crate::state_store::{OverrideScope, TripOverride, TripStateStore};

pub struct App {
    store: TripStateStore<SqliteKvStore>,
    config: BoardConfig,
    repository: TripRepository,
}

/// Everything one render pass produces from a single working set.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub grid: GridView,
    pub list: ListView,
    pub metrics: MetricsPanel,
}

impl App {
    pub fn open(
        db_path: &str,
        config: BoardConfig,
        csv_path: Option<&Path>,
    ) -> Result<Self, AppError> {
        let repository = match csv_path {
            Some(path) => TripRepository::load_csv(path)?,
            None => TripRepository::empty(),
        };
        Self::with_repository(db_path, config, repository)
    }

    pub fn with_repository(
        db_path: &str,
        config: BoardConfig,
        repository: TripRepository,
    ) -> Result<Self, AppError> {
        let scope = match (config.override_scope, repository.digest()) {
            (ScopeMode::Global, _) => None,
            (ScopeMode::File, Some(digest)) => Some(OverrideScope::File(digest.to_string())),
            (ScopeMode::File, None) => {
                return Err(AppError::InvalidArgument(
                    "file-scoped overrides need a loaded trip file (--csv)".to_string(),
                ))
            }
        };
        ensure_parent_dir(db_path)?;
        let kv = SqliteKvStore::open(db_path)?;
        let store = match scope {
            Some(scope) => TripStateStore::with_scope(kv, scope),
            None => TripStateStore::new(kv),
        };
        Ok(Self {
            store,
            config,
            repository,
        })
    }

    pub fn repository(&self) -> &TripRepository {
        &self.repository
    }

    pub fn working_set(&self, range: &DateRange) -> Vec<&Trip> {
        let working = select_working_set(self.repository.trips(), range);
        debug!(
            loaded = self.repository.len(),
            selected = working.len(),
            filtered = range.is_active(),
            "selected working set"
        );
        working
    }

    pub fn grid(&self, range: &DateRange, header_start: Option<PrimitiveDateTime>) -> GridView {
        build_grid(
            &self.working_set(range),
            &self.store,
            &self.config,
            header_start,
        )
    }

    pub fn list(&self, range: &DateRange) -> ListView {
        build_list(&self.working_set(range), &self.store, &self.config)
    }

    pub fn metrics(&self, range: &DateRange) -> MetricsPanel {
        build_panel(&self.working_set(range), &self.store)
    }

    pub fn snapshot(&self, range: &DateRange) -> BoardSnapshot {
        let working = self.working_set(range);
        BoardSnapshot {
            grid: build_grid(&working, &self.store, &self.config, range.start),
            list: build_list(&working, &self.store, &self.config),
            metrics: build_panel(&working, &self.store),
        }
    }

    pub fn show_trip(&self, trip_id: &str) -> Result<TripCard, AppError> {
        let trip = self
            .repository
            .find(trip_id)
            .ok_or_else(|| AppError::NotFound(trip_id.to_string()))?;
        Ok(TripCard::build(trip, &self.store, &self.config.highlight))
    }

    pub fn trip_state(&self, trip_id: &str) -> TripOverride {
        self.store.get(trip_id)
    }

    /// Drop target statuses are grid rows; `force` allows any other status.
    pub fn relocate(
        &self,
        trip_id: &str,
        target_status: &str,
        force: bool,
    ) -> Result<TripOverride, AppError> {
        let target_status = target_status.trim();
        if target_status.is_empty() {
            return Err(AppError::InvalidArgument(
                "target status must not be empty".to_string(),
            ));
        }
        if !force && !self.config.is_grid_status(target_status) {
            return Err(AppError::InvalidArgument(format!(
                "'{}' is not a board status; use one of: {} (or --force)",
                target_status,
                self.config.grid_statuses.join(", ")
            )));
        }
        self.warn_if_unknown(trip_id);
        Ok(apply_intent(
            &self.store,
            &BoardIntent::Relocate {
                trip_id: trip_id.to_string(),
                target_status: target_status.to_string(),
            },
        )?)
    }

    pub fn assign(&self, trip_id: &str, name: &str) -> Result<TripOverride, AppError> {
        self.warn_if_unknown(trip_id);
        Ok(apply_intent(
            &self.store,
            &BoardIntent::Assign {
                trip_id: trip_id.to_string(),
                name: name.to_string(),
            },
        )?)
    }

    fn warn_if_unknown(&self, trip_id: &str) {
        if !self.repository.is_empty() && self.repository.find(trip_id).is_none() {
            tracing::warn!(trip_id, "trip id is not in the loaded file; storing anyway");
        }
    }
}

fn ensure_parent_dir(path: &str) -> Result<(), AppError> {
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Store(StoreError),
    Ingest(IngestError),
    Config(ConfigError),
    Output(serde_json::Error),
    InvalidArgument(String),
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Store(err) => write!(f, "{}", err),
            AppError::Ingest(err) => write!(f, "{}", err),
            AppError::Config(err) => write!(f, "{}", err),
            AppError::Output(err) => write!(f, "could not render JSON output: {}", err),
            AppError::InvalidArgument(message) => write!(f, "{}", message),
            AppError::NotFound(id) => write!(f, "trip '{}' not found in the loaded file", id),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Ingest(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::Output(err) => Some(err),
            AppError::InvalidArgument(_) => None,
            AppError::NotFound(_) => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::Store(value)
    }
}

impl From<IngestError> for AppError {
    fn from(value: IngestError) -> Self {
        AppError::Ingest(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::Output(value)
    }
}
