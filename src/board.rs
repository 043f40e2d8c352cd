//! Grid and list projections of a working set.
//!
//! Both views read overrides through an [`OverrideSource`] at build time, so
//! a change written after the last render shows up on the next build.

use serde::Serialize;
use time::{Duration, PrimitiveDateTime};

use crate::classifier::{
    effective_status, highlights, is_grid_weekday, weekday_bucket, HighlightRules, Highlights,
    GRID_WEEKDAYS,
};
use crate::config::BoardConfig;
use crate::domain::dates::short_day_label;
use crate::domain::trip::Trip;
use crate::state_store::OverrideSource;

const WEEKDAY_NAMES: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

/// Tile / row content for one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripCard {
    pub trip_id: String,
    pub traveler: String,
    pub ship_bundle: String,
    pub max_usa_date: String,
    pub usa_dest: String,
    pub items_accepted: String,
    pub items_ready_to_process: String,
    pub total_bundle_weight: String,
    pub user_id: String,
    pub status: String,
    pub assigned_name: String,
    pub highlights: Highlights,
}

impl TripCard {
    pub fn build(trip: &Trip, overrides: &impl OverrideSource, rules: &HighlightRules) -> Self {
        let state = overrides.lookup(&trip.trip_id);
        Self {
            trip_id: trip.trip_id.clone(),
            traveler: trip.traveler.clone(),
            ship_bundle: trip.ship_bundle.clone(),
            max_usa_date: trip.max_usa_date.clone(),
            usa_dest: trip.usa_dest.clone(),
            items_accepted: trip.items_accepted.clone(),
            items_ready_to_process: trip.items_ready_to_process.clone(),
            total_bundle_weight: trip.total_bundle_weight.clone(),
            user_id: trip.user_id.clone(),
            status: effective_status(trip, &state).to_string(),
            assigned_name: state.assigned_name().to_string(),
            highlights: highlights(trip, rules),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridColumn {
    pub weekday: u8,
    pub name: &'static str,
    pub date_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub status: String,
    /// One cell per weekday column, Mon first.
    pub cells: Vec<Vec<TripCard>>,
}

/// Trips of the working set that have no grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unplaced {
    pub weekend: usize,
    pub undated: usize,
    pub unmapped_status: usize,
}

impl Unplaced {
    pub fn total(&self) -> usize {
        self.weekend + self.undated + self.unmapped_status
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridView {
    pub columns: Vec<GridColumn>,
    pub rows: Vec<GridRow>,
    pub unplaced: Unplaced,
}

impl GridView {
    #[cfg(test)]
    pub fn cell(&self, status: &str, weekday: u8) -> Option<&[TripCard]> {
        let column = GRID_WEEKDAYS.iter().position(|day| *day == weekday)?;
        self.rows
            .iter()
            .find(|row| row.status == status)
            .and_then(|row| row.cells.get(column))
            .map(Vec::as_slice)
    }

    pub fn placed_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .map(Vec::len)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub rows: Vec<TripCard>,
}

/// Column `i` is labelled with `header_start + i days`; a label past the last
/// representable date is left off.
pub fn grid_columns(header_start: Option<PrimitiveDateTime>) -> Vec<GridColumn> {
    GRID_WEEKDAYS
        .iter()
        .zip(WEEKDAY_NAMES)
        .enumerate()
        .map(|(offset, (weekday, name))| GridColumn {
            weekday: *weekday,
            name,
            date_label: header_start
                .and_then(|start| start.checked_add(Duration::days(offset as i64)))
                .and_then(short_day_label),
        })
        .collect()
}

/// Places each trip in the `(effective status, weekday)` cell. Weekend trips,
/// trips without a valid date, and trips whose status has no row are left
/// out and only counted.
pub fn build_grid(
    working: &[&Trip],
    overrides: &impl OverrideSource,
    config: &BoardConfig,
    header_start: Option<PrimitiveDateTime>,
) -> GridView {
    let mut rows: Vec<GridRow> = config
        .grid_statuses
        .iter()
        .map(|status| GridRow {
            status: status.clone(),
            cells: vec![Vec::new(); GRID_WEEKDAYS.len()],
        })
        .collect();
    let mut unplaced = Unplaced::default();

    for trip in working {
        let Some(weekday) = weekday_bucket(trip.ship_bundle_date) else {
            unplaced.undated += 1;
            continue;
        };
        if !is_grid_weekday(weekday) {
            unplaced.weekend += 1;
            continue;
        }
        let card = TripCard::build(trip, overrides, &config.highlight);
        let Some(row) = rows.iter_mut().find(|row| row.status == card.status) else {
            unplaced.unmapped_status += 1;
            continue;
        };
        row.cells[usize::from(weekday - 1)].push(card);
    }

    GridView {
        columns: grid_columns(header_start),
        rows,
        unplaced,
    }
}

pub fn build_list(
    working: &[&Trip],
    overrides: &impl OverrideSource,
    config: &BoardConfig,
) -> ListView {
    ListView {
        rows: working
            .iter()
            .map(|trip| TripCard::build(trip, overrides, &config.highlight))
            .collect(),
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
