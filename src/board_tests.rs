use time::macros::datetime;

use super::{build_grid, build_list, grid_columns};
use crate::config::BoardConfig;
use crate::domain::dates::{parse_date_text, ShipDate};
use crate::domain::trip::Trip;
use crate::kv::MemoryKvStore;
use crate::metrics::{build_panel, compute_status_distribution};
use crate::pipeline::{select_working_set, DateRange};
use crate::state_store::{OverrideField, TripStateStore};

fn trip(id: &str, ship_bundle: &str, status: &str) -> Trip {
    Trip {
        trip_id: id.to_string(),
        traveler: format!("Traveler {id}"),
        ship_bundle: ship_bundle.to_string(),
        ship_bundle_date: ShipDate::parse(ship_bundle),
        max_usa_date: String::new(),
        usa_dest: "TX".to_string(),
        items_accepted: "2".to_string(),
        items_ready_to_process: String::new(),
        total_bundle_weight: String::new(),
        verification_status: status.to_string(),
        user_id: "U-1".to_string(),
    }
}

fn config() -> BoardConfig {
    BoardConfig::embedded().expect("embedded config should load")
}

fn week_trips() -> Vec<Trip> {
    vec![
        trip("A", "2026-10-19", "Pending"),
        trip("B", "2026-10-21", "TX Approved"),
        trip("C", "2026-10-23", "Rejected"),
    ]
}

#[test]
fn week_scenario_places_each_trip_in_its_cell() {
    let trips = week_trips();
    let store = TripStateStore::new(MemoryKvStore::default());
    let range = DateRange::default_from(datetime!(2026-10-19 00:00));

    let working = select_working_set(&trips, &range);
    assert_eq!(working.len(), 3);

    let grid = build_grid(&working, &store, &config(), range.start);
    assert_eq!(grid.placed_count(), 3);
    assert_eq!(grid.unplaced.total(), 0);
    assert_eq!(grid.cell("Pending", 1).expect("cell")[0].trip_id, "A");
    assert_eq!(grid.cell("TX Approved", 3).expect("cell")[0].trip_id, "B");
    assert_eq!(grid.cell("Rejected", 5).expect("cell")[0].trip_id, "C");
    assert!(grid.cell("Pending", 6).is_none());

    let panel = build_panel(&working, &store);
    assert_eq!(panel.metrics.total_trips, 3);
    assert_eq!(panel.metrics.total_items, 6.0);
}

#[test]
fn relocated_trip_moves_row_and_distribution_on_next_render() {
    let trips = week_trips();
    let store = TripStateStore::new(MemoryKvStore::default());
    let working = select_working_set(&trips, &DateRange::unbounded());

    let before = build_grid(&working, &store, &config(), None);
    assert_eq!(before.cell("Pending", 1).expect("cell").len(), 1);

    store
        .set("A", OverrideField::Status, "Preparing")
        .expect("override should be stored");

    let after = build_grid(&working, &store, &config(), None);
    assert!(after.cell("Pending", 1).expect("cell").is_empty());
    assert_eq!(after.cell("Preparing", 1).expect("cell")[0].trip_id, "A");

    let distribution = compute_status_distribution(&working, &store);
    assert!(distribution
        .iter()
        .any(|entry| entry.status == "Preparing" && entry.count == 1));
    assert!(!distribution.iter().any(|entry| entry.status == "Pending"));
}

#[test]
fn weekend_undated_and_unmapped_trips_are_dropped_from_grid_only() {
    let trips = vec![
        trip("sat", "2026-10-24", "Pending"),
        trip("sun", "2026-10-25", "Pending"),
        trip("odd", "2026-10-20", "Archived"),
        trip("nodate", "not a date", "Pending"),
        trip("ok", "2026-10-20", "Pending"),
    ];
    let store = TripStateStore::new(MemoryKvStore::default());
    let working = select_working_set(&trips, &DateRange::unbounded());

    let grid = build_grid(&working, &store, &config(), None);
    assert_eq!(grid.placed_count(), 1);
    assert_eq!(grid.unplaced.weekend, 2);
    assert_eq!(grid.unplaced.undated, 1);
    assert_eq!(grid.unplaced.unmapped_status, 1);

    let list = build_list(&working, &store, &config());
    assert_eq!(list.rows.len(), 5);
    assert_eq!(list.rows.last().expect("row").trip_id, "nodate");
    assert_eq!(build_panel(&working, &store).metrics.total_trips, 5);
}

#[test]
fn list_rows_carry_override_values_and_base_highlight() {
    let trips = vec![trip("A", "2026-10-19", "TX Approved")];
    let store = TripStateStore::new(MemoryKvStore::default());
    store
        .set("A", OverrideField::Status, "Rejected")
        .expect("status should be stored");
    store
        .set("A", OverrideField::AssignedName, "Milton")
        .expect("name should be stored");

    let working = select_working_set(&trips, &DateRange::unbounded());
    let list = build_list(&working, &store, &config());
    let row = &list.rows[0];
    assert_eq!(row.status, "Rejected");
    assert_eq!(row.assigned_name, "Milton");
    assert!(!row.highlights.not_approved);
}

#[test]
fn column_labels_follow_header_start() {
    let columns = grid_columns(Some(datetime!(2026-10-17 10:00)));
    let labels: Vec<String> = columns
        .iter()
        .map(|column| {
            format!(
                "{} {}",
                column.name,
                column.date_label.as_deref().unwrap_or("-")
            )
        })
        .collect();
    assert_eq!(
        labels,
        vec!["Mon Oct 17", "Tue Oct 18", "Wed Oct 19", "Thu Oct 20", "Fri Oct 21"]
    );
    assert!(grid_columns(None)
        .iter()
        .all(|column| column.date_label.is_none()));
}

#[test]
fn column_labels_stop_at_last_representable_date() {
    let start = parse_date_text("12/31/9999").expect("date should parse");
    let columns = grid_columns(Some(start));
    assert_eq!(columns.len(), 5);
    assert_eq!(columns[0].date_label.as_deref(), Some("Dec 31"));
    assert!(columns[1..].iter().all(|column| column.date_label.is_none()));
}
