use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use uuid::Uuid;

const TRIPS_CSV: &str = "Trip ID,Traveler,Ship Bundle,Max USA Date,USA Dest,Items Accepted,\
Items Ready to process,Total Bundle Weight,Trip Verification Status,User ID
T-2,Sam Cole,2026-10-21,,TX,3,2,8,TX Approved,U-2
T-1,Delia Vera,2026-10-19,2026-10-30,NY,10,4,12,Pending,U-1
T-3,Ana Ruiz,not a date,,FL,5x,,5,Pending,U-3
";

fn unique_workspace(prefix: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{prefix}-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&path).expect("workspace should be creatable");
    path
}

fn write_trips(root: &Path) -> PathBuf {
    let csv = root.join("trips.csv");
    std::fs::write(&csv, TRIPS_CSV).expect("trip file should be writable");
    csv
}

fn tripboard(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tripboard"))
        .current_dir(root)
        .env_remove("TRIPBOARD_CONFIG")
        .env_remove("TRIPBOARD_DB_PATH")
        .env_remove("TRIPBOARD_CSV")
        .env("NO_COLOR", "1")
        .arg("--db")
        .arg(root.join("state/state.sqlite"))
        .arg("--csv")
        .arg(root.join("trips.csv"))
        .args(args)
        .output()
        .expect("tripboard should run")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn parse_json(output: &Output) -> Value {
    assert_success(output);
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn row_ids(list: &Value) -> Vec<String> {
    list["rows"]
        .as_array()
        .expect("rows should be an array")
        .iter()
        .map(|row| row["tripId"].as_str().expect("tripId").to_string())
        .collect()
}

#[test]
fn list_all_sorts_by_ship_date_with_undated_last() {
    let root = unique_workspace("tripboard-cli-list");
    write_trips(&root);

    let list = parse_json(&tripboard(&root, &["list", "--all", "--json"]));
    assert_eq!(row_ids(&list), vec!["T-1", "T-2", "T-3"]);
    assert_eq!(list["rows"][0]["status"], "Pending");
    assert_eq!(list["rows"][0]["highlights"]["destFlagged"], true);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn list_range_keeps_only_trips_inside_bounds() {
    let root = unique_workspace("tripboard-cli-range");
    write_trips(&root);

    let list = parse_json(&tripboard(
        &root,
        &["list", "--start", "2026-10-20", "--end", "2026-10-25", "--json"],
    ));
    assert_eq!(row_ids(&list), vec!["T-2"]);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn move_persists_and_changes_metrics_distribution() {
    let root = unique_workspace("tripboard-cli-move");
    write_trips(&root);

    let moved = tripboard(&root, &["move", "T-1", "Preparing"]);
    assert_success(&moved);
    assert!(String::from_utf8_lossy(&moved.stdout).contains("moved T-1 -> Preparing"));

    let panel = parse_json(&tripboard(&root, &["metrics", "--all", "--json"]));
    assert_eq!(panel["totalTrips"], 3);
    assert_eq!(panel["totalItems"].as_f64(), Some(13.0));
    let statuses: Vec<&str> = panel["distribution"]
        .as_array()
        .expect("distribution should be an array")
        .iter()
        .map(|entry| entry["status"].as_str().expect("status"))
        .collect();
    assert_eq!(statuses, vec!["Preparing", "TX Approved", "Pending"]);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn assign_is_visible_in_state_and_list() {
    let root = unique_workspace("tripboard-cli-assign");
    write_trips(&root);

    assert_success(&tripboard(&root, &["assign", "T-2", "  Ana  "]));
    let state = parse_json(&tripboard(&root, &["state", "T-2", "--json"]));
    assert_eq!(state["assignedName"], "Ana");
    assert!(state.get("status").is_none());

    let list = parse_json(&tripboard(&root, &["list", "--all", "--json"]));
    assert_eq!(list["rows"][1]["assignedName"], "Ana");
    assert_eq!(list["rows"][1]["status"], "TX Approved");

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn move_to_unknown_status_needs_force() {
    let root = unique_workspace("tripboard-cli-force");
    write_trips(&root);

    let rejected = tripboard(&root, &["move", "T-1", "Lost In Transit"]);
    assert!(!rejected.status.success());
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("not a board status"));

    assert_success(&tripboard(
        &root,
        &["move", "T-1", "Lost In Transit", "--force"],
    ));
    let state = parse_json(&tripboard(&root, &["state", "T-1", "--json"]));
    assert_eq!(state["status"], "Lost In Transit");

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn show_unknown_trip_fails() {
    let root = unique_workspace("tripboard-cli-show");
    write_trips(&root);

    let output = tripboard(&root, &["show", "T-404"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("T-404"));

    let _ = std::fs::remove_dir_all(root);
}
