use time::macros::datetime;

use super::{
    format_grid, format_list, format_metrics, format_trip_card, highlight_flags,
    status_color_code, unplaced_summary, Palette,
};
use crate::board::{grid_columns, GridRow, GridView, ListView, TripCard, Unplaced};
use crate::classifier::Highlights;
use crate::metrics::{MetricsPanel, StatusColor, StatusCount, TripMetrics};
use crate::pipeline::DateRange;

fn card(id: &str, status: &str, highlights: Highlights) -> TripCard {
    TripCard {
        trip_id: id.to_string(),
        traveler: "Ana Ruiz".to_string(),
        ship_bundle: "2026-10-19".to_string(),
        max_usa_date: String::new(),
        usa_dest: "NY".to_string(),
        items_accepted: "4".to_string(),
        items_ready_to_process: "2".to_string(),
        total_bundle_weight: "9".to_string(),
        user_id: "U-1".to_string(),
        status: status.to_string(),
        assigned_name: "Leo".to_string(),
        highlights,
    }
}

fn plain() -> Palette {
    Palette { enabled: false }
}

#[test]
fn grid_lists_only_occupied_rows_and_cells() {
    let mut cells = vec![Vec::new(); 5];
    cells[2].push(card("T-1", "Pending", Highlights::default()));
    let grid = GridView {
        columns: grid_columns(Some(datetime!(2026-10-19 00:00))),
        rows: vec![
            GridRow {
                status: "Pending".to_string(),
                cells,
            },
            GridRow {
                status: "Rejected".to_string(),
                cells: vec![Vec::new(); 5],
            },
        ],
        unplaced: Unplaced {
            weekend: 1,
            undated: 0,
            unmapped_status: 2,
        },
    };
    let range = DateRange::between(datetime!(2026-10-19 00:00), datetime!(2026-10-26 00:00));

    let lines = format_grid(&grid, &range, &plain());
    assert_eq!(lines[0], "Trip board");
    assert_eq!(lines[1], "range: 2026-10-19 00:00 .. 2026-10-26 00:00");
    assert!(lines.iter().any(|line| line == "[Pending] (1)"));
    assert!(lines.iter().any(|line| line == "  Wed Oct 21"));
    assert!(lines
        .iter()
        .any(|line| line == "    T-1 Ana Ruiz (NY) accepted=4 @Leo"));
    assert!(!lines.iter().any(|line| line.contains("[Rejected]")));
    assert_eq!(
        lines.last().map(String::as_str),
        Some("3 trip(s) not on the grid: weekend=1 undated=0 unmapped_status=2")
    );
}

#[test]
fn empty_grid_and_list_say_so() {
    let grid = GridView {
        columns: grid_columns(None),
        rows: Vec::new(),
        unplaced: Unplaced::default(),
    };
    let lines = format_grid(&grid, &DateRange::unbounded(), &plain());
    assert_eq!(lines, vec!["Trip board", "no trips on the board"]);

    let list = format_list(&ListView { rows: Vec::new() }, &DateRange::unbounded(), &plain());
    assert_eq!(list, vec!["Trips", "no trips matched"]);
}

#[test]
fn list_rows_show_columns_and_flags() {
    let flagged = Highlights {
        not_approved: true,
        dest_flagged: true,
        traveler_flagged: false,
    };
    let list = ListView {
        rows: vec![card("T-7", "Preparing", flagged)],
    };
    let lines = format_list(&list, &DateRange::unbounded(), &plain());
    assert_eq!(
        lines[1],
        "T-7 | Ana Ruiz | 2026-10-19 |  | NY | 4 | [Preparing] | 2 | Leo !not-approved !dest"
    );
    assert_eq!(lines[2], "1 trip(s)");
}

#[test]
fn metrics_lines_include_totals_and_colors() {
    let panel = MetricsPanel {
        metrics: TripMetrics {
            total_trips: 3,
            total_items: 13.0,
        },
        distribution: vec![StatusCount {
            status: "TX Approved".to_string(),
            count: 3,
            color: StatusColor::Approved,
        }],
    };
    let lines = format_metrics(&panel, &plain());
    assert_eq!(
        lines,
        vec![
            "Metrics",
            "total trips: 3",
            "total items: 13",
            "  [TX Approved] 3 #8BC34A"
        ]
    );
}

#[test]
fn trip_card_expands_details() {
    let lines = format_trip_card(&card("T-1", "Pending", Highlights::default()), &plain());
    assert_eq!(lines[0], "T-1 [Pending]");
    assert!(lines.contains(&"  Total Weight: 9".to_string()));
    assert!(lines.contains(&"  Assigned: Leo".to_string()));
}

#[test]
fn flags_and_colors_follow_status_palette() {
    assert!(highlight_flags(Highlights::default(), &plain()).is_none());
    let all = Highlights {
        not_approved: true,
        dest_flagged: true,
        traveler_flagged: true,
    };
    assert_eq!(
        highlight_flags(all, &plain()).as_deref(),
        Some("!not-approved !dest !traveler")
    );
    assert_eq!(status_color_code("TX Approved"), "32");
    assert_eq!(status_color_code("Rejected"), "31");
    assert_eq!(status_color_code("Something"), "37");
    assert!(unplaced_summary(&Unplaced::default()).is_none());

    let colored = Palette { enabled: true };
    assert_eq!(colored.paint("31", "x"), "\x1b[31mx\x1b[0m");
}
