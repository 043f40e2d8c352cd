use serde::Serialize;

use crate::classifier::effective_status;
use crate::domain::trip::Trip;
use crate::state_store::OverrideSource;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripMetrics {
    pub total_trips: usize,
    pub total_items: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Approved,
    InFlight,
    Rejected,
    Neutral,
}

impl StatusColor {
    pub fn for_status(status: &str) -> Self {
        match status {
            "TX Approved" => StatusColor::Approved,
            "Pending" | "In Progress" => StatusColor::InFlight,
            "Rejected" => StatusColor::Rejected,
            _ => StatusColor::Neutral,
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            StatusColor::Approved => "#8BC34A",
            StatusColor::InFlight => "#FFB74D",
            StatusColor::Rejected => "#E57373",
            StatusColor::Neutral => "#90A4AE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
    pub color: StatusColor,
}

/// Totals plus status distribution for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsPanel {
    #[serde(flatten)]
    pub metrics: TripMetrics,
    pub distribution: Vec<StatusCount>,
}

pub fn compute_metrics(working: &[&Trip]) -> TripMetrics {
    TripMetrics {
        total_trips: working.len(),
        total_items: working.iter().map(|trip| trip.accepted_quantity()).sum(),
    }
}

/// Counts by effective status in first-seen order. Overrides are read fresh
/// on every call.
pub fn compute_status_distribution(
    working: &[&Trip],
    overrides: &impl OverrideSource,
) -> Vec<StatusCount> {
    let mut counts: Vec<StatusCount> = Vec::new();
    for trip in working {
        let state = overrides.lookup(&trip.trip_id);
        let status = effective_status(trip, &state);
        match counts.iter_mut().find(|entry| entry.status == status) {
            Some(entry) => entry.count += 1,
            None => counts.push(StatusCount {
                status: status.to_string(),
                count: 1,
                color: StatusColor::for_status(status),
            }),
        }
    }
    counts
}

pub fn build_panel(working: &[&Trip], overrides: &impl OverrideSource) -> MetricsPanel {
    MetricsPanel {
        metrics: compute_metrics(working),
        distribution: compute_status_distribution(working, overrides),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{compute_metrics, compute_status_distribution, StatusColor};
    use crate::domain::dates::ShipDate;
    use crate::domain::trip::Trip;
    use crate::state_store::{OverrideSource, TripOverride};

    struct FixedOverrides(HashMap<String, String>);

    impl OverrideSource for FixedOverrides {
        fn lookup(&self, trip_id: &str) -> TripOverride {
            TripOverride {
                status: self.0.get(trip_id).cloned(),
                assigned_name: None,
            }
        }
    }

    fn trip(id: &str, status: &str, accepted: &str) -> Trip {
        Trip {
            trip_id: id.to_string(),
            traveler: String::new(),
            ship_bundle: "2026-10-19".to_string(),
            ship_bundle_date: ShipDate::parse("2026-10-19"),
            max_usa_date: String::new(),
            usa_dest: String::new(),
            items_accepted: accepted.to_string(),
            items_ready_to_process: String::new(),
            total_bundle_weight: String::new(),
            verification_status: status.to_string(),
            user_id: String::new(),
        }
    }

    #[test]
    fn metrics_count_trips_and_sum_accepted_items() {
        let trips = [
            trip("A", "Pending", "10"),
            trip("B", "Pending", ""),
            trip("C", "Pending", "5x"),
            trip("D", "Pending", "3"),
        ];
        let working: Vec<&Trip> = trips.iter().collect();

        let metrics = compute_metrics(&working);
        assert_eq!(metrics.total_trips, working.len());
        assert_eq!(metrics.total_items, 13.0);
    }

    #[test]
    fn empty_working_set_has_zero_metrics() {
        let metrics = compute_metrics(&[]);
        assert_eq!(metrics.total_trips, 0);
        assert_eq!(metrics.total_items, 0.0);
    }

    #[test]
    fn distribution_uses_effective_status_in_first_seen_order() {
        let trips = [
            trip("A", "Pending", "1"),
            trip("B", "TX Approved", "1"),
            trip("C", "Pending", "1"),
            trip("D", "Rejected", "1"),
        ];
        let working: Vec<&Trip> = trips.iter().collect();
        let overrides = FixedOverrides(HashMap::from([(
            "A".to_string(),
            "Preparing".to_string(),
        )]));

        let distribution = compute_status_distribution(&working, &overrides);
        let pairs: Vec<(&str, usize)> = distribution
            .iter()
            .map(|entry| (entry.status.as_str(), entry.count))
            .collect();
        assert_eq!(
            pairs,
            vec![("Preparing", 1), ("TX Approved", 1), ("Pending", 1), ("Rejected", 1)]
        );
        assert_eq!(distribution[0].color, StatusColor::Neutral);
        assert_eq!(distribution[1].color, StatusColor::Approved);
    }

    #[test]
    fn status_colors_match_panel_palette() {
        assert_eq!(StatusColor::for_status("TX Approved").hex(), "#8BC34A");
        assert_eq!(StatusColor::for_status("In Progress").hex(), "#FFB74D");
        assert_eq!(StatusColor::for_status("Pending").hex(), "#FFB74D");
        assert_eq!(StatusColor::for_status("Rejected").hex(), "#E57373");
        assert_eq!(StatusColor::for_status("ReadyForLabel").hex(), "#90A4AE");
    }
}
