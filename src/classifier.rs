use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::dates::{weekday_number, ShipDate};
use crate::domain::trip::Trip;
use crate::state_store::TripOverride;

/// Weekday buckets that have a grid column (Mon through Fri).
pub const GRID_WEEKDAYS: [u8; 5] = [1, 2, 3, 4, 5];

pub fn effective_status<'a>(trip: &'a Trip, state: &'a TripOverride) -> &'a str {
    state.status().unwrap_or(&trip.verification_status)
}

/// Monday = 1 .. Sunday = 7; `None` for a trip without a valid ship date.
pub fn weekday_bucket(date: ShipDate) -> Option<u8> {
    date.instant().map(weekday_number)
}

pub fn is_grid_weekday(bucket: u8) -> bool {
    GRID_WEEKDAYS.contains(&bucket)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRules {
    pub approved_status: String,
    pub flagged_destinations: BTreeSet<String>,
    pub flagged_travelers: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub not_approved: bool,
    pub dest_flagged: bool,
    pub traveler_flagged: bool,
}

impl Highlights {
    pub fn any(self) -> bool {
        self.not_approved || self.dest_flagged || self.traveler_flagged
    }
}

/// Presentation flags only. `not_approved` looks at the base status from the
/// file, never at an override.
pub fn highlights(trip: &Trip, rules: &HighlightRules) -> Highlights {
    Highlights {
        not_approved: trip.verification_status != rules.approved_status,
        dest_flagged: rules.flagged_destinations.contains(&trip.usa_dest),
        traveler_flagged: rules.flagged_travelers.contains(&trip.traveler),
    }
}
