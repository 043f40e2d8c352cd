use serde::Serialize;

use super::dates::ShipDate;

pub const COL_TRIP_ID: &str = "Trip ID";
pub const COL_TRAVELER: &str = "Traveler";
pub const COL_SHIP_BUNDLE: &str = "Ship Bundle";
pub const COL_MAX_USA_DATE: &str = "Max USA Date";
pub const COL_USA_DEST: &str = "USA Dest";
pub const COL_ITEMS_ACCEPTED: &str = "Items Accepted";
pub const COL_ITEMS_READY: &str = "Items Ready to process";
pub const COL_TOTAL_WEIGHT: &str = "Total Bundle Weight";
pub const COL_VERIFICATION_STATUS: &str = "Trip Verification Status";
pub const COL_USER_ID: &str = "User ID";

pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_TRIP_ID,
    COL_TRAVELER,
    COL_SHIP_BUNDLE,
    COL_MAX_USA_DATE,
    COL_USA_DEST,
    COL_ITEMS_ACCEPTED,
    COL_ITEMS_READY,
    COL_TOTAL_WEIGHT,
    COL_VERIFICATION_STATUS,
    COL_USER_ID,
];

/// One row of the loaded CSV. Missing columns read as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub trip_id: String,
    pub traveler: String,
    pub ship_bundle: String,
    #[serde(skip)]
    pub ship_bundle_date: ShipDate,
    pub max_usa_date: String,
    pub usa_dest: String,
    pub items_accepted: String,
    pub items_ready_to_process: String,
    pub total_bundle_weight: String,
    pub verification_status: String,
    pub user_id: String,
}

impl Trip {
    pub fn from_columns<'a>(column: impl Fn(&str) -> Option<&'a str>) -> Self {
        let text = |name: &str| column(name).unwrap_or("").to_string();
        let ship_bundle = text(COL_SHIP_BUNDLE);
        Self {
            trip_id: text(COL_TRIP_ID),
            traveler: text(COL_TRAVELER),
            ship_bundle_date: ShipDate::parse(&ship_bundle),
            ship_bundle,
            max_usa_date: text(COL_MAX_USA_DATE),
            usa_dest: text(COL_USA_DEST),
            items_accepted: text(COL_ITEMS_ACCEPTED),
            items_ready_to_process: text(COL_ITEMS_READY),
            total_bundle_weight: text(COL_TOTAL_WEIGHT),
            verification_status: text(COL_VERIFICATION_STATUS),
            user_id: text(COL_USER_ID),
        }
    }

    pub fn accepted_quantity(&self) -> f64 {
        parse_quantity(&self.items_accepted)
    }
}

/// Numeric field coercion: blank, non-numeric, or non-finite text counts as 0.
pub fn parse_quantity(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
