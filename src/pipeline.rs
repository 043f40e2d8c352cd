use time::PrimitiveDateTime;

use crate::domain::dates::{default_range, ShipDate};
use crate::domain::trip::Trip;

/// Inclusive ship-date bounds. Filtering only happens when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<PrimitiveDateTime>,
    pub end: Option<PrimitiveDateTime>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn default_from(now: PrimitiveDateTime) -> Self {
        let (start, end) = default_range(now);
        Self::between(start, end)
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Not-a-date values fail both bound checks, so they never match an
    /// active range.
    pub fn contains(&self, date: ShipDate) -> bool {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return true;
        };
        match date.instant() {
            Some(instant) => start <= instant && instant <= end,
            None => false,
        }
    }
}

/// Date filter plus stable ascending sort by ship date. Invalid dates sort
/// last in source order.
pub fn select_working_set<'a, I>(trips: I, range: &DateRange) -> Vec<&'a Trip>
where
    I: IntoIterator<Item = &'a Trip>,
{
    let mut working: Vec<&Trip> = trips
        .into_iter()
        .filter(|trip| range.contains(trip.ship_bundle_date))
        .collect();
    working.sort_by(|left, right| left.ship_bundle_date.sort_cmp(right.ship_bundle_date));
    working
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{select_working_set, DateRange};
    use crate::domain::dates::ShipDate;
    use crate::domain::trip::Trip;

    fn trip(id: &str, ship_bundle: &str) -> Trip {
        Trip {
            trip_id: id.to_string(),
            traveler: String::new(),
            ship_bundle: ship_bundle.to_string(),
            ship_bundle_date: ShipDate::parse(ship_bundle),
            max_usa_date: String::new(),
            usa_dest: String::new(),
            items_accepted: String::new(),
            items_ready_to_process: String::new(),
            total_bundle_weight: String::new(),
            verification_status: "Pending".to_string(),
            user_id: String::new(),
        }
    }

    fn ids(trips: &[&Trip]) -> Vec<String> {
        trips.iter().map(|trip| trip.trip_id.clone()).collect()
    }

    fn sample() -> Vec<Trip> {
        vec![
            trip("late", "2026-10-23"),
            trip("bad", "not a date"),
            trip("early-a", "2026-10-19"),
            trip("outside", "2026-11-30"),
            trip("early-b", "2026-10-19"),
            trip("bad-2", ""),
            trip("mid", "10/21/2026"),
        ]
    }

    #[test]
    fn filters_inclusive_bounds_and_sorts_stably() {
        let trips = sample();
        let range = DateRange::between(datetime!(2026-10-19 00:00), datetime!(2026-10-23 00:00));

        let working = select_working_set(&trips, &range);
        assert_eq!(ids(&working), vec!["early-a", "early-b", "mid", "late"]);
    }

    #[test]
    fn bound_time_of_day_participates_literally() {
        let trips = sample();
        let range = DateRange::between(datetime!(2026-10-19 08:30), datetime!(2026-10-23 08:30));

        let working = select_working_set(&trips, &range);
        assert_eq!(ids(&working), vec!["mid", "late"]);
    }

    #[test]
    fn missing_bound_disables_filtering_and_invalid_dates_sort_last() {
        let trips = sample();
        let half_open = DateRange {
            start: Some(datetime!(2026-10-20 00:00)),
            end: None,
        };

        let working = select_working_set(&trips, &half_open);
        assert_eq!(
            ids(&working),
            vec!["early-a", "early-b", "mid", "late", "outside", "bad", "bad-2"]
        );
        assert_eq!(
            ids(&select_working_set(&trips, &DateRange::unbounded())),
            ids(&working)
        );
    }

    #[test]
    fn invalid_dates_are_excluded_by_active_range() {
        let trips = vec![trip("bad", "not a date")];
        let range = DateRange::between(datetime!(1970-01-01 00:00), datetime!(2100-01-01 00:00));
        assert!(select_working_set(&trips, &range).is_empty());
        assert_eq!(
            ids(&select_working_set(&trips, &DateRange::unbounded())),
            vec!["bad"]
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let trips = sample();
        let range = DateRange::between(datetime!(2026-10-19 00:00), datetime!(2026-10-21 00:00));

        let once = select_working_set(&trips, &range);
        let twice = select_working_set(once.iter().copied(), &range);
        assert_eq!(ids(&once), ids(&twice));
        assert!(twice.iter().all(|trip| range.contains(trip.ship_bundle_date)));
    }

    #[test]
    fn default_range_is_active_for_a_week() {
        let range = DateRange::default_from(datetime!(2026-10-19 00:00));
        assert!(range.is_active());
        assert!(range.contains(ShipDate::parse("2026-10-26")));
        assert!(!range.contains(ShipDate::parse("2026-10-27")));
    }
}
