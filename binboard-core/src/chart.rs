//! Pickup counts per route over the trailing week.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::lookup::RouteDirectory;
use crate::model::{RouteId, RoutePickup, ScheduledTime};

/// Width of the chart window.
pub const CHART_WINDOW_DAYS: i64 = 7;
/// Label of the bucket for pickups without a route.
pub const UNKNOWN_ROUTE: &str = "Route Unknown";
/// Label of the placeholder bucket used when nothing matched.
pub const NO_DATA: &str = "No data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BucketKey {
    Route(RouteId),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One point of the per-route pickup chart.
pub struct ChartBucket {
    /// Route label shown on the x axis.
    pub label: String,
    /// Number of pickups counted for the route.
    pub count: u64,
}

/// Unreadable scheduled times never fall inside the window.
fn in_window(scheduled: &ScheduledTime, cutoff: DateTime<Utc>) -> bool {
    scheduled.at().is_some_and(|at| at.0 >= cutoff)
}

/// Count pickups per route for the chart.
///
/// Pickups scheduled at or after `now - 7 days` are counted, as are pickups
/// without a scheduled time. Pickups whose scheduled time is unreadable are
/// left out. Buckets are ordered by route id with the `Route Unknown` bucket
/// last. An empty result yields a single `No data` bucket with a zero count,
/// so a chart always has one point.
#[must_use]
pub fn pickup_buckets(
    pickups: &[RoutePickup],
    routes: &RouteDirectory,
    now: DateTime<Utc>,
) -> Vec<ChartBucket> {
    let cutoff = now - Duration::days(CHART_WINDOW_DAYS);

    let mut counts: BTreeMap<BucketKey, u64> = BTreeMap::new();
    for pickup in pickups {
        let counted = pickup
            .scheduled_time
            .as_ref()
            .is_none_or(|scheduled| in_window(scheduled, cutoff));
        if !counted {
            continue;
        }
        let key = pickup.route_id.map_or(BucketKey::Unknown, BucketKey::Route);
        *counts.entry(key).or_default() += 1;
    }

    if counts.is_empty() {
        return vec![ChartBucket {
            label: NO_DATA.to_owned(),
            count: 0,
        }];
    }

    counts
        .into_iter()
        .map(|(key, count)| ChartBucket {
            label: match key {
                BucketKey::Route(id) => routes.label(id),
                BucketKey::Unknown => UNKNOWN_ROUTE.to_owned(),
            },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn counts_recent_and_unscheduled_pickups_per_route() {
        let now = fixtures::now();
        let routes = RouteDirectory::new(fixtures::routes());
        let pickups = fixtures::pickups();

        let buckets = pickup_buckets(&pickups, &routes, now);

        let expected_total = pickups
            .iter()
            .filter(|pickup| {
                pickup
                    .scheduled_time
                    .as_ref()
                    .is_none_or(|scheduled| in_window(scheduled, now - Duration::days(7)))
            })
            .count();
        let total: u64 = buckets.iter().map(|bucket| bucket.count).sum();
        assert_eq!(usize::try_from(total).ok(), Some(expected_total));

        let labels: Vec<&str> = buckets.iter().map(|bucket| bucket.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Morning North", "Evening South", "Route 7", "Route Unknown"]
        );
        let counts: Vec<u64> = buckets.iter().map(|bucket| bucket.count).collect();
        assert_eq!(counts, [2, 1, 1, 1]);
    }

    #[test]
    fn routeless_pickups_fall_back_like_unnamed_routes() {
        let mut pickup = fixtures::pickups()
            .into_iter()
            .find(|pickup| pickup.route_id.is_none())
            .expect("fixture has a route-less pickup");
        pickup.scheduled_time = None;

        let buckets = pickup_buckets(&[pickup], &RouteDirectory::default(), fixtures::now());
        assert_eq!(
            buckets,
            [ChartBucket {
                label: "Route Unknown".to_owned(),
                count: 1
            }]
        );
    }

    #[test]
    fn unreadable_schedule_is_left_out_but_missing_one_counts() {
        let mut unreadable = fixtures::pickups()
            .into_iter()
            .next()
            .expect("fixture pickup");
        let mut unscheduled = unreadable.clone();
        unreadable.scheduled_time = Some(ScheduledTime::Unreadable("infinity".to_owned()));
        unscheduled.scheduled_time = None;

        let routes = RouteDirectory::new(fixtures::routes());
        let buckets = pickup_buckets(&[unreadable, unscheduled], &routes, fixtures::now());
        assert_eq!(
            buckets,
            [ChartBucket {
                label: "Morning North".to_owned(),
                count: 1
            }]
        );
    }

    #[test]
    fn empty_input_yields_single_no_data_bucket() {
        let buckets = pickup_buckets(&[], &RouteDirectory::default(), fixtures::now());
        assert_eq!(
            buckets,
            [ChartBucket {
                label: "No data".to_owned(),
                count: 0
            }]
        );
    }

    #[test]
    fn only_stale_pickups_also_yield_no_data() {
        let now = fixtures::now();
        let stale: Vec<RoutePickup> = fixtures::pickups()
            .into_iter()
            .filter(|pickup| {
                pickup
                    .scheduled_time
                    .as_ref()
                    .and_then(ScheduledTime::at)
                    .is_some_and(|ts| ts.0 < now - Duration::days(7))
            })
            .collect();
        assert!(!stale.is_empty(), "fixture has stale pickups");

        let buckets = pickup_buckets(&stale, &RouteDirectory::default(), now);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.first().map(|bucket| bucket.count), Some(0));
    }
}
