//! Shared test rows and an in-memory REST port.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::model::{
    Bin, BinId, Complaint, Device, MaintTicket, Route, RouteId, RoutePickup, ScheduledTime,
    Timestamp, Zone, ZoneId,
};
use crate::ports::{PortError, RestPort, Row};
use crate::query::{Query, Resource};

/// Stored value trying to repaint the terminal and inject markup.
pub(crate) const INJECTION: &str = "\u{1b}[2J\u{1b}[31m<script>alert(1)</script>";

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0)
        .single()
        .expect("valid fixture time")
}

fn ago(hours: i64) -> Option<Timestamp> {
    Some(Timestamp(now() - Duration::hours(hours)))
}

pub(crate) fn bins() -> Vec<Bin> {
    vec![
        Bin {
            bin_id: BinId(1),
            bin_type: "RECYCLE".to_owned(),
            status: "ACTIVE".to_owned(),
            zone_id: Some(ZoneId(1)),
            latitude: Some(50.94),
            longitude: Some(6.96),
        },
        Bin {
            bin_id: BinId(2),
            bin_type: "TRASH".to_owned(),
            status: "INACTIVE".to_owned(),
            zone_id: Some(ZoneId(2)),
            latitude: None,
            longitude: None,
        },
        Bin {
            bin_id: BinId(3),
            bin_type: "COMPOST".to_owned(),
            status: "ACTIVE".to_owned(),
            zone_id: Some(ZoneId(3)),
            latitude: Some(50.93),
            longitude: Some(6.95),
        },
    ]
}

pub(crate) fn zones() -> Vec<Zone> {
    vec![
        Zone {
            zone_id: ZoneId(1),
            name: "North".to_owned(),
        },
        Zone {
            zone_id: ZoneId(2),
            name: "South".to_owned(),
        },
    ]
}

pub(crate) fn routes() -> Vec<Route> {
    vec![
        Route {
            route_id: RouteId(1),
            route_name: Some("Morning North".to_owned()),
            zone_id: Some(ZoneId(1)),
            scheduled_days: Some("MON,THU".to_owned()),
            avg_time_min: Some(95.0),
        },
        Route {
            route_id: RouteId(2),
            route_name: Some("Evening South".to_owned()),
            zone_id: Some(ZoneId(2)),
            scheduled_days: None,
            avg_time_min: None,
        },
        Route {
            route_id: RouteId(3),
            route_name: Some(String::new()),
            zone_id: None,
            scheduled_days: None,
            avg_time_min: None,
        },
    ]
}

fn pickup(pickup_id: i64, route: Option<i64>, scheduled: Option<Timestamp>) -> RoutePickup {
    RoutePickup {
        pickup_id,
        bin_id: BinId(1),
        route_id: route.map(RouteId),
        truck_id: Some(10),
        status: "DONE".to_owned(),
        scheduled_time: scheduled.map(ScheduledTime::At),
        actual_time: None,
        weight_kg: Some(12.5),
    }
}

/// Newest first, as the backend orders them. Pickups 4 and 7 are older than a week.
pub(crate) fn pickups() -> Vec<RoutePickup> {
    vec![
        pickup(1, Some(1), ago(24)),
        pickup(2, Some(1), None),
        pickup(3, Some(2), ago(6 * 24)),
        pickup(4, Some(2), ago(8 * 24)),
        pickup(5, Some(7), ago(2 * 24)),
        pickup(6, None, ago(3)),
        pickup(7, Some(1), ago(30 * 24)),
    ]
}

pub(crate) fn devices() -> Vec<Device> {
    vec![Device {
        device_id: 100,
        device_serial: INJECTION.to_owned(),
        status: "ONLINE".to_owned(),
        bin_id: BinId(1),
    }]
}

fn complaint(complaint_id: i64, status: &str, created_at: Option<Timestamp>) -> Complaint {
    Complaint {
        complaint_id,
        bin_id: BinId(1),
        user_id: Some(4),
        complaint_type: "OVERFLOW".to_owned(),
        description: INJECTION.to_owned(),
        status: status.to_owned(),
        created_at,
    }
}

pub(crate) fn complaints() -> Vec<Complaint> {
    vec![
        complaint(10, "OPEN", ago(5)),
        complaint(11, "RESOLVED", ago(50)),
        complaint(12, "OPEN", ago(1)),
    ]
}

/// Wire order T-1, T-3, T-2 for complaints 1, 3, 2.
pub(crate) fn unordered_complaints() -> Vec<Complaint> {
    vec![
        complaint(1, "OPEN", ago(1)),
        complaint(3, "OPEN", ago(3)),
        complaint(2, "OPEN", ago(2)),
    ]
}

pub(crate) fn tickets() -> Vec<MaintTicket> {
    vec![
        MaintTicket {
            ticket_id: 20,
            bin_id: BinId(1),
            issue_desc: "Sensor reports full while the bin is empty, please recalibrate soon".to_owned(),
            status: "OPEN".to_owned(),
            created_by: Some(2),
            assigned_to: None,
            created_at: ago(4),
        },
        MaintTicket {
            ticket_id: 21,
            bin_id: BinId(2),
            issue_desc: "Lid hinge".to_owned(),
            status: "CLOSED".to_owned(),
            created_by: Some(2),
            assigned_to: Some(3),
            created_at: ago(40),
        },
    ]
}

fn to_rows<T: Serialize>(rows: &[T]) -> Vec<Row> {
    rows.iter()
        .map(|row| serde_json::to_value(row).expect("fixture serializes"))
        .collect()
}

/// In-memory backend that records every request.
#[derive(Default)]
pub(crate) struct FakePort {
    tables: HashMap<Resource, Vec<Row>>,
    failing: Option<Resource>,
    gets: Mutex<Vec<String>>,
    posts: Mutex<Vec<(Resource, Row)>>,
}

impl FakePort {
    pub(crate) fn seeded() -> Self {
        Self::default()
            .with_rows(Resource::Bins, &bins())
            .with_rows(Resource::Zones, &zones())
            .with_rows(Resource::Routes, &routes())
            .with_rows(Resource::RoutePickups, &pickups())
            .with_rows(Resource::Devices, &devices())
            .with_rows(Resource::Complaints, &complaints())
            .with_rows(Resource::MaintTickets, &tickets())
    }

    pub(crate) fn with_rows<T: Serialize>(mut self, resource: Resource, rows: &[T]) -> Self {
        self.tables.insert(resource, to_rows(rows));
        self
    }

    pub(crate) fn failing(mut self, resource: Resource) -> Self {
        self.failing = Some(resource);
        self
    }

    pub(crate) fn get_calls(&self) -> Vec<String> {
        self.gets.lock().expect("lock").clone()
    }

    pub(crate) fn posts(&self) -> Vec<(Resource, Row)> {
        self.posts.lock().expect("lock").clone()
    }

    fn fail_if_configured(&self, resource: Resource) -> Result<(), PortError> {
        if self.failing == Some(resource) {
            return Err(PortError::Api {
                status: 500,
                body: "boom".to_owned(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RestPort for FakePort {
    async fn get(&self, query: &Query) -> Result<Vec<Row>, PortError> {
        self.gets.lock().expect("lock").push(query.path_and_query());
        self.fail_if_configured(query.resource())?;
        Ok(self
            .tables
            .get(&query.resource())
            .cloned()
            .unwrap_or_default())
    }

    async fn post(&self, resource: Resource, payload: Row) -> Result<Vec<Row>, PortError> {
        self.posts
            .lock()
            .expect("lock")
            .push((resource, payload.clone()));
        self.fail_if_configured(resource)?;
        let mut created = payload;
        if let Value::Object(fields) = &mut created {
            fields.insert("created_at".to_owned(), json!(now().to_rfc3339()));
        }
        Ok(vec![created])
    }
}
