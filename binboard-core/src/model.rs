//! Row types for the backend tables: bins, zones, routes, pickups, devices,
//! complaints, and maintenance tickets.
//!
//! Column names follow the backend schema. Every cross reference is a loose
//! foreign key; nothing here checks that the referenced row exists.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

/// Status value marking a bin as in service.
pub const STATUS_ACTIVE: &str = "ACTIVE";
/// Status value marking a complaint or ticket as unresolved.
pub const STATUS_OPEN: &str = "OPEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of a bin.
pub struct BinId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of a zone.
pub struct ZoneId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of a route.
pub struct RouteId(pub i64);

macro_rules! display_id {
    ($($name:ident),*) => {
        $(impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "{}", self.0)
            }
        })*
    };
}

display_id!(BinId, ZoneId, RouteId);

/// Point in time as stored by the backend.
///
/// Accepts RFC 3339 strings (`timestamptz` columns) as well as zone-less ISO
/// strings and plain dates, which are read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub DateTime<Utc>);

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl Timestamp {
    /// Parse a backend timestamp string.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(parsed.with_timezone(&Utc)));
        }
        if let Some(parsed) = OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        {
            return Some(Self(parsed.with_timezone(&Utc)));
        }
        if let Some(naive) = NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        {
            return Some(Self(naive.and_utc()));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc()))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Planned time of a pickup as stored. Text that is not a timestamp is kept
/// verbatim so it can still be shown, but it never falls inside a time window.
pub enum ScheduledTime {
    /// A readable point in time.
    At(Timestamp),
    /// Stored text that is not a timestamp, e.g. `infinity`.
    Unreadable(String),
}

impl ScheduledTime {
    /// The point in time, if the stored value was readable.
    #[must_use]
    pub fn at(&self) -> Option<Timestamp> {
        match self {
            ScheduledTime::At(at) => Some(*at),
            ScheduledTime::Unreadable(_) => None,
        }
    }
}

impl fmt::Display for ScheduledTime {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduledTime::At(at) => write!(formatter, "{at}"),
            ScheduledTime::Unreadable(raw) => formatter.write_str(raw),
        }
    }
}

impl Serialize for ScheduledTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScheduledTime::At(at) => at.serialize(serializer),
            ScheduledTime::Unreadable(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for ScheduledTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Timestamp::parse(&raw).map_or_else(
            || {
                debug!(%raw, "unreadable scheduled time");
                ScheduledTime::Unreadable(raw)
            },
            ScheduledTime::At,
        ))
    }
}

/// Optional timestamp column; values that do not parse (`infinity`,
/// locale-formatted dates) read as absent instead of failing the row.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        let parsed = Timestamp::parse(&raw);
        if parsed.is_none() {
            debug!(%raw, "ignoring unparseable timestamp");
        }
        parsed
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Physical waste receptacle.
pub struct Bin {
    /// Unique identifier.
    pub bin_id: BinId,
    /// Waste stream the bin collects, such as `RECYCLE` or `TRASH`.
    #[serde(default)]
    pub bin_type: String,
    /// Service status; `ACTIVE` for bins in service.
    #[serde(default)]
    pub status: String,
    /// Zone the bin is placed in.
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    /// Latitude in decimal degrees.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Bin {
    /// Whether the bin is in service.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Geographic grouping of bins and routes.
pub struct Zone {
    /// Unique identifier.
    pub zone_id: ZoneId,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Scheduled sequence of bin visits.
pub struct Route {
    /// Unique identifier.
    pub route_id: RouteId,
    /// Display name, if the route has one.
    #[serde(default)]
    pub route_name: Option<String>,
    /// Zone served by the route.
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    /// Free-form list of service days, e.g. `MON,THU`.
    #[serde(default)]
    pub scheduled_days: Option<String>,
    /// Average duration in minutes.
    #[serde(default)]
    pub avg_time_min: Option<f64>,
}

impl Route {
    /// Route name when present and non-empty.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.route_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One scheduled or completed visit to a bin along a route.
pub struct RoutePickup {
    /// Unique identifier.
    pub pickup_id: i64,
    /// Visited bin.
    pub bin_id: BinId,
    /// Route the visit belongs to.
    #[serde(default)]
    pub route_id: Option<RouteId>,
    /// Truck assigned to the visit.
    #[serde(default)]
    pub truck_id: Option<i64>,
    /// Visit status.
    #[serde(default)]
    pub status: String,
    /// Planned time of the visit.
    #[serde(default)]
    pub scheduled_time: Option<ScheduledTime>,
    /// Time the visit happened.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub actual_time: Option<Timestamp>,
    /// Collected weight in kilograms.
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Sensor attached to a bin.
pub struct Device {
    /// Unique identifier.
    pub device_id: i64,
    /// Hardware serial number.
    #[serde(default)]
    pub device_serial: String,
    /// Device status.
    #[serde(default)]
    pub status: String,
    /// Bin the device is mounted on.
    pub bin_id: BinId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Issue report filed by a user against a bin.
pub struct Complaint {
    /// Unique identifier.
    pub complaint_id: i64,
    /// Bin the complaint is about.
    pub bin_id: BinId,
    /// Reporting user.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Complaint category.
    #[serde(rename = "type", default)]
    pub complaint_type: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Status; `OPEN` until resolved.
    #[serde(default)]
    pub status: String,
    /// Creation time.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<Timestamp>,
}

impl Complaint {
    /// Whether the complaint is unresolved.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == STATUS_OPEN
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Internal work item tied to a bin.
pub struct MaintTicket {
    /// Unique identifier.
    pub ticket_id: i64,
    /// Bin needing maintenance.
    pub bin_id: BinId,
    /// Description of the issue.
    #[serde(default)]
    pub issue_desc: String,
    /// Status; `OPEN` until resolved.
    #[serde(default)]
    pub status: String,
    /// Staff member who filed the ticket.
    #[serde(default)]
    pub created_by: Option<i64>,
    /// Staff member working on the ticket.
    #[serde(default)]
    pub assigned_to: Option<i64>,
    /// Creation time.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<Timestamp>,
}

impl MaintTicket {
    /// Whether the ticket is unresolved.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == STATUS_OPEN
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Insert payload for the `complaints` table.
pub struct NewComplaint {
    /// Bin the complaint is about.
    pub bin_id: BinId,
    /// Reporting user.
    pub user_id: i64,
    /// Complaint category.
    #[serde(rename = "type")]
    pub complaint_type: String,
    /// Free-text description.
    pub description: String,
    /// Initial status.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Insert payload for the `maint_tickets` table.
pub struct NewTicket {
    /// Bin needing maintenance.
    pub bin_id: BinId,
    /// Initial status.
    pub status: String,
    /// Description of the issue.
    pub issue_desc: String,
    /// Staff member filing the ticket.
    pub created_by: i64,
    /// Assignee; serialized as `null` when nobody is assigned.
    pub assigned_to: Option<i64>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamp_accepts_backend_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).single();
        for raw in [
            "2024-05-01T10:30:00+00:00",
            "2024-05-01T12:30:00+02:00",
            "2024-05-01T10:30:00",
            "2024-05-01 10:30:00",
            "2024-05-01T10:30:00.000",
            "2024-05-01 10:30:00+00",
        ] {
            assert_eq!(
                Timestamp::parse(raw).map(|ts| ts.0),
                expected,
                "failed to parse {raw}"
            );
        }
        assert!(Timestamp::parse("yesterday").is_none(), "free text is rejected");
    }

    #[test]
    fn rows_tolerate_missing_and_extra_columns() {
        let row = serde_json::json!({
            "pickup_id": 7,
            "bin_id": 3,
            "route_id": null,
            "status": "DONE",
            "scheduled_time": "2024-05-01T08:00:00+00:00",
            "extra_column": "ignored"
        });
        let pickup: RoutePickup = serde_json::from_value(row).expect("pickup row");
        assert_eq!(pickup.bin_id, BinId(3));
        assert_eq!(pickup.route_id, None);
        assert_eq!(pickup.truck_id, None);
        assert_eq!(pickup.weight_kg, None);
        assert!(pickup.scheduled_time.is_some(), "timestamp parsed");
    }

    #[test]
    fn unreadable_timestamps_do_not_fail_the_row() {
        for raw in ["05/01/2024", "infinity"] {
            let row = serde_json::json!({
                "pickup_id": 1,
                "bin_id": 1,
                "status": "DONE",
                "scheduled_time": raw,
                "actual_time": raw
            });
            let pickup: RoutePickup = serde_json::from_value(row).expect("row still decodes");
            assert_eq!(
                pickup.scheduled_time,
                Some(ScheduledTime::Unreadable(raw.to_owned()))
            );
            assert_eq!(pickup.actual_time, None, "{raw}");
        }

        let complaint: Complaint = serde_json::from_value(serde_json::json!({
            "complaint_id": 1,
            "bin_id": 1,
            "created_at": "not a date"
        }))
        .expect("complaint still decodes");
        assert_eq!(complaint.created_at, None);
    }

    #[test]
    fn complaint_type_uses_backend_column_name() {
        let row = serde_json::json!({
            "complaint_id": 1,
            "bin_id": 2,
            "user_id": 9,
            "type": "OVERFLOW",
            "description": "full",
            "status": "OPEN"
        });
        let complaint: Complaint = serde_json::from_value(row).expect("complaint row");
        assert_eq!(complaint.complaint_type, "OVERFLOW");
        assert!(complaint.is_open(), "OPEN status");
        assert_eq!(complaint.created_at, None);
    }

    #[test]
    fn new_ticket_serializes_missing_assignee_as_null() {
        let ticket = NewTicket {
            bin_id: BinId(4),
            status: "OPEN".to_owned(),
            issue_desc: "lid broken".to_owned(),
            created_by: 2,
            assigned_to: None,
        };
        let payload = serde_json::to_value(&ticket).expect("payload");
        assert!(payload.get("assigned_to").is_some_and(serde_json::Value::is_null), "explicit null");
        assert_eq!(payload.get("bin_id"), Some(&serde_json::json!(4)));
    }
}
