//! Query strings for the table-as-resource REST surface.
//!
//! Only the grammar the backend understands is produced: `select=*`,
//! `<column>=eq.<value>`, `order=<column>.desc` and `limit=<n>`.
//! Parameters keep the order in which they were added.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Tables exposed by the backend.
pub enum Resource {
    /// `bins`
    Bins,
    /// `zones`
    Zones,
    /// `routes`
    Routes,
    /// `route_pickups`
    RoutePickups,
    /// `devices`
    Devices,
    /// `complaints`
    Complaints,
    /// `maint_tickets`
    MaintTickets,
}

impl Resource {
    /// Every table, in selector order.
    pub const ALL: [Resource; 7] = [
        Resource::Bins,
        Resource::Zones,
        Resource::Routes,
        Resource::RoutePickups,
        Resource::Devices,
        Resource::Complaints,
        Resource::MaintTickets,
    ];

    /// Table name as used in the URL path.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Bins => "bins",
            Resource::Zones => "zones",
            Resource::Routes => "routes",
            Resource::RoutePickups => "route_pickups",
            Resource::Devices => "devices",
            Resource::Complaints => "complaints",
            Resource::MaintTickets => "maint_tickets",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Read request against one table.
pub struct Query {
    resource: Resource,
    params: Vec<String>,
}

impl Query {
    /// `select=*` over the given table.
    #[must_use]
    pub fn select_all(resource: Resource) -> Self {
        Self {
            resource,
            params: vec!["select=*".to_owned()],
        }
    }

    /// Add a `<column>=eq.<value>` filter.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.params.push(format!("{column}=eq.{value}"));
        self
    }

    /// Add an `order=<column>.desc` clause, newest rows first.
    #[must_use]
    pub fn latest_first(mut self, column: &str) -> Self {
        self.params.push(format!("order={column}.desc"));
        self
    }

    /// Add a `limit=<n>` cap.
    #[must_use]
    pub fn limit(mut self, rows: usize) -> Self {
        self.params.push(format!("limit={rows}"));
        self
    }

    /// Table the query reads from.
    #[must_use]
    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Resource path with its query string, e.g. `bins?select=*`.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        format!("{}?{}", self.resource, self.params.join("&"))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.path_and_query())
    }
}
