//! High-level service facade over the REST port.
//!
//! Each method is one load of a dashboard panel. Multi-fetch loads run their
//! requests concurrently and fail as a unit: if any request fails, the whole
//! load returns that error and nothing partial is handed out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::chart::{ChartBucket, pickup_buckets};
use crate::dashboard::{DASHBOARD_RECENT, DashboardMetrics, recent_complaints};
use crate::forms::{ComplaintForm, TicketForm, ValidationError};
use crate::lookup::RouteDirectory;
use crate::model::{
    Bin, BinId, Complaint, Device, MaintTicket, Route, RouteId, RoutePickup, Zone,
};
use crate::ports::{PortError, RestPort, Row};
use crate::query::{Query, Resource};

/// Rows per related list in the bin details panel.
pub const DETAIL_RECENT: usize = 5;
/// Rows per list in the complaints and tickets view.
pub const OVERVIEW_RECENT: usize = 20;

#[derive(thiserror::Error, Debug)]
/// Errors from submitting a form.
pub enum SubmitError {
    /// The form was rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The backend rejected the insert or could not be reached.
    #[error(transparent)]
    Port(#[from] PortError),
}

#[derive(Debug, Clone)]
/// Everything the dashboard renders after one load.
pub struct DashboardSnapshot {
    /// Scalar counters.
    pub metrics: DashboardMetrics,
    /// Newest pickups, in the backend's order.
    pub recent_pickups: Vec<RoutePickup>,
    /// Newest complaints by creation time.
    pub recent_complaints: Vec<Complaint>,
    /// Pickups per route over the last week.
    pub chart: Vec<ChartBucket>,
}

#[derive(Debug, Clone)]
/// Rows related to one bin.
pub struct BinDetails {
    /// Devices mounted on the bin.
    pub devices: Vec<Device>,
    /// Newest complaints about the bin.
    pub complaints: Vec<Complaint>,
    /// Newest maintenance tickets for the bin.
    pub tickets: Vec<MaintTicket>,
    /// Newest pickups of the bin.
    pub pickups: Vec<RoutePickup>,
}

#[derive(Debug, Clone)]
/// Newest complaints and tickets.
pub struct ComplaintsOverview {
    /// Complaints, newest first.
    pub complaints: Vec<Complaint>,
    /// Tickets, newest first.
    pub tickets: Vec<MaintTicket>,
}

/// Public entry point for every dashboard load and submission.
pub struct BinboardService {
    port: Arc<dyn RestPort>,
}

impl BinboardService {
    /// Create a new service bound to the given port.
    #[must_use]
    pub fn new(port: Arc<dyn RestPort>) -> Self {
        Self { port }
    }

    async fn fetch<T: DeserializeOwned>(&self, query: Query) -> Result<Vec<T>, PortError> {
        debug!(%query, "fetching rows");
        let rows = self.port.get(&query).await?;
        Ok(serde_json::from_value(Value::Array(rows))?)
    }

    /// Every row of a table, untyped, for the generic table viewer.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    pub async fn table(&self, resource: Resource) -> Result<Vec<Row>, PortError> {
        let query = Query::select_all(resource);
        debug!(%query, "fetching table");
        self.port.get(&query).await
    }

    /// All routes.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    pub async fn routes(&self) -> Result<Vec<Route>, PortError> {
        self.fetch(Query::select_all(Resource::Routes)).await
    }

    /// All bins and zones, fetched together.
    ///
    /// # Errors
    ///
    /// Returns the first [`PortError`] of either request.
    pub async fn bins_and_zones(&self) -> Result<(Vec<Bin>, Vec<Zone>), PortError> {
        tokio::try_join!(
            self.fetch::<Bin>(Query::select_all(Resource::Bins)),
            self.fetch::<Zone>(Query::select_all(Resource::Zones)),
        )
    }

    /// Load the dashboard: metrics, recent lists, and chart buckets.
    ///
    /// # Errors
    ///
    /// Returns the first [`PortError`] of the five requests.
    pub async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardSnapshot, PortError> {
        let (bins, complaints, tickets, pickups, routes) = tokio::try_join!(
            self.fetch::<Bin>(Query::select_all(Resource::Bins)),
            self.fetch::<Complaint>(Query::select_all(Resource::Complaints)),
            self.fetch::<MaintTicket>(Query::select_all(Resource::MaintTickets)),
            self.fetch::<RoutePickup>(
                Query::select_all(Resource::RoutePickups).latest_first("scheduled_time")
            ),
            self.fetch::<Route>(Query::select_all(Resource::Routes)),
        )?;

        let routes = RouteDirectory::new(routes);
        Ok(DashboardSnapshot {
            metrics: DashboardMetrics::compute(&bins, &complaints, &tickets),
            recent_pickups: pickups.iter().take(DASHBOARD_RECENT).cloned().collect(),
            recent_complaints: recent_complaints(&complaints, DASHBOARD_RECENT),
            chart: pickup_buckets(&pickups, &routes, now),
        })
    }

    /// Devices and newest complaints, tickets, and pickups of one bin.
    ///
    /// # Errors
    ///
    /// Returns the first [`PortError`] of the four requests.
    pub async fn bin_details(&self, bin_id: BinId) -> Result<BinDetails, PortError> {
        let (devices, complaints, tickets, pickups) = tokio::try_join!(
            self.fetch::<Device>(Query::select_all(Resource::Devices).eq("bin_id", bin_id)),
            self.fetch::<Complaint>(
                Query::select_all(Resource::Complaints)
                    .eq("bin_id", bin_id)
                    .latest_first("created_at")
                    .limit(DETAIL_RECENT)
            ),
            self.fetch::<MaintTicket>(
                Query::select_all(Resource::MaintTickets)
                    .eq("bin_id", bin_id)
                    .latest_first("created_at")
                    .limit(DETAIL_RECENT)
            ),
            self.fetch::<RoutePickup>(
                Query::select_all(Resource::RoutePickups)
                    .eq("bin_id", bin_id)
                    .latest_first("scheduled_time")
                    .limit(DETAIL_RECENT)
            ),
        )?;
        Ok(BinDetails {
            devices,
            complaints,
            tickets,
            pickups,
        })
    }

    /// Every pickup of a route, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    pub async fn route_pickups(&self, route_id: RouteId) -> Result<Vec<RoutePickup>, PortError> {
        self.fetch(
            Query::select_all(Resource::RoutePickups)
                .eq("route_id", route_id)
                .latest_first("scheduled_time"),
        )
        .await
    }

    /// Newest complaints and tickets, fetched together.
    ///
    /// # Errors
    ///
    /// Returns the first [`PortError`] of either request.
    pub async fn complaints_overview(&self) -> Result<ComplaintsOverview, PortError> {
        let (complaints, tickets) = tokio::try_join!(
            self.fetch::<Complaint>(
                Query::select_all(Resource::Complaints)
                    .latest_first("created_at")
                    .limit(OVERVIEW_RECENT)
            ),
            self.fetch::<MaintTicket>(
                Query::select_all(Resource::MaintTickets)
                    .latest_first("created_at")
                    .limit(OVERVIEW_RECENT)
            ),
        )?;
        Ok(ComplaintsOverview {
            complaints,
            tickets,
        })
    }

    /// Validate and insert a complaint.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Validation`] without touching the network when
    /// the form is incomplete, or [`SubmitError::Port`] when the insert fails.
    pub async fn submit_complaint(&self, form: &ComplaintForm) -> Result<Vec<Row>, SubmitError> {
        let payload = form.to_payload()?;
        info!(bin_id = %payload.bin_id, "submitting complaint");
        let body = serde_json::to_value(&payload).map_err(PortError::from)?;
        Ok(self.port.post(Resource::Complaints, body).await?)
    }

    /// Validate and insert a maintenance ticket.
    ///
    /// # Errors
    ///
    /// Same contract as [`BinboardService::submit_complaint`].
    pub async fn submit_ticket(&self, form: &TicketForm) -> Result<Vec<Row>, SubmitError> {
        let payload = form.to_payload()?;
        info!(bin_id = %payload.bin_id, "submitting ticket");
        let body = serde_json::to_value(&payload).map_err(PortError::from)?;
        Ok(self.port.post(Resource::MaintTickets, body).await?)
    }
}
