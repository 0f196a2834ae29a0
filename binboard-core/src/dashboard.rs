//! Dashboard metrics and recency helpers.

use std::cmp::Reverse;

use crate::model::{Bin, Complaint, MaintTicket};

/// Number of rows shown in each dashboard list.
pub const DASHBOARD_RECENT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Scalar counters at the top of the dashboard.
pub struct DashboardMetrics {
    /// Every bin.
    pub total_bins: usize,
    /// Bins with status `ACTIVE`.
    pub active_bins: usize,
    /// Complaints with status `OPEN`.
    pub open_complaints: usize,
    /// Tickets with status `OPEN`.
    pub open_tickets: usize,
}

impl DashboardMetrics {
    /// Count the metrics over freshly fetched rows.
    #[must_use]
    pub fn compute(bins: &[Bin], complaints: &[Complaint], tickets: &[MaintTicket]) -> Self {
        Self {
            total_bins: bins.len(),
            active_bins: bins.iter().filter(|bin| bin.is_active()).count(),
            open_complaints: complaints
                .iter()
                .filter(|complaint| complaint.is_open())
                .count(),
            open_tickets: tickets.iter().filter(|ticket| ticket.is_open()).count(),
        }
    }
}

/// The `limit` newest complaints by creation time.
///
/// The complaints fetch is unordered, so sorting happens here. Complaints
/// without a timestamp go last; ties keep their fetch order.
#[must_use]
pub fn recent_complaints(complaints: &[Complaint], limit: usize) -> Vec<Complaint> {
    let mut sorted = complaints.to_vec();
    sorted.sort_by_key(|complaint| Reverse(complaint.created_at));
    sorted.truncate(limit);
    sorted
}
