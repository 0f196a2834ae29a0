//! Keyed lookups over cached zones and routes.
//!
//! Both directories are rebuilt from scratch whenever their cache is
//! refreshed. A reference to a row that is not known falls back to the raw id.

use std::collections::HashMap;

use crate::model::{Route, RouteId, Zone, ZoneId};

#[derive(Debug, Clone, Default)]
/// Zones indexed by id, in fetch order.
pub struct ZoneDirectory {
    zones: Vec<Zone>,
    by_id: HashMap<ZoneId, usize>,
}

impl ZoneDirectory {
    /// Index the given zones.
    #[must_use]
    pub fn new(zones: Vec<Zone>) -> Self {
        let by_id = zones
            .iter()
            .enumerate()
            .map(|(position, zone)| (zone.zone_id, position))
            .collect();
        Self { zones, by_id }
    }

    /// Zones in fetch order.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Look up a zone.
    #[must_use]
    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.by_id
            .get(&id)
            .and_then(|position| self.zones.get(*position))
    }

    /// Zone name, or the id when the zone is unknown or missing.
    #[must_use]
    pub fn label(&self, id: Option<ZoneId>) -> String {
        match id {
            Some(id) => self
                .get(id)
                .map_or_else(|| id.to_string(), |zone| zone.name.clone()),
            None => "-".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Routes indexed by id, in fetch order.
pub struct RouteDirectory {
    routes: Vec<Route>,
    by_id: HashMap<RouteId, usize>,
}

impl RouteDirectory {
    /// Index the given routes.
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        let by_id = routes
            .iter()
            .enumerate()
            .map(|(position, route)| (route.route_id, position))
            .collect();
        Self { routes, by_id }
    }

    /// Routes in fetch order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Whether no routes are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Look up a route.
    #[must_use]
    pub fn get(&self, id: RouteId) -> Option<&Route> {
        self.by_id
            .get(&id)
            .and_then(|position| self.routes.get(*position))
    }

    /// Position of a route in fetch order.
    #[must_use]
    pub fn position(&self, id: RouteId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// Route name, or `Route <id>` when the route is unknown or unnamed.
    #[must_use]
    pub fn label(&self, id: RouteId) -> String {
        self.get(id)
            .and_then(Route::name)
            .map_or_else(|| format!("Route {id}"), str::to_owned)
    }
}

/// Title used in route lists: the name, or `Route #<id>`.
#[must_use]
pub fn route_title(route: &Route) -> String {
    route
        .name()
        .map_or_else(|| format!("Route #{}", route.route_id), str::to_owned)
}
