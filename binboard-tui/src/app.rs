use binboard_core::{
    BinDetails, BinFilter, ComplaintForm, ComplaintsOverview, DashboardSnapshot, PortError,
    Resource, Row, RouteDirectory, SubmitError, TicketForm, ZoneDirectory, bin_types,
    model::{Bin, BinId, Route, RouteId, RoutePickup, Zone},
};
use tracing::debug;

use crate::chart::RouteChart;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tab {
    Dashboard,
    Bins,
    Routes,
    Complaints,
    Tables,
}

impl Tab {
    pub(crate) const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Bins,
        Tab::Routes,
        Tab::Complaints,
        Tab::Tables,
    ];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Bins => "Bins",
            Tab::Routes => "Routes",
            Tab::Complaints => "Complaints & Tickets",
            Tab::Tables => "Tables",
        }
    }

    fn position(self) -> usize {
        Tab::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    pub(crate) fn next(self) -> Tab {
        Tab::ALL
            .get((self.position() + 1) % Tab::ALL.len())
            .copied()
            .unwrap_or(Tab::Dashboard)
    }

    pub(crate) fn previous(self) -> Tab {
        Tab::ALL
            .get((self.position() + Tab::ALL.len() - 1) % Tab::ALL.len())
            .copied()
            .unwrap_or(Tab::Dashboard)
    }
}

/// Content state of one panel.
#[derive(Debug)]
pub(crate) enum Panel<T> {
    Idle(&'static str),
    Loading,
    Ready(T),
    Failed(String),
}

/// Panels whose loads can overlap; each keeps its own generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Dashboard,
    Bins,
    BinDetails,
    Routes,
    RoutePickups,
    Overview,
    Table,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Slot::Dashboard => 0,
            Slot::Bins => 1,
            Slot::BinDetails => 2,
            Slot::Routes => 3,
            Slot::RoutePickups => 4,
            Slot::Overview => 5,
            Slot::Table => 6,
        }
    }
}

/// Per-panel load counters. A completion is applied only if it carries the
/// generation of the latest load started for its panel.
#[derive(Debug, Default)]
pub(crate) struct Generations([u64; 7]);

impl Generations {
    fn begin(&mut self, slot: Slot) -> u64 {
        let counter = self.0.get_mut(slot.index());
        counter.map_or(0, |current| {
            *current += 1;
            *current
        })
    }

    fn is_current(&self, slot: Slot, generation: u64) -> bool {
        self.0.get(slot.index()) == Some(&generation)
    }
}

/// Background work requested by a state transition.
#[derive(Debug)]
pub(crate) enum Job {
    Dashboard(u64),
    BinsAndZones(u64),
    BinDetails(u64, Bin),
    Routes(u64),
    RoutePickups(u64, RouteId),
    Overview(u64),
    Table(u64, Resource),
    SubmitComplaint(ComplaintForm),
    SubmitTicket(TicketForm),
}

/// Completion of a [`Job`].
#[derive(Debug)]
pub(crate) enum Message {
    Dashboard(u64, Result<DashboardSnapshot, PortError>),
    BinsAndZones(u64, Result<(Vec<Bin>, Vec<Zone>), PortError>),
    BinDetails(u64, Bin, Result<BinDetails, PortError>),
    Routes(u64, Result<Vec<Route>, PortError>),
    RoutePickups(u64, Result<Vec<RoutePickup>, PortError>),
    Overview(u64, Result<ComplaintsOverview, PortError>),
    Table(u64, Resource, Result<Vec<Row>, PortError>),
    ComplaintSubmitted(Result<Vec<Row>, SubmitError>),
    TicketSubmitted(Result<Vec<Row>, SubmitError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormStatus {
    Warning(String),
    Submitting,
    Created(&'static str),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    ComplaintBin,
    ComplaintUser,
    ComplaintType,
    ComplaintDescription,
    TicketBin,
    TicketStatus,
    TicketDescription,
    TicketCreatedBy,
    TicketAssignedTo,
}

impl FormField {
    const COMPLAINT: [FormField; 4] = [
        FormField::ComplaintBin,
        FormField::ComplaintUser,
        FormField::ComplaintType,
        FormField::ComplaintDescription,
    ];
    const TICKET: [FormField; 5] = [
        FormField::TicketBin,
        FormField::TicketStatus,
        FormField::TicketDescription,
        FormField::TicketCreatedBy,
        FormField::TicketAssignedTo,
    ];

    pub(crate) fn is_complaint(self) -> bool {
        FormField::COMPLAINT.contains(&self)
    }

    fn siblings(self) -> &'static [FormField] {
        if self.is_complaint() {
            &FormField::COMPLAINT
        } else {
            &FormField::TICKET
        }
    }

    pub(crate) fn next(self) -> FormField {
        let fields = self.siblings();
        let position = fields.iter().position(|field| *field == self).unwrap_or(0);
        fields
            .get((position + 1) % fields.len())
            .copied()
            .unwrap_or(self)
    }

    pub(crate) fn previous(self) -> FormField {
        let fields = self.siblings();
        let position = fields.iter().position(|field| *field == self).unwrap_or(0);
        fields
            .get((position + fields.len() - 1) % fields.len())
            .copied()
            .unwrap_or(self)
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            FormField::ComplaintBin | FormField::TicketBin => "Bin",
            FormField::ComplaintUser => "User ID",
            FormField::ComplaintType => "Type",
            FormField::ComplaintDescription | FormField::TicketDescription => "Description",
            FormField::TicketStatus => "Status",
            FormField::TicketCreatedBy => "Created by",
            FormField::TicketAssignedTo => "Assigned to",
        }
    }
}

#[derive(Debug)]
pub(crate) struct BinDetailsView {
    pub bin: Bin,
    pub details: BinDetails,
}

#[derive(Debug)]
pub(crate) struct TableView {
    pub resource: Resource,
    pub rows: Vec<Row>,
}

/// Whole application state, owned by the UI loop and mutated only there.
pub(crate) struct App {
    pub tab: Tab,
    generations: Generations,
    pub status_message: Option<String>,

    pub dashboard: Panel<DashboardSnapshot>,
    pub chart: Option<RouteChart>,

    pub bins: Vec<Bin>,
    pub zones: ZoneDirectory,
    pub bins_panel: Panel<()>,
    pub bin_types: Vec<String>,
    pub bin_filter: BinFilter,
    pub bin_list_index: usize,
    pub selected_bin_id: Option<BinId>,
    pub bin_details: Panel<BinDetailsView>,

    pub routes: RouteDirectory,
    pub routes_panel: Panel<()>,
    pub route_list_index: usize,
    pub active_route: Option<RouteId>,
    pending_route: Option<RouteId>,
    pub route_pickups: Panel<Vec<RoutePickup>>,

    pub overview: Panel<ComplaintsOverview>,
    pub complaint_form: ComplaintForm,
    pub ticket_form: TicketForm,
    pub complaint_status: Option<FormStatus>,
    pub ticket_status: Option<FormStatus>,
    pub focus: Option<FormField>,

    pub table_index: usize,
    pub table: Panel<TableView>,
}

const SELECT_BIN: &str = "Select a bin to view relationships.";
const SELECT_ROUTE: &str = "Select a route to view pickups.";

impl App {
    pub(crate) fn new() -> Self {
        Self {
            tab: Tab::Dashboard,
            generations: Generations::default(),
            status_message: None,
            dashboard: Panel::Loading,
            chart: None,
            bins: Vec::new(),
            zones: ZoneDirectory::default(),
            bins_panel: Panel::Idle("Open this tab to load bins."),
            bin_types: Vec::new(),
            bin_filter: BinFilter::default(),
            bin_list_index: 0,
            selected_bin_id: None,
            bin_details: Panel::Idle(SELECT_BIN),
            routes: RouteDirectory::default(),
            routes_panel: Panel::Idle("Open this tab to load routes."),
            route_list_index: 0,
            active_route: None,
            pending_route: None,
            route_pickups: Panel::Idle(SELECT_ROUTE),
            overview: Panel::Idle("Open this tab to load complaints and tickets."),
            complaint_form: ComplaintForm::default(),
            ticket_form: TicketForm::default(),
            complaint_status: None,
            ticket_status: None,
            focus: None,
            table_index: 0,
            table: Panel::Idle("Pick a table with ←/→ and press Enter."),
        }
    }

    /// Switch to `tab` and start its load.
    pub(crate) fn activate(&mut self, tab: Tab) -> Vec<Job> {
        self.tab = tab;
        self.focus = None;
        match tab {
            Tab::Dashboard => vec![self.load_dashboard()],
            Tab::Bins => vec![self.load_bins()],
            Tab::Routes => vec![self.load_routes()],
            Tab::Complaints => vec![self.load_overview()],
            Tab::Tables => Vec::new(),
        }
    }

    fn load_dashboard(&mut self) -> Job {
        self.dashboard = Panel::Loading;
        Job::Dashboard(self.generations.begin(Slot::Dashboard))
    }

    pub(crate) fn load_bins(&mut self) -> Job {
        self.bins_panel = Panel::Loading;
        self.bin_details = Panel::Idle(SELECT_BIN);
        self.generations.begin(Slot::BinDetails);
        Job::BinsAndZones(self.generations.begin(Slot::Bins))
    }

    fn load_routes(&mut self) -> Job {
        self.routes_panel = Panel::Loading;
        self.active_route = None;
        self.route_pickups = Panel::Idle(SELECT_ROUTE);
        self.generations.begin(Slot::RoutePickups);
        Job::Routes(self.generations.begin(Slot::Routes))
    }

    fn load_overview(&mut self) -> Job {
        self.overview = Panel::Loading;
        Job::Overview(self.generations.begin(Slot::Overview))
    }

    pub(crate) fn load_table(&mut self) -> Job {
        let resource = Resource::ALL
            .get(self.table_index)
            .copied()
            .unwrap_or(Resource::Bins);
        self.table = Panel::Loading;
        Job::Table(self.generations.begin(Slot::Table), resource)
    }

    pub(crate) fn cycle_table(&mut self, forward: bool) {
        let len = Resource::ALL.len();
        self.table_index = if forward {
            (self.table_index + 1) % len
        } else {
            (self.table_index + len - 1) % len
        };
    }

    /// Bins passing the current filter, in cache order.
    pub(crate) fn visible_bins(&self) -> Vec<&Bin> {
        self.bin_filter.apply(&self.bins)
    }

    /// Step the zone filter through `All zones` and every cached zone.
    pub(crate) fn cycle_zone_filter(&mut self) {
        let zones = self.zones.zones();
        self.bin_filter.zone = match self.bin_filter.zone {
            None => zones.first().map(|zone| zone.zone_id),
            Some(current) => zones
                .iter()
                .position(|zone| zone.zone_id == current)
                .and_then(|position| zones.get(position + 1))
                .map(|zone| zone.zone_id),
        };
        self.bin_list_index = 0;
    }

    /// Step the type filter through `All types` and every cached bin type.
    pub(crate) fn cycle_type_filter(&mut self) {
        self.bin_filter.bin_type = match self.bin_filter.bin_type.take() {
            None => self.bin_types.first().cloned(),
            Some(current) => self
                .bin_types
                .iter()
                .position(|bin_type| *bin_type == current)
                .and_then(|position| self.bin_types.get(position + 1))
                .cloned(),
        };
        self.bin_list_index = 0;
    }

    /// Select a bin: remember it for the forms and load its relationships.
    pub(crate) fn select_bin(&mut self, bin_id: BinId) -> Vec<Job> {
        let Some(bin) = self.bins.iter().find(|bin| bin.bin_id == bin_id).cloned() else {
            self.bin_details = Panel::Idle("Bin not found.");
            return Vec::new();
        };
        self.selected_bin_id = Some(bin_id);
        self.complaint_form.bin.select(bin_id);
        self.ticket_form.bin.select(bin_id);
        self.bin_details = Panel::Loading;
        vec![Job::BinDetails(
            self.generations.begin(Slot::BinDetails),
            bin,
        )]
    }

    pub(crate) fn select_bin_at_cursor(&mut self) -> Vec<Job> {
        let bin_id = self
            .visible_bins()
            .get(self.bin_list_index)
            .map(|bin| bin.bin_id);
        bin_id.map_or_else(Vec::new, |bin_id| self.select_bin(bin_id))
    }

    /// Select a route, loading the route list first when it is empty.
    pub(crate) fn select_route(&mut self, route_id: RouteId) -> Vec<Job> {
        if self.routes.is_empty() {
            self.pending_route = Some(route_id);
            let job = self.load_routes();
            return vec![job];
        }
        self.select_loaded_route(route_id)
    }

    /// Select a route from the loaded list; unknown ids are ignored.
    fn select_loaded_route(&mut self, route_id: RouteId) -> Vec<Job> {
        let Some(position) = self.routes.position(route_id) else {
            return Vec::new();
        };
        self.route_list_index = position;
        self.active_route = Some(route_id);
        self.route_pickups = Panel::Loading;
        vec![Job::RoutePickups(
            self.generations.begin(Slot::RoutePickups),
            route_id,
        )]
    }

    pub(crate) fn select_route_at_cursor(&mut self) -> Vec<Job> {
        let route_id = self
            .routes
            .routes()
            .get(self.route_list_index)
            .map(|route| route.route_id);
        route_id.map_or_else(Vec::new, |route_id| self.select_route(route_id))
    }

    pub(crate) fn submit_complaint(&mut self) -> Vec<Job> {
        match self.complaint_form.to_payload() {
            Err(err) => {
                self.complaint_status = Some(FormStatus::Warning(err.to_string()));
                Vec::new()
            }
            Ok(_) => {
                self.complaint_status = Some(FormStatus::Submitting);
                vec![Job::SubmitComplaint(self.complaint_form.clone())]
            }
        }
    }

    pub(crate) fn submit_ticket(&mut self) -> Vec<Job> {
        match self.ticket_form.to_payload() {
            Err(err) => {
                self.ticket_status = Some(FormStatus::Warning(err.to_string()));
                Vec::new()
            }
            Ok(_) => {
                self.ticket_status = Some(FormStatus::Submitting);
                vec![Job::SubmitTicket(self.ticket_form.clone())]
            }
        }
    }

    /// Loads that keep derived counts consistent after a submission.
    fn refresh_after_submit(&mut self) -> Vec<Job> {
        let mut jobs = vec![self.load_overview(), self.load_dashboard()];
        if let Some(bin_id) = self.selected_bin_id {
            jobs.extend(self.select_bin(bin_id));
        }
        jobs
    }

    /// Text field behind a form field; bin selectors have none.
    pub(crate) fn field_text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::ComplaintBin | FormField::TicketBin => None,
            FormField::ComplaintUser => Some(&mut self.complaint_form.user_id),
            FormField::ComplaintType => Some(&mut self.complaint_form.complaint_type),
            FormField::ComplaintDescription => Some(&mut self.complaint_form.description),
            FormField::TicketStatus => Some(&mut self.ticket_form.status),
            FormField::TicketDescription => Some(&mut self.ticket_form.description),
            FormField::TicketCreatedBy => Some(&mut self.ticket_form.created_by),
            FormField::TicketAssignedTo => Some(&mut self.ticket_form.assigned_to),
        }
    }

    /// Apply a finished job and return any follow-up jobs.
    pub(crate) fn apply(&mut self, message: Message) -> Vec<Job> {
        match message {
            Message::Dashboard(generation, result) => {
                if self.is_stale(Slot::Dashboard, generation) {
                    return Vec::new();
                }
                match result {
                    Ok(snapshot) => {
                        self.chart = Some(RouteChart::new(&snapshot.chart));
                        self.dashboard = Panel::Ready(snapshot);
                    }
                    Err(err) => self.dashboard = Panel::Failed(err.to_string()),
                }
                Vec::new()
            }
            Message::BinsAndZones(generation, result) => {
                if self.is_stale(Slot::Bins, generation) {
                    return Vec::new();
                }
                match result {
                    Ok((bins, zones)) => self.replace_bins(bins, zones),
                    Err(err) => self.bins_panel = Panel::Failed(err.to_string()),
                }
                Vec::new()
            }
            Message::BinDetails(generation, bin, result) => {
                if self.is_stale(Slot::BinDetails, generation) {
                    return Vec::new();
                }
                self.bin_details = match result {
                    Ok(details) => Panel::Ready(BinDetailsView { bin, details }),
                    Err(err) => Panel::Failed(err.to_string()),
                };
                Vec::new()
            }
            Message::Routes(generation, result) => {
                if self.is_stale(Slot::Routes, generation) {
                    return Vec::new();
                }
                match result {
                    Ok(routes) => {
                        self.routes = RouteDirectory::new(routes);
                        self.route_list_index = 0;
                        self.routes_panel = Panel::Ready(());
                        if let Some(route_id) = self.pending_route.take() {
                            return self.select_loaded_route(route_id);
                        }
                    }
                    Err(err) => {
                        self.pending_route = None;
                        self.routes_panel = Panel::Failed(err.to_string());
                    }
                }
                Vec::new()
            }
            Message::RoutePickups(generation, result) => {
                if self.is_stale(Slot::RoutePickups, generation) {
                    return Vec::new();
                }
                self.route_pickups = match result {
                    Ok(pickups) => Panel::Ready(pickups),
                    Err(err) => Panel::Failed(err.to_string()),
                };
                Vec::new()
            }
            Message::Overview(generation, result) => {
                if self.is_stale(Slot::Overview, generation) {
                    return Vec::new();
                }
                self.overview = match result {
                    Ok(overview) => Panel::Ready(overview),
                    Err(err) => Panel::Failed(err.to_string()),
                };
                Vec::new()
            }
            Message::Table(generation, resource, result) => {
                if self.is_stale(Slot::Table, generation) {
                    return Vec::new();
                }
                self.table = match result {
                    Ok(rows) => Panel::Ready(TableView { resource, rows }),
                    Err(err) => Panel::Failed(err.to_string()),
                };
                Vec::new()
            }
            Message::ComplaintSubmitted(result) => match result {
                Ok(_) => {
                    self.complaint_status = Some(FormStatus::Created("Complaint created."));
                    self.complaint_form.clear_description();
                    self.refresh_after_submit()
                }
                Err(err) => {
                    self.complaint_status = Some(FormStatus::Failed(err.to_string()));
                    Vec::new()
                }
            },
            Message::TicketSubmitted(result) => match result {
                Ok(_) => {
                    self.ticket_status = Some(FormStatus::Created("Ticket created."));
                    self.ticket_form.clear_description();
                    self.refresh_after_submit()
                }
                Err(err) => {
                    self.ticket_status = Some(FormStatus::Failed(err.to_string()));
                    Vec::new()
                }
            },
        }
    }

    fn is_stale(&self, slot: Slot, generation: u64) -> bool {
        let stale = !self.generations.is_current(slot, generation);
        if stale {
            debug!(?slot, generation, "discarding stale result");
        }
        stale
    }

    fn replace_bins(&mut self, bins: Vec<Bin>, zones: Vec<Zone>) {
        self.bin_types = bin_types(&bins);
        self.bins = bins;
        self.zones = ZoneDirectory::new(zones);
        self.bin_filter.zone = None;
        if let Some(current) = &self.bin_filter.bin_type
            && !self.bin_types.contains(current)
        {
            self.bin_filter.bin_type = None;
        }
        self.bin_list_index = 0;
        self.complaint_form
            .bin
            .populate(&self.bins, self.selected_bin_id);
        self.ticket_form
            .bin
            .populate(&self.bins, self.selected_bin_id);
        self.bins_panel = Panel::Ready(());
    }
}
