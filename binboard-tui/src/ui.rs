use binboard_core::{
    Resource, TICKET_DETAIL_PREFIX, TICKET_LIST_PREFIX, cell, route_title, sanitize, truncate,
    model::{Complaint, MaintTicket, RoutePickup},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap},
};
use serde_json::Value;

use crate::app::{App, FormField, FormStatus, Panel, Tab};

const ERROR_COLOR: Color = Color::LightRed;
const MUTED_COLOR: Color = Color::DarkGray;

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: tabs, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(idx, tab)| format!("F{} {}", idx + 1, tab.title()));
    let selected = Tab::ALL.iter().position(|tab| *tab == app.tab).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("binboard · waste operations"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, *header_area);

    match app.tab {
        Tab::Dashboard => draw_dashboard(frame, app, *content_area),
        Tab::Bins => draw_bins(frame, app, *content_area),
        Tab::Routes => draw_routes(frame, app, *content_area),
        Tab::Complaints => draw_complaints(frame, app, *content_area),
        Tab::Tables => draw_tables(frame, app, *content_area),
    }

    let nav_hint = if app.focus.is_some() {
        "Type to edit · Tab/↑/↓ next field · ←/→ pick bin · Enter submit · Esc leave form"
    } else {
        match app.tab {
            Tab::Dashboard => "r refresh · Tab/F1-F5 switch · q quit",
            Tab::Bins => "↑/↓ move · Enter open bin · z zone · t type · r refresh · q quit",
            Tab::Routes => "↑/↓ move · Enter open route · 1/2 route shortcuts · r refresh · q quit",
            Tab::Complaints => "c new complaint · t new ticket · r refresh · q quit",
            Tab::Tables => "←/→ pick table · Enter load · q quit",
        }
    };

    let (status_text, status_style) = match &app.status_message {
        Some(msg) => (
            format!("{} · {nav_hint}", sanitize(msg)),
            Style::default().fg(ERROR_COLOR),
        ),
        None => (nav_hint.to_owned(), Style::default()),
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn bordered(title: impl Into<Line<'static>>) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title)
}

/// Paragraph for a panel that has no rows to show.
fn panel_note<T>(panel: &Panel<T>, block: Block<'static>) -> Option<Paragraph<'static>> {
    let (text, style) = match panel {
        Panel::Ready(_) => return None,
        Panel::Idle(msg) => ((*msg).to_owned(), Style::default().fg(MUTED_COLOR)),
        Panel::Loading => ("Loading…".to_owned(), Style::default().fg(Color::Yellow)),
        Panel::Failed(msg) => (sanitize(msg).into_owned(), Style::default().fg(ERROR_COLOR)),
    };
    Some(
        Paragraph::new(text)
            .style(style)
            .block(block)
            .wrap(Wrap { trim: true }),
    )
}

fn muted(text: &'static str, block: Block<'static>) -> Paragraph<'static> {
    Paragraph::new(text)
        .style(Style::default().fg(MUTED_COLOR))
        .block(block)
}

fn header_row(columns: &[&'static str]) -> Row<'static> {
    Row::new(columns.iter().copied().map(Cell::from).collect::<Vec<_>>())
        .style(Style::default().add_modifier(Modifier::BOLD))
}

fn status_style(status: &str) -> Style {
    match status {
        "OPEN" => Style::default().fg(Color::Yellow),
        "ACTIVE" | "DONE" | "COMPLETED" | "CLOSED" | "RESOLVED" => {
            Style::default().fg(Color::Green)
        }
        _ => Style::default(),
    }
}

fn pickup_row(pickup: &RoutePickup, with_weight: bool) -> Row<'static> {
    let mut cells = vec![
        Cell::from(pickup.pickup_id.to_string()),
        Cell::from(pickup.bin_id.to_string()),
        Cell::from(cell(pickup.truck_id)),
        Cell::from(sanitize(&pickup.status).into_owned()).style(status_style(&pickup.status)),
        Cell::from(sanitize(&cell(pickup.scheduled_time.as_ref())).into_owned()),
        Cell::from(cell(pickup.actual_time)),
    ];
    if with_weight {
        cells.push(Cell::from(cell(pickup.weight_kg)));
    }
    Row::new(cells)
}

fn complaint_line(complaint: &Complaint) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("#{}", complaint.complaint_id),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " - {}: {}",
            sanitize(&complaint.complaint_type),
            sanitize(&complaint.description)
        )),
        Span::styled(
            format!("  Bin {} · ", complaint.bin_id),
            Style::default().fg(MUTED_COLOR),
        ),
        Span::styled(
            sanitize(&complaint.status).into_owned(),
            status_style(&complaint.status),
        ),
    ])
}

fn ticket_line(ticket: &MaintTicket, prefix: usize) -> Line<'static> {
    let description = sanitize(&ticket.issue_desc);
    Line::from(vec![
        Span::styled(
            format!("#{}", ticket.ticket_id),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" - {}", truncate(&description, prefix))),
        Span::styled(
            format!("  Bin {} · ", ticket.bin_id),
            Style::default().fg(MUTED_COLOR),
        ),
        Span::styled(
            sanitize(&ticket.status).into_owned(),
            status_style(&ticket.status),
        ),
    ])
}

fn draw_dashboard(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let [metrics_area, chart_area, lists_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Percentage(45),
        Constraint::Min(0),
    ])
    .areas(area);

    let metrics = match &app.dashboard {
        Panel::Ready(snapshot) => [
            snapshot.metrics.total_bins.to_string(),
            snapshot.metrics.active_bins.to_string(),
            snapshot.metrics.open_complaints.to_string(),
            snapshot.metrics.open_tickets.to_string(),
        ],
        _ => ["-", "-", "-", "-"].map(str::to_owned),
    };
    let titles = ["Total bins", "Active bins", "Open complaints", "Open tickets"];
    let metric_areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(metrics_area);
    for ((title, value), metric_area) in titles.iter().zip(metrics).zip(metric_areas.iter()) {
        let widget = Paragraph::new(value)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(bordered(*title));
        frame.render_widget(widget, *metric_area);
    }

    if let Some(chart) = &app.chart {
        chart.render(frame, chart_area);
    }

    let [pickups_area, complaints_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .areas(lists_area);

    let pickups_block = bordered("Recent pickups");
    let complaints_block = bordered("Recent complaints");

    let snapshot = match &app.dashboard {
        Panel::Ready(snapshot) => snapshot,
        other => {
            if let Some(note) = panel_note(other, pickups_block) {
                frame.render_widget(note, pickups_area);
            }
            if let Some(note) = panel_note(other, complaints_block) {
                frame.render_widget(note, complaints_area);
            }
            return;
        }
    };

    if snapshot.recent_pickups.is_empty() {
        frame.render_widget(muted("No pickups yet.", pickups_block), pickups_area);
    } else {
        let rows = snapshot
            .recent_pickups
            .iter()
            .map(|pickup| pickup_row(pickup, false));
        let table = Table::new(
            rows,
            [
                Constraint::Length(9),
                Constraint::Length(5),
                Constraint::Length(6),
                Constraint::Length(10),
                Constraint::Length(16),
                Constraint::Min(16),
            ],
        )
        .header(header_row(&[
            "Pickup", "Bin", "Truck", "Status", "Scheduled", "Actual",
        ]))
        .block(pickups_block);
        frame.render_widget(table, pickups_area);
    }

    if snapshot.recent_complaints.is_empty() {
        frame.render_widget(muted("No complaints yet.", complaints_block), complaints_area);
    } else {
        let items: Vec<ListItem<'_>> = snapshot
            .recent_complaints
            .iter()
            .map(|complaint| ListItem::new(complaint_line(complaint)))
            .collect();
        frame.render_widget(List::new(items).block(complaints_block), complaints_area);
    }
}

fn draw_bins(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let [list_area, details_area] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(area);

    let zone_label = app
        .bin_filter
        .zone
        .map_or_else(|| "All zones".to_owned(), |zone| app.zones.label(Some(zone)));
    let type_label = app.bin_filter.bin_type.as_deref().unwrap_or("All types");
    let list_block = bordered(format!(
        "Bins · zone: {} · type: {}",
        sanitize(&zone_label),
        sanitize(type_label)
    ));

    if let Some(note) = panel_note(&app.bins_panel, list_block.clone()) {
        frame.render_widget(note, list_area);
    } else {
        let visible = app.visible_bins();
        if visible.is_empty() {
            frame.render_widget(muted("No bins found.", list_block), list_area);
        } else {
            let items: Vec<ListItem<'_>> = visible
                .iter()
                .map(|bin| {
                    let marker = if app.selected_bin_id == Some(bin.bin_id) {
                        "● "
                    } else {
                        "  "
                    };
                    ListItem::new(Line::from(vec![
                        Span::raw(marker),
                        Span::styled(
                            format!("Bin #{}", bin.bin_id),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!(" · {}", sanitize(&bin.bin_type))),
                        Span::styled(
                            format!(
                                "  Zone: {} · Status: {}",
                                sanitize(&app.zones.label(bin.zone_id)),
                                sanitize(&bin.status)
                            ),
                            Style::default().fg(MUTED_COLOR),
                        ),
                    ]))
                })
                .collect();
            let list = List::new(items)
                .block(list_block)
                .highlight_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                );
            let mut state = ListState::default();
            state.select(Some(app.bin_list_index));
            frame.render_stateful_widget(list, list_area, &mut state);
        }
    }

    let details_block = bordered("Bin details");
    let view = match &app.bin_details {
        Panel::Ready(view) => view,
        other => {
            if let Some(note) = panel_note(other, details_block) {
                frame.render_widget(note, details_area);
            }
            return;
        }
    };

    let bin = &view.bin;
    let details = &view.details;
    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ))
    };
    let empty = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(MUTED_COLOR)));

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Bin #{} ({})", bin.bin_id, sanitize(&bin.bin_type)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Zone: {} · Status: {}",
            sanitize(&app.zones.label(bin.zone_id)),
            sanitize(&bin.status)
        )),
        Line::from(format!(
            "Location: {}, {}",
            cell(bin.latitude),
            cell(bin.longitude)
        )),
        Line::default(),
        heading("IoT devices"),
    ];

    if details.devices.is_empty() {
        lines.push(empty("No devices linked."));
    }
    lines.extend(details.devices.iter().map(|device| {
        Line::from(format!(
            "Device #{} · {} ({})",
            device.device_id,
            sanitize(&device.device_serial),
            sanitize(&device.status)
        ))
    }));

    lines.push(heading("Recent complaints"));
    if details.complaints.is_empty() {
        lines.push(empty("No complaints."));
    }
    lines.extend(details.complaints.iter().map(complaint_line));

    lines.push(heading("Maintenance tickets"));
    if details.tickets.is_empty() {
        lines.push(empty("No tickets."));
    }
    lines.extend(
        details
            .tickets
            .iter()
            .map(|ticket| ticket_line(ticket, TICKET_DETAIL_PREFIX)),
    );

    lines.push(heading("Recent pickups"));
    if details.pickups.is_empty() {
        lines.push(empty("No pickups."));
    }
    lines.extend(details.pickups.iter().map(|pickup| {
        let route = pickup
            .route_id
            .map_or_else(|| "-".to_owned(), |route_id| route_id.to_string());
        Line::from(format!(
            "Pickup #{} · Route {route} · Status {}",
            pickup.pickup_id,
            sanitize(&pickup.status)
        ))
    }));

    let paragraph = Paragraph::new(lines)
        .block(details_block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, details_area);
}

fn draw_routes(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let [list_area, pickups_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(area);

    let list_block = bordered("Routes");
    if let Some(note) = panel_note(&app.routes_panel, list_block.clone()) {
        frame.render_widget(note, list_area);
    } else if app.routes.is_empty() {
        frame.render_widget(muted("No routes defined.", list_block), list_area);
    } else {
        let items: Vec<ListItem<'_>> = app
            .routes
            .routes()
            .iter()
            .map(|route| {
                let active = app.active_route == Some(route.route_id);
                let title_style = if active {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                let zone = route
                    .zone_id
                    .map_or_else(|| "-".to_owned(), |zone| zone.to_string());
                let days = route
                    .scheduled_days
                    .as_deref()
                    .filter(|days| !days.is_empty())
                    .unwrap_or("-");
                let avg = route
                    .avg_time_min
                    .map_or_else(|| "-".to_owned(), |minutes| minutes.to_string());
                ListItem::new(vec![
                    Line::from(Span::styled(
                        format!(
                            "{}{}",
                            if active { "● " } else { "" },
                            sanitize(&route_title(route))
                        ),
                        title_style,
                    )),
                    Line::from(Span::styled(
                        format!(
                            "  Zone {zone} · Days: {} · Avg time: {avg} min",
                            sanitize(days)
                        ),
                        Style::default().fg(MUTED_COLOR),
                    )),
                ])
            })
            .collect();
        let list = List::new(items)
            .block(list_block)
            .highlight_style(Style::default().fg(Color::Yellow));
        let mut state = ListState::default();
        state.select(Some(app.route_list_index));
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    let title = app.active_route.map_or_else(
        || "Route pickups".to_owned(),
        |route_id| format!("Pickups for {}", sanitize(&app.routes.label(route_id))),
    );
    let pickups_block = bordered(title);
    let pickups = match &app.route_pickups {
        Panel::Ready(pickups) => pickups,
        other => {
            if let Some(note) = panel_note(other, pickups_block) {
                frame.render_widget(note, pickups_area);
            }
            return;
        }
    };

    if pickups.is_empty() {
        frame.render_widget(muted("No pickups for this route.", pickups_block), pickups_area);
        return;
    }

    let rows = pickups.iter().map(|pickup| pickup_row(pickup, true));
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Min(11),
        ],
    )
    .header(header_row(&[
        "ID",
        "Bin",
        "Truck",
        "Status",
        "Scheduled",
        "Actual",
        "Weight (kg)",
    ]))
    .block(pickups_block);
    frame.render_widget(table, pickups_area);
}

fn draw_complaints(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let [lists_area, forms_area] =
        Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
    let [complaints_area, tickets_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(lists_area);

    let complaints_block = bordered("Complaints (latest 20)");
    let tickets_block = bordered("Maintenance tickets (latest 20)");
    match &app.overview {
        Panel::Ready(overview) => {
            if overview.complaints.is_empty() {
                frame.render_widget(muted("No complaints.", complaints_block), complaints_area);
            } else {
                let items: Vec<ListItem<'_>> = overview
                    .complaints
                    .iter()
                    .map(|complaint| ListItem::new(complaint_line(complaint)))
                    .collect();
                frame.render_widget(List::new(items).block(complaints_block), complaints_area);
            }
            if overview.tickets.is_empty() {
                frame.render_widget(muted("No tickets.", tickets_block), tickets_area);
            } else {
                let items: Vec<ListItem<'_>> = overview
                    .tickets
                    .iter()
                    .map(|ticket| ListItem::new(ticket_line(ticket, TICKET_LIST_PREFIX)))
                    .collect();
                frame.render_widget(List::new(items).block(tickets_block), tickets_area);
            }
        }
        other => {
            if let Some(note) = panel_note(other, complaints_block) {
                frame.render_widget(note, complaints_area);
            }
            if let Some(note) = panel_note(other, tickets_block) {
                frame.render_widget(note, tickets_area);
            }
        }
    }

    let [complaint_form_area, ticket_form_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(forms_area);

    let complaint_fields = [
        (FormField::ComplaintBin, app.complaint_form.bin.label()),
        (FormField::ComplaintUser, app.complaint_form.user_id.as_str()),
        (
            FormField::ComplaintType,
            app.complaint_form.complaint_type.as_str(),
        ),
        (
            FormField::ComplaintDescription,
            app.complaint_form.description.as_str(),
        ),
    ];
    draw_form(
        frame,
        complaint_form_area,
        "New complaint (c)",
        &complaint_fields,
        app.focus,
        app.complaint_status.as_ref(),
    );

    let ticket_fields = [
        (FormField::TicketBin, app.ticket_form.bin.label()),
        (FormField::TicketStatus, app.ticket_form.status.as_str()),
        (
            FormField::TicketDescription,
            app.ticket_form.description.as_str(),
        ),
        (FormField::TicketCreatedBy, app.ticket_form.created_by.as_str()),
        (
            FormField::TicketAssignedTo,
            app.ticket_form.assigned_to.as_str(),
        ),
    ];
    draw_form(
        frame,
        ticket_form_area,
        "New maintenance ticket (t)",
        &ticket_fields,
        app.focus,
        app.ticket_status.as_ref(),
    );
}

fn draw_form(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &'static str,
    fields: &[(FormField, &str)],
    focus: Option<FormField>,
    status: Option<&FormStatus>,
) {
    let mut lines: Vec<Line<'_>> = fields
        .iter()
        .map(|(field, value)| {
            let focused = focus == Some(*field);
            let label_style = if focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(MUTED_COLOR)
            };
            let shown = match field {
                FormField::ComplaintBin | FormField::TicketBin => format!("< {value} >"),
                _ if focused => format!("{value}▏"),
                _ => (*value).to_owned(),
            };
            Line::from(vec![
                Span::styled(format!("{:>12}: ", field.label()), label_style),
                Span::raw(sanitize(&shown).into_owned()),
            ])
        })
        .collect();

    if let Some(status) = status {
        let (text, color) = match status {
            FormStatus::Warning(msg) => (msg.clone(), Color::Yellow),
            FormStatus::Submitting => ("Submitting…".to_owned(), MUTED_COLOR),
            FormStatus::Created(msg) => ((*msg).to_owned(), Color::Green),
            FormStatus::Failed(msg) => (sanitize(msg).into_owned(), ERROR_COLOR),
        };
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
    }

    let border_style = if focus.is_some_and(|field| fields.iter().any(|(own, _)| *own == field)) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let paragraph = Paragraph::new(lines)
        .block(bordered(title).border_style(border_style))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_tables(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let [picker_area, table_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let names: Vec<Span<'_>> = Resource::ALL
        .iter()
        .enumerate()
        .map(|(idx, resource)| {
            let style = if idx == app.table_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default()
            };
            Span::styled(format!(" {resource} "), style)
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(names)).block(bordered("Table (←/→, Enter to load)")),
        picker_area,
    );

    let view = match &app.table {
        Panel::Ready(view) => view,
        other => {
            if let Some(note) = panel_note(other, bordered("Rows")) {
                frame.render_widget(note, table_area);
            }
            return;
        }
    };

    let block = bordered(format!("Table: {}", view.resource));
    let Some(Value::Object(first)) = view.rows.first() else {
        frame.render_widget(muted("No rows found.", block), table_area);
        return;
    };

    let columns: Vec<String> = first.keys().cloned().collect();
    let header = Row::new(
        columns
            .iter()
            .map(|column| Cell::from(sanitize(column).into_owned()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = view.rows.iter().map(|row| {
        Row::new(
            columns
                .iter()
                .map(|column| Cell::from(table_value(row.get(column))))
                .collect::<Vec<_>>(),
        )
    });
    let widths = vec![Constraint::Fill(1); columns.len()];
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, table_area);
}

/// Cell text for a raw JSON value; null and missing render empty.
fn table_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => sanitize(text).into_owned(),
        Some(other) => sanitize(&other.to_string()).into_owned(),
    }
}
