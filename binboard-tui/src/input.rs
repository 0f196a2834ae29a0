use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use binboard_core::model::RouteId;

use crate::app::{App, FormField, Job, Tab};

/// Route ids bound to the two route shortcut keys.
const ROUTE_SHORTCUTS: [(char, i64); 2] = [('1', 1), ('2', 2)];

#[derive(Debug)]
pub(crate) enum Action {
    None,
    Quit,
    /// Hand these jobs to the task runner
    Run(Vec<Job>),
}

impl From<Vec<Job>> for Action {
    fn from(jobs: Vec<Job>) -> Self {
        if jobs.is_empty() {
            Action::None
        } else {
            Action::Run(jobs)
        }
    }
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if let Some(field) = app.focus {
        return handle_form_key(key, field, app);
    }

    match key.code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Tab => return app.activate(app.tab.next()).into(),
        KeyCode::BackTab => return app.activate(app.tab.previous()).into(),
        KeyCode::F(number) => {
            let tab = usize::from(number)
                .checked_sub(1)
                .and_then(|position| Tab::ALL.get(position).copied());
            return tab.map_or(Action::None, |tab| app.activate(tab).into());
        }
        _ => {}
    }

    match app.tab {
        Tab::Dashboard => match key.code {
            KeyCode::Char('r') => app.activate(Tab::Dashboard).into(),
            _ => Action::None,
        },

        Tab::Bins => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                app.bin_list_index = app.bin_list_index.saturating_sub(1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.bin_list_index + 1 < app.visible_bins().len() {
                    app.bin_list_index += 1;
                }
                Action::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => app.select_bin_at_cursor().into(),
            KeyCode::Char('z') => {
                app.cycle_zone_filter();
                Action::None
            }
            KeyCode::Char('t') => {
                app.cycle_type_filter();
                Action::None
            }
            KeyCode::Char('r') => vec![app.load_bins()].into(),
            _ => Action::None,
        },

        Tab::Routes => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                app.route_list_index = app.route_list_index.saturating_sub(1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.route_list_index + 1 < app.routes.routes().len() {
                    app.route_list_index += 1;
                }
                Action::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => app.select_route_at_cursor().into(),
            KeyCode::Char('r') => app.activate(Tab::Routes).into(),
            KeyCode::Char(shortcut) => ROUTE_SHORTCUTS
                .iter()
                .find(|(bound, _)| *bound == shortcut)
                .map_or(Action::None, |(_, route_id)| {
                    app.select_route(RouteId(*route_id)).into()
                }),
            _ => Action::None,
        },

        Tab::Complaints => match key.code {
            KeyCode::Char('c') => {
                app.focus = Some(FormField::ComplaintBin);
                Action::None
            }
            KeyCode::Char('t') => {
                app.focus = Some(FormField::TicketBin);
                Action::None
            }
            KeyCode::Char('r') => app.activate(Tab::Complaints).into(),
            _ => Action::None,
        },

        Tab::Tables => match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                app.cycle_table(false);
                Action::None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                app.cycle_table(true);
                Action::None
            }
            KeyCode::Enter => vec![app.load_table()].into(),
            _ => Action::None,
        },
    }
}

fn handle_form_key(key: KeyEvent, field: FormField, app: &mut App) -> Action {
    match key.code {
        KeyCode::Esc => app.focus = None,
        KeyCode::Tab | KeyCode::Down => app.focus = Some(field.next()),
        KeyCode::BackTab | KeyCode::Up => app.focus = Some(field.previous()),
        KeyCode::Enter => {
            return if field.is_complaint() {
                app.submit_complaint().into()
            } else {
                app.submit_ticket().into()
            };
        }
        KeyCode::Left | KeyCode::Right => {
            let selector = match field {
                FormField::ComplaintBin => Some(&mut app.complaint_form.bin),
                FormField::TicketBin => Some(&mut app.ticket_form.bin),
                _ => None,
            };
            if let Some(selector) = selector {
                if key.code == KeyCode::Left {
                    selector.previous();
                } else {
                    selector.next();
                }
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = app.field_text_mut(field) {
                text.pop();
            }
        }
        KeyCode::Char(character)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            if let Some(text) = app.field_text_mut(field) {
                text.push(character);
            }
        }
        _ => {}
    }
    Action::None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn function_keys_activate_tabs() {
        let mut app = App::new();
        let action = handle_key_event(press(KeyCode::F(3)), &mut app);
        assert_eq!(app.tab, Tab::Routes);
        assert!(matches!(action, Action::Run(jobs) if jobs.len() == 1), "one load");
    }

    #[test]
    fn typing_q_in_a_form_does_not_quit() {
        let mut app = App::new();
        app.tab = Tab::Complaints;
        handle_key_event(press(KeyCode::Char('c')), &mut app);
        handle_key_event(press(KeyCode::Tab), &mut app);
        handle_key_event(press(KeyCode::Tab), &mut app);
        handle_key_event(press(KeyCode::Tab), &mut app);
        let action = handle_key_event(press(KeyCode::Char('q')), &mut app);

        assert!(matches!(action, Action::None), "typed, not quit");
        assert_eq!(app.complaint_form.description, "q");

        handle_key_event(press(KeyCode::Esc), &mut app);
        assert!(
            matches!(handle_key_event(press(KeyCode::Char('q')), &mut app), Action::Quit),
            "quits outside forms"
        );
    }

    #[test]
    fn enter_on_empty_ticket_form_only_warns() {
        let mut app = App::new();
        app.tab = Tab::Complaints;
        handle_key_event(press(KeyCode::Char('t')), &mut app);
        let action = handle_key_event(press(KeyCode::Enter), &mut app);
        assert!(matches!(action, Action::None), "no job");
        assert!(app.ticket_status.is_some(), "warning set");
    }

    #[test]
    fn route_shortcut_on_cold_cache_loads_routes() {
        let mut app = App::new();
        app.tab = Tab::Routes;
        let action = handle_key_event(press(KeyCode::Char('2')), &mut app);
        assert!(
            matches!(action, Action::Run(jobs) if matches!(jobs.as_slice(), [Job::Routes(_)])),
            "routes first"
        );
    }
}
