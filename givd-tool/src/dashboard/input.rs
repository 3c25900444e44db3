use crossterm::event::{Event, KeyCode, KeyEvent};

use super::app::{DashboardApp, Tab};

pub fn handle_event(app: &mut DashboardApp, event: Event) {
    if let Event::Key(key) = event {
        handle_key(app, key);
    }
}

fn handle_key(app: &mut DashboardApp, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            // Esc first dismisses a pending alert, then quits.
            if app.alert.is_some() {
                app.dismiss_alert();
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Tab => {
            app.toggle_tab();
        }
        KeyCode::Char('1') => {
            app.select_tab(Tab::Stock);
        }
        KeyCode::Char('2') => {
            app.select_tab(Tab::Stats);
        }
        KeyCode::Char('r') => {
            app.start_refresh();
        }
        KeyCode::Char('a') => {
            app.start_test_insert();
        }
        KeyCode::Up => {
            app.scroll_up();
        }
        KeyCode::Down => {
            app.scroll_down();
        }
        _ => {}
    }
}
