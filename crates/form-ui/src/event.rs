//! Event handling for the terminal form.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode, Tab};

/// Poll for the next terminal event, if any arrives within the timeout.
pub fn poll_event(timeout: Duration) -> anyhow::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle keyboard events.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Global shortcuts (work in all modes)
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('q') if app.input_mode == InputMode::Normal => {
            app.should_quit = true;
            return;
        }
        _ => {}
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => app.tab = app.tab.next(),
        KeyCode::Char('1') => app.tab = Tab::Form,
        KeyCode::Char('2') => app.tab = Tab::Evaluation,
        _ => {
            if app.tab == Tab::Form {
                handle_form_keys(app, key);
            }
        }
    }
}

fn handle_form_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.previous_field(),
        KeyCode::Down | KeyCode::Char('j') => app.next_field(),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => app.cycle_choice(),
        KeyCode::Enter | KeyCode::Char('e') => {
            if app.selected_is_numeric() {
                app.input_mode = InputMode::Editing;
            } else {
                app.cycle_choice();
            }
        }
        KeyCode::Char('p') => app.predict(),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_store::ArtifactState;

    fn app() -> App {
        App::new(
            ArtifactState::Degraded {
                reason: "missing".to_string(),
            },
            None,
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits_in_normal_mode_only() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = self::app();
        app.input_mode = InputMode::Editing;
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);
    }

    #[test]
    fn enter_on_a_numeric_field_starts_editing() {
        let mut app = app();
        app.selected = 0;
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Editing);

        handle_key_event(&mut app, key(KeyCode::Char('5')));
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.fields[0].display(), "40005");
    }

    #[test]
    fn enter_on_a_choice_field_cycles_it() {
        let mut app = app();
        app.selected = 5; // mainroad
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.fields[5].display(), "no");
    }

    #[test]
    fn tab_switches_between_form_and_evaluation() {
        let mut app = app();
        assert_eq!(app.tab, Tab::Form);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Evaluation);
        handle_key_event(&mut app, key(KeyCode::Char('1')));
        assert_eq!(app.tab, Tab::Form);
    }
}
