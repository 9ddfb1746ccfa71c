use crate::application::{App, AppMode, FormFocus, TeacherForm};
use crate::presentation::ui::GRID_COLUMNS;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

/// What a form key press asks the surrounding dialog to do.
#[derive(Debug, PartialEq, Eq)]
enum FormAction {
    None,
    Submit,
    Cancel,
}

impl InputHandler {
    /// Routes a key press. Returns `true` when the user asked to quit.
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            return true;
        }

        if app.create_dialog.is_open() {
            Self::handle_create_dialog(app, key);
            return false;
        }

        match app.mode {
            AppMode::Browsing => return Self::handle_browsing_mode(app, key),
            AppMode::Editing(_) => Self::handle_edit_dialog(app, key),
            AppMode::ConfirmDelete { .. } => Self::handle_confirm_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
        false
    }

    fn handle_browsing_mode(app: &mut App, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char('n') => app.open_create_dialog(),
            KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),
            KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
            KeyCode::Char('r') => app.refresh(),
            KeyCode::Char('?') | KeyCode::F(1) => app.show_help(),
            KeyCode::Right | KeyCode::Char('l') => app.select_next(),
            KeyCode::Left | KeyCode::Char('h') => app.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.select_by(GRID_COLUMNS as isize),
            KeyCode::Up | KeyCode::Char('k') => app.select_by(-(GRID_COLUMNS as isize)),
            KeyCode::Esc => app.status_message = None,
            _ => {}
        }
        false
    }

    fn handle_create_dialog(app: &mut App, key: KeyCode) {
        let subjects = app.queries.subjects().data().unwrap_or(&[]);
        match Self::handle_form_key(&mut app.create_dialog.form, subjects, key) {
            FormAction::Submit => app.submit_create(),
            FormAction::Cancel => app.close_create_dialog(),
            FormAction::None => {}
        }
    }

    fn handle_edit_dialog(app: &mut App, key: KeyCode) {
        let subjects = app.queries.subjects().data().unwrap_or(&[]);
        let AppMode::Editing(dialog) = &mut app.mode else {
            return;
        };
        match Self::handle_form_key(&mut dialog.form, subjects, key) {
            FormAction::Submit => app.submit_edit(),
            FormAction::Cancel => app.cancel_edit(),
            FormAction::None => {}
        }
    }

    fn handle_form_key(form: &mut TeacherForm, subjects: &[crate::domain::Subject], key: KeyCode) -> FormAction {
        match key {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::BackTab => form.toggle_focus(),
            _ => match form.focus {
                FormFocus::Name => match key {
                    KeyCode::Char(c) => form.insert_char(c),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Left => form.move_left(),
                    KeyCode::Right => form.move_right(),
                    KeyCode::Down => form.toggle_focus(),
                    _ => {}
                },
                FormFocus::Subjects => match key {
                    KeyCode::Char(' ') | KeyCode::Char('x') => form.toggle_subject(subjects),
                    KeyCode::Down | KeyCode::Char('j') => form.next_subject(subjects.len()),
                    KeyCode::Up | KeyCode::Char('k') if form.subject_cursor == 0 => form.toggle_focus(),
                    KeyCode::Up | KeyCode::Char('k') => form.previous_subject(),
                    _ => {}
                },
            },
        }
        FormAction::None
    }

    fn handle_confirm_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::F(1)) {
            app.close_help();
        }
    }
}
