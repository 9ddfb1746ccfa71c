//! Application state for the Teachers console.
//!
//! `App` owns the query cache, the mutation coordinator and the transient UI
//! state (dialogs, selection, status line). Completions coming back from
//! worker threads are applied here, on the UI thread.

use super::cache::{QueryClient, QueryKey};
use super::dialog::{CreateDialog, EditDialog};
use super::mutations::{Command, MutationCoordinator, MutationKind};
use super::runtime::{Completion, Executor};
use super::view::{self, CreateDialogView, ListView, TeacherCard};
use crate::domain::TeacherApi;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

/// Represents the current mode of the application.
///
/// The create dialog is tracked separately by [`CreateDialog`] since its
/// open flag is part of the mutation contract.
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    /// Browsing the list of teacher cards
    Browsing,
    /// Editing the selected teacher in a popup
    Editing(EditDialog),
    /// Waiting for the user to confirm deletion of a teacher
    ConfirmDelete { command: Command, name: String },
    /// Help screen is displayed
    Help,
}

pub struct App {
    pub queries: QueryClient,
    pub mutations: MutationCoordinator,
    pub create_dialog: CreateDialog,
    pub mode: AppMode,
    /// Index of the selected card in the populated list
    pub selected: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
}

impl App {
    /// Builds the screen and starts loading both lists.
    pub fn new(api: Arc<dyn TeacherApi>, executor: Rc<dyn Executor>) -> Self {
        let mut app = Self {
            queries: QueryClient::new(Arc::clone(&api), Rc::clone(&executor)),
            mutations: MutationCoordinator::new(api, executor),
            create_dialog: CreateDialog::default(),
            mode: AppMode::Browsing,
            selected: 0,
            status_message: None,
        };
        app.queries.fetch(QueryKey::Teachers);
        app.queries.fetch(QueryKey::Subjects);
        app
    }

    pub fn list_view(&self) -> ListView<'_> {
        view::list_view(self.queries.teachers(), self.queries.subjects())
    }

    pub fn create_trigger_disabled(&self) -> bool {
        view::create_trigger_disabled(&self.create_dialog, self.queries.subjects())
    }

    pub fn create_dialog_view(&self) -> Option<CreateDialogView<'_>> {
        view::create_dialog_view(&self.create_dialog, self.queries.subjects(), &self.mutations)
    }

    /// The card under the selection cursor, if the list is populated.
    pub fn selected_card(&self) -> Option<TeacherCard<'_>> {
        match self.list_view() {
            ListView::Populated(cards) => {
                let index = self.selected.min(cards.len().saturating_sub(1));
                cards.into_iter().nth(index)
            }
            _ => None,
        }
    }

    fn teacher_count(&self) -> usize {
        self.queries.teachers().data().map_or(0, |t| t.len())
    }

    pub fn select_next(&mut self) {
        let count = self.teacher_count();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Moves the selection by a whole grid row.
    pub fn select_by(&mut self, delta: isize) {
        let count = self.teacher_count();
        if count == 0 {
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, count as isize - 1) as usize;
    }

    pub fn open_create_dialog(&mut self) {
        if self.create_trigger_disabled() {
            return;
        }
        self.status_message = None;
        self.create_dialog.open();
    }

    pub fn close_create_dialog(&mut self) {
        self.create_dialog.close();
    }

    /// Sends the create form. Ignored while a create is already in flight.
    pub fn submit_create(&mut self) {
        if !self.create_dialog.is_open() || self.mutations.is_pending(MutationKind::Create) {
            return;
        }
        let draft = self.create_dialog.form.to_draft();
        self.mutations.create(draft);
    }

    pub fn start_edit(&mut self) {
        let Some(card) = self.selected_card() else {
            return;
        };
        let dialog = EditDialog::new(card.teacher);
        self.status_message = None;
        self.mode = AppMode::Editing(dialog);
    }

    /// Dispatches the edit as a partial update and closes the popup.
    pub fn submit_edit(&mut self) {
        let AppMode::Editing(dialog) = std::mem::replace(&mut self.mode, AppMode::Browsing) else {
            return;
        };
        let patch = dialog.patch();
        if patch.is_empty() {
            debug!(id = %dialog.teacher.id, "edit without changes");
            return;
        }
        self.mutations.dispatch(Command::update(&dialog.teacher.id, patch));
    }

    pub fn cancel_edit(&mut self) {
        if matches!(self.mode, AppMode::Editing(_)) {
            self.mode = AppMode::Browsing;
        }
    }

    pub fn request_delete(&mut self) {
        let Some(card) = self.selected_card() else {
            return;
        };
        let (command, name) = (card.on_delete(), card.teacher.name.clone());
        self.mode = AppMode::ConfirmDelete { command, name };
    }

    pub fn confirm_delete(&mut self) {
        if let AppMode::ConfirmDelete { command, .. } = std::mem::replace(&mut self.mode, AppMode::Browsing) {
            self.mutations.dispatch(command);
        }
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.mode, AppMode::ConfirmDelete { .. }) {
            self.mode = AppMode::Browsing;
        }
    }

    /// Reloads both lists on request.
    pub fn refresh(&mut self) {
        self.status_message = None;
        self.queries.invalidate(QueryKey::Teachers);
        self.queries.invalidate(QueryKey::Subjects);
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
    }

    pub fn close_help(&mut self) {
        if self.mode == AppMode::Help {
            self.mode = AppMode::Browsing;
        }
    }

    /// Applies a finished backend call.
    pub fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Query(result) => {
                self.queries.settle(result);
                if let Some(teachers) = self.queries.teachers().data() {
                    self.selected = self.selected.min(teachers.len().saturating_sub(1));
                }
            }
            Completion::Mutation(result) => {
                match self
                    .mutations
                    .settle(result, &mut self.queries, &mut self.create_dialog)
                {
                    Ok(kind) => {
                        self.status_message = Some(match kind {
                            MutationKind::Create => "Teacher created".to_string(),
                            MutationKind::Update => "Teacher updated".to_string(),
                            MutationKind::Delete => "Teacher deleted".to_string(),
                        });
                    }
                    Err(failure) => self.status_message = Some(failure.user_message()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::runtime::QueuedExecutor;
    use crate::application::view::PLACEHOLDER_COUNT;
    use crate::domain::{RecordId, Subject, Teacher};
    use crate::infrastructure::fake::{FakeApi, FakeOp};

    fn app_with(teachers: Vec<Teacher>) -> (Arc<FakeApi>, Rc<QueuedExecutor>, App) {
        let api = Arc::new(FakeApi::new(teachers, vec![Subject::new(1u64, "Math")]));
        let executor = Rc::new(QueuedExecutor::default());
        let app = App::new(api.clone(), executor.clone());
        (api, executor, app)
    }

    fn settle(executor: &QueuedExecutor, app: &mut App) {
        while let Some(completion) = executor.run_next() {
            app.handle_completion(completion);
        }
    }

    fn names(app: &App) -> Vec<String> {
        app.queries.teachers().data().unwrap().iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn test_new_app_starts_loading() {
        let (_, executor, app) = app_with(Vec::new());
        assert_eq!(executor.pending(), 2);
        assert_eq!(app.list_view(), ListView::Loading { placeholders: PLACEHOLDER_COUNT });
        assert!(app.create_trigger_disabled());
        assert!(app.create_dialog_view().is_none());
        assert_eq!(app.mode, AppMode::Browsing);
    }

    #[test]
    fn test_open_create_dialog_requires_subjects() {
        let (_, executor, mut app) = app_with(Vec::new());
        app.open_create_dialog();
        assert!(!app.create_dialog.is_open());

        settle(&executor, &mut app);
        app.open_create_dialog();
        assert!(app.create_dialog.is_open());
        assert!(app.create_trigger_disabled());
    }

    #[test]
    fn test_create_flow() {
        let (_, executor, mut app) = app_with(Vec::new());
        settle(&executor, &mut app);
        assert_eq!(app.list_view(), ListView::Empty);

        app.open_create_dialog();
        app.create_dialog.form.insert_char('A');
        app.submit_create();
        app.submit_create();
        assert_eq!(executor.pending(), 1);
        assert!(app.create_dialog_view().unwrap().is_submitting);

        settle(&executor, &mut app);
        assert!(!app.create_dialog.is_open());
        assert_eq!(names(&app), vec!["A"]);
        assert_eq!(app.status_message.as_deref(), Some("Teacher created"));
    }

    #[test]
    fn test_create_failure_keeps_dialog_and_reports() {
        let (api, executor, mut app) = app_with(Vec::new());
        settle(&executor, &mut app);
        api.fail(FakeOp::Create);

        app.open_create_dialog();
        app.create_dialog.form.insert_char('A');
        app.submit_create();
        settle(&executor, &mut app);

        assert!(app.create_dialog.is_open());
        assert_eq!(app.create_dialog.form.name, "A");
        assert!(app.status_message.as_deref().unwrap().starts_with("Could not create teacher"));
        assert_eq!(api.calls(FakeOp::FetchTeachers), 1);

        // The user can retry from the same dialog.
        api.recover(FakeOp::Create);
        app.submit_create();
        settle(&executor, &mut app);
        assert!(!app.create_dialog.is_open());
        assert_eq!(names(&app), vec!["A"]);
    }

    #[test]
    fn test_edit_flow_sends_partial_update() {
        let (_, executor, mut app) = app_with(vec![Teacher::new(5u64, "A"), Teacher::new(6u64, "C")]);
        settle(&executor, &mut app);

        app.start_edit();
        let AppMode::Editing(dialog) = &mut app.mode else {
            panic!("expected edit mode");
        };
        dialog.form.backspace();
        dialog.form.insert_char('B');
        app.submit_edit();
        assert_eq!(app.mode, AppMode::Browsing);

        settle(&executor, &mut app);
        assert_eq!(names(&app), vec!["B", "C"]);
        assert_eq!(app.status_message.as_deref(), Some("Teacher updated"));
    }

    #[test]
    fn test_edit_without_changes_sends_nothing() {
        let (api, executor, mut app) = app_with(vec![Teacher::new(5u64, "A")]);
        settle(&executor, &mut app);
        app.start_edit();
        app.submit_edit();
        assert_eq!(executor.pending(), 0);
        assert_eq!(api.calls(FakeOp::Update), 0);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (api, executor, mut app) = app_with(vec![Teacher::new(1u64, "A"), Teacher::new(2u64, "B")]);
        settle(&executor, &mut app);
        app.select_next();

        app.request_delete();
        assert_eq!(
            app.mode,
            AppMode::ConfirmDelete {
                command: Command::Delete(RecordId::Number(2)),
                name: "B".to_string(),
            }
        );
        app.cancel_delete();
        assert_eq!(executor.pending(), 0);

        app.request_delete();
        app.confirm_delete();
        settle(&executor, &mut app);
        assert_eq!(api.calls(FakeOp::Delete), 1);
        assert_eq!(names(&app), vec!["A"]);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_delete_failure_keeps_record() {
        let (api, executor, mut app) = app_with(vec![Teacher::new(1u64, "A")]);
        settle(&executor, &mut app);
        api.fail(FakeOp::Delete);

        app.request_delete();
        app.confirm_delete();
        settle(&executor, &mut app);
        assert_eq!(names(&app), vec!["A"]);
        assert!(app.status_message.as_deref().unwrap().starts_with("Could not delete teacher"));
    }

    #[test]
    fn test_selection_is_clamped() {
        let (_, executor, mut app) = app_with(vec![Teacher::new(1u64, "A"), Teacher::new(2u64, "B"), Teacher::new(3u64, "C")]);
        settle(&executor, &mut app);
        app.select_by(2);
        assert_eq!(app.selected, 2);
        app.select_by(2);
        assert_eq!(app.selected, 2);
        app.select_by(-5);
        assert_eq!(app.selected, 0);
        app.select_previous();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_refresh_invalidates_both_lists() {
        let (api, executor, mut app) = app_with(Vec::new());
        settle(&executor, &mut app);
        app.refresh();
        assert_eq!(app.list_view(), ListView::Loading { placeholders: PLACEHOLDER_COUNT });
        settle(&executor, &mut app);
        assert_eq!(api.calls(FakeOp::FetchTeachers), 2);
        assert_eq!(api.calls(FakeOp::FetchSubjects), 2);
    }

    #[test]
    fn test_no_card_actions_while_loading() {
        let (_, executor, mut app) = app_with(vec![Teacher::new(1u64, "A")]);
        app.start_edit();
        app.request_delete();
        assert_eq!(app.mode, AppMode::Browsing);
        assert_eq!(executor.pending(), 2);
    }
}
