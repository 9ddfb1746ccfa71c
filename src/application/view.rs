//! Render state derived from the cache, the create dialog and the
//! mutation coordinator.
//!
//! Everything here is a pure function of current state; the presentation
//! layer only draws what these functions return.

use super::cache::CacheEntry;
use super::dialog::CreateDialog;
use super::errors::FetchFailure;
use super::mutations::{Command, MutationCoordinator, MutationKind};
use crate::domain::{RecordId, Subject, Teacher, TeacherPatch};

/// Number of skeleton cards drawn while either list is loading.
pub const PLACEHOLDER_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum ListView<'a> {
    Loading { placeholders: usize },
    Failed(&'a FetchFailure),
    Empty,
    Populated(Vec<TeacherCard<'a>>),
}

/// One teacher as shown in the list, with the subjects it can be associated with.
#[derive(Debug, Clone, PartialEq)]
pub struct TeacherCard<'a> {
    pub teacher: &'a Teacher,
    pub subjects: &'a [Subject],
}

impl<'a> TeacherCard<'a> {
    pub fn id(&self) -> &'a RecordId {
        &self.teacher.id
    }

    pub fn subject_names(&self) -> Vec<&'a str> {
        self.teacher.subject_names(self.subjects)
    }

    pub fn on_delete(&self) -> Command {
        Command::delete(self.id())
    }

    pub fn on_update(&self, patch: TeacherPatch) -> Command {
        Command::update(self.id(), patch)
    }
}

/// Loading wins over everything, then failures, then the empty notice.
pub fn list_view<'a>(teachers: &'a CacheEntry<Teacher>, subjects: &'a CacheEntry<Subject>) -> ListView<'a> {
    if teachers.is_pending() || subjects.is_pending() {
        return ListView::Loading {
            placeholders: PLACEHOLDER_COUNT,
        };
    }
    if let Some(failure) = teachers.error().or_else(|| subjects.error()) {
        return ListView::Failed(failure);
    }

    match (teachers.data(), subjects.data()) {
        (Some([]), Some(_)) => ListView::Empty,
        (Some(teachers), Some(subjects)) => ListView::Populated(
            teachers
                .iter()
                .map(|teacher| TeacherCard { teacher, subjects })
                .collect(),
        ),
        // Neither pending nor failed means both are ready.
        _ => ListView::Empty,
    }
}

/// The create trigger needs the subjects list loaded, and the dialog closed.
pub fn create_trigger_disabled(dialog: &CreateDialog, subjects: &CacheEntry<Subject>) -> bool {
    dialog.is_open() || !subjects.is_ready()
}

/// State of the create dialog as rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDialogView<'a> {
    pub is_open: bool,
    pub is_submitting: bool,
    /// `None` when the subjects fetch failed.
    pub subjects: Option<&'a [Subject]>,
}

/// The dialog exists once the subjects fetch has been attempted, whether or
/// not it succeeded. This is deliberately looser than the trigger gate.
pub fn create_dialog_view<'a>(
    dialog: &CreateDialog,
    subjects: &'a CacheEntry<Subject>,
    mutations: &MutationCoordinator,
) -> Option<CreateDialogView<'a>> {
    subjects.is_fetched().then(|| CreateDialogView {
        is_open: dialog.is_open(),
        is_submitting: mutations.is_pending(MutationKind::Create),
        subjects: subjects.data(),
    })
}
