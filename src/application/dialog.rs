//! Form state for the create and edit popups.

use crate::domain::{RecordId, Subject, Teacher, TeacherDraft, TeacherPatch};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormFocus {
    #[default]
    Name,
    Subjects,
}

/// Editable teacher fields: a name line and a subject checklist.
///
/// The cursor counts characters, not bytes, so non-ASCII names edit
/// correctly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherForm {
    pub name: String,
    cursor: usize,
    selected: Vec<RecordId>,
    pub focus: FormFocus,
    pub subject_cursor: usize,
}

impl TeacherForm {
    pub fn from_teacher(teacher: &Teacher) -> Self {
        Self {
            name: teacher.name.clone(),
            cursor: teacher.name.chars().count(),
            selected: teacher.subjects.clone(),
            ..Self::default()
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> &[RecordId] {
        &self.selected
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selected.contains(id)
    }

    fn byte_index(&self) -> usize {
        self.name
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.name.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.name.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.name.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.name.chars().count());
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormFocus::Name => FormFocus::Subjects,
            FormFocus::Subjects => FormFocus::Name,
        };
    }

    pub fn next_subject(&mut self, subject_count: usize) {
        if subject_count > 0 {
            self.subject_cursor = (self.subject_cursor + 1).min(subject_count - 1);
        }
    }

    pub fn previous_subject(&mut self) {
        self.subject_cursor = self.subject_cursor.saturating_sub(1);
    }

    /// Toggles the subject under the checklist cursor.
    pub fn toggle_subject(&mut self, subjects: &[Subject]) {
        let Some(subject) = subjects.get(self.subject_cursor) else {
            return;
        };
        if let Some(pos) = self.selected.iter().position(|id| id == &subject.id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(subject.id.clone());
        }
    }

    pub fn to_draft(&self) -> TeacherDraft {
        TeacherDraft {
            name: self.name.trim().to_string(),
            subjects: self.selected.clone(),
        }
    }

    /// Builds a patch holding only the fields that differ from `original`.
    pub fn to_patch(&self, original: &Teacher) -> TeacherPatch {
        let name = self.name.trim();
        let before: HashSet<_> = original.subjects.iter().collect();
        let after: HashSet<_> = self.selected.iter().collect();

        TeacherPatch {
            name: (name != original.name).then(|| name.to_string()),
            subjects: (before != after).then(|| self.selected.clone()),
        }
    }
}

/// The "create teacher" popup.
#[derive(Debug, Default)]
pub struct CreateDialog {
    open: bool,
    pub form: TeacherForm,
}

impl CreateDialog {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens with an empty form.
    pub fn open(&mut self) {
        self.open = true;
        self.form = TeacherForm::default();
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

/// The edit popup of a single teacher card.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDialog {
    pub teacher: Teacher,
    pub form: TeacherForm,
}

impl EditDialog {
    pub fn new(teacher: &Teacher) -> Self {
        Self {
            teacher: teacher.clone(),
            form: TeacherForm::from_teacher(teacher),
        }
    }

    pub fn patch(&self) -> TeacherPatch {
        self.form.to_patch(&self.teacher)
    }
}
