//! In-memory backend used by unit tests.

use crate::domain::{ApiError, ApiResult, RecordId, Subject, Teacher, TeacherApi, TeacherDraft, TeacherPatch};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeOp {
    FetchTeachers,
    FetchSubjects,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
struct FakeState {
    teachers: Vec<Teacher>,
    subjects: Vec<Subject>,
    next_id: u64,
    failing: HashSet<FakeOp>,
    calls: HashMap<FakeOp, usize>,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new(teachers: Vec<Teacher>, subjects: Vec<Subject>) -> Self {
        let next_id = teachers
            .iter()
            .filter_map(|t| match t.id {
                RecordId::Number(n) => Some(n),
                RecordId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            state: Mutex::new(FakeState {
                teachers,
                subjects,
                next_id,
                ..FakeState::default()
            }),
        }
    }

    pub fn fail(&self, op: FakeOp) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn recover(&self, op: FakeOp) {
        self.state.lock().unwrap().failing.remove(&op);
    }

    pub fn calls(&self, op: FakeOp) -> usize {
        self.state.lock().unwrap().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn teachers(&self) -> Vec<Teacher> {
        self.state.lock().unwrap().teachers.clone()
    }

    fn enter(&self, op: FakeOp) -> ApiResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(op).or_insert(0) += 1;
        if state.failing.contains(&op) {
            return Err(ApiError::Status {
                status: 500,
                message: format!("{:?} rejected", op),
            });
        }
        Ok(state)
    }
}

fn not_found(id: &RecordId) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("teacher {} not found", id),
    }
}

impl TeacherApi for FakeApi {
    fn fetch_teachers(&self) -> ApiResult<Vec<Teacher>> {
        Ok(self.enter(FakeOp::FetchTeachers)?.teachers.clone())
    }

    fn fetch_subjects(&self) -> ApiResult<Vec<Subject>> {
        Ok(self.enter(FakeOp::FetchSubjects)?.subjects.clone())
    }

    fn create_teacher(&self, draft: &TeacherDraft) -> ApiResult<()> {
        let mut state = self.enter(FakeOp::Create)?;
        let teacher = Teacher::new(state.next_id, draft.name.clone()).with_subjects(draft.subjects.clone());
        state.next_id += 1;
        state.teachers.push(teacher);
        Ok(())
    }

    fn update_teacher(&self, id: &RecordId, patch: &TeacherPatch) -> ApiResult<()> {
        let mut state = self.enter(FakeOp::Update)?;
        let teacher = state
            .teachers
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| not_found(id))?;
        patch.apply_to(teacher);
        Ok(())
    }

    fn delete_teacher(&self, id: &RecordId) -> ApiResult<()> {
        let mut state = self.enter(FakeOp::Delete)?;
        let before = state.teachers.len();
        state.teachers.retain(|t| &t.id != id);
        if state.teachers.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}
