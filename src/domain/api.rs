//! Backend contract consumed by the Teachers screen.

use super::errors::ApiResult;
use super::models::{RecordId, Subject, Teacher, TeacherDraft, TeacherPatch};

/// Remote CRUD operations for teachers plus the read-only subjects list.
///
/// Calls are blocking; the application layer runs them on worker threads
/// so the UI loop never waits on the network.
pub trait TeacherApi: Send + Sync {
    fn fetch_teachers(&self) -> ApiResult<Vec<Teacher>>;

    fn fetch_subjects(&self) -> ApiResult<Vec<Subject>>;

    /// Any success response counts; the list is refetched afterwards, so the
    /// body is not read.
    fn create_teacher(&self, draft: &TeacherDraft) -> ApiResult<()>;

    fn update_teacher(&self, id: &RecordId, patch: &TeacherPatch) -> ApiResult<()>;

    fn delete_teacher(&self, id: &RecordId) -> ApiResult<()>;
}
