//! Teachers Admin - terminal console for managing teacher records
//!
//! Lists teachers from a REST backend, creates, edits and deletes them, and
//! associates them with subjects.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use application::{
    App, AppMode, Command, FetchFailure, ListView, MutationCoordinator, MutationFailure, MutationKind,
    QueryClient, QueryKey, TeacherCard,
};
pub use domain::{ApiError, ApiResult, RecordId, Subject, Teacher, TeacherApi, TeacherDraft, TeacherPatch};

#[cfg(test)]
mod tests {
    #[test]
    fn test_root_exports_name_one_item_each() {
        let teacher = crate::Teacher::new(1u64, "Ada");
        assert_eq!(teacher.id, crate::RecordId::Number(1));
        assert_eq!(crate::QueryKey::Teachers.as_str(), "teachers");
        assert_eq!(crate::MutationKind::Create.to_string(), "create");
        let _: fn(&crate::ApiError) -> String = crate::ApiError::user_message;
        let _: Option<&crate::FetchFailure> = None;
    }
}
