use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque identifier assigned by the backend.
///
/// Backends differ in whether they hand out numeric or string keys, so both
/// are accepted and serialized back in the form they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    /// Attributes this screen does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subject {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_subject_refs")]
    pub subjects: Vec<RecordId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Teacher {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subjects: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_subjects(mut self, subjects: Vec<RecordId>) -> Self {
        self.subjects = subjects;
        self
    }

    /// Resolves the associated subject ids against the fetched subjects list.
    ///
    /// Ids that are not present in `subjects` are skipped, and the order
    /// follows the teacher's own association order.
    pub fn subject_names<'a>(&self, subjects: &'a [Subject]) -> Vec<&'a str> {
        self.subjects
            .iter()
            .filter_map(|id| subjects.iter().find(|s| &s.id == id))
            .map(|s| s.name.as_str())
            .collect()
    }
}

/// Payload for creating a teacher that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeacherDraft {
    pub name: String,
    pub subjects: Vec<RecordId>,
}

impl TeacherDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subjects: Vec::new(),
        }
    }
}

/// Partial update for an existing teacher; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeacherPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<RecordId>>,
}

impl TeacherPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            subjects: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.subjects.is_none()
    }

    pub fn apply_to(&self, teacher: &mut Teacher) {
        if let Some(name) = &self.name {
            teacher.name = name.clone();
        }
        if let Some(subjects) = &self.subjects {
            teacher.subjects = subjects.clone();
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SubjectRef {
    Id(RecordId),
    Embedded { id: RecordId },
}

fn deserialize_subject_refs<'de, D>(deserializer: D) -> Result<Vec<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Option::<Vec<SubjectRef>>::deserialize(deserializer)?;
    Ok(refs
        .unwrap_or_default()
        .into_iter()
        .map(|r| match r {
            SubjectRef::Id(id) | SubjectRef::Embedded { id } => id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_teacher_accepts_embedded_subjects() {
        let teacher: Teacher = serde_json::from_value(json!({
            "id": 5,
            "name": "Olena",
            "subjects": [{ "id": 1, "name": "Math" }, 2],
            "email": "olena@example.com"
        }))
        .unwrap();

        assert_eq!(teacher.id, RecordId::Number(5));
        assert_eq!(teacher.subjects, vec![RecordId::Number(1), RecordId::Number(2)]);
        assert_eq!(teacher.extra.get("email"), Some(&json!("olena@example.com")));
    }

    #[test]
    fn test_teacher_with_null_subjects() {
        let teacher: Teacher =
            serde_json::from_value(json!({ "id": "a1", "name": "Ivan", "subjects": null })).unwrap();
        assert_eq!(teacher.id, RecordId::from("a1"));
        assert!(teacher.subjects.is_empty());
    }

    #[test]
    fn test_extra_attributes_survive_serialization() {
        let teacher: Teacher =
            serde_json::from_value(json!({ "id": 3, "name": "Ivan", "room": "204" })).unwrap();
        let value = serde_json::to_value(&teacher).unwrap();
        assert_eq!(value["room"], json!("204"));
        assert_eq!(value["subjects"], json!([]));
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = TeacherPatch::name("B");
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "name": "B" }));
        assert!(TeacherPatch::default().is_empty());
    }

    #[test]
    fn test_patch_apply() {
        let mut teacher = Teacher::new(5u64, "A").with_subjects(vec![1u64.into()]);
        TeacherPatch {
            name: None,
            subjects: Some(vec![2u64.into(), 3u64.into()]),
        }
        .apply_to(&mut teacher);

        assert_eq!(teacher.name, "A");
        assert_eq!(teacher.subjects, vec![RecordId::Number(2), RecordId::Number(3)]);
    }

    #[test]
    fn test_subject_names_follow_association_order() {
        let subjects = vec![Subject::new(1u64, "Math"), Subject::new(2u64, "History")];
        let teacher = Teacher::new(1u64, "A").with_subjects(vec![2u64.into(), 9u64.into(), 1u64.into()]);
        assert_eq!(teacher.subject_names(&subjects), vec!["History", "Math"]);
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::from(42u64).to_string(), "42");
        assert_eq!(RecordId::from("abc").to_string(), "abc");
    }
}
