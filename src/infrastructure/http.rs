use crate::domain::{ApiError, ApiResult, RecordId, Subject, Teacher, TeacherApi, TeacherDraft, TeacherPatch};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

/// JSON-over-HTTP binding of [`TeacherApi`].
///
/// Every path is resolved against `base_url`, e.g. `http://host/api` gives
/// `http://host/api/teachers/5` for teacher 5.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("teachers-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn teacher_endpoint(&self, id: &RecordId) -> String {
        self.endpoint(&format!("teachers/{}", id))
    }

    fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send()?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "backend responded");

        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().unwrap_or_default();
            Err(ApiError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request)?;
        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl TeacherApi for HttpApi {
    fn fetch_teachers(&self) -> ApiResult<Vec<Teacher>> {
        self.send_json(self.client.get(self.endpoint("teachers")))
    }

    fn fetch_subjects(&self) -> ApiResult<Vec<Subject>> {
        self.send_json(self.client.get(self.endpoint("subjects")))
    }

    fn create_teacher(&self, draft: &TeacherDraft) -> ApiResult<()> {
        self.send(self.client.post(self.endpoint("teachers")).json(draft))?;
        Ok(())
    }

    fn update_teacher(&self, id: &RecordId, patch: &TeacherPatch) -> ApiResult<()> {
        self.send(self.client.patch(self.teacher_endpoint(id)).json(patch))?;
        Ok(())
    }

    fn delete_teacher(&self, id: &RecordId) -> ApiResult<()> {
        self.send(self.client.delete(self.teacher_endpoint(id)))?;
        Ok(())
    }
}
