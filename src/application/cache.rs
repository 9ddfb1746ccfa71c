//! Read-through cache of the remote teachers and subjects lists.
//!
//! Each list lives under a typed [`QueryKey`]. An entry is pending from the
//! moment a fetch cycle starts until that cycle settles into ready or error.
//! Settled results are applied in arrival order; there is no cancellation,
//! so a slow request can still land after a newer invalidation.

use super::errors::FetchFailure;
use super::runtime::{Completion, Executor};
use crate::domain::{ApiResult, Subject, Teacher, TeacherApi};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Teachers,
    Subjects,
}

impl QueryKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            QueryKey::Teachers => "teachers",
            QueryKey::Subjects => "subjects",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Pending,
    Ready,
    Error,
}

/// Data only exists in the `Ready` variant.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Pending,
    Ready(Vec<T>),
    Failed(FetchFailure),
}

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    state: QueryState<T>,
    in_flight: usize,
    settled: usize,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            state: QueryState::Pending,
            in_flight: 0,
            settled: 0,
        }
    }
}

impl<T> CacheEntry<T> {
    pub fn state(&self) -> &QueryState<T> {
        &self.state
    }

    pub fn status(&self) -> QueryStatus {
        match self.state {
            QueryState::Pending => QueryStatus::Pending,
            QueryState::Ready(_) => QueryStatus::Ready,
            QueryState::Failed(_) => QueryStatus::Error,
        }
    }

    pub fn data(&self) -> Option<&[T]> {
        match &self.state {
            QueryState::Ready(items) => Some(items),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchFailure> {
        match &self.state {
            QueryState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, QueryState::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, QueryState::Ready(_))
    }

    /// Whether any fetch for this entry has settled, successfully or not.
    pub fn is_fetched(&self) -> bool {
        self.settled > 0
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight > 0
    }

    fn begin(&mut self) {
        self.state = QueryState::Pending;
        self.in_flight += 1;
    }

    fn settle(&mut self, result: Result<Vec<T>, FetchFailure>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.settled += 1;
        self.state = match result {
            Ok(items) => QueryState::Ready(items),
            Err(failure) => QueryState::Failed(failure),
        };
    }
}

/// Raw outcome of a list fetch, produced on a worker thread.
#[derive(Debug)]
pub enum QueryResult {
    Teachers(ApiResult<Vec<Teacher>>),
    Subjects(ApiResult<Vec<Subject>>),
}

impl QueryResult {
    pub fn key(&self) -> QueryKey {
        match self {
            QueryResult::Teachers(_) => QueryKey::Teachers,
            QueryResult::Subjects(_) => QueryKey::Subjects,
        }
    }
}

/// The screen's cache of remote lists.
///
/// It is the only writer of its entries; everything else reads them and
/// asks for fetches or invalidations.
pub struct QueryClient {
    api: Arc<dyn TeacherApi>,
    executor: Rc<dyn Executor>,
    teachers: CacheEntry<Teacher>,
    subjects: CacheEntry<Subject>,
}

impl QueryClient {
    pub fn new(api: Arc<dyn TeacherApi>, executor: Rc<dyn Executor>) -> Self {
        Self {
            api,
            executor,
            teachers: CacheEntry::default(),
            subjects: CacheEntry::default(),
        }
    }

    pub fn teachers(&self) -> &CacheEntry<Teacher> {
        &self.teachers
    }

    pub fn subjects(&self) -> &CacheEntry<Subject> {
        &self.subjects
    }

    pub fn status(&self, key: QueryKey) -> QueryStatus {
        match key {
            QueryKey::Teachers => self.teachers.status(),
            QueryKey::Subjects => self.subjects.status(),
        }
    }

    pub fn is_fetched(&self, key: QueryKey) -> bool {
        match key {
            QueryKey::Teachers => self.teachers.is_fetched(),
            QueryKey::Subjects => self.subjects.is_fetched(),
        }
    }

    pub fn is_fetching(&self, key: QueryKey) -> bool {
        match key {
            QueryKey::Teachers => self.teachers.is_fetching(),
            QueryKey::Subjects => self.subjects.is_fetching(),
        }
    }

    /// Starts a fetch unless one is already outstanding for `key`.
    ///
    /// Returns `true` when a new request was issued; callers that find a
    /// request in flight share its eventual result.
    pub fn fetch(&mut self, key: QueryKey) -> bool {
        if self.is_fetching(key) {
            debug!(%key, "fetch already in flight");
            return false;
        }
        self.start(key);
        true
    }

    /// Marks `key` stale and always schedules a new request for it.
    pub fn invalidate(&mut self, key: QueryKey) {
        info!(%key, "invalidating");
        self.start(key);
    }

    /// Applies a finished fetch. Runs on the UI thread.
    pub fn settle(&mut self, result: QueryResult) {
        let key = result.key();
        let failure = |cause| FetchFailure { key, cause };

        match result {
            QueryResult::Teachers(result) => {
                log_settled(key, &result);
                self.teachers.settle(result.map_err(failure));
            }
            QueryResult::Subjects(result) => {
                log_settled(key, &result);
                self.subjects.settle(result.map_err(failure));
            }
        }
    }

    fn start(&mut self, key: QueryKey) {
        match key {
            QueryKey::Teachers => self.teachers.begin(),
            QueryKey::Subjects => self.subjects.begin(),
        }

        debug!(%key, "fetch started");
        let api = Arc::clone(&self.api);
        self.executor.execute(Box::new(move || {
            Completion::Query(match key {
                QueryKey::Teachers => QueryResult::Teachers(api.fetch_teachers()),
                QueryKey::Subjects => QueryResult::Subjects(api.fetch_subjects()),
            })
        }));
    }
}

fn log_settled<T>(key: QueryKey, result: &ApiResult<Vec<T>>) {
    match result {
        Ok(items) => debug!(%key, count = items.len(), "fetch settled"),
        Err(err) => warn!(%key, error = %err, "fetch failed"),
    }
}
