//! Create, update and delete against the backend.
//!
//! Nothing is written locally ahead of the backend: a mutation only
//! invalidates the teachers list once the backend has confirmed it.

use super::cache::{QueryClient, QueryKey};
use super::dialog::CreateDialog;
use super::errors::MutationFailure;
use super::runtime::{Completion, Executor};
use crate::domain::{ApiResult, RecordId, TeacherApi, TeacherDraft, TeacherPatch};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        })
    }
}

/// A mutation request, built from plain data so each card's actions can be
/// produced and checked without any UI around them.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create(TeacherDraft),
    Update { id: RecordId, patch: TeacherPatch },
    Delete(RecordId),
}

impl Command {
    pub fn create(draft: TeacherDraft) -> Self {
        Command::Create(draft)
    }

    pub fn update(id: &RecordId, patch: TeacherPatch) -> Self {
        Command::Update {
            id: id.clone(),
            patch,
        }
    }

    pub fn delete(id: &RecordId) -> Self {
        Command::Delete(id.clone())
    }

    pub fn kind(&self) -> MutationKind {
        match self {
            Command::Create(_) => MutationKind::Create,
            Command::Update { .. } => MutationKind::Update,
            Command::Delete(_) => MutationKind::Delete,
        }
    }

    pub fn target(&self) -> Option<&RecordId> {
        match self {
            Command::Create(_) => None,
            Command::Update { id, .. } | Command::Delete(id) => Some(id),
        }
    }

    fn run(&self, api: &dyn TeacherApi) -> ApiResult<()> {
        match self {
            Command::Create(draft) => api.create_teacher(draft),
            Command::Update { id, patch } => api.update_teacher(id, patch),
            Command::Delete(id) => api.delete_teacher(id),
        }
    }
}

/// Outcome of a mutation, produced on a worker thread.
#[derive(Debug)]
pub struct MutationResult {
    pub kind: MutationKind,
    pub target: Option<RecordId>,
    pub outcome: ApiResult<()>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(MutationFailure),
}

impl MutationStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, MutationStatus::Failed(_))
    }
}

#[derive(Debug, Default)]
struct MutationSlot {
    in_flight: usize,
    last: MutationStatus,
}

impl MutationSlot {
    fn status(&self) -> MutationStatus {
        if self.in_flight > 0 {
            MutationStatus::Pending
        } else {
            self.last.clone()
        }
    }
}

pub struct MutationCoordinator {
    api: Arc<dyn TeacherApi>,
    executor: Rc<dyn Executor>,
    create: MutationSlot,
    update: MutationSlot,
    delete: MutationSlot,
}

impl MutationCoordinator {
    pub fn new(api: Arc<dyn TeacherApi>, executor: Rc<dyn Executor>) -> Self {
        Self {
            api,
            executor,
            create: MutationSlot::default(),
            update: MutationSlot::default(),
            delete: MutationSlot::default(),
        }
    }

    pub fn status(&self, kind: MutationKind) -> MutationStatus {
        self.slot(kind).status()
    }

    pub fn is_pending(&self, kind: MutationKind) -> bool {
        self.slot(kind).in_flight > 0
    }

    pub fn create(&mut self, draft: TeacherDraft) {
        self.dispatch(Command::create(draft));
    }

    pub fn update(&mut self, id: &RecordId, patch: TeacherPatch) {
        self.dispatch(Command::update(id, patch));
    }

    pub fn delete(&mut self, id: &RecordId) {
        self.dispatch(Command::delete(id));
    }

    /// Sends `command` to the backend. The result arrives later as a
    /// [`Completion::Mutation`] to be passed to [`Self::settle`].
    pub fn dispatch(&mut self, command: Command) {
        let kind = command.kind();
        let target = command.target().cloned();
        info!(%kind, target = ?target, "dispatching mutation");

        self.slot_mut(kind).in_flight += 1;
        let api = Arc::clone(&self.api);
        self.executor.execute(Box::new(move || {
            Completion::Mutation(MutationResult {
                kind,
                target,
                outcome: command.run(api.as_ref()),
            })
        }));
    }

    /// Applies a finished mutation.
    ///
    /// On success a create closes `dialog` first, then every kind
    /// invalidates the teachers list. Failures leave the dialog and the
    /// cache as they were and are handed back to the caller.
    pub fn settle(
        &mut self,
        result: MutationResult,
        queries: &mut QueryClient,
        dialog: &mut CreateDialog,
    ) -> Result<MutationKind, MutationFailure> {
        let MutationResult {
            kind,
            target,
            outcome,
        } = result;
        let slot = self.slot_mut(kind);
        slot.in_flight = slot.in_flight.saturating_sub(1);

        match outcome {
            Ok(()) => {
                info!(%kind, target = ?target, "mutation confirmed");
                slot.last = MutationStatus::Succeeded;
                if kind == MutationKind::Create {
                    dialog.close();
                }
                queries.invalidate(QueryKey::Teachers);
                Ok(kind)
            }
            Err(cause) => {
                warn!(%kind, target = ?target, error = %cause, "mutation rejected");
                let failure = MutationFailure { kind, cause };
                slot.last = MutationStatus::Failed(failure.clone());
                Err(failure)
            }
        }
    }

    fn slot(&self, kind: MutationKind) -> &MutationSlot {
        match kind {
            MutationKind::Create => &self.create,
            MutationKind::Update => &self.update,
            MutationKind::Delete => &self.delete,
        }
    }

    fn slot_mut(&mut self, kind: MutationKind) -> &mut MutationSlot {
        match kind {
            MutationKind::Create => &mut self.create,
            MutationKind::Update => &mut self.update,
            MutationKind::Delete => &mut self.delete,
        }
    }
}
