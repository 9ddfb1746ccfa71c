//! Execution of backend calls off the UI thread.
//!
//! Work is handed to an [`Executor`] as a boxed job. The job performs the
//! blocking call and yields a [`Completion`], which travels back to the UI
//! loop and is applied there. Only the UI thread ever touches cache or
//! mutation state.

use super::cache::QueryResult;
use super::mutations::MutationResult;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::warn;

/// Result of a finished backend call, waiting to be applied on the UI thread.
#[derive(Debug)]
pub enum Completion {
    Query(QueryResult),
    Mutation(MutationResult),
}

pub type Job = Box<dyn FnOnce() -> Completion + Send + 'static>;

pub trait Executor {
    fn execute(&self, job: Job);
}

/// Runs each job on its own thread and forwards the completion over a channel.
pub struct ThreadExecutor {
    completions: Sender<Completion>,
}

impl ThreadExecutor {
    pub fn new() -> (Self, Receiver<Completion>) {
        let (tx, rx) = mpsc::channel();
        (Self { completions: tx }, rx)
    }
}

impl Executor for ThreadExecutor {
    fn execute(&self, job: Job) {
        let tx = self.completions.clone();
        thread::spawn(move || {
            if tx.send(job()).is_err() {
                warn!("completion dropped, UI loop has exited");
            }
        });
    }
}

#[cfg(test)]
pub use queued::QueuedExecutor;


#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache::QueryResult;

    #[test]
    fn test_thread_executor_delivers_completion() {
        let (executor, completions) = ThreadExecutor::new();
        executor.execute(Box::new(|| Completion::Query(QueryResult::Subjects(Ok(Vec::new())))));

        let completion = completions
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        assert!(matches!(
            completion,
            Completion::Query(QueryResult::Subjects(Ok(ref subjects))) if subjects.is_empty()
        ));
    }

    #[test]
    fn test_queued_executor_defers_jobs() {
        let executor = QueuedExecutor::default();
        executor.execute(Box::new(|| Completion::Query(QueryResult::Teachers(Ok(Vec::new())))));
        executor.execute(Box::new(|| Completion::Query(QueryResult::Subjects(Ok(Vec::new())))));
        assert_eq!(executor.pending(), 2);

        assert!(matches!(
            executor.run_last(),
            Some(Completion::Query(QueryResult::Subjects(_)))
        ));
        assert_eq!(executor.run_all().len(), 1);
        assert_eq!(executor.pending(), 0);
    }
}
