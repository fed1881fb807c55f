//! Completion handles for governed tasks.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::oneshot;

/// Why a governed task did not produce a value.
#[derive(Debug, Error)]
pub enum TaskError<E> {
    /// The task ran and returned an error.
    #[error("task failed: {0}")]
    Failed(E),

    /// The task panicked. The governor keeps serving the rest of the queue.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The governor was shut down or its runtime went away before the task settled.
    #[error("task abandoned before it could run")]
    Abandoned,
}

impl<E> TaskError<E> {
    pub fn is_failed(&self) -> bool {
        matches!(self, TaskError::Failed(_))
    }

    /// The task's own error, if it ran and failed.
    pub fn into_inner(self) -> Option<E> {
        match self {
            TaskError::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Deferred result of a task submitted to a [`RequestGovernor`](super::RequestGovernor).
///
/// Dropping the handle does not withdraw the task; it still runs in its turn.
#[must_use = "the task runs regardless, but its result is lost if the handle is dropped"]
pub struct TaskHandle<T, E> {
    id: u64,
    rx: oneshot::Receiver<Result<T, TaskError<E>>>,
}

impl<T, E> TaskHandle<T, E> {
    pub(crate) fn new(id: u64, rx: oneshot::Receiver<Result<T, TaskError<E>>>) -> Self {
        Self { id, rx }
    }

    /// Submission sequence number, unique per governor.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<T, E> Future for TaskHandle<T, E> {
    type Output = Result<T, TaskError<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(TaskError::Abandoned)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T, E> std::fmt::Debug for TaskHandle<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle").field("id", &self.id).finish()
    }
}
