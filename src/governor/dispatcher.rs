use super::config::GovernorConfig;
use super::handle::{TaskError, TaskHandle};
use crate::{Error, ErrorContext, Result};
use arc_swap::ArcSwap;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct GovernorSnapshot {
    pub max_requests_per_second: f64,
    pub min_interval_ms: u64,
    /// Tasks submitted but not yet started.
    pub pending: usize,
    /// Whether a task is executing right now.
    pub dispatching: bool,
    /// Tasks started since the governor was created.
    pub dispatched: u64,
    /// Time until the next dispatch is allowed (ms), if the pacing window is still open.
    pub estimated_wait_ms: Option<u64>,
}

/// Type-erased unit of work. Settles its own handle when run.
struct Job {
    id: u64,
    run: Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>,
}

/// State shared with the dispatcher task.
struct Shared {
    config: ArcSwap<GovernorConfig>,
    pending: AtomicUsize,
    dispatching: AtomicBool,
    dispatched: AtomicU64,
    last_start: Mutex<Option<Instant>>,
}

struct Inner {
    shared: Arc<Shared>,
    tx: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    next_id: AtomicU64,
}

/// Serializes and paces calls to a rate-limited dependency.
///
/// - At most one task executes at a time
/// - Tasks start in submission order
/// - Consecutive starts are at least `1s / max_requests_per_second` apart
///
/// The governor is owned by the caller and cloned into whatever needs it;
/// clones share one queue.
#[derive(Clone)]
pub struct RequestGovernor {
    inner: Arc<Inner>,
}

impl RequestGovernor {
    /// Create a governor and spawn its dispatcher on the current Tokio runtime.
    pub fn new(config: GovernorConfig) -> Result<Self> {
        config.validate()?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            Error::configuration_with_context(
                "RequestGovernor must be created inside a Tokio runtime",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("governor"),
            )
        })?;

        let shared = Arc::new(Shared {
            config: ArcSwap::from_pointee(config.clone()),
            pending: AtomicUsize::new(0),
            dispatching: AtomicBool::new(false),
            dispatched: AtomicU64::new(0),
            last_start: Mutex::new(None),
        });
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = runtime.spawn(dispatch_loop(rx, shared.clone()));

        info!(
            max_requests_per_second = config.max_requests_per_second,
            "request governor started"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                shared,
                tx: Mutex::new(Some(tx)),
                worker: Mutex::new(Some(worker)),
                next_id: AtomicU64::new(0),
            }),
        })
    }

    /// Convenience constructor for a plain rate.
    pub fn with_rate(max_requests_per_second: f64) -> Result<Self> {
        Self::new(GovernorConfig::from_rps(max_requests_per_second)?)
    }

    /// Change the rate. Only dispatches that happen after this call observe it.
    pub fn configure(&self, max_requests_per_second: f64) -> Result<()> {
        let config = GovernorConfig::from_rps(max_requests_per_second)?;
        debug!(max_requests_per_second, "governor reconfigured");
        self.inner.shared.config.store(Arc::new(config));
        Ok(())
    }

    pub fn config(&self) -> GovernorConfig {
        self.inner.shared.config.load().as_ref().clone()
    }

    /// Queue `task` for execution and return a handle to its result.
    ///
    /// The task is never run inside this call. A panic inside the task is
    /// reported as [`TaskError::Panicked`] on its handle only.
    pub fn submit<F, Fut, T, E>(&self, task: F) -> TaskHandle<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply, rx) = oneshot::channel();

        let job = Job {
            id,
            run: Box::new(move || {
                async move {
                    let outcome = AssertUnwindSafe(async move { task().await })
                        .catch_unwind()
                        .await;
                    let settled = match outcome {
                        Ok(Ok(value)) => Ok(value),
                        Ok(Err(e)) => Err(TaskError::Failed(e)),
                        Err(payload) => {
                            let message = panic_message(payload.as_ref());
                            warn!(task_id = id, %message, "governed task panicked");
                            Err(TaskError::Panicked(message))
                        }
                    };
                    // The caller may have dropped the handle; the task still counted.
                    let _ = reply.send(settled);
                }
                .boxed()
            }),
        };

        let shared = &self.inner.shared;
        shared.pending.fetch_add(1, Ordering::SeqCst);
        let sent = match self.inner.tx.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(tx) => tx.send(job).is_ok(),
                None => false,
            },
            Err(_) => false,
        };
        if !sent {
            shared.pending.fetch_sub(1, Ordering::SeqCst);
            debug!(task_id = id, "governor closed, task abandoned");
        }

        TaskHandle::new(id, rx)
    }

    /// Stop accepting tasks and wait until every queued task has run.
    ///
    /// Submissions made after shutdown settle with [`TaskError::Abandoned`].
    pub async fn shutdown(&self) {
        let tx = self.inner.tx.lock().ok().and_then(|mut guard| guard.take());
        drop(tx);
        let worker = self.inner.worker.lock().ok().and_then(|mut guard| guard.take());
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                warn!(error = %e, "governor dispatcher exited abnormally");
            }
        }
        info!("request governor stopped");
    }

    pub fn snapshot(&self) -> GovernorSnapshot {
        let shared = &self.inner.shared;
        let cfg = shared.config.load();
        let min_interval = cfg.min_interval();
        let now = Instant::now();

        let estimated_wait_ms = shared
            .last_start
            .lock()
            .ok()
            .and_then(|last| *last)
            .and_then(|last| last.checked_add(min_interval))
            .and_then(|ready_at| {
                if ready_at > now {
                    Some((ready_at - now).as_millis() as u64)
                } else {
                    None
                }
            });

        GovernorSnapshot {
            max_requests_per_second: cfg.max_requests_per_second,
            min_interval_ms: min_interval.as_millis() as u64,
            pending: shared.pending.load(Ordering::SeqCst),
            dispatching: shared.dispatching.load(Ordering::SeqCst),
            dispatched: shared.dispatched.load(Ordering::SeqCst),
            estimated_wait_ms,
        }
    }
}

impl std::fmt::Debug for RequestGovernor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestGovernor")
            .field("config", &self.config())
            .finish()
    }
}

/// Single consumer: one task in flight, pacing measured between start times.
async fn dispatch_loop(mut rx: mpsc::UnboundedReceiver<Job>, shared: Arc<Shared>) {
    let mut last_start: Option<Instant> = None;

    while let Some(job) = rx.recv().await {
        // Read the config per dispatch so reconfiguration applies to the next start.
        let min_interval = shared.config.load().min_interval();
        if let Some(ready_at) = last_start.and_then(|last| last.checked_add(min_interval)) {
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }

        let started = Instant::now();
        last_start = Some(started);
        if let Ok(mut guard) = shared.last_start.lock() {
            *guard = Some(started);
        }
        shared.pending.fetch_sub(1, Ordering::SeqCst);
        shared.dispatching.store(true, Ordering::SeqCst);
        shared.dispatched.fetch_add(1, Ordering::SeqCst);
        debug!(task_id = job.id, "dispatching governed task");

        (job.run)().await;

        shared.dispatching.store(false, Ordering::SeqCst);
    }

    debug!("governor queue closed and drained");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
