//! Fixed-size worker group fed from a bounded task queue.

use std::any::type_name;
use std::fmt;
use std::num::NonZero;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, SendTimeoutError, Sender};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::Error;

/// A unit of work executed by one of the workers.
pub(crate) type Job = Box<dyn FnOnce() -> crate::Result<()> + Send + 'static>;

/// Why the group stopped making progress before all submitted work completed.
#[derive(Debug)]
pub(crate) enum Interrupted {
    /// The deadline passed first.
    DeadlineElapsed,

    /// A unit of work failed or panicked. Only the first failure is kept.
    Failed(Error),
}

#[derive(Debug, Default)]
struct Progress {
    submitted: u64,
    completed: u64,
    closed: bool,
    failure: Option<Error>,
}

impl Progress {
    fn is_drained(&self) -> bool {
        self.closed && self.completed == self.submitted
    }
}

#[derive(Debug)]
struct Shared {
    progress: Mutex<Progress>,
    changed: Condvar,
    worker_count: NonZero<usize>,

    // Set when the group is torn down early. Workers then discard queued jobs unexecuted.
    abandoned: AtomicBool,
}

impl Shared {
    fn finish_one(&self, failure: Option<Error>) {
        let mut progress = self.progress.lock();
        progress.completed = progress.completed.saturating_add(1);

        let first_failure = failure.is_some() && progress.failure.is_none();
        if first_failure {
            progress.failure = failure;
        }

        if first_failure || progress.is_drained() {
            self.changed.notify_all();
        }
    }
}

/// A group of `worker_count` threads executing [`Job`]s from a bounded queue.
///
/// The group lives for exactly one dispatch run. Dropping it closes the queue, discards any
/// jobs that have not started and joins every worker thread.
pub(crate) struct WorkerGroup {
    job_tx: Option<Sender<Job>>,
    shared: Arc<Shared>,
    join_handles: Vec<JoinHandle<()>>,
}

impl fmt::Debug for WorkerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("worker_count", &self.shared.worker_count)
            .field("progress", &*self.shared.progress.lock())
            .field("accepting_work", &self.job_tx.is_some())
            .finish_non_exhaustive()
    }
}

impl WorkerGroup {
    /// Starts `worker_count` worker threads sharing a queue of `queue_capacity` pending jobs.
    pub(crate) fn spawn(worker_count: NonZero<usize>, queue_capacity: NonZero<usize>) -> Self {
        let (job_tx, job_rx) = crossbeam_channel::bounded::<Job>(queue_capacity.get());

        let shared = Arc::new(Shared {
            progress: Mutex::new(Progress::default()),
            changed: Condvar::new(),
            worker_count,
            abandoned: AtomicBool::new(false),
        });

        let join_handles = (0..worker_count.get())
            .map(|worker_index| {
                let job_rx = job_rx.clone();
                let shared = Arc::clone(&shared);

                thread::Builder::new()
                    .name(format!("prime-worker-{worker_index}"))
                    .spawn(move || {
                        debug!(worker_index, "worker thread started");
                        worker_entrypoint(&shared, &job_rx, worker_index);
                        debug!(worker_index, "worker thread exiting");
                    })
                    .expect("failed to spawn worker thread: thread spawning failure is not supported")
            })
            .collect();

        Self {
            job_tx: Some(job_tx),
            shared,
            join_handles,
        }
    }

    /// Enqueues a job, blocking while the queue is full.
    ///
    /// Fails if the deadline has passed, if it passes before there is room in the queue or if an
    /// earlier job has already failed, in which case the run is doomed and further submissions
    /// are pointless.
    ///
    /// # Panics
    ///
    /// Panics if called after [`close()`][Self::close].
    pub(crate) fn submit_before(&self, job: Job, deadline: Instant) -> Result<(), Interrupted> {
        let job_tx = self
            .job_tx
            .as_ref()
            .expect("jobs cannot be submitted after the worker group has been closed");

        {
            let mut progress = self.shared.progress.lock();

            if let Some(failure) = progress.failure.take() {
                return Err(Interrupted::Failed(failure));
            }

            if Instant::now() >= deadline {
                return Err(Interrupted::DeadlineElapsed);
            }

            progress.submitted = progress.submitted.saturating_add(1);
        }

        let timeout = deadline.saturating_duration_since(Instant::now());

        match job_tx.send_timeout(job, timeout) {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => {
                let mut progress = self.shared.progress.lock();
                progress.submitted = progress.submitted.saturating_sub(1);
                Err(Interrupted::DeadlineElapsed)
            }
            Err(SendTimeoutError::Disconnected(_)) => {
                panic!("worker threads must outlive the job queue - did a worker exit early?")
            }
        }
    }

    /// Signals that no more jobs will be submitted.
    ///
    /// Workers exit once they have drained the queue.
    pub(crate) fn close(&mut self) {
        self.shared.progress.lock().closed = true;

        // Dropping the last sender disconnects the channel, ending each worker's receive loop.
        self.job_tx = None;
    }

    /// Blocks until every submitted job has completed, a job fails or the deadline passes.
    ///
    /// Completion is checked before the deadline, so work that finished in time is reported as
    /// complete even if this thread only observes it after the deadline.
    pub(crate) fn wait_until(&self, deadline: Instant) -> Result<(), Interrupted> {
        let mut progress = self.shared.progress.lock();

        loop {
            if let Some(failure) = progress.failure.take() {
                return Err(Interrupted::Failed(failure));
            }

            if progress.is_drained() {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(Interrupted::DeadlineElapsed);
            }

            // Spurious and timed-out wakeups are both handled by re-checking above.
            _ = self.shared.changed.wait_until(&mut progress, deadline);
        }
    }

    /// Discards all queued jobs that have not started yet.
    ///
    /// Jobs already executing run to completion.
    pub(crate) fn abandon(&self) {
        self.shared.abandoned.store(true, Ordering::Release);
    }
}

impl Drop for WorkerGroup {
    #[cfg_attr(test, mutants::skip)] // Impractical to test that stuff stops happening.
    fn drop(&mut self) {
        if thread::panicking() {
            // If the thread is panicking, we are probably in a dirty state and shutting down
            // may make the problem worse by hiding the original panic, so just do nothing.
            return;
        }

        // Anything still queued at this point belongs to a run that has already ended.
        self.abandon();
        self.close();

        for handle in self.join_handles.drain(..) {
            if let Err(payload) = handle.join() {
                // Jobs run inside a panic trap, so a worker panic means the group itself is broken.
                panic::resume_unwind(payload);
            }
        }
    }
}

fn worker_entrypoint(shared: &Shared, job_rx: &Receiver<Job>, worker_index: usize) {
    let mut executed: u64 = 0;
    let mut discarded: u64 = 0;

    while let Ok(job) = job_rx.recv() {
        if shared.abandoned.load(Ordering::Acquire) {
            drop(job);
            discarded = discarded.saturating_add(1);
            shared.finish_one(None);
            continue;
        }

        let failure = match panic::catch_unwind(AssertUnwindSafe(job)) {
            Ok(Ok(())) => None,
            Ok(Err(error)) => Some(error),
            Err(_) => Some(Error::WorkerPanicked {
                worker_count: shared.worker_count,
            }),
        };

        if failure.is_some() {
            // The run is lost. Skip the rest of the queue instead of computing unused results.
            shared.abandoned.store(true, Ordering::Release);
        }

        executed = executed.saturating_add(1);
        shared.finish_one(failure);
    }

    trace!(worker_index, executed, discarded, "worker queue drained");
}
