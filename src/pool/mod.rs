use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crossbeam::channel::{self, Receiver, Sender};

use crate::job::{JobId, JobResult, JobStatus, TrackedJob};
use crate::{PoolError, Result};

mod worker;

pub(crate) type StatusTable = Arc<Mutex<HashMap<JobId, JobStatus>>>;

/// A fixed set of worker threads draining one bounded FIFO queue.
///
/// Jobs are dequeued in submission order, but with more than one worker the
/// completion order across jobs is not guaranteed.
pub struct WorkerPool {
    sender: Mutex<Option<Sender<TrackedJob>>>,
    receiver: Receiver<TrackedJob>,
    statuses: StatusTable,
    last_id: AtomicU64,
    queue_size: usize,
    workers_size: usize,
}

impl WorkerPool {
    /// Creates a pool with the given queue capacity and worker count, both
    /// of which must be positive. No worker runs until `start` is called.
    pub fn new(queue_size: usize, workers_size: usize) -> Result<WorkerPool> {
        if queue_size == 0 {
            return Err(PoolError::Config("queue size must be positive".to_owned()));
        }
        if workers_size == 0 {
            return Err(PoolError::Config("worker count must be positive".to_owned()));
        }
        let (tx, rx) = channel::bounded(queue_size);
        Ok(WorkerPool {
            sender: Mutex::new(Some(tx)),
            receiver: rx,
            statuses: Arc::new(Mutex::new(HashMap::new())),
            last_id: AtomicU64::new(0),
            queue_size,
            workers_size,
        })
    }

    /// Launches the worker threads. Call exactly once; calling it again
    /// starts another full set of workers on the same queue.
    pub fn start(&self) -> Result<()> {
        for _ in 0..self.workers_size {
            let rx = worker::JobReceiver::new(self.receiver.clone(), Arc::clone(&self.statuses));
            thread::Builder::new().spawn(move || worker::run_jobs(rx))?;
        }
        info!("worker pool started with {} workers", self.workers_size);
        Ok(())
    }

    /// Submits a job and returns its identifier.
    ///
    /// The pending status record is registered before this returns, so a
    /// concurrent `status` call on the returned identifier always finds it.
    /// Blocks while the queue is at capacity; backpressure is the pool's
    /// only admission control. Fails with `PoolError::Closed` once
    /// `shutdown` has been called.
    pub fn submit<F>(&self, job: F) -> Result<JobId>
    where
        F: FnOnce() -> JobResult + Send + 'static,
    {
        let tx = match &*self.sender.lock().unwrap() {
            Some(tx) => tx.clone(),
            None => return Err(PoolError::Closed),
        };
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.statuses
            .lock()
            .unwrap()
            .insert(id, JobStatus::pending(id));
        let tracked = TrackedJob {
            id,
            execute: Box::new(job),
        };
        // Blocks when the queue is full.
        tx.send(tracked).map_err(|_| PoolError::Closed)?;
        debug!("job {} queued", id);
        Ok(id)
    }

    /// Point-in-time snapshot of the status record for `id`, or `None` if
    /// this pool never issued that identifier.
    pub fn status(&self, id: JobId) -> Option<JobStatus> {
        self.statuses.lock().unwrap().get(&id).cloned()
    }

    /// Stops accepting submissions. Jobs already queued are still processed;
    /// each worker exits once the queue is closed and drained. Idempotent,
    /// and does not wait for the workers to finish.
    pub fn shutdown(&self) {
        if self.sender.lock().unwrap().take().is_some() {
            info!("worker pool closed for submissions");
        }
    }

    pub fn queue_size(&self) -> usize {
        self.queue_size
    }

    pub fn workers_size(&self) -> usize {
        self.workers_size
    }
}
