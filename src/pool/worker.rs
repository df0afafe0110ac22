use std::cell::Cell;
use std::sync::Arc;
use std::thread;

use crossbeam::channel::Receiver;

use super::StatusTable;
use crate::job::{JobId, JobStatus, TrackedJob};

pub(super) struct JobReceiver {
    rx: Receiver<TrackedJob>,
    statuses: StatusTable,
    running: Cell<Option<JobId>>,
}

impl JobReceiver {
    pub(super) fn new(rx: Receiver<TrackedJob>, statuses: StatusTable) -> JobReceiver {
        JobReceiver {
            rx,
            statuses,
            running: Cell::new(None),
        }
    }
}

impl Drop for JobReceiver {
    fn drop(&mut self) {
        if thread::panicking() {
            // The job that unwound this thread never reported a result.
            if let Some(id) = self.running.take() {
                if let Ok(mut statuses) = self.statuses.lock() {
                    if let Some(status) = statuses.get_mut(&id) {
                        status.mark_failed("job panicked".to_owned());
                    }
                }
            }
            let rx = JobReceiver::new(self.rx.clone(), Arc::clone(&self.statuses));
            if let Err(e) = thread::Builder::new().spawn(move || run_jobs(rx)) {
                error!("Failed to spawn a replacement worker: {}", e);
            }
        }
    }
}

pub(super) fn run_jobs(rx: JobReceiver) {
    loop {
        match rx.rx.recv() {
            Ok(job) => {
                rx.running.set(Some(job.id));
                execute(&rx.statuses, job);
                rx.running.set(None);
            }
            Err(_) => {
                debug!("Worker exits because the queue is closed and drained.");
                break;
            }
        }
    }
}

fn execute(statuses: &StatusTable, job: TrackedJob) {
    let TrackedJob { id, execute } = job;
    update(statuses, id, JobStatus::mark_running);
    match execute() {
        Ok(()) => {
            update(statuses, id, JobStatus::mark_completed);
            debug!("job {} completed", id);
        }
        Err(e) => {
            error!("job {} failed: {}", id, e);
            update(statuses, id, move |status| status.mark_failed(e.to_string()));
        }
    }
}

fn update<F>(statuses: &StatusTable, id: JobId, f: F)
where
    F: FnOnce(&mut JobStatus),
{
    let mut statuses = statuses.lock().unwrap();
    if let Some(status) = statuses.get_mut(&id) {
        f(status);
    }
}
