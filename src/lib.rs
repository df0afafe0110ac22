#[macro_use]
extern crate log;

pub use error::{PoolError, Result};
pub use job::{Job, JobId, JobResult, JobState, JobStatus};
pub use pool::WorkerPool;

mod error;
mod job;
mod pool;
