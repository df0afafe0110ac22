use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one unit of work. A failure's `Display` text is recorded as
/// the job's error.
pub type JobResult = std::result::Result<(), failure::Error>;

/// A zero-argument unit of work, executed once by a single worker.
pub type Job = Box<dyn FnOnce() -> JobResult + Send + 'static>;

pub type JobId = u64;

/// A job bound to its submission identifier. Owned by the queue until a
/// worker claims it.
pub(crate) struct TrackedJob {
    pub(crate) id: JobId,
    pub(crate) execute: Job,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        match self {
            JobState::Completed | JobState::Failed => true,
            JobState::Pending | JobState::Running => false,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Lifecycle record of one submitted job. Serializes to the wire shape
/// returned by status endpoints; unset optional fields are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: JobId,
    pub status: JobState,
    /// Reserved in the wire shape; the pool itself never fills it in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub submitted: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<DateTime<Utc>>,
}

impl JobStatus {
    pub(crate) fn pending(id: JobId) -> JobStatus {
        JobStatus {
            id,
            status: JobState::Pending,
            result: None,
            error: None,
            submitted: Utc::now(),
            started: None,
            completed: None,
        }
    }

    pub(crate) fn mark_running(&mut self) {
        self.status = JobState::Running;
        self.started = Some(Utc::now());
    }

    pub(crate) fn mark_completed(&mut self) {
        self.status = JobState::Completed;
        self.completed = Some(Utc::now());
    }

    pub(crate) fn mark_failed(&mut self, error: String) {
        self.status = JobState::Failed;
        self.error = Some(error);
        self.completed = Some(Utc::now());
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
