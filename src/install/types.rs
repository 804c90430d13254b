//! Wire types for the remote install job.
//!
//! The instance reports one [`JobResult`] per observation, wrapped in a
//! `{ "result": ... }` envelope on both the trigger and progress endpoints.
//! Each poll replaces the previous observation wholesale; nothing is patched
//! in place.

use serde::Deserialize;

use super::errors::InstallError;

/// Lifecycle status of a remote install job.
///
/// The wire protocol transmits the status as a stringified number. The
/// ordering is meaningful: anything below `Successful` is still in flight
/// and keeps the poll loop running.
///
/// # Example
///
/// ```rust
/// use sn_cicd_install::JobStatus;
///
/// let status = JobStatus::parse("2").unwrap();
/// assert_eq!(status, JobStatus::Successful);
/// assert!(status.is_terminal());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter, strum::FromRepr,
)]
#[repr(u8)]
pub enum JobStatus {
    /// Queued on the instance, not yet picked up.
    Pending = 0,
    /// Install in progress.
    Running = 1,
    /// Terminal: the application was installed.
    Successful = 2,
    /// Terminal: the install failed on the instance.
    Failed = 3,
    /// Terminal: the job was canceled on the instance.
    Canceled = 4,
}

impl JobStatus {
    /// Parse the wire representation.
    ///
    /// Accepts the stringified discriminant (`"0"` through `"4"`),
    /// tolerating surrounding whitespace. Anything else fails with
    /// [`InstallError::UnknownStatus`]: a job whose status cannot be
    /// classified must not be polled forever.
    pub fn parse(value: &str) -> Result<Self, InstallError> {
        value
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_repr)
            .ok_or_else(|| InstallError::UnknownStatus {
                value: value.to_string(),
            })
    }

    /// Terminal statuses end polling.
    pub fn is_terminal(self) -> bool {
        self >= Self::Successful
    }

    /// Iterator over all statuses, in wire order.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

/// One observation of a remote install job.
///
/// Every field defaults when the instance omits it; the driver decides what
/// each combination means. `percent_complete` is a number on the wire even
/// though `status` is a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobResult {
    /// Stringified [`JobStatus`] discriminant.
    #[serde(default)]
    pub status: String,

    /// Human-readable status name (e.g. "Running").
    #[serde(default)]
    pub status_label: String,

    /// Summary message for the current state.
    #[serde(default)]
    pub status_message: String,

    /// Longer detail text, populated on completion.
    #[serde(default)]
    pub status_detail: String,

    /// Error text, populated when the job failed.
    #[serde(default)]
    pub error: String,

    /// Progress percentage, 0–100.
    #[serde(default)]
    pub percent_complete: f64,

    /// Version the instance would roll back to if asked.
    #[serde(default)]
    pub rollback_version: String,

    /// Follow-up links for this job.
    #[serde(default)]
    pub links: JobLinks,
}

impl JobResult {
    /// The classified status of this observation.
    pub fn status_code(&self) -> Result<JobStatus, InstallError> {
        JobStatus::parse(&self.status)
    }

    /// URL to poll for the next observation.
    pub fn progress_url(&self) -> &str {
        &self.links.progress.url
    }
}

/// Links attached to a job observation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobLinks {
    /// Where to poll for progress.
    #[serde(default)]
    pub progress: ProgressLink,
}

/// Pointer to the progress record of a job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressLink {
    /// sys_id of the progress record.
    #[serde(default)]
    pub id: String,

    /// Absolute URL of the progress endpoint.
    #[serde(default)]
    pub url: String,
}

/// Response envelope used by both CI/CD endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResultEnvelope {
    pub result: JobResult,
}
