//! Error types for install operations.
//!
//! Every failure an install run can produce is one [`InstallError`] variant
//! carrying a human-readable message. HTTP failures map through a closed
//! status-code table with an explicit fallback path, so the taxonomy is
//! exhaustively testable. Nothing here is retried automatically.

use serde::Deserialize;
use thiserror::Error;

use crate::config::MissingInput;

/// Errors that can occur while triggering or tracking an install job.
///
/// # Example
///
/// ```rust
/// use sn_cicd_install::InstallError;
///
/// let error = InstallError::JobFailed { message: "boom".into() };
/// assert_eq!(error.to_string(), "boom");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InstallError {
    /// One or more required pipeline inputs are absent.
    ///
    /// All missing inputs are collected eagerly, before any network
    /// activity, and reported together in a single message.
    #[error("{}", format_missing(.missing))]
    MissingConfig {
        /// The inputs found to be absent, in check order.
        missing: Vec<MissingInput>,
    },

    /// URL construction was attempted without a host or without an install
    /// target (neither sys_id nor scope).
    #[error("Configuration is incorrect")]
    IncorrectConfig,

    /// The workflow `version` input is absent or empty.
    #[error("Version is not set in the workflow")]
    MissingVersion,

    /// Transport or HTTP-level failure on the trigger or progress call.
    #[error("{message}")]
    Transport {
        /// Message from the closed status table or the transport itself.
        message: String,
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
    },

    /// The remote job reached the Failed status.
    #[error("{message}")]
    JobFailed {
        /// The job's error text, or its status message when the error text
        /// is empty.
        message: String,
    },

    /// The remote job was canceled on the instance.
    #[error("Canceled")]
    JobCanceled,

    /// The wire status could not be classified.
    #[error("Unrecognized job status: {value:?}")]
    UnknownStatus {
        /// The raw status string the instance sent.
        value: String,
    },
}

impl InstallError {
    /// Classify an HTTP failure response.
    ///
    /// Known status codes map to fixed messages regardless of the body.
    /// Unmapped codes fall back to the body's `result.error`, then
    /// `result.status_message`, then a generic `HTTP {status}` line.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sn_cicd_install::InstallError;
    ///
    /// let error = InstallError::from_http_response(401, "");
    /// assert_eq!(error.to_string(), "The user credentials are incorrect.");
    /// ```
    pub fn from_http_response(status: u16, body: &str) -> Self {
        let message = match status {
            401 => "The user credentials are incorrect.".to_string(),
            403 => {
                "Forbidden. The user is not an admin or does not have the CICD role.".to_string()
            }
            404 => "Not found. The requested item was not found.".to_string(),
            405 => "Invalid method. The functionality is disabled.".to_string(),
            409 => "Conflict. The requested item is not unique.".to_string(),
            500 => "Internal server error. An unexpected error occurred while processing \
                    the request."
                .to_string(),
            _ => fallback_message(status, body),
        };

        Self::Transport {
            message,
            status: Some(status),
        }
    }
}

/// Error payload the instance attaches to unmapped failure responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    result: ErrorResult,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResult {
    #[serde(default)]
    error: String,
    #[serde(default)]
    status_message: String,
}

fn fallback_message(status: u16, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    if !parsed.result.error.is_empty() {
        parsed.result.error
    } else if !parsed.result.status_message.is_empty() {
        parsed.result.status_message
    } else {
        format!("HTTP {status}")
    }
}

fn format_missing(missing: &[MissingInput]) -> String {
    let reasons: Vec<String> = missing.iter().map(ToString::to_string).collect();
    format!("{}. Configure Github secrets please", reasons.join(". "))
}
