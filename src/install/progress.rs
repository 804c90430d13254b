//! Progress events emitted while tracking a remote install job.
//!
//! The driver reports each observation through a caller-supplied callback.
//! Events are informational except [`InstallProgress::RollbackVersion`],
//! which doubles as the named `rollbackVersion` output of the run.

use std::fmt;

/// Progress events produced by one install run.
///
/// # Example
///
/// ```rust
/// use sn_cicd_install::InstallProgress;
///
/// fn on_progress(event: InstallProgress) {
///     match &event {
///         InstallProgress::RollbackVersion { version } => {
///             println!("would roll back to {version}");
///         }
///         other => println!("{other}"),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InstallProgress {
    /// The job was observed in the Pending state.
    Pending {
        /// Human-readable status name from the instance.
        label: String,
    },

    /// The version the instance would roll back to if the install were
    /// reverted. Emitted at most once per run, on the first Pending
    /// observation; the value may be empty when the instance reports none.
    RollbackVersion {
        /// Rollback version as reported by the instance.
        version: String,
    },

    /// Percent-complete line. Fires for every Running observation and for
    /// the final Successful observation, before the terminal events.
    Percent {
        /// Human-readable status name from the instance.
        label: String,
        /// Progress percentage, 0–100.
        percent: f64,
    },

    /// Terminal success, carrying the instance's closing messages.
    Completed {
        /// Summary line from the instance.
        message: String,
        /// Detail line from the instance.
        detail: String,
    },
}

impl InstallProgress {
    /// Check whether this event reports terminal success.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sn_cicd_install::InstallProgress;
    ///
    /// let event = InstallProgress::Percent { label: "Running".into(), percent: 40.0 };
    /// assert!(!event.is_complete());
    /// ```
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

impl fmt::Display for InstallProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending { label } => f.write_str(label),
            Self::RollbackVersion { version } => write!(f, "rollbackVersion: {version}"),
            Self::Percent { label, percent } => write!(f, "{label}: {percent}%"),
            Self::Completed { message, detail } => {
                if detail.is_empty() {
                    f.write_str(message)
                } else {
                    write!(f, "{message} {detail}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_line_format() {
        let event = InstallProgress::Percent {
            label: "Running".to_string(),
            percent: 50.0,
        };
        assert_eq!(event.to_string(), "Running: 50%");
    }

    #[test]
    fn test_fractional_percent_survives() {
        let event = InstallProgress::Percent {
            label: "Running".to_string(),
            percent: 62.5,
        };
        assert_eq!(event.to_string(), "Running: 62.5%");
    }

    #[test]
    fn test_pending_displays_label() {
        let event = InstallProgress::Pending {
            label: "Pending".to_string(),
        };
        assert_eq!(event.to_string(), "Pending");
    }

    #[test]
    fn test_rollback_version_format() {
        let event = InstallProgress::RollbackVersion {
            version: "1.0.2".to_string(),
        };
        assert_eq!(event.to_string(), "rollbackVersion: 1.0.2");
    }

    #[test]
    fn test_completed_with_and_without_detail() {
        let event = InstallProgress::Completed {
            message: "Install complete".to_string(),
            detail: "App installed on dev12345".to_string(),
        };
        assert_eq!(
            event.to_string(),
            "Install complete App installed on dev12345"
        );

        let bare = InstallProgress::Completed {
            message: "Install complete".to_string(),
            detail: String::new(),
        };
        assert_eq!(bare.to_string(), "Install complete");
    }

    #[test]
    fn test_is_complete() {
        assert!(InstallProgress::Completed {
            message: String::new(),
            detail: String::new(),
        }
        .is_complete());

        assert!(!InstallProgress::Pending {
            label: "Pending".to_string()
        }
        .is_complete());
        assert!(!InstallProgress::RollbackVersion {
            version: "1.0.2".to_string()
        }
        .is_complete());
    }
}
