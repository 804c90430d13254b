//! Install driver: triggers the remote job and tracks it to completion.
//!
//! This module provides [`InstallDriver`], which owns the configuration and
//! transport for one install run. [`InstallDriver::install_app`] validates
//! the inputs, POSTs the trigger request, and then polls the job's progress
//! link (one request per throttle interval, never two in flight) until the
//! instance reports a terminal status.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::config::InstallConfig;
use crate::request::{build_request_url, RequestOptions};

use super::errors::InstallError;
use super::progress::InstallProgress;
use super::transport::{HttpTransport, JobTransport};
use super::types::{JobResult, JobStatus};

/// Tuning knobs for the poll loop.
///
/// # Example
///
/// ```rust
/// use sn_cicd_install::DriverOptions;
/// use std::time::Duration;
///
/// let options = DriverOptions::default();
/// assert_eq!(options.throttle, Duration::from_millis(3000));
/// ```
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Delay between consecutive progress polls. Fixed, non-adaptive,
    /// non-jittered. Default: 3 seconds.
    pub throttle: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(3000),
        }
    }
}

/// Drives one application install on a ServiceNow instance.
///
/// The driver is independent per instance: it owns its config and
/// credentials, and concurrent drivers share no state. A single
/// [`install_app`](Self::install_app) call runs one logical task; the poll
/// loop suspends on the throttle delay between requests, so no two network
/// calls for the same job are ever in flight at once. Polling has no retry
/// cap and no overall timeout: it continues until the instance reports a
/// terminal status or a transport error occurs.
pub struct InstallDriver<T = HttpTransport> {
    config: InstallConfig,
    transport: T,
    options: DriverOptions,
}

impl InstallDriver<HttpTransport> {
    /// Driver with the production HTTP transport and default options.
    pub fn new(config: InstallConfig) -> Self {
        let transport = HttpTransport::new(&config);
        Self {
            config,
            transport,
            options: DriverOptions::default(),
        }
    }
}

impl<T: JobTransport> InstallDriver<T> {
    /// Driver over a custom transport (tests, alternate HTTP stacks).
    pub fn with_transport(config: InstallConfig, transport: T, options: DriverOptions) -> Self {
        Self {
            config,
            transport,
            options,
        }
    }

    /// Trigger the install and track it to a terminal state.
    ///
    /// `version` is the workflow-level input naming the application version
    /// to install; an absent or empty value fails with
    /// [`InstallError::MissingVersion`] before any request is sent.
    /// `on_progress` receives every [`InstallProgress`] event of the run.
    ///
    /// Returns `Ok(())` when the job finishes Successful, and the classified
    /// [`InstallError`] for every other outcome. There is no partial
    /// success: the call either fully succeeds or fails once.
    pub async fn install_app<F>(
        &self,
        version: Option<&str>,
        on_progress: F,
    ) -> Result<(), InstallError>
    where
        F: Fn(InstallProgress),
    {
        // Step 1: the version comes from the workflow input, never from config.
        let version = match version {
            Some(v) if !v.is_empty() => v,
            _ => return Err(InstallError::MissingVersion),
        };

        // Step 2: resolve the install target; sys_id wins when both are set.
        let mut options = RequestOptions {
            version: version.to_string(),
            ..Default::default()
        };
        if let Some(sys_id) = self.config.sys_id() {
            options.sys_id = Some(sys_id.to_string());
        } else {
            options.scope = self.config.scope().map(str::to_string);
        }

        // Step 3: build the URL; fails before any network activity.
        let url = build_request_url(&self.config.host, &options)?;
        debug!(%url, "install trigger");

        // Step 4: trigger the install.
        let job = self.transport.trigger_install(&url).await?;

        // Step 5: poll to a terminal state.
        self.track_progress(job, &on_progress).await
    }

    /// Poll loop over successive job observations.
    ///
    /// The job may enter at any status; the trigger response is not
    /// necessarily Pending. The rollback version is a one-time transition
    /// action: it fires on the first Pending observation and never again
    /// within the run.
    async fn track_progress<F>(
        &self,
        mut job: JobResult,
        on_progress: &F,
    ) -> Result<(), InstallError>
    where
        F: Fn(InstallProgress),
    {
        let mut rollback_emitted = false;

        loop {
            let status = job.status_code()?;

            if status == JobStatus::Pending {
                on_progress(InstallProgress::Pending {
                    label: job.status_label.clone(),
                });
                if !rollback_emitted {
                    rollback_emitted = true;
                    on_progress(InstallProgress::RollbackVersion {
                        version: job.rollback_version.clone(),
                    });
                }
            }

            // Fires for the terminal Successful observation too, before the
            // terminal handling below.
            if matches!(status, JobStatus::Running | JobStatus::Successful) {
                on_progress(InstallProgress::Percent {
                    label: job.status_label.clone(),
                    percent: job.percent_complete,
                });
            }

            if !status.is_terminal() {
                // The only suspension point: throttle, then fetch the next
                // observation.
                sleep(self.options.throttle).await;
                job = self.transport.fetch_progress(job.progress_url()).await?;
                continue;
            }

            return match status {
                JobStatus::Successful => {
                    on_progress(InstallProgress::Completed {
                        message: job.status_message.clone(),
                        detail: job.status_detail.clone(),
                    });
                    Ok(())
                }
                JobStatus::Failed => {
                    let message = if job.error.is_empty() {
                        job.status_message.clone()
                    } else {
                        job.error.clone()
                    };
                    Err(InstallError::JobFailed { message })
                }
                // is_terminal() leaves exactly Canceled.
                _ => Err(InstallError::JobCanceled),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::types::{JobLinks, ProgressLink};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted transport: returns the trigger result, then each queued
    /// poll result in order, recording every URL it was asked to hit.
    struct ScriptedTransport {
        trigger: Mutex<Option<Result<JobResult, InstallError>>>,
        polls: Mutex<VecDeque<Result<JobResult, InstallError>>>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(
            trigger: Result<JobResult, InstallError>,
            polls: Vec<Result<JobResult, InstallError>>,
        ) -> Self {
            Self {
                trigger: Mutex::new(Some(trigger)),
                polls: Mutex::new(polls.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JobTransport for ScriptedTransport {
        async fn trigger_install(&self, url: &str) -> Result<JobResult, InstallError> {
            self.requests.lock().unwrap().push(format!("POST {url}"));
            self.trigger
                .lock()
                .unwrap()
                .take()
                .expect("trigger called twice")
        }

        async fn fetch_progress(&self, url: &str) -> Result<JobResult, InstallError> {
            self.requests.lock().unwrap().push(format!("GET {url}"));
            self.polls
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra poll")
        }
    }

    fn config() -> InstallConfig {
        InstallConfig {
            username: "admin".to_string(),
            password: "secret".to_string(),
            host: "test".to_string(),
            app_sys_id: Some("123".to_string()),
            app_scope: None,
            debug: false,
        }
    }

    fn job(status: &str) -> JobResult {
        JobResult {
            status: status.to_string(),
            status_label: "Label".to_string(),
            links: JobLinks {
                progress: ProgressLink {
                    id: "p1".to_string(),
                    url: "https://test.service-now.com/api/sn_cicd/progress/p1".to_string(),
                },
            },
            ..Default::default()
        }
    }

    fn driver(
        transport: Arc<ScriptedTransport>,
    ) -> InstallDriver<Arc<ScriptedTransport>> {
        InstallDriver::with_transport(
            config(),
            transport,
            DriverOptions {
                throttle: Duration::from_millis(1),
            },
        )
    }

    #[async_trait]
    impl JobTransport for Arc<ScriptedTransport> {
        async fn trigger_install(&self, url: &str) -> Result<JobResult, InstallError> {
            self.as_ref().trigger_install(url).await
        }

        async fn fetch_progress(&self, url: &str) -> Result<JobResult, InstallError> {
            self.as_ref().fetch_progress(url).await
        }
    }

    fn collect_events() -> (Arc<Mutex<Vec<InstallProgress>>>, impl Fn(InstallProgress)) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        (events, move |event| sink.lock().unwrap().push(event))
    }

    #[tokio::test]
    async fn test_successful_run_emits_percent_then_completed() {
        let mut running = job("1");
        running.percent_complete = 50.0;
        let mut done = job("2");
        done.percent_complete = 100.0;
        done.status_message = "Install complete".to_string();
        done.status_detail = "Done".to_string();

        let transport = Arc::new(ScriptedTransport::new(Ok(running), vec![Ok(done)]));
        let (events, on_progress) = collect_events();

        driver(transport.clone())
            .install_app(Some("1.1.1"), on_progress)
            .await
            .unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                InstallProgress::Percent {
                    label: "Label".to_string(),
                    percent: 50.0
                },
                InstallProgress::Percent {
                    label: "Label".to_string(),
                    percent: 100.0
                },
                InstallProgress::Completed {
                    message: "Install complete".to_string(),
                    detail: "Done".to_string()
                },
            ]
        );

        // One trigger, one poll, nothing after the terminal status.
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("POST https://test.service-now.com"));
        assert!(requests[1].starts_with("GET https://test.service-now.com"));
    }

    #[tokio::test]
    async fn test_immediate_success_skips_polling() {
        let transport = Arc::new(ScriptedTransport::new(Ok(job("2")), vec![]));
        let (events, on_progress) = collect_events();

        driver(transport.clone())
            .install_app(Some("1.1.1"), on_progress)
            .await
            .unwrap();

        assert_eq!(transport.requests().len(), 1);
        let events = events.lock().unwrap();
        // Percent still fires on the terminal Successful observation.
        assert!(matches!(events[0], InstallProgress::Percent { .. }));
        assert!(events[1].is_complete());
    }

    #[tokio::test]
    async fn test_pending_emits_rollback_version_once() {
        let mut first = job("0");
        first.rollback_version = "1.0.2".to_string();
        let mut second = job("0");
        second.rollback_version = "1.0.2".to_string();

        let transport = Arc::new(ScriptedTransport::new(
            Ok(first),
            vec![Ok(second), Ok(job("2"))],
        ));
        let (events, on_progress) = collect_events();

        driver(transport)
            .install_app(Some("1.1.1"), on_progress)
            .await
            .unwrap();

        let events = events.lock().unwrap();
        let rollbacks: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, InstallProgress::RollbackVersion { .. }))
            .collect();
        assert_eq!(
            rollbacks,
            vec![&InstallProgress::RollbackVersion {
                version: "1.0.2".to_string()
            }]
        );

        // Both Pending observations still log their label.
        let pendings = events
            .iter()
            .filter(|e| matches!(e, InstallProgress::Pending { .. }))
            .count();
        assert_eq!(pendings, 2);
    }

    #[tokio::test]
    async fn test_failed_job_surfaces_error_text() {
        let mut failed = job("3");
        failed.error = "boom".to_string();
        failed.status_message = "ignored".to_string();

        let transport = Arc::new(ScriptedTransport::new(Ok(failed), vec![]));
        let (_, on_progress) = collect_events();

        let err = driver(transport)
            .install_app(Some("1.1.1"), on_progress)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_failed_job_falls_back_to_status_message() {
        let mut failed = job("3");
        failed.status_message = "install failed on instance".to_string();

        let transport = Arc::new(ScriptedTransport::new(Ok(failed), vec![]));
        let (_, on_progress) = collect_events();

        let err = driver(transport)
            .install_app(Some("1.1.1"), on_progress)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "install failed on instance");
    }

    #[tokio::test]
    async fn test_canceled_job_has_fixed_message() {
        let mut canceled = job("4");
        canceled.error = "whatever the instance says".to_string();

        let transport = Arc::new(ScriptedTransport::new(Ok(canceled), vec![]));
        let (_, on_progress) = collect_events();

        let err = driver(transport)
            .install_app(Some("1.1.1"), on_progress)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::JobCanceled));
        assert_eq!(err.to_string(), "Canceled");
    }

    #[tokio::test]
    async fn test_missing_version_fails_before_any_request() {
        let transport = Arc::new(ScriptedTransport::new(Ok(job("2")), vec![]));
        let (_, on_progress) = collect_events();

        let err = driver(transport.clone())
            .install_app(None, &on_progress)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::MissingVersion));

        let err = driver(transport.clone())
            .install_app(Some(""), &on_progress)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::MissingVersion));

        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_sys_id_wins_over_scope() {
        let transport = Arc::new(ScriptedTransport::new(Ok(job("2")), vec![]));
        let (_, on_progress) = collect_events();

        let mut config = config();
        config.app_scope = Some("x_acme_app".to_string());
        let driver = InstallDriver::with_transport(
            config,
            transport.clone(),
            DriverOptions {
                throttle: Duration::from_millis(1),
            },
        );
        driver.install_app(Some("1.1.1"), on_progress).await.unwrap();

        let requests = transport.requests();
        assert!(requests[0].contains("sys_id=123"));
        assert!(!requests[0].contains("scope="));
    }

    #[tokio::test]
    async fn test_scope_branch_when_sys_id_absent() {
        let transport = Arc::new(ScriptedTransport::new(Ok(job("2")), vec![]));
        let (_, on_progress) = collect_events();

        let mut config = config();
        config.app_sys_id = None;
        config.app_scope = Some("x_acme_app".to_string());
        let driver = InstallDriver::with_transport(
            config,
            transport.clone(),
            DriverOptions {
                throttle: Duration::from_millis(1),
            },
        );
        driver.install_app(Some("1.1.1"), on_progress).await.unwrap();

        assert!(transport.requests()[0].contains("scope=x_acme_app"));
    }

    #[tokio::test]
    async fn test_empty_host_fails_before_any_request() {
        let transport = Arc::new(ScriptedTransport::new(Ok(job("2")), vec![]));
        let (_, on_progress) = collect_events();

        let mut config = config();
        config.host = String::new();
        let driver = InstallDriver::with_transport(
            config,
            transport.clone(),
            DriverOptions {
                throttle: Duration::from_millis(1),
            },
        );
        let err = driver
            .install_app(Some("1.1.1"), on_progress)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::IncorrectConfig));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_status_fails_fast() {
        let transport = Arc::new(ScriptedTransport::new(Ok(job("wat")), vec![]));
        let (_, on_progress) = collect_events();

        let err = driver(transport)
            .install_app(Some("1.1.1"), on_progress)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::UnknownStatus { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_during_polling_propagates() {
        let transport = Arc::new(ScriptedTransport::new(
            Ok(job("1")),
            vec![Err(InstallError::from_http_response(403, ""))],
        ));
        let (_, on_progress) = collect_events();

        let err = driver(transport)
            .install_app(Some("1.1.1"), on_progress)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Forbidden. The user is not an admin or does not have the CICD role."
        );
    }
}
