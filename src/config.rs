//! Install configuration loaded from the pipeline environment.
//!
//! This module provides [`InstallConfig`], the immutable set of credentials
//! and install-target settings one driver run needs, along with the joint
//! eager validation of the required pipeline inputs: every missing input is
//! collected and reported in a single failure before any network activity.

use std::env;
use std::fmt;

use crate::install::InstallError;

/// A required pipeline input that was found to be absent.
///
/// The `Display` strings are the exact reasons surfaced to the pipeline log,
/// joined together when several inputs are missing at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    /// `nowUsername` is empty or unset.
    Username,
    /// `nowPassword` is empty or unset.
    Password,
    /// `nowInstallInstance` is empty or unset.
    InstallInstance,
    /// Neither `appSysID` nor `appScope` carries a value.
    SysIdOrScope,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Username => "nowUsername is not set",
            Self::Password => "nowPassword is not set",
            Self::InstallInstance => "nowInstallInstance is not set",
            Self::SysIdOrScope => "Please specify scope or sys_id",
        };
        f.write_str(reason)
    }
}

/// Credentials and install target for one driver run.
///
/// The instance is addressed by its name only: `host` is the `{host}` part
/// of `https://{host}.service-now.com`. The application may be identified by
/// `app_sys_id`, `app_scope`, or both; when both are set the sys_id wins.
///
/// The struct is assembled once (from the environment or a literal) and not
/// mutated afterwards.
///
/// # Example
///
/// ```rust
/// use sn_cicd_install::InstallConfig;
///
/// let config = InstallConfig {
///     username: "ci.bot".into(),
///     password: "secret".into(),
///     host: "dev12345".into(),
///     app_scope: Some("x_acme_app".into()),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InstallConfig {
    /// Basic-auth username.
    pub username: String,

    /// Basic-auth password.
    pub password: String,

    /// Instance name, i.e. the `{host}` in `https://{host}.service-now.com`.
    pub host: String,

    /// sys_id of the application to install. Wins over `app_scope`.
    pub app_sys_id: Option<String>,

    /// Scope of the application to install.
    pub app_scope: Option<String>,

    /// Verbose logging requested by the pipeline.
    pub debug: bool,
}

impl InstallConfig {
    /// Load the configuration from the pipeline environment.
    ///
    /// Reads `nowUsername`, `nowPassword`, `nowInstallInstance`, `appSysID`,
    /// `appScope`, and `appDebug` (the flag parses `"true"` only), then runs
    /// [`validate`](Self::validate). Empty variables count as unset.
    pub fn from_env() -> Result<Self, InstallError> {
        let config = Self {
            username: var("nowUsername").unwrap_or_default(),
            password: var("nowPassword").unwrap_or_default(),
            host: var("nowInstallInstance").unwrap_or_default(),
            app_sys_id: var("appSysID"),
            app_scope: var("appScope"),
            debug: matches!(env::var("appDebug").as_deref(), Ok("true")),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every required input is present.
    ///
    /// The checks run as one pass over a declarative list; every failing
    /// check contributes a [`MissingInput`] to a single
    /// [`InstallError::MissingConfig`], so the pipeline reports all missing
    /// secrets together instead of one per run.
    pub fn validate(&self) -> Result<(), InstallError> {
        let checks = [
            (self.username.is_empty(), MissingInput::Username),
            (self.password.is_empty(), MissingInput::Password),
            (self.host.is_empty(), MissingInput::InstallInstance),
            (
                self.sys_id().is_none() && self.scope().is_none(),
                MissingInput::SysIdOrScope,
            ),
        ];

        let missing: Vec<MissingInput> = checks
            .into_iter()
            .filter(|(absent, _)| *absent)
            .map(|(_, input)| input)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(InstallError::MissingConfig { missing })
        }
    }

    /// The configured sys_id, treating the empty string as absent.
    pub fn sys_id(&self) -> Option<&str> {
        present(&self.app_sys_id)
    }

    /// The configured scope, treating the empty string as absent.
    pub fn scope(&self) -> Option<&str> {
        present(&self.app_scope)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
