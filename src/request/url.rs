//! Absolute URL construction for the install endpoint.

use crate::install::InstallError;

use super::params::{build_params, RequestOptions};

/// Build the fully qualified install URL for an instance.
///
/// Fails with [`InstallError::IncorrectConfig`] when `host` is empty or when
/// neither `sys_id` nor `scope` carries a value (an empty string counts as
/// absent). Pure function of its inputs; nothing is sent.
///
/// # Example
///
/// ```rust
/// use sn_cicd_install::{build_request_url, RequestOptions};
///
/// let options = RequestOptions {
///     sys_id: Some("123".into()),
///     version: "1.1.1".into(),
///     ..Default::default()
/// };
/// assert_eq!(
///     build_request_url("test", &options).unwrap(),
///     "https://test.service-now.com/api/sn_cicd/app_repo/install?sys_id=123&version=1.1.1"
/// );
/// ```
pub fn build_request_url(host: &str, options: &RequestOptions) -> Result<String, InstallError> {
    let has_target = options.sys_id.as_deref().is_some_and(|v| !v.is_empty())
        || options.scope.as_deref().is_some_and(|v| !v.is_empty());

    if host.is_empty() || !has_target {
        return Err(InstallError::IncorrectConfig);
    }

    Ok(format!(
        "https://{host}.service-now.com/api/sn_cicd/app_repo/install?{}",
        build_params(options)
    ))
}
