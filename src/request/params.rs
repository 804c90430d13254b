//! Query-string serialization for the install endpoint.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in query values.
///
/// `NON_ALPHANUMERIC` minus the marks JavaScript's `encodeURIComponent`
/// leaves intact, so values serialize byte-for-byte the way the instance
/// expects them.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Parameters accepted by the install endpoint.
///
/// `version` is always required; the remaining fields are optional and are
/// omitted from the serialized query when absent or empty. The application
/// is identified by `sys_id` or `scope` (callers resolving both give
/// `sys_id` precedence and set only one).
///
/// # Example
///
/// ```rust
/// use sn_cicd_install::RequestOptions;
///
/// let options = RequestOptions {
///     scope: Some("x_acme_app".into()),
///     version: "1.1.1".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// sys_id of the application to install.
    pub sys_id: Option<String>,

    /// Scope of the application to install.
    pub scope: Option<String>,

    /// Application version to install. Required.
    pub version: String,

    /// Whether the instance should upgrade the base application first.
    pub auto_upgrade_base_app: Option<bool>,

    /// Base application version to upgrade to before installing.
    pub base_app_version: Option<String>,
}

/// Serialize `options` into a query string.
///
/// Fields are visited in a fixed order (`sys_id`, `scope`, `version`,
/// `auto_upgrade_base_app`, `base_app_version`); each present, non-empty
/// value contributes `key=percent_encode(value)` and the pieces are joined
/// with `&`. Empty or absent fields are dropped entirely; the remote API
/// rejects `key=` parameters.
///
/// # Example
///
/// ```rust
/// use sn_cicd_install::{build_params, RequestOptions};
///
/// let options = RequestOptions {
///     sys_id: Some("123".into()),
///     version: "1.1.1".into(),
///     ..Default::default()
/// };
/// assert_eq!(build_params(&options), "sys_id=123&version=1.1.1");
/// ```
pub fn build_params(options: &RequestOptions) -> String {
    let auto_upgrade = options.auto_upgrade_base_app.map(|v| v.to_string());

    let fields = [
        ("sys_id", options.sys_id.as_deref()),
        ("scope", options.scope.as_deref()),
        ("version", Some(options.version.as_str())),
        ("auto_upgrade_base_app", auto_upgrade.as_deref()),
        ("base_app_version", options.base_app_version.as_deref()),
    ];

    fields
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| format!("{key}={}", utf8_percent_encode(v, QUERY_VALUE)))
        })
        .collect::<Vec<_>>()
        .join("&")
}
