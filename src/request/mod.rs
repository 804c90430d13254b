//! Request construction for the CI/CD install endpoint.
//!
//! This module turns a validated parameter set into a safe, canonical query
//! string and absolute URL. It provides:
//!
//! - [`RequestOptions`]: the parameters accepted by the install endpoint
//! - [`build_params`]: fixed-order, percent-encoded query serialization
//! - [`build_request_url`]: the fully qualified install URL for an instance

mod params;
mod url;

pub use params::{build_params, RequestOptions};
pub use url::build_request_url;
