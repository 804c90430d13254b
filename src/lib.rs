//! # sn-cicd-install
//!
//! ServiceNow CI/CD application install client.
//!
//! This crate triggers an application install on a ServiceNow instance
//! through the CI/CD REST API (`/api/sn_cicd/app_repo/install`) and polls
//! the returned progress link until the remote job reaches a terminal
//! state, surfacing progress events and a classified outcome to the caller.
//!
//! ## Features
//!
//! - `InstallConfig` holding credentials and the install target, with joint
//!   eager validation of the pipeline inputs
//! - `RequestOptions` / `build_request_url` producing the canonical,
//!   percent-encoded install URL
//! - `InstallDriver` owning the trigger request and the throttled poll loop
//! - `InstallProgress` events delivered through a caller-supplied callback
//! - `InstallError` mapping transport, HTTP, and remote-job failures onto a
//!   single closed taxonomy
//!
//! ## Example
//!
//! ```rust,no_run
//! use sn_cicd_install::{InstallConfig, InstallDriver};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let config = InstallConfig {
//!         username: "ci.bot".into(),
//!         password: "secret".into(),
//!         host: "dev12345".into(),
//!         app_sys_id: Some("f4f33d7a0b10220050192f15d6673a30".into()),
//!         ..Default::default()
//!     };
//!
//!     let driver = InstallDriver::new(config);
//!     match driver.install_app(Some("1.0.3"), |event| println!("{event}")).await {
//!         Ok(()) => println!("application installed"),
//!         Err(e) => eprintln!("install failed: {e}"),
//!     }
//! }
//! ```

mod config;
mod install;
mod request;

pub use config::{InstallConfig, MissingInput};
pub use install::{
    DriverOptions, HttpTransport, InstallDriver, InstallError, InstallProgress, JobLinks,
    JobResult, JobStatus, JobTransport, ProgressLink,
};
pub use request::{build_params, build_request_url, RequestOptions};
