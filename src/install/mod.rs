//! Remote application-install job: trigger, polling, classification.
//!
//! This module owns the driver that starts an install job on the instance
//! and tracks it through its status lifecycle. Use
//! [`InstallDriver::install_app`] to run one install end to end.
//!
//! # Example
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
//!         app_scope: Some("x_acme_app".into()),
//!         ..Default::default()
//!     };
//!
//!     let outcome = InstallDriver::new(config)
//!         .install_app(Some("1.0.3"), |event| println!("{event}"))
//!         .await;
//!
//!     if let Err(e) = outcome {
//!         eprintln!("install failed: {e}");
//!     }
//! }
//! ```

mod driver;
mod errors;
mod progress;
mod transport;
mod types;

pub use driver::{DriverOptions, InstallDriver};
pub use errors::InstallError;
pub use progress::InstallProgress;
pub use transport::{HttpTransport, JobTransport};
pub use types::{JobLinks, JobResult, JobStatus, ProgressLink};
