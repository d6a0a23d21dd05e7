//! cfrelease
//!
//! Exposes a deployed application by binding `hostname.domain` to it and
//! moving the route away from every application that held it before.

pub mod config;
pub mod error;
pub mod manager;
pub mod progress;
pub mod request;
pub mod resolver;
pub mod stage;
pub mod switcher;

#[cfg(test)]
pub(crate) mod fake;

pub use config::{ConfigError, ReleaseConfig};
pub use error::{LookupError, ReleaseError, ReleaseResult};
pub use manager::{Release, ReleaseManager};
pub use progress::{NoopProgress, ProgressSink, ReleaseStep, StepEvent, TracingProgress};
pub use request::{ReleaseContext, ReleaseRequest};
pub use stage::ReleaseStage;
