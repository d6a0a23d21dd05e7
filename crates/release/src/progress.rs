//! Step progress reporting
//!
//! A release reports three steps (connect, app lookup, route binding). Sinks
//! only observe: they return nothing and cannot influence the release.

use std::fmt;

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseStep {
    Connect,
    LookupApp,
    BindRoute,
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReleaseStep::Connect => "connect",
            ReleaseStep::LookupApp => "lookup_app",
            ReleaseStep::BindRoute => "bind_route",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    Begin(String),
    Update(String),
    Success,
    Abort,
}

pub trait ProgressSink: Send + Sync {
    fn notify(&self, step: ReleaseStep, event: StepEvent);
}

/// Writes step events to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn notify(&self, step: ReleaseStep, event: StepEvent) {
        match event {
            StepEvent::Begin(message) | StepEvent::Update(message) => {
                info!(step = %step, "{}", message)
            }
            StepEvent::Success => info!(step = %step, "Step complete"),
            StepEvent::Abort => warn!(step = %step, "Step aborted"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn notify(&self, _step: ReleaseStep, _event: StepEvent) {}
}
