//! Release state machine

use std::fmt;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{ReleaseError, ReleaseResult};

/// Progress of a single release. A failure leaves the release at the last
/// stage it reached; nothing is rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStage {
    Idle,
    ClientConnected,
    AppResolved,
    DomainResolved,
    RouteResolved,
    RouteMapped,
    /// The route points at the target application only
    RouteExclusive,
}

impl ReleaseStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseStage::Idle => "idle",
            ReleaseStage::ClientConnected => "client_connected",
            ReleaseStage::AppResolved => "app_resolved",
            ReleaseStage::DomainResolved => "domain_resolved",
            ReleaseStage::RouteResolved => "route_resolved",
            ReleaseStage::RouteMapped => "route_mapped",
            ReleaseStage::RouteExclusive => "route_exclusive",
        }
    }
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fail with `Cancelled` if the release was cancelled. Called before every
/// remote call; a call already in flight always completes.
pub(crate) fn checkpoint(cancel: &CancellationToken, reached: ReleaseStage) -> ReleaseResult<()> {
    if cancel.is_cancelled() {
        tracing::warn!(stage = %reached, "Release cancelled");
        return Err(ReleaseError::Cancelled { reached });
    }
    Ok(())
}
