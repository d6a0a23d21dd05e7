//! cfrelease binary
//!
//! Binds a route to a deployed application and prints the live URL.
//!
//! Usage:
//!   cfrelease [deployment.json]
//!
//! Environment:
//! - CF_API, CF_TOKEN: controller endpoint and access token
//! - RELEASE_DOMAIN, RELEASE_HOSTNAME: route to bind
//! - CF_APP_GUID, CF_APP_NAME, CF_ORG_GUID, CF_SPACE_GUID: deployment,
//!   when no descriptor file is given
//! - CF_SOURCE_APP: logical app name, defaults to the deployment name

use std::env;
use std::path::Path;
use std::sync::Arc;

use cfrelease::config::{deployment_from_env, load_deployment};
use cfrelease::{ReleaseConfig, ReleaseContext, ReleaseManager, TracingProgress};
use cfrelease_controller::ControllerConfig;
use cfrelease_shared::Source;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the release URL
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ReleaseConfig::from_env()?;
    let controller = ControllerConfig::from_env()?;
    let deployment = match env::args().nth(1) {
        Some(path) => load_deployment(Path::new(&path))?,
        None => deployment_from_env()?,
    };
    let source = Source::new(env::var("CF_SOURCE_APP").unwrap_or_else(|_| deployment.name.clone()));

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current call");
                cancel.cancel();
            }
        });
    }

    let ctx = ReleaseContext::new(source, deployment)
        .with_progress(Arc::new(TracingProgress))
        .with_cancellation(cancel);

    match ReleaseManager::new(config).release(&controller, &ctx).await {
        Ok(release) => {
            println!("{}", release.url());
            Ok(())
        }
        Err(e) => {
            error!(
                stage = %e.reached_stage(),
                partial = e.is_partial(),
                "Release failed: {}",
                e
            );
            Err(e.into())
        }
    }
}
