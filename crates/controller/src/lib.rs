//! Cloud Controller v3 client
//!
//! Builds an authenticated client from the environment and implements
//! [`CloudController`](cfrelease_shared::CloudController) over the REST API.

pub mod client;
pub mod config;
mod wire;

pub use client::ControllerClient;
pub use config::{ConfigError, ControllerConfig};
