//! Artifact Registry Tools Library
//!
//! Host-side helpers for deploying and administering the artifact registry
//! contract: network configuration resolution and `stellar` CLI invocation
//! plumbing.

pub mod config;
pub mod stellar;

pub use config::{Config, ConfigError, Network};
