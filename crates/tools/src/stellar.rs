//! Thin wrapper around the `stellar` CLI
//!
//! Commands are built as plain argument vectors so they can be inspected and
//! unit tested without spawning anything; only [`StellarCli::run`] touches
//! the outside world.

use crate::config::Config;
use anyhow::{bail, Context, Result};
use tokio::process::Command;

/// Builds and runs `stellar` CLI invocations against the configured network.
pub struct StellarCli {
    config: Config,
}

impl StellarCli {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn network_args(&self) -> Vec<String> {
        let mut args = vec![
            "--rpc-url".to_string(),
            self.config.rpc_url.clone(),
            "--network-passphrase".to_string(),
            self.config.network_passphrase.clone(),
        ];
        if let Some(account) = &self.config.source_account {
            args.push("--source-account".to_string());
            args.push(account.clone());
        }
        args
    }

    /// `stellar contract deploy` arguments for the registry wasm.
    pub fn deploy_command(&self, wasm: &str) -> Vec<String> {
        let mut args = vec![
            "contract".to_string(),
            "deploy".to_string(),
            "--wasm".to_string(),
            wasm.to_string(),
        ];
        args.extend(self.network_args());
        args
    }

    /// `stellar contract invoke` arguments for one registry entry point.
    /// `fn_args` are (name, value) pairs appended after the `--` separator.
    pub fn invoke_command(
        &self,
        contract_id: &str,
        function: &str,
        fn_args: &[(&str, String)],
    ) -> Vec<String> {
        let mut args = vec![
            "contract".to_string(),
            "invoke".to_string(),
            "--id".to_string(),
            contract_id.to_string(),
        ];
        args.extend(self.network_args());
        args.push("--".to_string());
        args.push(function.to_string());
        for (name, value) in fn_args {
            args.push(format!("--{}", name));
            args.push(value.clone());
        }
        args
    }

    /// Run a prepared command, returning trimmed stdout.
    pub async fn run(&self, args: &[String]) -> Result<String> {
        let output = Command::new("stellar")
            .args(args)
            .output()
            .await
            .context("failed to spawn the stellar CLI; is it installed?")?;

        if !output.status.success() {
            bail!(
                "stellar {} failed: {}",
                args.first().map(String::as_str).unwrap_or(""),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
