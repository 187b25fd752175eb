// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! kubectl invocation bound to one cluster's kubeconfig

use crate::error::{E2eError, Result};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: String,
    kubeconfig: PathBuf,
}

impl Kubectl {
    pub fn new(binary: impl Into<String>, kubeconfig: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            kubeconfig: kubeconfig.into(),
        }
    }

    /// Arguments passed to the binary; the kubeconfig flag always comes last
    pub fn command_args(&self, args: &[&str]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string())
            .chain(std::iter::once(format!(
                "--kubeconfig={}",
                self.kubeconfig.display()
            )))
            .collect()
    }

    /// Run kubectl and return stdout followed by stderr
    #[instrument(skip(self), fields(kubeconfig = %self.kubeconfig.display()))]
    pub async fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.binary)
            .args(self.command_args(args))
            .output()
            .await?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        debug!("kubectl output: {}", combined);

        if output.status.success() {
            Ok(combined)
        } else {
            Err(E2eError::KubectlError {
                args: args.join(" "),
                output: combined,
            })
        }
    }
}
