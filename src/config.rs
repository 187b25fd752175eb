// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{env, poll, TEST_NAMESPACE};
use std::path::PathBuf;
use std::time::Duration;

/// Suite configuration assembled from command-line flags and environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub kubeconfig_hub: PathBuf,
    pub kubeconfig_managed: PathBuf,
    /// Namespace holding test policies on the managed cluster
    pub test_namespace: String,
    /// Namespace on the hub where policies for this cluster are applied
    pub cluster_namespace_on_hub: String,
    /// Managed cluster namespace override, created during setup when present
    pub cluster_namespace_override: Option<String>,
    pub gk_sync_disabled: bool,
    pub default_timeout: Duration,
    pub poll_interval: Duration,
    pub settle_delay: Duration,
    pub kubectl: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env(kubeconfig_hub: PathBuf, kubeconfig_managed: PathBuf) -> Self {
        Self::from_lookup(kubeconfig_hub, kubeconfig_managed, |key| {
            std::env::var(key).ok()
        })
    }

    /// Load configuration reading variables through `lookup`
    pub fn from_lookup<F>(kubeconfig_hub: PathBuf, kubeconfig_managed: PathBuf, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let test_namespace = TEST_NAMESPACE.to_string();
        let cluster_namespace_on_hub =
            non_empty(env::CLUSTER_NAMESPACE_ON_HUB).unwrap_or_else(|| test_namespace.clone());
        let gk_sync_disabled = lookup(env::DISABLE_GK_SYNC).is_some_and(|v| v == "true");

        Config {
            kubeconfig_hub,
            kubeconfig_managed,
            test_namespace,
            cluster_namespace_on_hub,
            cluster_namespace_override: non_empty(env::CLUSTER_NAMESPACE),
            gk_sync_disabled,
            default_timeout: Duration::from_secs(poll::DEFAULT_TIMEOUT_SECS),
            poll_interval: Duration::from_secs(poll::INTERVAL_SECS),
            settle_delay: Duration::from_secs(poll::SETTLE_SECS),
            kubectl: "kubectl".to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Namespace where the addon reports compliance on the managed cluster
    pub fn cluster_namespace(&self) -> &str {
        self.cluster_namespace_override
            .as_deref()
            .unwrap_or(&self.test_namespace)
    }
}
