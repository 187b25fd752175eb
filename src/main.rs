// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use policy_e2e::config::Config;
use policy_e2e::constants::{poll, DEFAULT_KUBECONFIG_HUB, DEFAULT_KUBECONFIG_MANAGED};
use policy_e2e::kubernetes::Ambient;
use policy_e2e::suite::Suite;

/// Prepare the hub and managed clusters for the governance addon e2e tests
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Location of the hub kubeconfig; KUBECONFIG is used when empty
    #[arg(long = "kubeconfig_hub", default_value = DEFAULT_KUBECONFIG_HUB)]
    kubeconfig_hub: PathBuf,

    /// Location of the managed kubeconfig; KUBECONFIG is used when empty
    #[arg(long = "kubeconfig_managed", default_value = DEFAULT_KUBECONFIG_MANAGED)]
    kubeconfig_managed: PathBuf,

    /// Default polling timeout in seconds
    #[arg(long, default_value_t = poll::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = Config::from_env(args.kubeconfig_hub, args.kubeconfig_managed)
        .with_timeout(Duration::from_secs(args.timeout));
    info!(
        "Configuration loaded: hub namespace={}, cluster namespace={}, gk_sync_disabled={}",
        config.cluster_namespace_on_hub,
        config.cluster_namespace(),
        config.gk_sync_disabled
    );

    let suite = Suite::setup(config, &Ambient::from_env())
        .await
        .context("suite setup failed")?;

    info!(
        "Suite ready: hub namespace {}, managed namespace {}",
        suite.config.cluster_namespace_on_hub,
        suite.config.cluster_namespace()
    );
    Ok(())
}
