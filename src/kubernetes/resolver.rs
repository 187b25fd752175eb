// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster credential resolution
//!
//! A [`ResolveRequest`] is turned into a [`ConnectionDescriptor`] by trying, in order:
//! the explicit kubeconfig path, the `KUBECONFIG` path, in-cluster service-account
//! credentials, and finally `<home>/.kube/config`. The first source that yields a
//! usable configuration wins.

use crate::constants::env;
use crate::error::{E2eError, Result};
use kube::config::{InClusterError, KubeConfigOptions, Kubeconfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Probe for in-cluster service-account credentials
pub type InClusterProbe = fn() -> std::result::Result<kube::Config, InClusterError>;

/// Where a resolved configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    ExplicitPath,
    EnvironmentPath,
    InCluster,
    HomeConfig,
}

/// Caller-supplied hints; empty strings are treated as absent
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    pub api_url: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
}

impl ResolveRequest {
    pub fn kubeconfig(path: impl Into<PathBuf>) -> Self {
        Self {
            kubeconfig: Some(path.into()),
            ..Default::default()
        }
    }
}

/// Process-level state consulted when the request carries no explicit path.
///
/// Captured once at startup so resolution itself never touches the environment.
#[derive(Debug, Clone, Default)]
pub struct Ambient {
    pub kubeconfig_env: Option<PathBuf>,
    pub home_dir: Option<PathBuf>,
    pub in_cluster: Option<InClusterProbe>,
}

impl Ambient {
    pub fn from_env() -> Self {
        let kubeconfig_env = std::env::var_os(env::KUBECONFIG)
            .and_then(|v| std::env::split_paths(&v).next())
            .filter(|p| !p.as_os_str().is_empty());
        let home_dir = std::env::var_os(env::HOME)
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty());

        Self {
            kubeconfig_env,
            home_dir,
            in_cluster: Some(kube::Config::incluster),
        }
    }
}

/// How to reach one cluster's API server
#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    pub api_url: Option<String>,
    pub config_path: Option<PathBuf>,
    pub context: Option<String>,
    pub source: CredentialSource,
    pub config: kube::Config,
}

/// Resolve a connection descriptor for one cluster
#[instrument(skip(ambient))]
pub async fn resolve(request: &ResolveRequest, ambient: &Ambient) -> Result<ConnectionDescriptor> {
    let api_url = request.api_url.clone().filter(|u| !u.is_empty());
    let context = request.context.clone().filter(|c| !c.is_empty());

    let established = request
        .kubeconfig
        .clone()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| (p, CredentialSource::ExplicitPath))
        .or_else(|| {
            ambient
                .kubeconfig_env
                .clone()
                .map(|p| (p, CredentialSource::EnvironmentPath))
        });

    if let Some((path, source)) = established {
        debug!("Kubeconfig path {}", path.display());
        let config = load_kubeconfig(&path, context.as_deref(), api_url.as_deref()).await?;
        return Ok(ConnectionDescriptor {
            api_url,
            config_path: Some(path),
            context,
            source,
            config,
        });
    }

    if let Some(probe) = ambient.in_cluster {
        match probe() {
            Ok(config) => {
                info!("Using in-cluster service account credentials");
                return Ok(ConnectionDescriptor {
                    api_url: None,
                    config_path: None,
                    context: None,
                    source: CredentialSource::InCluster,
                    config,
                });
            }
            Err(e) => debug!("In-cluster credentials unavailable: {}", e),
        }
    }

    if let Some(home) = &ambient.home_dir {
        let path = home.join(".kube").join("config");
        debug!("Trying default kubeconfig at {}", path.display());

        match load_kubeconfig(&path, context.as_deref(), api_url.as_deref()).await {
            Ok(config) => {
                return Ok(ConnectionDescriptor {
                    api_url,
                    config_path: Some(path),
                    context,
                    source: CredentialSource::HomeConfig,
                    config,
                })
            }
            Err(e) => debug!("Default kubeconfig unusable: {}", e),
        }
    }

    Err(E2eError::NoValidConfig)
}

async fn load_kubeconfig(
    path: &Path,
    context: Option<&str>,
    api_url: Option<&str>,
) -> Result<kube::Config> {
    let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
        E2eError::KubeconfigError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    };

    let mut config = kube::Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|e| {
            E2eError::KubeconfigError(format!(
                "Failed to create config from {}: {}",
                path.display(),
                e
            ))
        })?;

    if let Some(url) = api_url {
        config.cluster_url = parse_api_url(url)?;
    }

    Ok(config)
}

/// Parse an API server override, accepting only http(s) URLs
pub fn parse_api_url(raw: &str) -> Result<http::Uri> {
    let url = url::Url::parse(raw).map_err(|e| E2eError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(E2eError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            raw,
            url.scheme()
        )));
    }

    url.as_str()
        .parse()
        .map_err(|e| E2eError::InvalidUrl(format!("{}: {}", raw, e)))
}
