// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("could not create a valid kubeconfig")]
    NoValidConfig,

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Invalid API server URL: {0}")]
    InvalidUrl(String),

    #[error("Timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    #[error("kubectl {args} failed: {output}")]
    KubectlError { args: String, output: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Namespace creation failed: {0}")]
    NamespaceError(String),

    #[error("Invalid object snapshot: {0}")]
    SnapshotError(String),
}

impl E2eError {
    /// True when a poll gave up rather than an API call failing
    pub fn is_timeout(&self) -> bool {
        matches!(self, E2eError::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, E2eError>;
