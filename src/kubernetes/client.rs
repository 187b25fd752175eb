// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client construction

use crate::error::{E2eError, Result};
use crate::kubernetes::resolver::{resolve, Ambient, ConnectionDescriptor, ResolveRequest};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    core::{ApiResource, DynamicObject, GroupVersionKind},
    Api, Client,
};
use tracing::{debug, instrument};

/// Group-Version-Resource triple selecting a resource kind for dynamic access.
///
/// `kind` is carried alongside so objects created through the dynamic client
/// get a correct `TypeMeta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceCoordinate {
    pub group: &'static str,
    pub version: &'static str,
    pub resource: &'static str,
    pub kind: &'static str,
}

impl ResourceCoordinate {
    pub fn api_resource(&self) -> ApiResource {
        ApiResource::from_gvk_with_plural(
            &GroupVersionKind::gvk(self.group, self.version, self.kind),
            self.resource,
        )
    }
}

/// Typed and dynamic clients for one cluster
#[derive(Clone)]
pub struct ClusterHandle {
    typed: Client,
    dynamic: Client,
}

impl ClusterHandle {
    /// Build both clients from one resolved descriptor.
    ///
    /// No request is sent until an API is used.
    #[instrument(skip(descriptor), fields(source = ?descriptor.source))]
    pub fn build(descriptor: &ConnectionDescriptor) -> Result<Self> {
        debug!(
            "Creating clients for url {} using kubeconfig path {:?}",
            descriptor.config.cluster_url, descriptor.config_path
        );

        let typed = Client::try_from(descriptor.config.clone()).map_err(|e| {
            E2eError::KubeconfigError(format!("Failed to create typed client: {}", e))
        })?;
        let dynamic = Client::try_from(descriptor.config.clone()).map_err(|e| {
            E2eError::KubeconfigError(format!("Failed to create dynamic client: {}", e))
        })?;

        Ok(Self { typed, dynamic })
    }

    /// Resolve credentials and build the handle in one step
    pub async fn connect(request: &ResolveRequest, ambient: &Ambient) -> Result<Self> {
        let descriptor = resolve(request, ambient).await?;
        Self::build(&descriptor)
    }

    /// Wrap an existing client, used for both typed and dynamic access
    pub fn from_client(client: Client) -> Self {
        Self {
            typed: client.clone(),
            dynamic: client,
        }
    }

    pub fn typed(&self) -> &Client {
        &self.typed
    }

    pub fn namespaces(&self) -> Api<Namespace> {
        Api::all(self.typed.clone())
    }

    /// Dynamic API for a cluster-scoped resource
    pub fn dynamic(&self, gvr: &ResourceCoordinate) -> Api<DynamicObject> {
        Api::all_with(self.dynamic.clone(), &gvr.api_resource())
    }

    /// Dynamic API for a namespaced resource
    pub fn dynamic_namespaced(
        &self,
        gvr: &ResourceCoordinate,
        namespace: &str,
    ) -> Api<DynamicObject> {
        Api::namespaced_with(self.dynamic.clone(), namespace, &gvr.api_resource())
    }
}
