// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Suite-wide setup shared by every test case

use crate::config::Config;
use crate::constants::{CRD, GATEKEEPER_CRD_NAME, POLICY, TEST_CONTROLLER_NAME};
use crate::error::Result;
use crate::kubernetes::events::TestEventRecorder;
use crate::kubernetes::kubectl::Kubectl;
use crate::kubernetes::namespaces::{create_namespace, ensure_namespace_exists};
use crate::kubernetes::observe::{wait_for_existence, StatusField};
use crate::kubernetes::outage::DependencyOutage;
use crate::kubernetes::policy::{check_compliance, patch_remediation_action};
use crate::kubernetes::resolver::{Ambient, ResolveRequest};
use crate::kubernetes::ClusterHandle;
use kube::core::DynamicObject;
use tracing::{info, instrument};

/// Clients and settings for the hub and managed clusters
pub struct Suite {
    pub config: Config,
    pub hub: ClusterHandle,
    pub managed: ClusterHandle,
    pub kubectl_hub: Kubectl,
    pub kubectl_managed: Kubectl,
    pub managed_recorder: TestEventRecorder,
}

impl Suite {
    /// Connect to both clusters and prepare them for the test cases
    pub async fn setup(config: Config, ambient: &Ambient) -> Result<Self> {
        info!("Setup Hub and Managed client");
        let hub =
            ClusterHandle::connect(&ResolveRequest::kubeconfig(&config.kubeconfig_hub), ambient)
                .await?;
        let managed = ClusterHandle::connect(
            &ResolveRequest::kubeconfig(&config.kubeconfig_managed),
            ambient,
        )
        .await?;

        let suite = Self::from_handles(config, hub, managed);
        suite.prepare().await?;
        Ok(suite)
    }

    /// Assemble a suite from already-built cluster handles
    pub fn from_handles(config: Config, hub: ClusterHandle, managed: ClusterHandle) -> Self {
        let kubectl_hub = Kubectl::new(&config.kubectl, &config.kubeconfig_hub);
        let kubectl_managed = Kubectl::new(&config.kubectl, &config.kubeconfig_managed);
        let managed_recorder = TestEventRecorder::new(
            managed.typed().clone(),
            TEST_CONTROLLER_NAME,
            TEST_CONTROLLER_NAME,
            config.cluster_namespace(),
        );

        Self {
            config,
            hub,
            managed,
            kubectl_hub,
            kubectl_managed,
            managed_recorder,
        }
    }

    /// Provision namespaces and, unless disabled, simulate a Gatekeeper reinstall
    #[instrument(skip(self))]
    pub async fn prepare(&self) -> Result<()> {
        info!("Create Namespace if needed");
        ensure_namespace_exists(self.hub.typed(), &self.config.cluster_namespace_on_hub).await?;
        ensure_namespace_exists(self.managed.typed(), &self.config.test_namespace).await?;

        if let Some(namespace) = &self.config.cluster_namespace_override {
            create_namespace(self.managed.typed(), namespace).await?;
        }

        if self.config.gk_sync_disabled {
            info!("Gatekeeper sync disabled, skipping the ConstraintTemplate CRD outage");
            return Ok(());
        }

        // The gatekeeper-sync controller must stop when the CRD goes away and
        // start again once it is back; later test cases check it is running.
        DependencyOutage::new(self.managed.dynamic(&CRD), GATEKEEPER_CRD_NAME)
            .with_timeout(self.config.default_timeout)
            .with_interval(self.config.poll_interval)
            .with_settle(self.config.settle_delay)
            .run()
            .await?;

        Ok(())
    }

    /// Compliance of a policy in the managed cluster namespace
    pub async fn check_compliance(&self, name: &str) -> Result<StatusField> {
        let api = self
            .managed
            .dynamic_namespaced(&POLICY, self.config.cluster_namespace());
        check_compliance(&api, name).await
    }

    /// JSON-patch `spec.remediationAction` of `policy` through `cluster`
    pub async fn patch_remediation_action(
        &self,
        cluster: &ClusterHandle,
        policy: &DynamicObject,
        action: &str,
    ) -> Result<DynamicObject> {
        let namespace = policy
            .metadata
            .namespace
            .as_deref()
            .unwrap_or(self.config.cluster_namespace());
        let name = policy.metadata.name.as_deref().unwrap_or_default();
        let api = cluster.dynamic_namespaced(&POLICY, namespace);
        patch_remediation_action(&api, name, action).await
    }

    /// Apply a policy manifest on the hub and wait for the policy to exist
    #[instrument(skip(self))]
    pub async fn hub_apply_policy(&self, name: &str, path: &str) -> Result<DynamicObject> {
        let namespace = self.config.cluster_namespace_on_hub.as_str();
        info!("Applying policy {} to the hub in ns: {}", path, namespace);

        self.kubectl_hub
            .run(&["apply", "-f", path, "-n", namespace])
            .await?;

        let api = self.hub.dynamic_namespaced(&POLICY, namespace);
        wait_for_existence(&api, name, self.config.default_timeout, self.config.poll_interval)
            .await?;
        Ok(api.get(name).await?)
    }
}
