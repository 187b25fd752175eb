// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use crate::kubernetes::ResourceCoordinate;

/// Environment variables read at suite start
pub mod env {
    /// Ambient kubeconfig location
    pub const KUBECONFIG: &str = "KUBECONFIG";
    /// Cluster namespace on the managed cluster (optional)
    pub const CLUSTER_NAMESPACE: &str = "E2E_CLUSTER_NAMESPACE";
    /// Cluster namespace on the hub (optional)
    pub const CLUSTER_NAMESPACE_ON_HUB: &str = "E2E_CLUSTER_NAMESPACE_ON_HUB";
    /// When set to "true", skips the Gatekeeper CRD outage during setup
    pub const DISABLE_GK_SYNC: &str = "DISABLE_GK_SYNC";
    pub const HOME: &str = "HOME";
}

pub const DEFAULT_KUBECONFIG_HUB: &str = "../../kubeconfig_hub_e2e";
pub const DEFAULT_KUBECONFIG_MANAGED: &str = "../../kubeconfig_managed_e2e";

/// Namespace used for test policies on the managed cluster
pub const TEST_NAMESPACE: &str = "managed";

/// Name the test event recorder reports as
pub const TEST_CONTROLLER_NAME: &str = "status-sync-controller-test";

/// CRD removed and restored to exercise the gatekeeper-sync restart
pub const GATEKEEPER_CRD_NAME: &str = "constrainttemplates.templates.gatekeeper.sh";

/// Polling configuration
pub mod poll {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const INTERVAL_SECS: u64 = 1;
    /// Fixed wait for the addon to notice a CRD deletion or recreation
    pub const SETTLE_SECS: u64 = 10;
}

pub const POLICY: ResourceCoordinate = ResourceCoordinate {
    group: "policy.open-cluster-management.io",
    version: "v1",
    resource: "policies",
    kind: "Policy",
};

pub const CONFIGURATION_POLICY: ResourceCoordinate = ResourceCoordinate {
    group: "policy.open-cluster-management.io",
    version: "v1",
    resource: "configurationpolicies",
    kind: "ConfigurationPolicy",
};

pub const CONSTRAINT_TEMPLATE: ResourceCoordinate = ResourceCoordinate {
    group: "templates.gatekeeper.sh",
    version: "v1",
    resource: "constrainttemplates",
    kind: "ConstraintTemplate",
};

pub const CRD: ResourceCoordinate = ResourceCoordinate {
    group: "apiextensions.k8s.io",
    version: "v1",
    resource: "customresourcedefinitions",
    kind: "CustomResourceDefinition",
};

pub const SECRET: ResourceCoordinate = ResourceCoordinate {
    group: "",
    version: "v1",
    resource: "secrets",
    kind: "Secret",
};

pub const EVENT: ResourceCoordinate = ResourceCoordinate {
    group: "",
    version: "v1",
    resource: "events",
    kind: "Event",
};
