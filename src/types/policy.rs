// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[kube(group = "policy.open-cluster-management.io", version = "v1", kind = "Policy")]
#[kube(namespaced)]
#[kube(status = "PolicyStatus")]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_action: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(
        rename = "policy-templates",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub policy_templates: Vec<serde_json::Value>,
}

impl Policy {
    pub fn remediation_action(&self) -> Option<&str> {
        self.spec.remediation_action.as_deref()
    }

    /// Compliance reported by the addon, if any
    pub fn compliance(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.compliant.as_deref())
    }

    pub fn is_compliant(&self) -> bool {
        self.compliance() == Some("Compliant")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliant: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<serde_json::Value>,
}
