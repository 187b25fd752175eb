// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Policy helpers used by individual test cases

use crate::error::Result;
use crate::kubernetes::observe::{status_field, StatusField};
use json_patch::{PatchOperation, ReplaceOperation};
use jsonptr::PointerBuf;
use kube::{
    api::{Patch, PatchParams},
    core::DynamicObject,
    Api,
};
use tracing::{info, instrument};

/// JSON patch replacing `spec.remediationAction`
pub fn remediation_action_patch(action: &str) -> json_patch::Patch {
    json_patch::Patch(vec![PatchOperation::Replace(ReplaceOperation {
        path: PointerBuf::from_tokens(["spec", "remediationAction"]),
        value: serde_json::Value::String(action.to_string()),
    })])
}

/// Set a policy's remediation action and return the patched object
#[instrument(skip(api), fields(url = %api.resource_url()))]
pub async fn patch_remediation_action(
    api: &Api<DynamicObject>,
    name: &str,
    action: &str,
) -> Result<DynamicObject> {
    let patch: Patch<()> = Patch::Json(remediation_action_patch(action));
    let patched = api.patch(name, &PatchParams::default(), &patch).await?;
    info!("Set remediationAction of {} to {}", name, action);
    Ok(patched)
}

/// Compliance state reported in `status.compliant`
pub async fn check_compliance(api: &Api<DynamicObject>, name: &str) -> Result<StatusField> {
    status_field(api, name, "compliant").await
}
