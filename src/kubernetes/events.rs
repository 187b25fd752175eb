// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes Events emitted on behalf of a test controller

use crate::error::Result;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::Client;
use kube_runtime::events::{Event, EventType, Recorder, Reporter};
use tracing::{debug, instrument};

/// Action reported when none is set with [`TestEventRecorder::with_action`]
pub const DEFAULT_ACTION: &str = "ComplianceStateUpdate";

/// Publishes Events as if they came from the named controller, so tests can
/// feed the compliance history the addon reads.
///
/// Events for references without a namespace land in the cluster namespace.
pub struct TestEventRecorder {
    recorder: Recorder,
    controller: String,
    namespace: String,
    action: String,
}

impl TestEventRecorder {
    pub fn new(client: Client, controller: &str, instance: &str, namespace: &str) -> Self {
        let reporter = Reporter {
            controller: controller.to_string(),
            instance: Some(instance.to_string()),
        };
        Self {
            recorder: Recorder::new(client, reporter),
            controller: controller.to_string(),
            namespace: namespace.to_string(),
            action: DEFAULT_ACTION.to_string(),
        }
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = action.to_string();
        self
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[instrument(skip(self, reference, note), fields(object = ?reference.name))]
    pub async fn record(
        &self,
        reference: &ObjectReference,
        type_: EventType,
        reason: &str,
        note: Option<String>,
    ) -> Result<()> {
        let event = Event {
            type_,
            reason: reason.to_string(),
            note,
            action: self.action.clone(),
            secondary: None,
        };

        let mut reference = reference.clone();
        if reference.namespace.is_none() {
            reference.namespace = Some(self.namespace.clone());
        }

        self.recorder.publish(&event, &reference).await?;
        debug!("Recorded {} event as {}", reason, self.controller);
        Ok(())
    }
}
