// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Dependency outage simulation
//!
//! Deletes a cluster object the controller under test depends on, waits for it
//! to disappear, then recreates it from a snapshot taken before the deletion.
//! The controller is expected to notice both transitions through its own watches.

use crate::constants::poll::{DEFAULT_TIMEOUT_SECS, INTERVAL_SECS, SETTLE_SECS};
use crate::error::{E2eError, Result};
use crate::kubernetes::observe::wait_for_absence;
use kube::{
    api::{DeleteParams, PostParams},
    core::DynamicObject,
    Api,
};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// Server-assigned fields removed from a snapshot before it is resubmitted
pub const SERVER_MANAGED_FIELDS: &[&[&str]] = &[
    &["metadata", "resourceVersion"],
    &["metadata", "uid"],
    &["metadata", "generation"],
    &["metadata", "creationTimestamp"],
    &["status"],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutagePhase {
    Present,
    Deleting,
    Absent,
    Recreating,
}

impl fmt::Display for OutagePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            OutagePhase::Present => "Present",
            OutagePhase::Deleting => "Deleting",
            OutagePhase::Absent => "Absent",
            OutagePhase::Recreating => "Recreating",
        };
        f.write_str(phase)
    }
}

/// Remove a nested field; missing intermediate objects are ignored
fn remove_nested_field(object: &mut Value, path: &[&str]) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = object;
    for key in parents {
        match current.get_mut(*key) {
            Some(next) => current = next,
            None => return,
        }
    }

    if let Some(map) = current.as_object_mut() {
        map.remove(*last);
    }
}

/// Strip [`SERVER_MANAGED_FIELDS`] so the snapshot is a valid creation payload
pub fn sanitize_snapshot(mut snapshot: Value) -> Value {
    for path in SERVER_MANAGED_FIELDS {
        remove_nested_field(&mut snapshot, path);
    }
    snapshot
}

/// Delete-and-restore of one named object
pub struct DependencyOutage {
    api: Api<DynamicObject>,
    name: String,
    timeout: Duration,
    interval: Duration,
    settle: Duration,
    phase: OutagePhase,
}

impl DependencyOutage {
    pub fn new(api: Api<DynamicObject>, name: impl Into<String>) -> Self {
        Self {
            api,
            name: name.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            interval: Duration::from_secs(INTERVAL_SECS),
            settle: Duration::from_secs(SETTLE_SECS),
            phase: OutagePhase::Present,
        }
    }

    /// Upper bound on waiting for the deletion to complete
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Fixed wait after deletion and after recreation for the controller to react
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn phase(&self) -> OutagePhase {
        self.phase
    }

    fn enter(&mut self, phase: OutagePhase) {
        debug!("{}: {} -> {}", self.name, self.phase, phase);
        self.phase = phase;
    }

    /// Run the full outage and return the recreated object
    #[instrument(skip(self), fields(name = %self.name))]
    pub async fn run(&mut self) -> Result<DynamicObject> {
        let snapshot = self.api.get(&self.name).await?;
        let snapshot = serde_json::to_value(&snapshot)
            .map_err(|e| E2eError::SnapshotError(format!("{}: {}", self.name, e)))?;

        self.enter(OutagePhase::Deleting);
        info!("Deleting {} to simulate losing the dependency", self.name);
        self.api.delete(&self.name, &DeleteParams::default()).await?;
        wait_for_absence(&self.api, &self.name, self.timeout, self.interval).await?;

        self.enter(OutagePhase::Absent);
        info!(
            "Waiting {:?} for the controller to detect the missing {}",
            self.settle, self.name
        );
        sleep(self.settle).await;

        self.enter(OutagePhase::Recreating);
        let payload: DynamicObject = serde_json::from_value(sanitize_snapshot(snapshot))
            .map_err(|e| E2eError::SnapshotError(format!("{}: {}", self.name, e)))?;
        info!("Re-creating {} to simulate restoring the dependency", self.name);
        let created = self.api.create(&PostParams::default(), &payload).await?;

        info!(
            "Waiting {:?} for the controller to detect the fresh {}",
            self.settle, self.name
        );
        sleep(self.settle).await;
        self.enter(OutagePhase::Present);

        Ok(created)
    }
}
