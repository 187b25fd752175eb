// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for credential resolution, client creation, polling and fault injection.

pub mod client;
pub mod events;
pub mod kubectl;
pub mod namespaces;
pub mod observe;
pub mod outage;
pub mod policy;
pub mod resolver;

pub use client::{ClusterHandle, ResourceCoordinate};
pub use kubectl::Kubectl;
pub use namespaces::ensure_namespace_exists;
pub use observe::{poll, wait_until, StatusField};
pub use outage::{DependencyOutage, OutagePhase};
pub use resolver::{resolve, Ambient, ConnectionDescriptor, CredentialSource, ResolveRequest};
