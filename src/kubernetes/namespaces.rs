// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test namespace provisioning

use crate::error::{E2eError, Result};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use tracing::{debug, info, instrument};

/// Ensure a namespace exists in the cluster, create if it doesn't
#[instrument(skip(client))]
pub async fn ensure_namespace_exists(client: &Client, namespace: &str) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.get(namespace).await {
        Ok(_) => {
            debug!("Namespace {} already exists", namespace);
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 404 => create_namespace(client, namespace).await,
        Err(e) => Err(E2eError::NamespaceError(format!(
            "Failed to check namespace {}: {}",
            namespace, e
        ))),
    }
}

/// Create a namespace, treating "already exists" as success
#[instrument(skip(client))]
pub async fn create_namespace(client: &Client, namespace: &str) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let ns = Namespace {
        metadata: ObjectMeta {
            name: Some(namespace.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    match namespaces.create(&PostParams::default(), &ns).await {
        Ok(_) => {
            info!("Namespace {} created successfully", namespace);
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 409 => {
            debug!("Namespace {} already exists", namespace);
            Ok(())
        }
        Err(e) => Err(E2eError::NamespaceError(format!(
            "Failed to create namespace {}: {}",
            namespace, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{already_exists_json, namespace_json, MockService};

    #[tokio::test]
    async fn test_existing_namespace_is_left_alone() {
        let mock = MockService::new().on_get(
            "/api/v1/namespaces/managed",
            200,
            &namespace_json("managed"),
        );
        ensure_namespace_exists(&mock.clone().into_client(), "managed")
            .await
            .unwrap();

        assert!(mock.requests_to("POST", "/api/v1/namespaces").is_empty());
    }

    #[tokio::test]
    async fn test_missing_namespace_is_created() {
        let mock =
            MockService::new().on_post("/api/v1/namespaces", 201, &namespace_json("managed"));
        ensure_namespace_exists(&mock.clone().into_client(), "managed")
            .await
            .unwrap();

        let posts = mock.requests_to("POST", "/api/v1/namespaces");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].json()["metadata"]["name"], "managed");
    }

    #[tokio::test]
    async fn test_create_tolerates_already_exists() {
        let mock = MockService::new().on_post(
            "/api/v1/namespaces",
            409,
            &already_exists_json("namespaces", "cluster1"),
        );

        create_namespace(&mock.into_client(), "cluster1").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_surfaces_other_errors() {
        let body = serde_json::json!({
            "kind": "Status", "apiVersion": "v1", "status": "Failure",
            "message": "forbidden", "reason": "Forbidden", "code": 403
        });
        let mock = MockService::new().on_post("/api/v1/namespaces", 403, &body.to_string());

        let err = create_namespace(&mock.into_client(), "cluster1")
            .await
            .unwrap_err();
        assert!(matches!(err, E2eError::NamespaceError(_)));
    }
}
