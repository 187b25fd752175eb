// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Polling helpers for eventually-consistent cluster state

use crate::error::{E2eError, Result};
use kube::{core::DynamicObject, Api};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, instrument, warn};

/// Attempt `predicate` every `interval` until it holds or `timeout` elapses.
///
/// Returns `Ok(false)` on timeout. A predicate error ends polling immediately;
/// predicates turn "not yet" conditions such as a 404 into `Ok(false)` themselves.
pub async fn poll<F, Fut>(timeout: Duration, interval: Duration, mut predicate: F) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        if predicate().await? {
            debug!(attempt, "Condition met");
            return Ok(true);
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Like [`poll`], but a timeout becomes [`E2eError::Timeout`] naming `what`
pub async fn wait_until<F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    predicate: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    if poll(timeout, interval, predicate).await? {
        Ok(())
    } else {
        warn!("Timed out after {:?} waiting for {}", timeout, what);
        Err(E2eError::Timeout {
            what: what.to_string(),
            timeout,
        })
    }
}

/// True once the named object can be retrieved
pub async fn exists(api: &Api<DynamicObject>, name: &str) -> Result<bool> {
    Ok(api.get_opt(name).await?.is_some())
}

/// True once retrieving the named object yields not-found
pub async fn absent(api: &Api<DynamicObject>, name: &str) -> Result<bool> {
    Ok(api.get_opt(name).await?.is_none())
}

#[instrument(skip(api, timeout, interval), fields(url = %api.resource_url()))]
pub async fn wait_for_existence(
    api: &Api<DynamicObject>,
    name: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<()> {
    let what = format!("{} to exist", name);
    wait_until(&what, timeout, interval, move || exists(api, name)).await
}

#[instrument(skip(api, timeout, interval), fields(url = %api.resource_url()))]
pub async fn wait_for_absence(
    api: &Api<DynamicObject>,
    name: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<()> {
    let what = format!("{} to be deleted", name);
    wait_until(&what, timeout, interval, move || absent(api, name)).await
}

/// Outcome of reading `status.<field>` from an object.
///
/// Each variant is a distinct non-matching result so a failed wait says
/// which step was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusField {
    NotFound,
    NoStatus,
    FieldAbsent(String),
    Value(String),
}

impl StatusField {
    pub fn from_object(object: &DynamicObject, field: &str) -> Self {
        let Some(status) = object.data.get("status").and_then(|s| s.as_object()) else {
            return StatusField::NoStatus;
        };

        match status.get(field) {
            Some(serde_json::Value::String(s)) => StatusField::Value(s.clone()),
            Some(v) if v.is_boolean() || v.is_number() => StatusField::Value(v.to_string()),
            _ => StatusField::FieldAbsent(field.to_string()),
        }
    }

    pub fn matches(&self, expected: &str) -> bool {
        matches!(self, StatusField::Value(v) if v == expected)
    }
}

impl fmt::Display for StatusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusField::NotFound => write!(f, "object not found"),
            StatusField::NoStatus => write!(f, "object has no status"),
            StatusField::FieldAbsent(field) => write!(f, "object status has no {}", field),
            StatusField::Value(v) => write!(f, "{}", v),
        }
    }
}

/// Read `status.<field>` of the named object; a missing object is [`StatusField::NotFound`]
pub async fn status_field(
    api: &Api<DynamicObject>,
    name: &str,
    field: &str,
) -> Result<StatusField> {
    Ok(match api.get_opt(name).await? {
        Some(object) => StatusField::from_object(&object, field),
        None => StatusField::NotFound,
    })
}

/// Wait until `status.<field>` of the named object equals `expected`
pub async fn wait_for_status_field(
    api: &Api<DynamicObject>,
    name: &str,
    field: &str,
    expected: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<()> {
    let what = format!("{} status.{} to be {}", name, field, expected);
    wait_until(&what, timeout, interval, move || async move {
        let observed = status_field(api, name, field).await?;
        debug!("{} status.{}: {}", name, field, observed);
        Ok(observed.matches(expected))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::POLICY;
    use crate::test_utils::{not_found_json, MockService};
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    const SHORT: Duration = Duration::from_millis(10);

    fn policy(status: Option<serde_json::Value>) -> DynamicObject {
        let mut object = json!({
            "apiVersion": "policy.open-cluster-management.io/v1",
            "kind": "Policy",
            "metadata": {"name": "case1", "namespace": "managed"},
            "spec": {"remediationAction": "inform"}
        });
        if let Some(status) = status {
            object["status"] = status;
        }
        serde_json::from_value(object).unwrap()
    }

    fn policy_api(mock: MockService) -> Api<DynamicObject> {
        Api::namespaced_with(mock.into_client(), "managed", &POLICY.api_resource())
    }

    const POLICY_PATH: &str =
        "/apis/policy.open-cluster-management.io/v1/namespaces/managed/policies/case1";

    #[tokio::test]
    async fn test_poll_returns_true_when_predicate_eventually_holds() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let ok = poll(Duration::from_secs(5), SHORT, move || async move {
            Ok(counter.fetch_add(1, Ordering::SeqCst) >= 2)
        })
        .await
        .unwrap();

        assert!(ok);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_times_out_with_false() {
        let ok = poll(Duration::from_millis(50), SHORT, || async { Ok(false) })
            .await
            .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_poll_propagates_predicate_error() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let err = poll(Duration::from_secs(5), SHORT, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<bool, _>(E2eError::NamespaceError("boom".to_string()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, E2eError::NamespaceError(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wait_until_reports_timeout_distinctly() {
        let err = wait_until("the moon", Duration::from_millis(30), SHORT, || async {
            Ok(false)
        })
        .await
        .unwrap_err();

        assert!(err.is_timeout());
        assert!(err.to_string().contains("the moon"));
    }

    #[tokio::test]
    async fn test_absence_on_already_absent_object_returns_immediately() {
        let mock = MockService::new();
        let api = policy_api(mock.clone());

        let start = std::time::Instant::now();
        wait_for_absence(&api, "case1", Duration::from_secs(30), Duration::from_secs(1))
            .await
            .unwrap();

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(mock.requests_to("GET", POLICY_PATH).len(), 1);
    }

    #[tokio::test]
    async fn test_existence_follows_creation() {
        let mock = MockService::new()
            .on_get(POLICY_PATH, 404, &not_found_json("policies", "case1"))
            .then(200, &serde_json::to_string(&policy(None)).unwrap());
        let api = policy_api(mock.clone());

        assert!(!exists(&api, "case1").await.unwrap());
        wait_for_existence(&api, "case1", Duration::from_secs(5), SHORT)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_exists_propagates_server_errors() {
        let body = json!({
            "kind": "Status", "apiVersion": "v1", "status": "Failure",
            "message": "forbidden", "reason": "Forbidden", "code": 403
        });
        let mock = MockService::new().on_get(POLICY_PATH, 403, &body.to_string());
        let api = policy_api(mock);

        let err = exists(&api, "case1").await.unwrap_err();
        assert!(matches!(err, E2eError::KubeError(_)));
    }

    #[test]
    fn test_status_field_no_status() {
        assert_eq!(
            StatusField::from_object(&policy(None), "compliant"),
            StatusField::NoStatus
        );
    }

    #[test]
    fn test_status_field_absent_field() {
        let object = policy(Some(json!({"details": []})));
        let observed = StatusField::from_object(&object, "compliant");

        assert_eq!(observed, StatusField::FieldAbsent("compliant".to_string()));
        assert_eq!(observed.to_string(), "object status has no compliant");
    }

    #[test]
    fn test_status_field_value_mismatch_is_distinct_from_no_status() {
        let object = policy(Some(json!({"compliant": "NonCompliant"})));
        let observed = StatusField::from_object(&object, "compliant");

        assert_eq!(observed, StatusField::Value("NonCompliant".to_string()));
        assert!(!observed.matches("Compliant"));
        assert!(observed.matches("NonCompliant"));
        assert_ne!(observed, StatusField::NoStatus);
    }

    #[test]
    fn test_status_field_scalar_values() {
        let object = policy(Some(json!({"ready": true, "count": 3, "list": []})));

        assert!(StatusField::from_object(&object, "ready").matches("true"));
        assert!(StatusField::from_object(&object, "count").matches("3"));
        assert_eq!(
            StatusField::from_object(&object, "list"),
            StatusField::FieldAbsent("list".to_string())
        );
    }

    #[tokio::test]
    async fn test_status_field_not_found() {
        let api = policy_api(MockService::new());
        let observed = status_field(&api, "case1", "compliant").await.unwrap();

        assert_eq!(observed, StatusField::NotFound);
        assert_eq!(observed.to_string(), "object not found");
    }

    #[tokio::test]
    async fn test_wait_for_status_field_sees_compliance_change() {
        let mock = MockService::new()
            .on_get(POLICY_PATH, 200, &serde_json::to_string(&policy(None)).unwrap())
            .then(
                200,
                &serde_json::to_string(&policy(Some(json!({"compliant": "Compliant"})))).unwrap(),
            );
        let api = policy_api(mock);

        let timeout = Duration::from_secs(5);
        wait_for_status_field(&api, "case1", "compliant", "Compliant", timeout, SHORT)
            .await
            .unwrap();
    }
}
