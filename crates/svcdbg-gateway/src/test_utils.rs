//! Test utilities for gateway consumers
//!
//! [`ScriptedGateway`] is an in-memory [`GatewayApi`] with canned responses, optional
//! per-service delays (to force out-of-order completion) and a call log.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use svcdbg_core::prelude::*;
use svcdbg_core::{
    FieldLabel, FieldSchema, FieldType, MessageSchema, MethodCatalog, RpcInfo, SchemaRegistry,
    Value,
};

use crate::api::{CallTarget, GatewayApi, InvokeResponse};

/// Failure a scripted call should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedFailure {
    Unauthorized,
    Status(u16),
    Timeout,
}

impl ScriptedFailure {
    fn into_error(self, url: &str) -> Error {
        match self {
            ScriptedFailure::Unauthorized => Error::auth_required(url),
            ScriptedFailure::Status(status) => {
                Error::http_status(url, status, "Scripted Failure", "scripted body")
            }
            ScriptedFailure::Timeout => Error::transport(url, "operation timed out", true),
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    services: Vec<String>,
    catalogs: HashMap<String, MethodCatalog>,
    rpc_infos: HashMap<String, RpcInfo>,
    invoke_data: Value,
    server_cost_ms: u64,
    list_delays: HashMap<String, Duration>,
    failures: HashMap<&'static str, ScriptedFailure>,
    calls: Vec<String>,
    invoked_bodies: Vec<Value>,
}

#[derive(Debug, Default)]
pub struct ScriptedGateway {
    script: Mutex<Script>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_script<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut script = self.script.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut script)
    }

    pub fn with_services(self, services: &[&str]) -> Self {
        self.with_script(|s| s.services = services.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Catalog returned when `service` is requested. The empty key answers requests
    /// that leave the service to the gateway.
    pub fn with_catalog(self, service: &str, catalog: MethodCatalog) -> Self {
        self.with_script(|s| s.catalogs.insert(service.to_string(), catalog));
        self
    }

    pub fn with_rpc_info(self, method: &str, info: RpcInfo) -> Self {
        self.with_script(|s| s.rpc_infos.insert(method.to_string(), info));
        self
    }

    pub fn with_invoke_result(self, data: Value, server_cost_ms: u64) -> Self {
        self.with_script(|s| {
            s.invoke_data = data;
            s.server_cost_ms = server_cost_ms;
        });
        self
    }

    /// Delay `list_methods` answers for `service`.
    pub fn with_list_delay(self, service: &str, delay: Duration) -> Self {
        self.with_script(|s| s.list_delays.insert(service.to_string(), delay));
        self
    }

    /// Make every call of `operation` (e.g. `"invoke"`) fail.
    pub fn fail(&self, operation: &'static str, failure: ScriptedFailure) {
        self.with_script(|s| s.failures.insert(operation, failure));
    }

    pub fn clear_failures(&self) {
        self.with_script(|s| s.failures.clear());
    }

    /// Operations called so far, e.g. `["list_methods users/Svc", "invoke .Svc.Get"]`.
    pub fn calls(&self) -> Vec<String> {
        self.with_script(|s| s.calls.clone())
    }

    pub fn invoked_bodies(&self) -> Vec<Value> {
        self.with_script(|s| s.invoked_bodies.clone())
    }

    fn record(&self, operation: &'static str, detail: String) -> Result<()> {
        self.with_script(|s| {
            s.calls.push(format!("{operation} {detail}").trim_end().to_string());
            match s.failures.get(operation) {
                Some(failure) => Err(failure.into_error(&format!("scripted://{operation}"))),
                None => Ok(()),
            }
        })
    }
}

impl GatewayApi for ScriptedGateway {
    async fn list_services(&self) -> Result<Vec<String>> {
        self.record("list_services", String::new())?;
        Ok(self.with_script(|s| s.services.clone()))
    }

    async fn list_methods(
        &self,
        module: &str,
        service: Option<&str>,
        instance: Option<&str>,
    ) -> Result<MethodCatalog> {
        let key = service.unwrap_or_default().to_string();
        self.record(
            "list_methods",
            format!("{module}/{key}/{}", instance.unwrap_or_default()),
        )?;
        let delay = self.with_script(|s| s.list_delays.get(&key).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut catalog = self.with_script(|s| {
            s.catalogs
                .get(&key)
                .or_else(|| s.catalogs.get(""))
                .cloned()
                .unwrap_or_default()
        });
        if let Some(instance) = instance.filter(|i| !i.is_empty()) {
            catalog.instance = instance.to_string();
        }
        Ok(catalog)
    }

    async fn describe_method(&self, target: &CallTarget) -> Result<RpcInfo> {
        self.record("describe_method", target.caption())?;
        self.with_script(|s| s.rpc_infos.get(&target.method).cloned())
            .ok_or_else(|| Error::http_status("scripted://describe_method", 404, "Not Found", ""))
    }

    async fn invoke(&self, target: &CallTarget, body: &Value) -> Result<InvokeResponse> {
        self.record("invoke", target.caption())?;
        Ok(self.with_script(|s| {
            s.invoked_bodies.push(body.clone());
            InvokeResponse {
                data: s.invoke_data.clone(),
                server_cost_ms: s.server_cost_ms,
            }
        }))
    }

    async fn login(&self, username: &str, _password: &str) -> Result<()> {
        self.record("login", username.to_string())
    }
}

/// Catalog with one service, one instance and the given methods.
pub fn test_catalog(service: &str, instance: &str, rpcs: &[&str]) -> MethodCatalog {
    MethodCatalog {
        rpcs: rpcs.iter().map(|r| r.to_string()).collect(),
        services: vec![service.to_string()],
        service: service.to_string(),
        instances: vec![instance.to_string()],
        instance: instance.to_string(),
    }
}

/// Describe result whose request type `.test.Request` has a single optional Int32
/// field `age`.
pub fn test_rpc_info(method: &str) -> RpcInfo {
    let mut registry = SchemaRegistry::new();
    registry.insert(
        ".test.Request",
        MessageSchema::with_fields(vec![FieldSchema::new(
            "age",
            FieldLabel::Optional,
            FieldType::Int32,
        )]),
    );
    RpcInfo {
        name: method.to_string(),
        full_name: format!(".test.Service.{method}"),
        request_typename: ".test.Request".to_string(),
        response_typename: ".test.Response".to_string(),
        relate_schema: registry,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_catalog_falls_back_to_default() {
        let gateway = ScriptedGateway::new().with_catalog("", test_catalog("Svc", "a", &["Get"]));
        let catalog = gateway.list_methods("users", Some("Other"), None).await.unwrap();
        assert_eq!(catalog.rpcs, vec!["Get".to_string()]);
        assert_eq!(gateway.calls(), vec!["list_methods users/Other/".to_string()]);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let gateway = ScriptedGateway::new();
        gateway.fail("list_services", ScriptedFailure::Unauthorized);
        let err = gateway.list_services().await.unwrap_err();
        assert!(err.is_auth_required());
    }

    #[test]
    fn test_rpc_info_fixture() {
        let info = test_rpc_info("Get");
        assert!(info.request_schema().unwrap().field("age").is_some());
    }
}
