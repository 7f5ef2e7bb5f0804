//! Gateway boundary calls
//!
//! [`GatewayApi`] is the seam between the application and the HTTP gateway that
//! brokers calls to deployed services. The app only depends on this trait, so tests
//! can swap in the scripted gateway from `test_utils`.

use serde::{Deserialize, Serialize};
use svcdbg_core::prelude::*;
use svcdbg_core::{MethodCatalog, RpcInfo, Value};

/// Fully qualified method address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallTarget {
    pub module: String,
    pub service: String,
    pub instance: String,
    pub method: String,
}

impl CallTarget {
    pub fn new(
        module: impl Into<String>,
        service: impl Into<String>,
        instance: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            service: service.into(),
            instance: instance.into(),
            method: method.into(),
        }
    }

    /// `.service.method`
    pub fn caption(&self) -> String {
        format!(".{}.{}", self.service, self.method)
    }
}

/// Response of an invocation as reported by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeResponse {
    pub data: Value,
    pub server_cost_ms: u64,
}

/// Calls the debugger issues against the gateway.
///
/// `Send` futures are required because the engine runs every call on a spawned task.
#[trait_variant::make(GatewayApi: Send)]
pub trait LocalGatewayApi {
    /// Names of every module registered with the catalog.
    async fn list_services(&self) -> Result<Vec<String>>;

    /// Services, instances and methods of `module`. `None` lets the gateway pick.
    async fn list_methods(
        &self,
        module: &str,
        service: Option<&str>,
        instance: Option<&str>,
    ) -> Result<MethodCatalog>;

    /// Reflected request/response schema of one method.
    async fn describe_method(&self, target: &CallTarget) -> Result<RpcInfo>;

    /// Send `body` verbatim to the method.
    async fn invoke(&self, target: &CallTarget, body: &Value) -> Result<InvokeResponse>;

    /// Exchange credentials for a token used by every later call.
    async fn login(&self, username: &str, password: &str) -> Result<()>;
}
