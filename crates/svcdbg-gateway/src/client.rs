//! HTTP implementation of [`GatewayApi`]
//!
//! Catalog and describe calls use a short timeout; invocations use a separate, much
//! longer one because they wait on the remote method itself.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use svcdbg_core::prelude::*;
use svcdbg_core::{MethodCatalog, RpcInfo, Value};

use crate::api::{CallTarget, GatewayApi, InvokeResponse};

/// Default gateway endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:6550/api";

/// Header carrying the login token
pub const TOKEN_HEADER: &str = "Token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Timeout for list and describe calls
    pub catalog_timeout: Duration,
    /// Timeout for invoke calls
    pub invoke_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_timeout: Duration::from_millis(2_000),
            invoke_timeout: Duration::from_millis(30_000),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ServiceList {
    #[serde(default)]
    list: Vec<String>,
}

#[derive(Debug, Serialize)]
struct InvokeBody<'a> {
    module: &'a str,
    service: &'a str,
    instance: &'a str,
    method: &'a str,
    body: &'a Value,
}

#[derive(Debug, Deserialize)]
struct InvokeReply {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    cost: u64,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    token: String,
}

/// reqwest-backed gateway client. Cheap to clone; clones share the token.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base: Url,
    config: GatewayConfig,
    token: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base", &self.base.as_str())
            .field("logged_in", &self.has_token())
            .finish()
    }
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let trimmed = config.base_url.trim_end_matches('/');
        let base = Url::parse(&format!("{trimmed}/"))
            .map_err(|e| Error::invalid_url(format!("{}: {e}", config.base_url)))?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base,
            config,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| Error::invalid_url(format!("{path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.token.read().unwrap_or_else(|e| e.into_inner()).clone();
        match token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, url: &Url, timeout: Duration) -> Result<Response> {
        let response = self
            .authorize(request)
            .timeout(timeout.max(Duration::from_millis(1)))
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("Gateway requires authentication: {}", url);
            return Err(Error::auth_required(url.as_str()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gateway call failed: {} {}", status, url);
            return Err(Error::http_status(
                url.as_str(),
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                body,
            ));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint(path, query)?;
        debug!("GET {}", url);
        let response = self
            .send(self.http.get(url.clone()), &url, self.config.catalog_timeout)
            .await?;
        decode(response, &url).await
    }
}

fn transport_error(url: &Url, err: reqwest::Error) -> Error {
    warn!("Gateway transport error for {}: {}", url, err);
    Error::transport(url.as_str(), err.to_string(), err.is_timeout())
}

async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| Error::protocol(url.as_str(), e.to_string()))
}

impl GatewayApi for GatewayClient {
    async fn list_services(&self) -> Result<Vec<String>> {
        let list: ServiceList = self.get_json("service/list", &[]).await?;
        Ok(list.list)
    }

    async fn list_methods(
        &self,
        module: &str,
        service: Option<&str>,
        instance: Option<&str>,
    ) -> Result<MethodCatalog> {
        self.get_json(
            "service/rpcs",
            &[
                ("module", module),
                ("service", service.unwrap_or_default()),
                ("instance", instance.unwrap_or_default()),
            ],
        )
        .await
    }

    async fn describe_method(&self, target: &CallTarget) -> Result<RpcInfo> {
        self.get_json(
            "service/rpc",
            &[
                ("module", target.module.as_str()),
                ("service", target.service.as_str()),
                ("instance", target.instance.as_str()),
                ("method", target.method.as_str()),
            ],
        )
        .await
    }

    async fn invoke(&self, target: &CallTarget, body: &Value) -> Result<InvokeResponse> {
        let url = self.endpoint("service/invoke", &[])?;
        debug!("POST {} ({})", url, target.caption());
        let payload = InvokeBody {
            module: &target.module,
            service: &target.service,
            instance: &target.instance,
            method: &target.method,
            body,
        };
        let response = self
            .send(
                self.http.post(url.clone()).json(&payload),
                &url,
                self.config.invoke_timeout,
            )
            .await?;
        let reply: InvokeReply = decode(response, &url).await?;
        Ok(InvokeResponse {
            data: reply.data,
            server_cost_ms: reply.cost,
        })
    }

    async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = self.endpoint("user/login", &[])?;
        info!("Logging in to gateway as {}", username);
        let response = self
            .send(
                self.http.post(url.clone()).json(&LoginBody { username, password }),
                &url,
                self.config.catalog_timeout,
            )
            .await?;
        let reply: LoginReply = decode(response, &url).await?;
        self.set_token(Some(reply.token));
        Ok(())
    }
}
