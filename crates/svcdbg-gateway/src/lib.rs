//! # svcdbg-gateway - Gateway Client
//!
//! HTTP client for the gateway that brokers calls to deployed services: catalog
//! listing, method reflection, invocation and login.
//!
//! Depends on [`svcdbg_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! - [`GatewayApi`] - The boundary calls, as a `Send` async trait
//! - [`GatewayClient`] - reqwest implementation with separate catalog/invoke timeouts
//! - [`GatewayConfig`] - Base URL and timeouts
//! - [`CallTarget`], [`InvokeResponse`] - Invocation address and reply
//!
//! HTTP 401 surfaces as [`svcdbg_core::Error::AuthRequired`]; every other non-success
//! status as [`svcdbg_core::Error::HttpStatus`] carrying URL, status, reason and body.

pub mod api;
pub mod client;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use api::{CallTarget, GatewayApi, InvokeResponse, LocalGatewayApi};
pub use client::{GatewayClient, GatewayConfig, DEFAULT_BASE_URL, TOKEN_HEADER};
