//! Configuration types for the service debugger
//!
//! `Settings` mirrors `config.toml`. Every section and field has a default, so a
//! partial file only overrides what it names.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use svcdbg_gateway::{GatewayConfig, DEFAULT_BASE_URL};

/// Application settings (`config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub gateway: GatewaySettings,

    #[serde(default)]
    pub notifications: NotificationSettings,

    #[serde(default)]
    pub history: HistorySettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// `[gateway]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Base URL every boundary call is joined onto
    pub base_url: String,

    /// Timeout for list and describe calls
    pub catalog_timeout_ms: u64,

    /// Timeout for invocations; usually much longer than the catalog timeout
    pub invoke_timeout_ms: u64,

    /// How often the navigator re-lists modules (0 disables)
    pub catalog_refresh_ms: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_timeout_ms: 2_000,
            invoke_timeout_ms: 30_000,
            catalog_refresh_ms: 5_000,
        }
    }
}

impl GatewaySettings {
    pub fn to_gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.base_url.clone(),
            catalog_timeout: Duration::from_millis(self.catalog_timeout_ms),
            invoke_timeout: Duration::from_millis(self.invoke_timeout_ms),
        }
    }

    pub fn catalog_refresh(&self) -> Option<Duration> {
        (self.catalog_refresh_ms > 0).then(|| Duration::from_millis(self.catalog_refresh_ms))
    }
}

/// `[notifications]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Time a notification stays up unless focused
    pub expire_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { expire_ms: 4_000 }
    }
}

impl NotificationSettings {
    pub fn expire_after(&self) -> Duration {
        Duration::from_millis(self.expire_ms)
    }
}

/// `[history]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Records kept; the oldest are evicted first
    pub limit: usize,

    /// Record every invocation
    pub record: bool,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            limit: 1_000,
            record: true,
        }
    }
}

/// `[ui]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// Show the value path of the selected request row in the status bar
    pub show_path_hint: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_path_hint: true,
        }
    }
}
