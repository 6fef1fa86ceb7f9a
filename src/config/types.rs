// Configuration type definitions

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::query::{ToastOptions, ToastVariant};

/// HTTP transport section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Prefix for relative URLs given on the command line
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Sent with every request, e.g. `Authorization`
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Failure toast section
#[derive(Debug, Clone, Deserialize)]
pub struct ToastConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub variant: ToastVariant,
    #[serde(default)]
    pub filter_by_status: Vec<u16>,
    #[serde(default)]
    pub filter_by_code: Vec<String>,
    #[serde(default = "default_true")]
    pub filter_if_has_data: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ToastConfig {
    fn default() -> Self {
        ToastConfig {
            enabled: true,
            variant: ToastVariant::Error,
            filter_by_status: Vec::new(),
            filter_by_code: Vec::new(),
            filter_if_has_data: true,
        }
    }
}

impl From<&ToastConfig> for ToastOptions {
    fn from(config: &ToastConfig) -> Self {
        ToastOptions {
            variant: config.variant,
            filter_by_status: config.filter_by_status.clone(),
            filter_by_code: config.filter_by_code.clone(),
            filter_if_has_data: config.filter_if_has_data,
        }
    }
}

/// View section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub show_empty_error: bool,
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub toast: ToastConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
