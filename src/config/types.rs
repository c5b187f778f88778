// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Routes configuration
///
/// The full route table of the server, built once at startup and held
/// immutably afterwards. A request path resolves to exactly one entry:
/// exact page match first, then asset mount prefix match, then the
/// fallback page.
#[derive(Debug, Deserialize, Clone)]
pub struct RoutesConfig {
    /// Exact-match routes: request path -> file served verbatim
    pub pages: HashMap<String, String>,
    /// Prefix-match routes: the mount prefix is stripped and the remainder
    /// is looked up under the mount directory
    pub assets: Vec<AssetMount>,
    /// File served for `/` and any path that matches nothing else
    pub fallback_file: String,
    /// Index files tried when an asset path resolves to a directory
    pub index_files: Vec<String>,
}

/// A directory of static assets mounted under a route prefix
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AssetMount {
    pub route: String,
    pub dir: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        let mut pages = HashMap::new();
        pages.insert("/checkers".to_string(), "checkers.html".to_string());
        pages.insert(
            "/checkersTest".to_string(),
            "checkers_test.html".to_string(),
        );

        Self {
            pages,
            assets: vec![AssetMount {
                route: "/wasm".to_string(),
                dir: "wasm".to_string(),
            }],
            fallback_file: "index.html".to_string(),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        }
    }
}
