use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiGatewayConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default = "default_true")]
    pub enable_docs: bool,
    #[serde(default)]
    pub defaults: Defaults,
    /// Disables tenant/environment enforcement entirely. Exists for
    /// single-tenant operator tooling only; never set this for a
    /// multi-tenant deployment.
    #[serde(default)]
    pub auth_disabled: bool,
}

impl Default for ApiGatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors: CorsConfig::default(),
            enable_docs: true,
            defaults: Defaults::default(),
            auth_disabled: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    #[serde(default)]
    pub rate_limit: RateLimitDefaults,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self { rate_limit: RateLimitDefaults::default(), body_limit_bytes: default_body_limit_bytes() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitDefaults {
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl Default for RateLimitDefaults {
    fn default() -> Self {
        Self { requests_per_second: default_rps(), burst: default_burst() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_owned()
}
fn default_true() -> bool {
    true
}
fn default_rps() -> u32 {
    50
}
fn default_burst() -> u32 {
    100
}
fn default_body_limit_bytes() -> usize {
    2 * 1024 * 1024
}
fn default_max_age() -> u64 {
    3600
}
