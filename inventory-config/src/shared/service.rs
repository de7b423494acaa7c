use serde::{Deserialize, Serialize};

/// Listen address for HTTP-facing services.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceConfig {
    #[serde(default = "default_service_host")]
    pub host: String,
    pub port: u16,
}

impl ServiceConfig {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";

    /// The address in `host:port` form.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_service_host() -> String {
    ServiceConfig::DEFAULT_HOST.to_string()
}
