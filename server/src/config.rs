//! Server configuration.

use std::time::Duration;

use fiatbridge_common::FiatSet;
use fiatbridge_router::buda::DEFAULT_BASE_URL;
use fiatbridge_router::RouterConfig;

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Venue API root.
    pub market_api_url: String,
    /// Timeout for each venue request.
    pub upstream_timeout: Duration,
    /// Timeout for a whole client request.
    pub request_timeout: Duration,
    /// Routing configuration.
    pub router: RouterConfig,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Emit JSON log lines.
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8000,
            market_api_url: DEFAULT_BASE_URL.to_string(),
            upstream_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            router: RouterConfig::default(),
            log_level: "info".to_string(),
            log_json: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup, falling back to defaults.
    pub fn from_vars<F>(var: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = var("FIATBRIDGE_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = var("FIATBRIDGE_LISTEN_PORT") {
            config.listen_port = parse_var("FIATBRIDGE_LISTEN_PORT", &port)?;
        }

        if let Some(url) = var("FIATBRIDGE_MARKET_API_URL") {
            config.market_api_url = url;
        }

        if let Some(fiats) = var("FIATBRIDGE_SUPPORTED_FIATS") {
            config.router.fiats = FiatSet::from_list(&fiats)
                .map_err(|e| format!("FIATBRIDGE_SUPPORTED_FIATS: {}", e))?;
        }

        if let Some(n) = var("FIATBRIDGE_PRICE_CONCURRENCY") {
            config.router.price_concurrency = parse_var("FIATBRIDGE_PRICE_CONCURRENCY", &n)?;
        }

        if let Some(flag) = var("FIATBRIDGE_SAME_CURRENCY_PASSTHROUGH") {
            config.router.same_currency_passthrough =
                parse_var("FIATBRIDGE_SAME_CURRENCY_PASSTHROUGH", &flag)?;
        }

        if let Some(secs) = var("FIATBRIDGE_UPSTREAM_TIMEOUT_SECS") {
            config.upstream_timeout =
                Duration::from_secs(parse_var("FIATBRIDGE_UPSTREAM_TIMEOUT_SECS", &secs)?);
        }

        if let Some(secs) = var("FIATBRIDGE_REQUEST_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_var("FIATBRIDGE_REQUEST_TIMEOUT_SECS", &secs)?);
        }

        if let Some(level) = var("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(flag) = var("FIATBRIDGE_LOG_JSON") {
            config.log_json = parse_var("FIATBRIDGE_LOG_JSON", &flag)?;
        }

        Ok(config)
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if !(self.market_api_url.starts_with("http://")
            || self.market_api_url.starts_with("https://"))
        {
            return Err(format!(
                "Market API URL must be http(s): {}",
                self.market_api_url
            ));
        }

        if self.router.price_concurrency == 0 {
            return Err("Price concurrency must be at least 1".to_string());
        }

        if self.upstream_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err("Timeouts cannot be 0".to_string());
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{}: invalid value {:?}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.router.fiats, FiatSet::default());
    }

    #[test]
    fn test_config_from_vars() {
        let config = ServerConfig::from_vars(vars(&[
            ("FIATBRIDGE_LISTEN_PORT", "9100"),
            ("FIATBRIDGE_SUPPORTED_FIATS", "usd,eur,clp"),
            ("FIATBRIDGE_PRICE_CONCURRENCY", "1"),
            ("FIATBRIDGE_SAME_CURRENCY_PASSTHROUGH", "true"),
            ("FIATBRIDGE_LOG_JSON", "false"),
        ]))
        .unwrap();

        assert_eq!(config.listen_port, 9100);
        assert_eq!(config.router.fiats.to_string(), "CLP,EUR,USD");
        assert_eq!(config.router.price_concurrency, 1);
        assert!(config.router.same_currency_passthrough);
        assert!(!config.log_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_vars_rejected() {
        assert!(ServerConfig::from_vars(vars(&[("FIATBRIDGE_LISTEN_PORT", "http")])).is_err());
        assert!(ServerConfig::from_vars(vars(&[("FIATBRIDGE_SUPPORTED_FIATS", " ,")])).is_err());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = ServerConfig::default();
        config.listen_port = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.market_api_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.router.price_concurrency = 0;
        assert!(config.validate().is_err());
    }
}
