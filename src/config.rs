//! Runtime settings for the storefront engine.

use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_PAGE_SIZE: u32 = 6;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_BUFFER_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// Base URL of the product/order API, without a trailing slash.
    pub api_url: String,
    pub page_size: u32,
    /// Quiet window before a changed search/page is fetched.
    pub debounce: Duration,
    pub request_timeout: Duration,
    /// Mailbox size of the storefront actor.
    pub buffer_size: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl StorefrontConfig {
    pub fn new(api_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_api_url(&api_url.into())?,
            ..Self::default()
        })
    }

    /// Reads `STOREFRONT_API_URL`, `STOREFRONT_PAGE_SIZE` and
    /// `STOREFRONT_DEBOUNCE_MS`, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("STOREFRONT_API_URL") {
            Some(url) => Self::new(url)?,
            None => Self::default(),
        };

        if let Some(raw) = lookup("STOREFRONT_PAGE_SIZE") {
            config = config.with_page_size(parse_number("STOREFRONT_PAGE_SIZE", &raw)?)?;
        }
        if let Some(raw) = lookup("STOREFRONT_DEBOUNCE_MS") {
            config.debounce = Duration::from_millis(parse_number("STOREFRONT_DEBOUNCE_MS", &raw)?);
        }
        Ok(config)
    }

    pub fn with_page_size(mut self, page_size: u32) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "page_size",
                value: page_size.to_string(),
            });
        }
        self.page_size = page_size;
        Ok(self)
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.page_size, 6);
        assert_eq!(config.debounce, Duration::from_millis(300));
    }

    #[test]
    fn test_env_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("STOREFRONT_API_URL", "https://shop.example.com/api/"),
            ("STOREFRONT_PAGE_SIZE", "12"),
            ("STOREFRONT_DEBOUNCE_MS", "50"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://shop.example.com/api");
        assert_eq!(config.page_size, 12);
        assert_eq!(config.debounce, Duration::from_millis(50));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            StorefrontConfig::new("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            StorefrontConfig::new("ftp://shop.example.com"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert_eq!(
            StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_PAGE_SIZE", "0")])),
            Err(ConfigError::InvalidValue { name: "page_size", value: "0".to_string() })
        );
        assert!(StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_DEBOUNCE_MS", "soon")])).is_err());
    }
}
