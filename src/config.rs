//! Backend endpoint configuration
//!
//! Read from the environment, then overridden by command-line flags.

use reqwest::Url;

/// Default neighbour query endpoint. Env: `RELNET_NETWORK_URL`.
pub const DEFAULT_NETWORK_URL: &str = "http://127.0.0.1:8000/network";

/// Default enrichment endpoint. Env: `RELNET_ENRICH_URL`.
pub const DEFAULT_ENRICH_URL: &str = "http://127.0.0.1:8000/enrich/neighbours";

/// Backend endpoints the explorer talks to.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    /// `GET <network_url>?key=..&label=..` returns neighbour lists.
    pub network_url: Url,
    /// `POST <enrich_url>/<key>` triggers backend enrichment.
    pub enrich_url: Url,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            network_url: Url::parse(DEFAULT_NETWORK_URL).expect("default network URL is valid"),
            enrich_url: Url::parse(DEFAULT_ENRICH_URL).expect("default enrich URL is valid"),
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from environment variables, applying defaults.
    ///
    /// # Errors
    /// Returns an error if a variable is set but is not an absolute http(s) URL.
    pub fn from_env() -> anyhow::Result<Self> {
        let network = std::env::var("RELNET_NETWORK_URL").ok();
        let enrich = std::env::var("RELNET_ENRICH_URL").ok();
        Self::from_parts(network.as_deref(), enrich.as_deref())
    }

    /// Build a configuration from optional overrides; `None` keeps the default.
    pub fn from_parts(network_url: Option<&str>, enrich_url: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self {
            network_url: parse_url("RELNET_NETWORK_URL", network_url.unwrap_or(DEFAULT_NETWORK_URL))?,
            enrich_url: parse_url("RELNET_ENRICH_URL", enrich_url.unwrap_or(DEFAULT_ENRICH_URL))?,
        })
    }

    /// Apply command-line overrides on top of this configuration.
    pub fn with_overrides(
        mut self,
        network_url: Option<&str>,
        enrich_url: Option<&str>,
    ) -> anyhow::Result<Self> {
        if let Some(url) = network_url {
            self.network_url = parse_url("--network-url", url)?;
        }
        if let Some(url) = enrich_url {
            self.enrich_url = parse_url("--enrich-url", url)?;
        }
        Ok(self)
    }
}

fn parse_url(name: &str, value: &str) -> anyhow::Result<Url> {
    let url = Url::parse(value).map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", name, value, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("Invalid {} '{}': expected an http(s) URL", name, value);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ExplorerConfig::from_parts(None, None).unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.network_url.as_str(), DEFAULT_NETWORK_URL);
    }

    #[test]
    fn overrides_replace_defaults() {
        let config = ExplorerConfig::default()
            .with_overrides(Some("https://api.example.com/network"), None)
            .unwrap();
        assert_eq!(config.network_url.host_str(), Some("api.example.com"));
        assert_eq!(config.enrich_url.as_str(), DEFAULT_ENRICH_URL);
    }

    #[test]
    fn relative_or_non_http_urls_are_rejected() {
        assert!(ExplorerConfig::from_parts(Some("/network"), None).is_err());
        assert!(ExplorerConfig::from_parts(None, Some("ftp://host/enrich")).is_err());
    }
}
