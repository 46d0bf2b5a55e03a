//! Application configuration read from `BUS_LOOKUP_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::sources::{OverpassConfig, RouteClientConfig};

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Which route backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteBackend {
    /// JSON route API.
    #[default]
    Json,
    /// HTML timetable pages.
    Html,
}

impl FromStr for RouteBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(RouteBackend::Json),
            "html" => Ok(RouteBackend::Html),
            other => Err(format!("expected json or html, got {other}")),
        }
    }
}

/// Server and source settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub listen: SocketAddr,
    pub overpass_url: String,
    pub routes_url: String,
    pub route_backend: RouteBackend,

    /// Persist the cache to this JSON file; in memory when unset.
    pub cache_file: Option<PathBuf>,

    /// Replace the bundled fallback data with this JSON file.
    pub fallback_file: Option<PathBuf>,

    /// Per-request timeout for every upstream, in seconds.
    pub http_timeout_secs: Option<u64>,

    pub enforce_fallback_radius: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            overpass_url: OverpassConfig::new().base_url,
            routes_url: RouteClientConfig::new().base_url,
            route_backend: RouteBackend::default(),
            cache_file: None,
            fallback_file: None,
            http_timeout_secs: None,
            enforce_fallback_radius: false,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read configuration through `var`, which returns the value of a named
    /// variable if set. Blank values count as unset.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| var(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get("BUS_LOOKUP_LISTEN") {
            config.listen = parse("BUS_LOOKUP_LISTEN", v)?;
        }
        if let Some(v) = get("BUS_LOOKUP_OVERPASS_URL") {
            config.overpass_url = v;
        }
        if let Some(v) = get("BUS_LOOKUP_ROUTES_URL") {
            config.routes_url = v;
        }
        if let Some(v) = get("BUS_LOOKUP_ROUTE_BACKEND") {
            config.route_backend = parse("BUS_LOOKUP_ROUTE_BACKEND", v)?;
        }
        config.cache_file = get("BUS_LOOKUP_CACHE_FILE").map(PathBuf::from);
        config.fallback_file = get("BUS_LOOKUP_FALLBACK_FILE").map(PathBuf::from);
        if let Some(v) = get("BUS_LOOKUP_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = Some(parse("BUS_LOOKUP_HTTP_TIMEOUT_SECS", v)?);
        }
        if let Some(v) = get("BUS_LOOKUP_ENFORCE_FALLBACK_RADIUS") {
            config.enforce_fallback_radius = parse("BUS_LOOKUP_ENFORCE_FALLBACK_RADIUS", v)?;
        }

        Ok(config)
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.listen.port(), 3000);
        assert_eq!(config.route_backend, RouteBackend::Json);
        assert!(config.cache_file.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_vars(vars(&[
            ("BUS_LOOKUP_LISTEN", "0.0.0.0:8080"),
            ("BUS_LOOKUP_OVERPASS_URL", "http://localhost:9000/api"),
            ("BUS_LOOKUP_ROUTES_URL", "http://localhost:9001"),
            ("BUS_LOOKUP_ROUTE_BACKEND", "HTML"),
            ("BUS_LOOKUP_CACHE_FILE", "/tmp/cache.json"),
            ("BUS_LOOKUP_FALLBACK_FILE", "/tmp/fallback.json"),
            ("BUS_LOOKUP_HTTP_TIMEOUT_SECS", "7"),
            ("BUS_LOOKUP_ENFORCE_FALLBACK_RADIUS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.listen, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.overpass_url, "http://localhost:9000/api");
        assert_eq!(config.routes_url, "http://localhost:9001");
        assert_eq!(config.route_backend, RouteBackend::Html);
        assert_eq!(config.cache_file, Some(PathBuf::from("/tmp/cache.json")));
        assert_eq!(config.fallback_file, Some(PathBuf::from("/tmp/fallback.json")));
        assert_eq!(config.http_timeout_secs, Some(7));
        assert!(config.enforce_fallback_radius);
    }

    #[test]
    fn blank_counts_as_unset() {
        let config = AppConfig::from_vars(vars(&[("BUS_LOOKUP_CACHE_FILE", "  ")])).unwrap();
        assert!(config.cache_file.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        let err = AppConfig::from_vars(vars(&[("BUS_LOOKUP_ROUTE_BACKEND", "xml")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "BUS_LOOKUP_ROUTE_BACKEND",
                ..
            }
        ));

        let err = AppConfig::from_vars(vars(&[("BUS_LOOKUP_HTTP_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().starts_with("BUS_LOOKUP_HTTP_TIMEOUT_SECS"));

        assert!(AppConfig::from_vars(vars(&[("BUS_LOOKUP_LISTEN", "nowhere")])).is_err());
    }
}
