use anyhow::{Context, Result, ensure};
use juniper_relay_loaders::PaginationConfig;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub pagination: PaginationConfig,
}

impl AppConfig {
    /// Reads `BIND_ADDR`, `RELAY_DEFAULT_PAGE_SIZE` and `RELAY_MAX_PAGE_SIZE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = PaginationConfig::default();
        let config = AppConfig {
            bind_addr: parse_or(
                &lookup,
                "BIND_ADDR",
                SocketAddr::from(([127, 0, 0, 1], 8080)),
            )?,
            pagination: PaginationConfig {
                default_page_size: parse_or(
                    &lookup,
                    "RELAY_DEFAULT_PAGE_SIZE",
                    defaults.default_page_size,
                )?,
                max_page_size: parse_or(&lookup, "RELAY_MAX_PAGE_SIZE", defaults.max_page_size)?,
            },
        };

        ensure!(
            config.pagination.default_page_size <= config.pagination.max_page_size,
            "RELAY_DEFAULT_PAGE_SIZE must not exceed RELAY_MAX_PAGE_SIZE"
        );

        Ok(config)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{name} has an invalid value `{raw}`")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.pagination.default_page_size, 100);
        assert_eq!(config.pagination.max_page_size, 1000);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("BIND_ADDR", "0.0.0.0:3000"),
            ("RELAY_DEFAULT_PAGE_SIZE", "10"),
            ("RELAY_MAX_PAGE_SIZE", "20"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.pagination.max_page_size, 20);
    }

    #[test]
    fn test_invalid_values() {
        let err = config(&[("RELAY_MAX_PAGE_SIZE", "lots")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "RELAY_MAX_PAGE_SIZE has an invalid value `lots`"
        );

        assert!(config(&[("RELAY_DEFAULT_PAGE_SIZE", "2000")]).is_err());
    }
}
