use std::env;
use std::time::Duration;

use crate::errors::ConfigError;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SEARCH_RADIUS_METERS: u32 = 15_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: Option<String>,
    pub google_maps_api_key: String,
    pub openweather_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub lookup_timeout_secs: u64,
    pub search_radius_meters: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let google_maps_api_key =
            var("GOOGLE_MAPS_API_KEY").ok_or(ConfigError::Missing("GOOGLE_MAPS_API_KEY"))?;

        let lookup_timeout_secs = match var("LOOKUP_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    var: "LOOKUP_TIMEOUT_SECS",
                    value,
                })?,
            None => DEFAULT_LOOKUP_TIMEOUT_SECS,
        };

        let search_radius_meters = match var("SEARCH_RADIUS_METERS") {
            Some(value) => value.parse::<u32>().map_err(|_| ConfigError::Invalid {
                var: "SEARCH_RADIUS_METERS",
                value,
            })?,
            None => DEFAULT_SEARCH_RADIUS_METERS,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| HOST.to_string()),
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(PORT),
            mongodb_uri: var("MONGODB_URI"),
            google_maps_api_key,
            openweather_api_key: var("OPENWEATHER_API_KEY"),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            lookup_timeout_secs,
            search_radius_meters,
        })
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_vars(vars(&[("GOOGLE_MAPS_API_KEY", "maps-key")])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.lookup_timeout(), Duration::from_secs(10));
        assert_eq!(config.search_radius_meters, 15_000);
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert!(config.mongodb_uri.is_none());
        assert!(config.openweather_api_key.is_none());
    }

    #[test]
    fn test_maps_key_required() {
        let err = AppConfig::from_vars(vars(&[("GOOGLE_MAPS_API_KEY", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GOOGLE_MAPS_API_KEY"));
    }

    #[test]
    fn test_bad_port_falls_back_but_bad_timeout_fails() {
        let config = AppConfig::from_vars(vars(&[
            ("GOOGLE_MAPS_API_KEY", "k"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);

        let err = AppConfig::from_vars(vars(&[
            ("GOOGLE_MAPS_API_KEY", "k"),
            ("LOOKUP_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LOOKUP_TIMEOUT_SECS", .. }));
    }

    #[test]
    #[serial]
    fn test_from_process_environment() {
        env::set_var("GOOGLE_MAPS_API_KEY", "env-key");
        env::set_var("SEARCH_RADIUS_METERS", "5000");
        let config = AppConfig::from_env().unwrap();
        env::remove_var("GOOGLE_MAPS_API_KEY");
        env::remove_var("SEARCH_RADIUS_METERS");

        assert_eq!(config.google_maps_api_key, "env-key");
        assert_eq!(config.search_radius_meters, 5000);
    }
}
