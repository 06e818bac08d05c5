//! Configuration for the relay and the browser client.
//!
//! Both read flat `KEY=value` settings, the relay from its process
//! environment and the browser client from the environment it was built in.
//! Loading goes through a lookup closure so the same rules apply to both.
//! Blank values count as absent. Missing credentials are an error, never a
//! silent fallback.

use crate::map_view::ViewState;
use crate::model::Coordinates;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_TABLE: &str = "businesses";
pub const DEFAULT_RELAY_HOST: &str = "127.0.0.1";
pub const DEFAULT_RELAY_PORT: u16 = 3001;
pub const DEFAULT_MAP_STYLE: &str = "mapbox://styles/mapbox/satellite-streets-v12";
/// Freetown, Sierra Leone.
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lng: -13.2344,
    lat: 8.4844,
};
pub const DEFAULT_ZOOM: f64 = 13.0;
pub const DEFAULT_PITCH: f64 = 0.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Connection to the hosted datastore.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub url: String,
    pub service_key: String,
    pub table: String,
}

impl StoreConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        Ok(Self {
            url: required(&lookup, "SUPABASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            service_key: required(&lookup, "SUPABASE_SERVICE_KEY")?,
            table: optional(&lookup, "BUSINESS_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
}

impl RelayConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        Ok(Self {
            host: optional(&lookup, "RELAY_HOST").unwrap_or_else(|| DEFAULT_RELAY_HOST.to_string()),
            port: parsed(&lookup, "PORT")?.unwrap_or(DEFAULT_RELAY_PORT),
            store: StoreConfig::from_lookup(&lookup)?,
        })
    }

    pub fn bind_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Initial camera and decorative layers of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewConfig {
    pub access_token: String,
    pub style: String,
    pub center: Coordinates,
    pub zoom: f64,
    pub pitch: f64,
    /// Extrude buildings in 3D once the style has loaded.
    pub buildings_3d: bool,
    /// Overlay live traffic.
    pub traffic: bool,
}

impl MapViewConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let center = Coordinates::new(
            parsed(&lookup, "MAP_CENTER_LNG")?.unwrap_or(DEFAULT_CENTER.lng),
            parsed(&lookup, "MAP_CENTER_LAT")?.unwrap_or(DEFAULT_CENTER.lat),
        );
        if !center.is_valid() {
            return Err(ConfigError::Invalid {
                key: "MAP_CENTER_LNG/MAP_CENTER_LAT",
                value: center.to_string(),
            });
        }

        Ok(Self {
            access_token: required(&lookup, "MAPBOX_TOKEN")?,
            style: optional(&lookup, "MAP_STYLE").unwrap_or_else(|| DEFAULT_MAP_STYLE.to_string()),
            center,
            zoom: parsed(&lookup, "MAP_ZOOM")?.unwrap_or(DEFAULT_ZOOM),
            pitch: parsed(&lookup, "MAP_PITCH")?.unwrap_or(DEFAULT_PITCH),
            buildings_3d: flag(&lookup, "MAP_BUILDINGS_3D")?.unwrap_or(false),
            traffic: flag(&lookup, "MAP_TRAFFIC")?.unwrap_or(false),
        })
    }

    pub fn initial_view(&self) -> ViewState {
        ViewState {
            center: self.center,
            zoom: self.zoom,
            pitch: self.pitch,
        }
    }
}

/// Everything the browser client needs at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct WebConfig {
    /// Base URL of the relay; empty means the page's own origin.
    pub relay_url: String,
    pub map: MapViewConfig,
}

impl WebConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        Ok(Self {
            relay_url: optional(&lookup, "RELAY_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            map: MapViewConfig::from_lookup(&lookup)?,
        })
    }
}

/// Reads the `admin` flag from a page query string such as `?admin=1`.
///
/// A bare `admin`, or `admin` set to `1`, `true`, `yes` or `on`, enables it.
pub fn admin_flag_from_query(query: &str) -> bool {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some("admin"), None) => Some(true),
                (Some("admin"), Some(value)) => Some(parse_bool(value).unwrap_or(false)),
                _ => None,
            }
        })
        .last()
        .unwrap_or(false)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> ConfigResult<String> {
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> ConfigResult<Option<T>> {
    optional(lookup, key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value })
        })
        .transpose()
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> ConfigResult<Option<bool>> {
    optional(lookup, key)
        .map(|value| parse_bool(&value).ok_or(ConfigError::Invalid { key, value }))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn relay_requires_store_credentials() {
        assert_eq!(
            RelayConfig::from_lookup(env(&[])),
            Err(ConfigError::Missing("SUPABASE_URL"))
        );
        assert_eq!(
            RelayConfig::from_lookup(env(&[("SUPABASE_URL", "https://x.supabase.co")])),
            Err(ConfigError::Missing("SUPABASE_SERVICE_KEY"))
        );
        assert_eq!(
            RelayConfig::from_lookup(env(&[
                ("SUPABASE_URL", "https://x.supabase.co"),
                ("SUPABASE_SERVICE_KEY", "   "),
            ])),
            Err(ConfigError::Missing("SUPABASE_SERVICE_KEY"))
        );
    }

    #[test]
    fn relay_defaults_and_overrides() {
        let config = RelayConfig::from_lookup(env(&[
            ("SUPABASE_URL", "https://x.supabase.co/"),
            ("SUPABASE_SERVICE_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3001);
        assert_eq!(config.store.url, "https://x.supabase.co");
        assert_eq!(config.store.table, "businesses");
        assert_eq!(config.bind_url(), "http://127.0.0.1:3001");

        let config = RelayConfig::from_lookup(env(&[
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_SERVICE_KEY", "secret"),
            ("PORT", "8080"),
            ("RELAY_HOST", "0.0.0.0"),
            ("BUSINESS_TABLE", "shops"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.store.table, "shops");
    }

    #[test]
    fn unparsable_port_is_invalid() {
        let err = RelayConfig::from_lookup(env(&[
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_SERVICE_KEY", "secret"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn web_config_requires_map_token_and_defaults_to_freetown() {
        assert_eq!(
            WebConfig::from_lookup(env(&[])),
            Err(ConfigError::Missing("MAPBOX_TOKEN"))
        );

        let config = WebConfig::from_lookup(env(&[("MAPBOX_TOKEN", "pk.test")])).unwrap();
        assert_eq!(config.relay_url, "");
        assert_eq!(config.map.style, DEFAULT_MAP_STYLE);
        assert_eq!(config.map.initial_view().center, DEFAULT_CENTER);
        assert_eq!(config.map.zoom, 13.0);
        assert!(!config.map.buildings_3d);
        assert!(!config.map.traffic);
    }

    #[test]
    fn web_config_overrides_view_and_layers() {
        let config = WebConfig::from_lookup(env(&[
            ("MAPBOX_TOKEN", "pk.test"),
            ("RELAY_URL", "http://localhost:3001/"),
            ("MAP_CENTER_LNG", "-0.1276"),
            ("MAP_CENTER_LAT", "51.5072"),
            ("MAP_ZOOM", "11.5"),
            ("MAP_PITCH", "45"),
            ("MAP_BUILDINGS_3D", "yes"),
            ("MAP_TRAFFIC", "ON"),
        ]))
        .unwrap();
        assert_eq!(config.relay_url, "http://localhost:3001");
        assert_eq!(config.map.center, Coordinates::new(-0.1276, 51.5072));
        assert_eq!(config.map.pitch, 45.0);
        assert!(config.map.buildings_3d);
        assert!(config.map.traffic);
    }

    #[test]
    fn out_of_range_center_is_rejected() {
        let err = MapViewConfig::from_lookup(env(&[
            ("MAPBOX_TOKEN", "pk.test"),
            ("MAP_CENTER_LAT", "95"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn bad_flag_is_invalid() {
        let err = MapViewConfig::from_lookup(env(&[
            ("MAPBOX_TOKEN", "pk.test"),
            ("MAP_TRAFFIC", "maybe"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "MAP_TRAFFIC",
                value: "maybe".to_string()
            }
        );
    }

    #[test]
    fn admin_flag_parsing() {
        assert!(admin_flag_from_query("?admin"));
        assert!(admin_flag_from_query("?admin=1"));
        assert!(admin_flag_from_query("?lang=en&admin=TRUE"));
        assert!(!admin_flag_from_query(""));
        assert!(!admin_flag_from_query("?admin=0"));
        assert!(!admin_flag_from_query("?admin=please"));
        assert!(!admin_flag_from_query("?administrator=1"));
    }
}
