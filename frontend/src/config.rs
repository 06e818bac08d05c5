//! Browser-side configuration.
//!
//! There is no process environment in the browser, so settings are captured
//! from the environment `trunk build` runs in. The admin flag comes from the
//! page URL and is read once at load.

use common::config::{admin_flag_from_query, ConfigResult, WebConfig};

pub fn load() -> ConfigResult<WebConfig> {
    WebConfig::from_lookup(build_env)
}

fn build_env(key: &str) -> Option<String> {
    let value = match key {
        "MAPBOX_TOKEN" => option_env!("MAPBOX_TOKEN"),
        "RELAY_URL" => option_env!("RELAY_URL"),
        "MAP_STYLE" => option_env!("MAP_STYLE"),
        "MAP_CENTER_LNG" => option_env!("MAP_CENTER_LNG"),
        "MAP_CENTER_LAT" => option_env!("MAP_CENTER_LAT"),
        "MAP_ZOOM" => option_env!("MAP_ZOOM"),
        "MAP_PITCH" => option_env!("MAP_PITCH"),
        "MAP_BUILDINGS_3D" => option_env!("MAP_BUILDINGS_3D"),
        "MAP_TRAFFIC" => option_env!("MAP_TRAFFIC"),
        _ => None,
    };
    value.map(str::to_string)
}

/// `?admin=1` on the page URL shows the capture panel. UI affordance only.
pub fn admin_from_location() -> bool {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|query| admin_flag_from_query(&query))
        .unwrap_or(false)
}
