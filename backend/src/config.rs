//! Relay configuration, read from the process environment after a `.env`
//! file in the working directory (or a parent) has been merged in. Variables
//! already set in the environment win over the file.
//!
//! | Variable | Default |
//! |---|---|
//! | `SUPABASE_URL` | required |
//! | `SUPABASE_SERVICE_KEY` | required |
//! | `BUSINESS_TABLE` | `businesses` |
//! | `RELAY_HOST` | `127.0.0.1` |
//! | `PORT` | `3001` |

use std::path::PathBuf;

use common::config::{ConfigResult, RelayConfig};
use log::{debug, info};

pub fn load() -> ConfigResult<RelayConfig> {
    merge_env_file(dotenvy::dotenv());
    RelayConfig::from_lookup(|key| std::env::var(key).ok())
}

fn merge_env_file(loaded: dotenvy::Result<PathBuf>) {
    match loaded {
        Ok(path) => info!("loaded settings from {}", path.display()),
        Err(e) => debug!("no .env file merged: {e}"),
    }
}
