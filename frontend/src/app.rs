use common::config::{ConfigError, WebConfig};
use gloo_console::error;
use yew::{html, Component, Context, Html};

use crate::components::directory::DirectoryComponent;
use crate::config;

/// Root component. Refuses to show the map when configuration is incomplete.
pub struct App {
    config: Result<WebConfig, ConfigError>,
    admin: bool,
}

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let config = config::load();
        if let Err(err) = &config {
            error!(format!("configuration error: {err}"));
        }
        Self {
            config,
            admin: config::admin_from_location(),
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        match &self.config {
            Ok(config) => html! {
                <DirectoryComponent config={config.clone()} admin={self.admin} />
            },
            Err(err) => html! {
                <div class="config-error">
                    <h1>{"The map cannot start"}</h1>
                    <p>{ err.to_string() }</p>
                    <p>{"Set it in the environment and rebuild the client."}</p>
                </div>
            },
        }
    }
}
