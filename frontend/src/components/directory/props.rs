//! Properties for the `DirectoryComponent`.

use common::config::WebConfig;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct DirectoryProps {
    /// Relay location and initial map view, already validated by `App`.
    pub config: WebConfig,

    /// Shows the "Add business" affordance. Taken from the page URL once at
    /// load; the relay does not check it.
    #[prop_or_default]
    pub admin: bool,
}
