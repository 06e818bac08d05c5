//! Business directory screen: the map, the search/filter overlay and the
//! admin capture panel.
//!
//! Responsibilities
//! - Wire the Yew `Component` to `update::update` and `view::view`.
//! - Create the map adapter once the container node exists, register its
//!   observers exactly once, and load the directory.
//! - Tear the map down when the component is removed.

use gloo_console::info;
use web_sys::HtmlElement;
use yew::prelude::*;

mod dialogs;
mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

use common::map_view::MapViewAdapter;

pub use messages::Msg;
pub use props::DirectoryProps;
pub use state::DirectoryComponent;

use crate::map::MapboxSurface;

impl Component for DirectoryComponent {
    type Message = Msg;
    type Properties = DirectoryProps;

    fn create(ctx: &Context<Self>) -> Self {
        DirectoryComponent::new(ctx.props())
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if !first_render || self.map.is_some() {
            return;
        }
        let Some(container) = self.map_ref.cast::<HtmlElement>() else {
            return;
        };

        let config = &ctx.props().config.map;
        let surface = MapboxSurface::create(&container, config);
        let adapter = MapViewAdapter::mount(surface, config.initial_view());

        let link = ctx.link().clone();
        adapter.on_viewport_change(move |view| link.send_message(Msg::ViewportChanged(view)));
        let link = ctx.link().clone();
        adapter.on_map_click(move |at| link.send_message(Msg::MapClicked(at)));

        self.map = Some(adapter);
        info!("map mounted");
        ctx.link().send_message(Msg::Refresh);
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(mut map) = self.map.take() {
            map.destroy();
        }
    }
}
