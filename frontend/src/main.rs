use crate::app::App;

mod app;
mod components;
mod config;
mod map;
mod relay;
mod side_sheet;

fn main() {
    yew::Renderer::<App>::new().render();
}
