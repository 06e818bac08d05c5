use yew::{classes, html, Component, Context, Html, Properties};

/// Panel sliding in from the right edge of the page.
///
/// Visibility is driven by the `open` prop: the `show` class is toggled on
/// every render, so the sheet always mirrors the parent's state.
pub struct SideSheet;

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub open: bool,
}

impl Component for SideSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        SideSheet
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        html! {
            <aside class={classes!("side-sheet", props.open.then_some("show"))} aria-hidden={(!props.open).to_string()}>
                { props.children.clone() }
            </aside>
        }
    }
}
