//! View rendering for the directory screen.
//!
//! Layout: the map fills the page; a floating overlay carries the title, the
//! camera readout, the search box, the category selector and the result
//! list; the admin panel slides in from the right.

use common::map_view::MarkerColor;
use common::model::BusinessRecord;
use yew::html::Scope;
use yew::prelude::*;

use super::dialogs::admin::admin_dialog;
use super::helpers::{input_value, select_value};
use super::messages::Msg;
use super::state::DirectoryComponent;

pub fn view(component: &DirectoryComponent, ctx: &Context<DirectoryComponent>) -> Html {
    let link = ctx.link();

    html! {
        <div class="map-root">
            <div class="overlay">
                <h1>{"Business Map"}</h1>
                <div>{ component.view.to_string() }</div>
                { build_filters(component, link) }
                { build_admin_button(component, link) }
                { build_results(component, link) }
            </div>
            <div class="map-container" ref={component.map_ref.clone()} />
            { admin_dialog(component, link) }
        </div>
    }
}

fn build_filters(component: &DirectoryComponent, link: &Scope<DirectoryComponent>) -> Html {
    let categories = component.directory.distinct_categories();

    html! {
        <>
            <input
                type="search"
                placeholder="Search name or category"
                value={component.search.clone()}
                oninput={link.callback(|e: InputEvent| Msg::SetSearch(input_value(&e)))}
            />
            <select onchange={link.callback(|e: Event| Msg::SetCategory(select_value(&e)))}>
                { for categories.into_iter().map(|category| {
                    let selected = category == component.category;
                    let label = if category == common::directory::ALL_CATEGORIES {
                        "All categories".to_string()
                    } else {
                        category.clone()
                    };
                    html! { <option value={category} selected={selected}>{ label }</option> }
                }) }
            </select>
        </>
    }
}

fn build_admin_button(component: &DirectoryComponent, link: &Scope<DirectoryComponent>) -> Html {
    if !component.capture.is_admin() {
        return html! {};
    }
    html! {
        <button class="admin-btn" onclick={link.callback(|_| Msg::OpenAdmin)}>
            {"+ Add business"}
        </button>
    }
}

fn build_results(component: &DirectoryComponent, link: &Scope<DirectoryComponent>) -> Html {
    let visible = component.visible();
    if visible.is_empty() {
        let text = if component.directory.is_refreshing() {
            "Loading businesses…"
        } else {
            "No businesses found."
        };
        return html! { <p>{ text }</p> };
    }

    html! {
        <>
            <p>{ format!("{} of {} businesses", visible.len(), component.directory.len()) }</p>
            <ul class="biz-list">
                { for visible.iter().map(|record| result_row(record, link)) }
            </ul>
        </>
    }
}

fn result_row(record: &BusinessRecord, link: &Scope<DirectoryComponent>) -> Html {
    let id = record.id.clone();
    let dot = format!("background:{};", MarkerColor::for_record(record).css());

    html! {
        <li key={record.id.to_string()} onclick={link.callback(move |_| Msg::FocusBusiness(id.clone()))}>
            <span class="dot" style={dot} />
            <span>
                <strong>{ record.name.clone() }</strong>
                <br />
                <small>{ format!("{} · {}", record.category, record.power_type) }</small>
            </span>
        </li>
    }
}
