use common::capture::CapturePhase;
use common::model::PowerType;
use yew::html::Scope;
use yew::prelude::*;

use crate::components::directory::helpers::{checkbox_value, input_value, select_value};
use crate::components::directory::{DirectoryComponent, Msg};
use crate::side_sheet::SideSheet;

/// Admin panel: pick a location, fill in the form, save or cancel.
pub fn admin_dialog(component: &DirectoryComponent, link: &Scope<DirectoryComponent>) -> Html {
    let capture = &component.capture;
    let form = capture.form();
    let open = capture.phase() != CapturePhase::Idle;

    let location = match capture.picked() {
        Some(at) => html! { <p>{ format!("Location: {at}") }</p> },
        None => html! { <p class="hint">{"Click the map to place the business."}</p> },
    };

    html! {
        <SideSheet open={open}>
            <h2>{"Add business"}</h2>
            { location }

            <label>{"Name *"}</label>
            <input
                type="text"
                value={form.name.clone()}
                oninput={link.callback(|e: InputEvent| Msg::EditName(input_value(&e)))}
            />

            <label>{"Category"}</label>
            <input
                type="text"
                placeholder="General"
                value={form.category.clone()}
                oninput={link.callback(|e: InputEvent| Msg::EditCategory(input_value(&e)))}
            />

            <label>{"Power"}</label>
            <select onchange={link.batch_callback(|e: Event| {
                PowerType::parse(&select_value(&e)).map(Msg::EditPowerType)
            })}>
                { for PowerType::ALL.into_iter().map(|power| html! {
                    <option value={power.as_str()} selected={power == form.power_type}>
                        { power.label() }
                    </option>
                }) }
            </select>

            <label>
                <input
                    type="checkbox"
                    checked={form.accepts_card_payment}
                    onchange={link.callback(|e: Event| Msg::EditCardPayment(checkbox_value(&e)))}
                />
                {" Accepts card payment"}
            </label>

            <label>{"Photo URL"}</label>
            <input
                type="text"
                value={form.photo_url.clone()}
                oninput={link.callback(|e: InputEvent| Msg::EditPhotoUrl(input_value(&e)))}
            />

            {
                if let Some(message) = capture.last_error() {
                    html! { <p class="error">{ message }</p> }
                } else {
                    html! {}
                }
            }

            <div style="display:flex;gap:8px;margin-top:12px;">
                <button
                    disabled={!capture.can_submit()}
                    onclick={link.callback(|_| Msg::Save)}
                >
                    { if capture.is_submitting() { "Saving…" } else { "Save" } }
                </button>
                <button onclick={link.callback(|_| Msg::CancelAdmin)}>{"Cancel"}</button>
            </div>
        </SideSheet>
    }
}
