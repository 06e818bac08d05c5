//! Update function for the directory screen (Elm-style: state + message in,
//! "re-render?" out).
//!
//! Key behaviors
//! - Refreshes are ticketed; only the newest fetch is applied.
//! - Markers follow the filtered view after every refresh and filter change.
//! - Map clicks go to the capture flow, which ignores them unless the admin
//!   panel is open.
//! - Saves run asynchronously; success refreshes the directory, failure
//!   keeps the form and shows the store's message.

use std::rc::Rc;

use common::capture::CaptureError;
use common::directory::ALL_CATEGORIES;
use common::store::RecordStore;
use gloo_console::{error, log};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::show_toast;
use super::messages::Msg;
use super::state::DirectoryComponent;

pub fn update(component: &mut DirectoryComponent, ctx: &Context<DirectoryComponent>, msg: Msg) -> bool {
    match msg {
        Msg::Refresh => {
            let ticket = component.directory.begin_refresh();
            let store = Rc::clone(&component.store);
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = store.fetch_all().await;
                link.send_message(Msg::Refreshed(ticket, result));
            });
            false
        }
        Msg::Refreshed(ticket, result) => {
            if let Err(err) = &result {
                error!(format!("loading businesses failed: {err}"));
            }
            let failed = result.is_err();
            if !component.directory.apply_refresh(ticket, result) {
                return false;
            }
            if failed {
                show_toast("Could not load businesses.");
            } else {
                log!(format!("{} businesses loaded", component.directory.len()));
            }

            let categories = component.directory.distinct_categories();
            if !categories.contains(&component.category) {
                component.category = ALL_CATEGORIES.to_string();
            }
            component.sync_markers();
            true
        }
        Msg::ViewportChanged(view) => {
            component.view = view;
            true
        }
        Msg::MapClicked(at) => component.capture.pick(at),
        Msg::SetSearch(search) => {
            component.search = search;
            component.sync_markers();
            true
        }
        Msg::SetCategory(category) => {
            component.category = category;
            component.sync_markers();
            true
        }
        Msg::FocusBusiness(id) => {
            let position = component.directory.get(&id).map(|r| r.position);
            if let (Some(position), Some(map)) = (position, component.map.as_mut()) {
                map.fly_to(position);
            }
            false
        }
        Msg::OpenAdmin => match component.capture.open() {
            Ok(()) => true,
            Err(err) => {
                show_toast(&err.to_string());
                false
            }
        },
        Msg::CancelAdmin => {
            component.capture.cancel();
            true
        }
        Msg::EditName(name) => edit(component, |form| form.name = name),
        Msg::EditCategory(category) => edit(component, |form| form.category = category),
        Msg::EditPowerType(power_type) => edit(component, |form| form.power_type = power_type),
        Msg::EditCardPayment(accepts) => edit(component, |form| form.accepts_card_payment = accepts),
        Msg::EditPhotoUrl(url) => edit(component, |form| form.photo_url = url),
        Msg::Save => {
            let (ticket, record) = match component.capture.begin_submit() {
                Ok(submission) => submission,
                Err(CaptureError::Busy) => return false,
                Err(err) => {
                    show_toast(&err.to_string());
                    return true;
                }
            };

            let store = Rc::clone(&component.store);
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = store.insert(record).await;
                link.send_message(Msg::Saved(ticket, result));
            });
            true
        }
        Msg::Saved(ticket, result) => {
            if component.capture.finish_submit(ticket, &result) {
                show_toast("Business saved.");
                ctx.link().send_message(Msg::Refresh);
            } else if let Err(err) = &result {
                show_toast(&err.to_string());
            }
            true
        }
    }
}

fn edit(
    component: &mut DirectoryComponent,
    apply: impl FnOnce(&mut common::capture::CaptureForm),
) -> bool {
    match component.capture.form_mut() {
        Some(form) => {
            apply(form);
            true
        }
        None => false,
    }
}
