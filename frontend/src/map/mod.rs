//! Mapbox GL JS as the concrete [`MapSurface`].
//!
//! The surface is created against a mounted DOM node and owns the JS map
//! instance plus the Rust closures registered as its listeners. The closures
//! live exactly as long as the surface; `destroy` removes the map first so
//! none of them can fire afterwards.

mod bindings;

use bindings::{MapMouseEvent, MapboxMap, MapboxMarker, MapboxPopup};
use common::config::MapViewConfig;
use common::map_view::{MapEvents, MapSurface, MarkerSpec, ViewState};
use common::model::Coordinates;
use gloo_console::warn;
use js_sys::Reflect;
use serde_json::{json, Value};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

pub struct MapboxSurface {
    map: MapboxMap,
    config: MapViewConfig,
    listeners: Vec<Closure<dyn FnMut(JsValue)>>,
}

impl MapboxSurface {
    pub fn create(container: &HtmlElement, config: &MapViewConfig) -> Self {
        let options = js_object(&json!({
            "accessToken": config.access_token,
            "style": config.style,
            "center": [config.center.lng, config.center.lat],
            "zoom": config.zoom,
            "pitch": config.pitch,
            "antialias": true,
        }));
        if Reflect::set(&options, &JsValue::from_str("container"), container).is_err() {
            warn!("could not attach map container");
        }

        Self {
            map: MapboxMap::new(&options),
            config: config.clone(),
            listeners: Vec::new(),
        }
    }

    fn listen(&mut self, event: &str, handler: impl FnMut(JsValue) + 'static) {
        let closure = Closure::<dyn FnMut(JsValue)>::new(handler);
        self.map.on(event, closure.as_ref().unchecked_ref());
        self.listeners.push(closure);
    }
}

impl MapSurface for MapboxSurface {
    type Marker = MapboxMarker;

    fn bind_events(&mut self, events: MapEvents) {
        let map = self.map.clone();
        let move_events = events.clone();
        self.listen("move", move |_| {
            let center = map.get_center();
            move_events.emit_viewport(ViewState {
                center: Coordinates::new(center.lng(), center.lat()),
                zoom: map.get_zoom(),
                pitch: map.get_pitch(),
            });
        });

        self.listen("click", move |event| {
            let at = event.unchecked_into::<MapMouseEvent>().lng_lat();
            events.emit_click(Coordinates::new(at.lng(), at.lat()));
        });

        let map = self.map.clone();
        let buildings_3d = self.config.buildings_3d;
        let traffic = self.config.traffic;
        self.listen("load", move |_| {
            if buildings_3d {
                map.add_layer(&js_object(&building_layer()));
            }
            if traffic {
                map.add_source(
                    "traffic",
                    &js_object(&json!({ "type": "vector", "url": "mapbox://mapbox.mapbox-traffic-v1" })),
                );
                map.add_layer(&js_object(&traffic_layer()));
            }
        });
    }

    fn add_marker(&mut self, spec: &MarkerSpec) -> MapboxMarker {
        let popup = MapboxPopup::new(&js_object(&json!({ "offset": 24 })));
        popup.set_html(&spec.popup.to_html());

        let marker = MapboxMarker::new(&js_object(&json!({ "color": spec.color.css() })));
        marker.set_lng_lat(&js_object(&json!([spec.position.lng, spec.position.lat])));
        marker.set_popup(&popup);
        marker.add_to(&self.map);
        marker
    }

    fn remove_marker(&mut self, marker: MapboxMarker) {
        marker.remove_marker();
    }

    fn fly_to(&mut self, center: Coordinates) {
        self.map
            .fly_to(&js_object(&json!({ "center": [center.lng, center.lat] })));
    }

    fn destroy(&mut self) {
        self.map.remove_map();
        self.listeners.clear();
    }
}

/// Turns a JSON value into the equivalent plain JS value.
fn js_object(value: &Value) -> JsValue {
    js_sys::JSON::parse(&value.to_string()).unwrap_or(JsValue::UNDEFINED)
}

fn building_layer() -> Value {
    json!({
        "id": "3d-buildings",
        "source": "composite",
        "source-layer": "building",
        "filter": ["==", "extrude", "true"],
        "type": "fill-extrusion",
        "minzoom": 15,
        "paint": {
            "fill-extrusion-color": "#aaa",
            "fill-extrusion-height": ["get", "height"],
            "fill-extrusion-base": ["get", "min_height"],
            "fill-extrusion-opacity": 0.6
        }
    })
}

fn traffic_layer() -> Value {
    json!({
        "id": "traffic",
        "type": "line",
        "source": "traffic",
        "source-layer": "traffic",
        "paint": {
            "line-width": 2,
            "line-color": [
                "match", ["get", "congestion"],
                "low", "#4caf50",
                "moderate", "#ffb300",
                "heavy", "#e65100",
                "severe", "#b71c1c",
                "#9e9e9e"
            ]
        }
    })
}
