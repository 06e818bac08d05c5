//! Minimal `wasm-bindgen` view of the Mapbox GL JS global (`mapboxgl`),
//! loaded by `index.html`. Only what the surface uses is bound.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    #[derive(Clone, Debug)]
    pub type MapboxMap;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Map")]
    pub fn new(options: &JsValue) -> MapboxMap;

    #[wasm_bindgen(method, js_class = "Map")]
    pub fn on(this: &MapboxMap, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, js_class = "Map", js_name = getCenter)]
    pub fn get_center(this: &MapboxMap) -> LngLat;

    #[wasm_bindgen(method, js_class = "Map", js_name = getZoom)]
    pub fn get_zoom(this: &MapboxMap) -> f64;

    #[wasm_bindgen(method, js_class = "Map", js_name = getPitch)]
    pub fn get_pitch(this: &MapboxMap) -> f64;

    #[wasm_bindgen(method, js_class = "Map", js_name = flyTo)]
    pub fn fly_to(this: &MapboxMap, options: &JsValue);

    #[wasm_bindgen(method, js_class = "Map", js_name = addSource)]
    pub fn add_source(this: &MapboxMap, id: &str, source: &JsValue);

    #[wasm_bindgen(method, js_class = "Map", js_name = addLayer)]
    pub fn add_layer(this: &MapboxMap, layer: &JsValue);

    #[wasm_bindgen(method, js_class = "Map", js_name = remove)]
    pub fn remove_map(this: &MapboxMap);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type LngLat;

    #[wasm_bindgen(method, getter)]
    pub fn lng(this: &LngLat) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn lat(this: &LngLat) -> f64;
}

#[wasm_bindgen]
extern "C" {
    /// Event object passed to `click` listeners.
    pub type MapMouseEvent;

    #[wasm_bindgen(method, getter, js_name = lngLat)]
    pub fn lng_lat(this: &MapMouseEvent) -> LngLat;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Marker)]
    #[derive(Clone, Debug)]
    pub type MapboxMarker;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Marker")]
    pub fn new(options: &JsValue) -> MapboxMarker;

    #[wasm_bindgen(method, js_class = "Marker", js_name = setLngLat)]
    pub fn set_lng_lat(this: &MapboxMarker, lng_lat: &JsValue) -> MapboxMarker;

    #[wasm_bindgen(method, js_class = "Marker", js_name = setPopup)]
    pub fn set_popup(this: &MapboxMarker, popup: &MapboxPopup) -> MapboxMarker;

    #[wasm_bindgen(method, js_class = "Marker", js_name = addTo)]
    pub fn add_to(this: &MapboxMarker, map: &MapboxMap) -> MapboxMarker;

    #[wasm_bindgen(method, js_class = "Marker", js_name = remove)]
    pub fn remove_marker(this: &MapboxMarker);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Popup)]
    #[derive(Clone, Debug)]
    pub type MapboxPopup;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Popup")]
    pub fn new(options: &JsValue) -> MapboxPopup;

    #[wasm_bindgen(method, js_class = "Popup", js_name = setHTML)]
    pub fn set_html(this: &MapboxPopup, html: &str) -> MapboxPopup;
}
