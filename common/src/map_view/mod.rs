//! Map view adapter.
//!
//! Sits between the directory and whatever actually draws the map. Rendering
//! flows one way (records in, markers out) and so do events (native map
//! interaction in, observer callbacks out). The drawing engine itself is
//! reached only through [`MapSurface`], so the adapter can be driven by a mock
//! surface that emits synthetic events.
//!
//! Lifecycle: [`MapViewAdapter::mount`] takes ownership of a surface and binds
//! its native listeners exactly once; [`MapViewAdapter::destroy`] removes the
//! markers, tears the surface down and silences every observer.

mod marker;

pub use marker::{MarkerColor, MarkerSpec, Popup, escape_html};

use crate::model::{BusinessRecord, Coordinates, RecordId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Camera position reported on every view change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub center: Coordinates,
    pub zoom: f64,
    pub pitch: f64,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lng: {:.4} | Lat: {:.4} | Zoom: {:.2}",
            self.center.lng, self.center.lat, self.zoom
        )
    }
}

/// Rendering capability provided by a concrete map engine.
pub trait MapSurface {
    /// Engine-side handle of one placed marker.
    type Marker;

    /// Hooks the engine's move and click listeners up to `events`. Called
    /// once per surface, by [`MapViewAdapter::mount`].
    fn bind_events(&mut self, events: MapEvents);

    fn add_marker(&mut self, spec: &MarkerSpec) -> Self::Marker;

    fn remove_marker(&mut self, marker: Self::Marker);

    /// Moves the camera to `center`, keeping zoom and pitch.
    fn fly_to(&mut self, center: Coordinates);

    /// Releases the engine instance. No other method is called afterwards.
    fn destroy(&mut self);
}

/// Handle returned by observer registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type ViewportObserver = Rc<dyn Fn(ViewState)>;
type ClickObserver = Rc<dyn Fn(Coordinates)>;

#[derive(Default)]
struct Observers {
    next_id: u64,
    viewport: Vec<(u64, ViewportObserver)>,
    click: Vec<(u64, ClickObserver)>,
    last_view: Option<ViewState>,
    closed: bool,
}

/// Event entry point handed to the surface.
///
/// Cloning is cheap; all clones feed the same observers. Once the adapter is
/// destroyed every emit is ignored, so a late native event is harmless.
#[derive(Clone, Default)]
pub struct MapEvents {
    observers: Rc<RefCell<Observers>>,
}

impl MapEvents {
    pub fn emit_viewport(&self, view: ViewState) {
        let targets: Vec<ViewportObserver> = {
            let mut observers = self.observers.borrow_mut();
            if observers.closed {
                return;
            }
            observers.last_view = Some(view);
            observers.viewport.iter().map(|(_, o)| o.clone()).collect()
        };
        for observer in targets {
            observer(view);
        }
    }

    pub fn emit_click(&self, at: Coordinates) {
        let targets: Vec<ClickObserver> = {
            let observers = self.observers.borrow();
            if observers.closed {
                return;
            }
            observers.click.iter().map(|(_, o)| o.clone()).collect()
        };
        for observer in targets {
            observer(at);
        }
    }

    fn next_id(&self) -> u64 {
        let mut observers = self.observers.borrow_mut();
        observers.next_id += 1;
        observers.next_id
    }
}

/// Outcome of one [`MapViewAdapter::render_markers`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub added: usize,
    pub removed: usize,
    pub kept: usize,
}

pub struct MapViewAdapter<S: MapSurface> {
    surface: Option<S>,
    events: MapEvents,
    rendered: HashMap<RecordId, (MarkerSpec, S::Marker)>,
}

impl<S: MapSurface> MapViewAdapter<S> {
    /// Takes ownership of `surface` and binds its native events.
    pub fn mount(mut surface: S, initial: ViewState) -> Self {
        let events = MapEvents::default();
        events.observers.borrow_mut().last_view = Some(initial);
        surface.bind_events(events.clone());
        Self {
            surface: Some(surface),
            events,
            rendered: HashMap::new(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Last view reported by the surface, or the initial one.
    pub fn view_state(&self) -> Option<ViewState> {
        self.events.observers.borrow().last_view
    }

    pub fn on_viewport_change(&self, observer: impl Fn(ViewState) + 'static) -> Subscription {
        let id = self.events.next_id();
        self.events
            .observers
            .borrow_mut()
            .viewport
            .push((id, Rc::new(observer)));
        Subscription(id)
    }

    /// Every click is delivered; observers decide whether to act on it.
    pub fn on_map_click(&self, observer: impl Fn(Coordinates) + 'static) -> Subscription {
        let id = self.events.next_id();
        self.events
            .observers
            .borrow_mut()
            .click
            .push((id, Rc::new(observer)));
        Subscription(id)
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        let mut observers = self.events.observers.borrow_mut();
        observers.viewport.retain(|(id, _)| *id != subscription.0);
        observers.click.retain(|(id, _)| *id != subscription.0);
    }

    /// Makes the markers on the map match `records` exactly.
    ///
    /// Markers are keyed by record id: an unchanged record keeps its marker,
    /// a changed one gets a fresh marker, a vanished one loses it. Calling
    /// this repeatedly with the same records is a no-op.
    pub fn render_markers(&mut self, records: &[BusinessRecord]) -> RenderStats {
        let Some(surface) = self.surface.as_mut() else {
            return RenderStats::default();
        };

        let mut wanted: HashMap<RecordId, MarkerSpec> = records
            .iter()
            .map(|r| (r.id.clone(), MarkerSpec::for_record(r)))
            .collect();
        let mut stats = RenderStats::default();

        let previous = std::mem::take(&mut self.rendered);
        for (id, (spec, marker)) in previous {
            match wanted.remove(&id) {
                Some(next) if next == spec => {
                    self.rendered.insert(id, (spec, marker));
                    stats.kept += 1;
                }
                Some(next) => {
                    surface.remove_marker(marker);
                    let placed = surface.add_marker(&next);
                    self.rendered.insert(id, (next, placed));
                    stats.removed += 1;
                    stats.added += 1;
                }
                None => {
                    surface.remove_marker(marker);
                    stats.removed += 1;
                }
            }
        }

        for (id, spec) in wanted {
            let placed = surface.add_marker(&spec);
            self.rendered.insert(id, (spec, placed));
            stats.added += 1;
        }

        stats
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered.len()
    }

    pub fn rendered_spec(&self, id: &RecordId) -> Option<&MarkerSpec> {
        self.rendered.get(id).map(|(spec, _)| spec)
    }

    pub fn fly_to(&mut self, center: Coordinates) {
        if let Some(surface) = self.surface.as_mut() {
            surface.fly_to(center);
        }
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Removes all markers, releases the surface and drops every observer.
    /// Further calls on the adapter do nothing.
    pub fn destroy(&mut self) {
        let Some(mut surface) = self.surface.take() else {
            return;
        };
        for (_, (_, marker)) in self.rendered.drain() {
            surface.remove_marker(marker);
        }
        surface.destroy();

        let mut observers = self.events.observers.borrow_mut();
        observers.closed = true;
        observers.viewport.clear();
        observers.click.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewBusinessRecord, PowerType};
    use std::cell::Cell;

    /// Records every call; stands in for the real map engine.
    #[derive(Default)]
    struct MockSurface {
        events: Option<MapEvents>,
        bind_calls: usize,
        next_marker: u32,
        live: Vec<(u32, MarkerSpec)>,
        adds: usize,
        removes: usize,
        flown_to: Vec<Coordinates>,
        destroyed: bool,
    }

    impl MapSurface for MockSurface {
        type Marker = u32;

        fn bind_events(&mut self, events: MapEvents) {
            self.bind_calls += 1;
            self.events = Some(events);
        }

        fn add_marker(&mut self, spec: &MarkerSpec) -> u32 {
            self.next_marker += 1;
            self.adds += 1;
            self.live.push((self.next_marker, spec.clone()));
            self.next_marker
        }

        fn remove_marker(&mut self, marker: u32) {
            self.removes += 1;
            self.live.retain(|(m, _)| *m != marker);
        }

        fn fly_to(&mut self, center: Coordinates) {
            self.flown_to.push(center);
        }

        fn destroy(&mut self) {
            self.destroyed = true;
        }
    }

    fn initial() -> ViewState {
        ViewState {
            center: Coordinates::new(-13.2344, 8.4844),
            zoom: 13.0,
            pitch: 0.0,
        }
    }

    fn record(id: &str, name: &str, card: bool) -> BusinessRecord {
        NewBusinessRecord::new(name, "Market", Coordinates::new(-13.2, 8.5))
            .with_power_type(PowerType::Generator)
            .with_card_payment(card)
            .into_record(RecordId::new(id))
    }

    fn native(adapter: &MapViewAdapter<MockSurface>) -> MapEvents {
        adapter
            .surface()
            .and_then(|s| s.events.clone())
            .expect("events bound on mount")
    }

    #[test]
    fn mount_binds_native_events_exactly_once() {
        let mut adapter = MapViewAdapter::mount(MockSurface::default(), initial());
        adapter.render_markers(&[record("1", "A", false)]);
        adapter.render_markers(&[record("1", "A", false)]);
        adapter.on_map_click(|_| {});
        assert_eq!(adapter.surface().map(|s| s.bind_calls), Some(1));
        assert_eq!(adapter.view_state(), Some(initial()));
    }

    #[test]
    fn rerender_with_same_records_does_not_duplicate_markers() {
        let mut adapter = MapViewAdapter::mount(MockSurface::default(), initial());
        let records = vec![record("1", "A", false), record("2", "B", true)];

        let first = adapter.render_markers(&records);
        assert_eq!(first.added, 2);

        for _ in 0..3 {
            let again = adapter.render_markers(&records);
            assert_eq!(again, RenderStats { added: 0, removed: 0, kept: 2 });
        }
        let surface = adapter.surface().unwrap();
        assert_eq!(surface.live.len(), 2);
        assert_eq!(surface.adds, 2);
    }

    #[test]
    fn rerender_replaces_changed_and_removes_vanished_markers() {
        let mut adapter = MapViewAdapter::mount(MockSurface::default(), initial());
        adapter.render_markers(&[record("1", "A", false), record("2", "B", false)]);

        let stats = adapter.render_markers(&[record("1", "A", true), record("3", "C", false)]);
        assert_eq!(stats, RenderStats { added: 2, removed: 2, kept: 0 });

        assert_eq!(adapter.rendered_count(), 2);
        assert_eq!(
            adapter.rendered_spec(&RecordId::new("1")).map(|s| s.color),
            Some(MarkerColor::Green)
        );
        assert!(adapter.rendered_spec(&RecordId::new("2")).is_none());
        assert_eq!(adapter.surface().unwrap().live.len(), 2);
    }

    #[test]
    fn empty_render_clears_the_map() {
        let mut adapter = MapViewAdapter::mount(MockSurface::default(), initial());
        adapter.render_markers(&[record("1", "A", false)]);
        let stats = adapter.render_markers(&[]);
        assert_eq!(stats.removed, 1);
        assert!(adapter.surface().unwrap().live.is_empty());
    }

    #[test]
    fn synthetic_events_reach_observers() {
        let adapter = MapViewAdapter::mount(MockSurface::default(), initial());
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let zooms = Rc::new(RefCell::new(Vec::new()));
        {
            let clicks = clicks.clone();
            adapter.on_map_click(move |at| clicks.borrow_mut().push(at));
        }
        {
            let zooms = zooms.clone();
            adapter.on_viewport_change(move |view| zooms.borrow_mut().push(view.zoom));
        }

        let events = native(&adapter);
        events.emit_click(Coordinates::new(-13.2, 8.5));
        let moved = ViewState { zoom: 15.5, ..initial() };
        events.emit_viewport(moved);

        assert_eq!(*clicks.borrow(), vec![Coordinates::new(-13.2, 8.5)]);
        assert_eq!(*zooms.borrow(), vec![15.5]);
        assert_eq!(adapter.view_state(), Some(moved));
    }

    #[test]
    fn unsubscribed_observer_stops_receiving() {
        let adapter = MapViewAdapter::mount(MockSurface::default(), initial());
        let count = Rc::new(Cell::new(0));
        let sub = {
            let count = count.clone();
            adapter.on_map_click(move |_| count.set(count.get() + 1))
        };
        let events = native(&adapter);
        events.emit_click(Coordinates::new(0.0, 0.0));
        adapter.unsubscribe(sub);
        events.emit_click(Coordinates::new(0.0, 0.0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn observer_may_register_another_during_dispatch() {
        let adapter = Rc::new(MapViewAdapter::mount(MockSurface::default(), initial()));
        let inner_calls = Rc::new(Cell::new(0));
        {
            let adapter_ref = Rc::downgrade(&adapter);
            let inner_calls = inner_calls.clone();
            adapter.on_map_click(move |_| {
                if let Some(adapter) = adapter_ref.upgrade() {
                    let inner_calls = inner_calls.clone();
                    adapter.on_map_click(move |_| inner_calls.set(inner_calls.get() + 1));
                }
            });
        }
        let events = native(&adapter);
        events.emit_click(Coordinates::new(1.0, 1.0));
        assert_eq!(inner_calls.get(), 0);
        events.emit_click(Coordinates::new(1.0, 1.0));
        assert_eq!(inner_calls.get(), 1);
    }

    #[test]
    fn destroy_tears_down_once_and_silences_events() {
        let mut adapter = MapViewAdapter::mount(MockSurface::default(), initial());
        adapter.render_markers(&[record("1", "A", false)]);
        let events = native(&adapter);
        let count = Rc::new(Cell::new(0));
        {
            let count = count.clone();
            adapter.on_map_click(move |_| count.set(count.get() + 1));
        }

        adapter.destroy();
        assert!(!adapter.is_mounted());
        adapter.destroy();

        events.emit_click(Coordinates::new(0.0, 0.0));
        assert_eq!(count.get(), 0);
        assert_eq!(adapter.render_markers(&[record("2", "B", false)]), RenderStats::default());
        assert_eq!(adapter.rendered_count(), 0);
    }

    #[test]
    fn fly_to_reaches_surface() {
        let mut adapter = MapViewAdapter::mount(MockSurface::default(), initial());
        adapter.fly_to(Coordinates::new(-13.1, 8.4));
        assert_eq!(
            adapter.surface().unwrap().flown_to,
            vec![Coordinates::new(-13.1, 8.4)]
        );
    }

    #[test]
    fn view_state_formats_like_the_overlay() {
        let view = ViewState {
            center: Coordinates::new(-13.23444, 8.48444),
            zoom: 13.0,
            pitch: 45.0,
        };
        assert_eq!(view.to_string(), "Lng: -13.2344 | Lat: 8.4844 | Zoom: 13.00");
    }
}
