use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dioxus::html::input_data::MouseButton;
use dioxus::html::TouchPoint;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use mapguess_shared::{FrameStats, InputContext, InputEvent, MapEngine, Point, Viewport};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::canvas::{WebImage, WebSurface};
use crate::coords;

pub const MAP_CANVAS_ID: &str = "map-canvas";

/// How often the debug readout copies the frame rate into the UI.
const DEBUG_REFRESH_MS: u32 = 500;

/// Shared handle to the engine, compared by identity so props stay stable
/// across renders.
#[derive(Clone)]
pub struct EngineHandle(pub Rc<RefCell<MapEngine<WebImage>>>);

impl PartialEq for EngineHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Canvas-relative position of a client point.
fn canvas_point(client_x: f64, client_y: f64) -> Option<Point> {
    let (left, top, _) = coords::canvas_rect(MAP_CANVAS_ID)?;
    Some(coords::client_to_canvas(client_x, client_y, left, top))
}

fn touch_points(touches: &[TouchPoint]) -> Vec<Point> {
    touches
        .iter()
        .filter_map(|t| {
            let client = t.client_coordinates();
            canvas_point(client.x, client.y)
        })
        .collect()
}

/// Whether the frame loop continues. Once `running` clears, the stored
/// callback is released so it stops keeping itself alive.
fn keep_running<T>(running: &Cell<bool>, callback: &RefCell<Option<T>>) -> bool {
    if running.get() {
        return true;
    }
    let released = callback.borrow_mut().take();
    drop(released);
    false
}

/// Wheel input for the engine, or `None` when the overlay owns the wheel
/// and the page should scroll normally.
fn wheel_input(blocked: bool, pos: Option<Point>, delta_y: f64) -> Option<InputEvent> {
    if blocked {
        return None;
    }
    Some(InputEvent::Wheel { pos: pos?, delta_y })
}

/// Drive `engine.frame` from `requestAnimationFrame` until `running` clears.
fn start_frame_loop(engine: EngineHandle, running: Rc<Cell<bool>>, stats: Rc<RefCell<FrameStats>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = callback.clone();
    let mut surface: Option<WebSurface> = None;

    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        if !keep_running(&running, &next) {
            return;
        }
        stats.borrow_mut().tick(now);

        if surface.is_none() {
            surface = WebSurface::from_element_id(MAP_CANVAS_ID);
        }
        if let Some(surface) = surface.as_mut() {
            let viewport = Viewport::new(surface.css_size(), coords::device_pixel_ratio());
            engine.0.borrow_mut().frame(surface, viewport);
        }

        if let (Some(window), Some(cb)) = (web_sys::window(), next.borrow().as_ref()) {
            window.request_animation_frame(cb.as_ref().unchecked_ref()).ok();
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = callback.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref()).ok();
    };
}

#[component]
pub fn MapView(
    engine: EngineHandle,
    input_blocked: Signal<bool>,
    accepting_guess: Signal<bool>,
    show_debug: Signal<bool>,
    loading: Signal<bool>,
    on_guess: EventHandler<Point>,
) -> Element {
    let mut fps = use_signal(|| 0.0_f64);
    let mut grabbing = use_signal(|| false);
    let stats = use_hook(|| Rc::new(RefCell::new(FrameStats::default())));
    let running = use_hook(|| Rc::new(Cell::new(true)));

    use_hook({
        let engine = engine.clone();
        let running = running.clone();
        let stats = stats.clone();
        move || start_frame_loop(engine, running, stats)
    });
    use_drop({
        let running = running.clone();
        move || running.set(false)
    });

    // Copy the frame rate into a signal at a readable pace
    use_future({
        let stats = stats.clone();
        move || {
            let stats = stats.clone();
            async move {
                loop {
                    TimeoutFuture::new(DEBUG_REFRESH_MS).await;
                    if *show_debug.peek() {
                        fps.set(stats.borrow().fps());
                    }
                }
            }
        }
    });

    let send = use_callback({
        let engine = engine.clone();
        move |event: InputEvent| {
            let Some((_, _, canvas)) = coords::canvas_rect(MAP_CANVAS_ID) else {
                return;
            };
            let ctx = InputContext {
                input_blocked: *input_blocked.peek(),
                accepting_guess: *accepting_guess.peek(),
            };
            let (guess, interacting) = {
                let mut engine = engine.0.borrow_mut();
                let guess = engine.handle_input(&event, canvas, ctx);
                (guess, engine.is_interacting())
            };
            if *grabbing.peek() != interacting {
                grabbing.set(interacting);
            }
            if let Some(guess) = guess {
                on_guess.call(guess);
            }
        }
    });

    let fps_text = format!("{:.0} fps", fps());
    let pointer_text = {
        let engine = engine.0.borrow();
        coords::canvas_rect(MAP_CANVAS_ID)
            .and_then(|(_, _, canvas)| engine.pointer_world(canvas))
            .map(|p| format!("pointer {:.0}, {:.0}", p.x, p.y))
    };

    rsx! {
        div { class: "map-view",
            canvas {
                id: MAP_CANVAS_ID,
                class: if grabbing() { "map-canvas grabbing" } else { "map-canvas" },

                onmousedown: move |evt: Event<MouseData>| {
                    if evt.trigger_button() != Some(MouseButton::Primary) {
                        return;
                    }
                    let client = evt.client_coordinates();
                    if let Some(pos) = canvas_point(client.x, client.y) {
                        send.call(InputEvent::MouseDown { pos });
                    }
                },

                onmousemove: move |evt: Event<MouseData>| {
                    let client = evt.client_coordinates();
                    if let Some(pos) = canvas_point(client.x, client.y) {
                        send.call(InputEvent::MouseMove { pos });
                    }
                },

                onmouseup: move |evt: Event<MouseData>| {
                    if evt.trigger_button() != Some(MouseButton::Primary) {
                        return;
                    }
                    let client = evt.client_coordinates();
                    if let Some(pos) = canvas_point(client.x, client.y) {
                        send.call(InputEvent::MouseUp { pos });
                    }
                },

                onmouseleave: move |_| send.call(InputEvent::MouseLeave),

                onwheel: move |evt: Event<WheelData>| {
                    let delta_y = coords::wheel_delta_y(evt.data().delta());
                    let client = evt.data().client_coordinates();
                    let pos = canvas_point(client.x, client.y);
                    let Some(event) = wheel_input(*input_blocked.peek(), pos, delta_y) else {
                        return;
                    };
                    evt.prevent_default();
                    send.call(event);
                },

                ontouchstart: move |evt: Event<TouchData>| {
                    evt.prevent_default();
                    send.call(InputEvent::TouchStart(touch_points(&evt.data().touches())));
                },

                ontouchmove: move |evt: Event<TouchData>| {
                    evt.prevent_default();
                    send.call(InputEvent::TouchMove(touch_points(&evt.data().touches())));
                },

                ontouchend: move |evt: Event<TouchData>| {
                    evt.prevent_default();
                    send.call(InputEvent::TouchEnd(touch_points(&evt.data().touches())));
                },

                ontouchcancel: move |_evt: Event<TouchData>| {
                    send.call(InputEvent::TouchCancel);
                },
            }

            if loading() {
                div { class: "map-loading", "Loading map..." }
            }

            if *show_debug.read() {
                div { class: "debug-readout",
                    div { "{fps_text}" }
                    if let Some(text) = pointer_text {
                        div { "{text}" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_loop_releases_callback() {
        let running = Cell::new(true);
        let held = Rc::new(());
        let slot = RefCell::new(Some(held.clone()));

        assert!(keep_running(&running, &slot));
        assert_eq!(Rc::strong_count(&held), 2);

        running.set(false);
        assert!(!keep_running(&running, &slot));
        assert!(slot.borrow().is_none());
        assert_eq!(Rc::strong_count(&held), 1);
    }

    #[test]
    fn test_wheel_ignored_while_blocked() {
        let pos = Some(Point::new(10.0, 20.0));
        assert_eq!(wheel_input(true, pos, 120.0), None);
        assert_eq!(
            wheel_input(false, pos, 120.0),
            Some(InputEvent::Wheel {
                pos: Point::new(10.0, 20.0),
                delta_y: 120.0,
            })
        );
        assert_eq!(wheel_input(false, None, 120.0), None);
    }
}
