use dioxus::html::geometry::WheelDelta;
use mapguess_shared::{Point, Size};

/// Canvas element's bounding box as (left, top, size), in CSS pixels.
pub fn canvas_rect(id: &str) -> Option<(f64, f64, Size)> {
    let document = web_sys::window()?.document()?;
    let rect = document.get_element_by_id(id)?.get_bounding_client_rect();
    Some((rect.left(), rect.top(), Size::new(rect.width(), rect.height())))
}

/// Convert client (viewport) coordinates to canvas-relative CSS pixels.
pub fn client_to_canvas(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> Point {
    Point::new(client_x - rect_left, client_y - rect_top)
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
pub fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => lines_to_pixels(d.y),
        WheelDelta::Pages(d) => pages_to_pixels(d.y),
    }
}

fn lines_to_pixels(lines: f64) -> f64 {
    lines * 40.0
}

fn pages_to_pixels(pages: f64) -> f64 {
    pages * 400.0
}

/// Device pixel ratio of the current window, 1.0 outside a browser.
pub fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
}
