//! Screen <-> world coordinate conversion.
//!
//! The draw transform is: translate to the canvas center, scale by zoom,
//! translate by the camera pan. Every function here is the algebra of that
//! transform or its inverse, in CSS pixels (device pixel ratio is applied
//! separately by the renderer).

use crate::models::{Point, Pose, Rect, Size};

/// Convert a canvas-relative screen point to world coordinates.
pub fn screen_to_world(screen: Point, pose: Pose, canvas: Size) -> Point {
    Point::new(
        (screen.x - canvas.width / 2.0) / pose.zoom - pose.x,
        (screen.y - canvas.height / 2.0) / pose.zoom - pose.y,
    )
}

/// Convert a world point to canvas-relative screen coordinates.
pub fn world_to_screen(world: Point, pose: Pose, canvas: Size) -> Point {
    Point::new(
        (world.x + pose.x) * pose.zoom + canvas.width / 2.0,
        (world.y + pose.y) * pose.zoom + canvas.height / 2.0,
    )
}

/// The world-space rectangle covered by the canvas.
pub fn visible_world_rect(pose: Pose, canvas: Size) -> Rect {
    let half_w = canvas.width / 2.0 / pose.zoom;
    let half_h = canvas.height / 2.0 / pose.zoom;
    Rect::from_edges(
        -pose.x - half_w,
        -pose.y - half_h,
        -pose.x + half_w,
        -pose.y + half_h,
    )
}

/// Solve for the camera pan that keeps the world point found under `focus`
/// at `old_zoom` under the same screen point at `new_zoom`.
///
/// `pan` is the camera pan the old zoom was evaluated with.
pub fn anchor_pan(focus: Point, pan: Point, old_zoom: f64, new_zoom: f64, canvas: Size) -> Point {
    let anchor = screen_to_world(focus, Pose::new(pan.x, pan.y, old_zoom), canvas);
    Point::new(
        (focus.x - canvas.width / 2.0) / new_zoom - anchor.x,
        (focus.y - canvas.height / 2.0) / new_zoom - anchor.y,
    )
}
