//! Per-frame viewport rendering with source-image culling.

use tracing::trace;

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::models::{Point, Rect, Size};
use crate::transform;

/// A raster the renderer can draw.
pub trait ImageSource {
    /// Natural size in pixels, which is also its extent in world units.
    fn natural_size(&self) -> Size;

    /// Whether the image is decoded and has a usable size.
    fn is_ready(&self) -> bool;
}

/// 2D drawing surface with a canvas-style transform stack.
///
/// Transforms compose in call order, so `translate` followed by `scale`
/// scales around the translated origin.
pub trait Surface {
    type Image: ImageSource;

    /// Current backing store size in device pixels.
    fn backing_size(&self) -> (u32, u32);
    fn set_backing_size(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    /// Draw the `src` region of `image` into `dst`, both in the current transform's units.
    fn draw_image_region(&mut self, image: &Self::Image, src: Rect, dst: Rect);
    /// Draw `image` at its natural size with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64);
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: &str);
}

/// CSS size of the canvas and the device pixel ratio it is displayed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub css: Size,
    pub dpr: f64,
}

impl Viewport {
    pub fn new(css: Size, dpr: f64) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        Self { css, dpr }
    }

    /// Backing store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        let px = |v: f64| (v * self.dpr).round().max(0.0) as u32;
        (px(self.css.width), px(self.css.height))
    }
}

/// Everything drawn on top of the camera state in one frame.
pub struct Scene<'a, I> {
    pub map: Option<&'a I>,
    pub guess: Option<Point>,
    pub correct: Option<Point>,
    /// Round resolved: draw the result line and the correct-location marker.
    pub resolved: bool,
    pub guess_marker: Option<&'a I>,
    pub correct_marker: Option<&'a I>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// No map image, or it is still loading.
    ImagePending,
    /// The visible area does not overlap the map.
    Culled,
    /// The map was drawn from this source rectangle.
    Drawn { source: Rect },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub resized: bool,
    pub outcome: FrameOutcome,
}

/// Draw one frame: resize, advance the camera animation, then draw the
/// visible part of the map and the markers.
pub fn render_frame<S: Surface>(
    surface: &mut S,
    camera: &mut Camera,
    viewport: Viewport,
    scene: &Scene<'_, S::Image>,
    style: &RenderConfig,
) -> FrameReport {
    let backing = viewport.backing_size();
    let resized = surface.backing_size() != backing;
    if resized {
        surface.set_backing_size(backing.0, backing.1);
    }

    surface.clear();
    surface.save();
    surface.scale(viewport.dpr, viewport.dpr);

    camera.step(viewport.css);
    let pose = camera.current();

    surface.translate(viewport.css.width / 2.0, viewport.css.height / 2.0);
    surface.scale(pose.zoom, pose.zoom);
    surface.translate(pose.x, pose.y);

    let outcome = match scene.map.filter(|img| img.is_ready()) {
        None => FrameOutcome::ImagePending,
        Some(map) => {
            let size = map.natural_size();
            let bounds = Rect::new(0.0, 0.0, size.width, size.height);
            let visible = transform::visible_world_rect(pose, viewport.css);
            match visible.intersect(&bounds) {
                None => {
                    trace!(?visible, "map outside viewport, skipping draw");
                    FrameOutcome::Culled
                }
                Some(source) => {
                    // The canvas transform already encodes pan and zoom, so the
                    // source region is drawn at the same world rectangle.
                    surface.draw_image_region(map, source, source);
                    draw_markers(surface, scene, pose.zoom, style);
                    FrameOutcome::Drawn { source }
                }
            }
        }
    };

    surface.restore();
    FrameReport { resized, outcome }
}

fn draw_markers<S: Surface>(
    surface: &mut S,
    scene: &Scene<'_, S::Image>,
    zoom: f64,
    style: &RenderConfig,
) {
    let Some(guess) = scene.guess else {
        return;
    };
    let marker_scale = style.marker_scale / zoom;

    if scene.resolved {
        if let Some(correct) = scene.correct {
            surface.stroke_line(
                guess,
                correct,
                style.result_line_width / zoom,
                &style.result_line_color,
            );
            if let Some(sprite) = scene.correct_marker {
                draw_sprite(surface, sprite, correct, marker_scale);
            }
        }
    }
    if let Some(sprite) = scene.guess_marker {
        draw_sprite(surface, sprite, guess, marker_scale);
    }
}

/// Draw a sprite centered on `at` at a constant on-screen size.
fn draw_sprite<S: Surface>(surface: &mut S, sprite: &S::Image, at: Point, scale: f64) {
    if !sprite.is_ready() {
        return;
    }
    let size = sprite.natural_size();
    surface.save();
    surface.translate(at.x, at.y);
    surface.scale(scale, scale);
    surface.draw_image(sprite, -size.width / 2.0, -size.height / 2.0);
    surface.restore();
}

/// Frames-per-second estimate from consecutive frame timestamps.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    last_frame_ms: Option<f64>,
    fps: f64,
}

impl FrameStats {
    /// Record a frame at `now_ms` and return the updated estimate.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        if let Some(last) = self.last_frame_ms {
            let dt = now_ms - last;
            if dt > 0.0 {
                self.fps = 1000.0 / dt;
            }
        }
        self.last_frame_ms = Some(now_ms);
        self.fps
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}
