use tracing::debug;

use crate::config::CameraConfig;
use crate::interp::lerp;
use crate::models::{Point, Pose, Size};
use crate::transform;

/// Who is driving the camera.
///
/// `Animating` is entered by scripted moves (fit, reset, set-target) and
/// disables the zoom-to-focus correction so leftover focus state from an
/// earlier gesture cannot drag the scripted move off course. The next user
/// zoom gesture that changes the target zoom switches back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    UserControlled,
    Animating,
}

/// Pan/zoom camera with a current pose that eases towards a target pose.
#[derive(Debug, Clone)]
pub struct Camera {
    current: Pose,
    target: Pose,
    zoom_focus: Point,
    mode: CameraMode,
    config: CameraConfig,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let pose = Pose::new(0.0, 0.0, config.clamp_zoom(config.default_zoom));
        Self {
            current: pose,
            target: pose,
            zoom_focus: Point::default(),
            mode: CameraMode::UserControlled,
            config,
        }
    }

    pub fn current(&self) -> Pose {
        self.current
    }

    pub fn target(&self) -> Pose {
        self.target
    }

    pub fn zoom_focus(&self) -> Point {
        self.zoom_focus
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Pan by a screen-space delta. Current and target move together so the
    /// animation step does not pull back against an ongoing drag.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.current.x += dx / self.current.zoom;
        self.current.y += dy / self.current.zoom;
        self.target.x = self.current.x;
        self.target.y = self.current.y;
    }

    /// Multiply the target zoom by `factor`, keeping `focus` fixed on screen.
    pub fn zoom_by(&mut self, factor: f64, focus: Point) {
        self.zoom_to(self.target.zoom * factor, focus);
    }

    /// Zoom factor for a wheel event: `exp(-delta_y * sensitivity)`.
    pub fn wheel_factor(&self, delta_y: f64) -> f64 {
        (-delta_y * self.config.wheel_sensitivity).exp()
    }

    /// Set an absolute target zoom, keeping `focus` fixed on screen.
    pub fn zoom_to(&mut self, zoom: f64, focus: Point) {
        if zoom.is_nan() {
            return;
        }
        let zoom = self.config.clamp_zoom(zoom);
        self.zoom_focus = focus;
        if zoom != self.target.zoom {
            self.mode = CameraMode::UserControlled;
        }
        self.target.zoom = zoom;
    }

    /// Aim the camera so both world points, each with `padding` world units
    /// of margin, fit on a canvas of the given CSS size.
    pub fn fit_points_in_view(&mut self, a: Point, b: Point, padding: f64, canvas: Size) {
        let mid = a.midpoint(b);
        let zoom_x = axis_zoom(canvas.width, (a.x - b.x).abs(), padding);
        let zoom_y = axis_zoom(canvas.height, (a.y - b.y).abs(), padding);
        let zoom = self
            .config
            .clamp_zoom(zoom_x.min(zoom_y).min(self.config.fit_max_zoom));

        debug!(?a, ?b, zoom, "fitting points in view");
        self.target = Pose::new(-mid.x, -mid.y, zoom);
        self.mode = CameraMode::Animating;
    }

    /// Aim at the center of a map of the given size at the default zoom.
    pub fn reset_to_center(&mut self, map: Size) {
        self.set_target(map.center(), self.config.default_zoom);
    }

    /// Aim the camera so `world` ends up at the canvas center at `zoom`.
    pub fn set_target(&mut self, world: Point, zoom: f64) {
        debug!(?world, zoom, "scripted camera move");
        self.target = Pose::new(-world.x, -world.y, self.config.clamp_zoom(zoom));
        self.mode = CameraMode::Animating;
    }

    /// Advance the current pose one frame towards the target.
    ///
    /// Returns whether the zoom changed this frame.
    pub fn step(&mut self, canvas: Size) -> bool {
        let old_zoom = self.current.zoom;
        self.current.x = lerp(self.current.x, self.target.x, self.config.pan_blend);
        self.current.y = lerp(self.current.y, self.target.y, self.config.pan_blend);
        self.current.zoom = self.config.clamp_zoom(lerp(
            self.current.zoom,
            self.target.zoom,
            self.config.zoom_blend,
        ));

        let zoom_changed = self.current.zoom != old_zoom;
        if zoom_changed && self.mode == CameraMode::UserControlled {
            let pan = transform::anchor_pan(
                self.zoom_focus,
                Point::new(self.current.x, self.current.y),
                old_zoom,
                self.current.zoom,
                canvas,
            );
            self.current.x = pan.x;
            self.current.y = pan.y;
            self.target.x = pan.x;
            self.target.y = pan.y;
        }
        zoom_changed
    }

    /// Place the camera at `pose` with no animation pending.
    #[cfg(test)]
    pub(crate) fn settle_at(&mut self, pose: Pose) {
        self.current = pose;
        self.target = pose;
    }
}

/// Zoom needed to fit `spread` plus padding on both sides into `extent`.
fn axis_zoom(extent: f64, spread: f64, padding: f64) -> f64 {
    let span = spread + 2.0 * padding;
    if span > 0.0 {
        extent / span
    } else {
        f64::INFINITY
    }
}
