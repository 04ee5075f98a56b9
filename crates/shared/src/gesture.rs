//! Translation of raw pointer, touch and wheel input into camera moves and
//! guess commits.

use tracing::{debug, info};

use crate::camera::Camera;
use crate::models::{Point, Size};
use crate::transform;

/// Input event with positions in CSS pixels relative to the canvas top-left.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown { pos: Point },
    MouseMove { pos: Point },
    MouseUp { pos: Point },
    MouseLeave,
    Wheel { pos: Point, delta_y: f64 },
    /// All touches active after the start.
    TouchStart(Vec<Point>),
    /// All touches active after the move.
    TouchMove(Vec<Point>),
    /// The touches that remain after one or more were lifted.
    TouchEnd(Vec<Point>),
    TouchCancel,
}

/// Game state the interpreter needs for each event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputContext {
    /// A modal covers the map. Only releases are honored, to end a drag.
    pub input_blocked: bool,
    /// Clicks and taps place a guess.
    pub accepting_guess: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct DragState {
    is_dragging: bool,
    last: Point,
    /// Any nonzero movement since the press turns a click into a pan.
    has_moved: bool,
}

#[derive(Debug, Clone, Copy)]
struct PinchState {
    start_distance: f64,
    start_zoom: f64,
}

/// Stateful interpreter for one canvas.
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    drag: DragState,
    pinch: Option<PinchState>,
    pointer: Option<Point>,
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position on the canvas.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Apply one event to the camera. Returns the world position of a guess
    /// when the event completes a click or tap.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        camera: &mut Camera,
        canvas: Size,
        ctx: InputContext,
    ) -> Option<Point> {
        if ctx.input_blocked {
            self.handle_blocked(event);
            return None;
        }

        match event {
            InputEvent::MouseDown { pos } => {
                self.pointer = Some(*pos);
                self.start_drag(*pos);
                None
            }
            InputEvent::MouseMove { pos } => {
                self.pointer = Some(*pos);
                self.drag_to(*pos, camera);
                None
            }
            InputEvent::MouseUp { pos } => {
                self.pointer = Some(*pos);
                self.release(*pos, camera, canvas, ctx)
            }
            InputEvent::MouseLeave => {
                self.drag.is_dragging = false;
                None
            }
            InputEvent::Wheel { pos, delta_y } => {
                self.pointer = Some(*pos);
                let factor = camera.wheel_factor(*delta_y);
                camera.zoom_by(factor, *pos);
                None
            }
            InputEvent::TouchStart(touches) => {
                match touches.as_slice() {
                    [] => {}
                    [only] => {
                        self.pointer = Some(*only);
                        self.pinch = None;
                        self.start_drag(*only);
                    }
                    [a, b, ..] => {
                        self.pinch = Some(PinchState {
                            start_distance: a.distance(*b),
                            start_zoom: camera.target().zoom,
                        });
                        // A pinch never ends as a tap.
                        self.drag.is_dragging = false;
                        self.drag.has_moved = true;
                        debug!(start_zoom = camera.target().zoom, "pinch started");
                    }
                }
                None
            }
            InputEvent::TouchMove(touches) => {
                match (touches.as_slice(), self.pinch) {
                    ([a, b, ..], Some(pinch)) => {
                        let ratio = if pinch.start_distance > 0.0 {
                            a.distance(*b) / pinch.start_distance
                        } else {
                            1.0
                        };
                        camera.zoom_to(pinch.start_zoom * ratio, a.midpoint(*b));
                    }
                    ([only], None) => {
                        self.pointer = Some(*only);
                        self.drag_to(*only, camera);
                    }
                    _ => {}
                }
                None
            }
            InputEvent::TouchEnd(remaining) => match remaining.as_slice() {
                [] => {
                    self.pinch = None;
                    let at = self.pointer?;
                    self.release(at, camera, canvas, ctx)
                }
                [only] if self.pinch.is_some() => {
                    // Continue as a drag from the remaining finger so the
                    // camera does not jump to it.
                    self.pinch = None;
                    self.pointer = Some(*only);
                    self.drag = DragState {
                        is_dragging: true,
                        last: *only,
                        has_moved: true,
                    };
                    None
                }
                _ => None,
            },
            InputEvent::TouchCancel => {
                self.pinch = None;
                self.drag.is_dragging = false;
                None
            }
        }
    }

    fn handle_blocked(&mut self, event: &InputEvent) {
        match event {
            InputEvent::MouseUp { .. } | InputEvent::MouseLeave | InputEvent::TouchCancel => {
                self.drag.is_dragging = false;
                self.pinch = None;
            }
            InputEvent::TouchEnd(remaining) if remaining.len() < 2 => {
                self.drag.is_dragging = false;
                self.pinch = None;
            }
            _ => {}
        }
    }

    fn start_drag(&mut self, pos: Point) {
        self.drag = DragState {
            is_dragging: true,
            last: pos,
            has_moved: false,
        };
    }

    fn drag_to(&mut self, pos: Point, camera: &mut Camera) {
        if !self.drag.is_dragging {
            return;
        }
        let dx = pos.x - self.drag.last.x;
        let dy = pos.y - self.drag.last.y;
        if dx != 0.0 || dy != 0.0 {
            self.drag.has_moved = true;
            camera.pan(dx, dy);
        }
        self.drag.last = pos;
    }

    fn release(
        &mut self,
        pos: Point,
        camera: &Camera,
        canvas: Size,
        ctx: InputContext,
    ) -> Option<Point> {
        let was_click = self.drag.is_dragging && !self.drag.has_moved;
        self.drag.is_dragging = false;
        if !was_click || !ctx.accepting_guess {
            return None;
        }
        let world = transform::screen_to_world(pos, camera.current(), canvas);
        info!(x = world.x, y = world.y, "guess placed");
        Some(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::models::Pose;

    const CANVAS: Size = Size::new(800.0, 600.0);
    const GUESSING: InputContext = InputContext {
        input_blocked: false,
        accepting_guess: true,
    };

    fn camera_at(x: f64, y: f64, zoom: f64) -> Camera {
        let mut cam = Camera::new(CameraConfig::default());
        cam.settle_at(Pose::new(x, y, zoom));
        cam
    }

    fn feed(
        gestures: &mut GestureInterpreter,
        cam: &mut Camera,
        ctx: InputContext,
        events: &[InputEvent],
    ) -> Vec<Point> {
        events
            .iter()
            .filter_map(|e| gestures.handle(e, cam, CANVAS, ctx))
            .collect()
    }

    #[test]
    fn test_click_without_movement_commits_world_point() {
        let mut cam = camera_at(-1000.0, -500.0, 2.0);
        let mut gestures = GestureInterpreter::new();
        let pos = Point::new(500.0, 200.0);
        let guesses = feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[InputEvent::MouseDown { pos }, InputEvent::MouseUp { pos }],
        );
        // (500 - 400) / 2 + 1000, (200 - 300) / 2 + 500
        assert_eq!(guesses, vec![Point::new(1050.0, 450.0)]);
    }

    #[test]
    fn test_drag_pans_and_does_not_commit() {
        let mut cam = camera_at(0.0, 0.0, 2.0);
        let mut gestures = GestureInterpreter::new();
        let guesses = feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[
                InputEvent::MouseDown {
                    pos: Point::new(100.0, 100.0),
                },
                InputEvent::MouseMove {
                    pos: Point::new(101.0, 100.0),
                },
                InputEvent::MouseMove {
                    pos: Point::new(121.0, 90.0),
                },
                InputEvent::MouseUp {
                    pos: Point::new(121.0, 90.0),
                },
            ],
        );
        assert!(guesses.is_empty());
        assert!((cam.current().x - 10.5).abs() < 1e-9);
        assert!((cam.current().y + 5.0).abs() < 1e-9);
        assert!(!gestures.is_dragging());
    }

    #[test]
    fn test_move_to_same_point_still_counts_as_click() {
        let mut cam = camera_at(0.0, 0.0, 1.0);
        let mut gestures = GestureInterpreter::new();
        let pos = Point::new(10.0, 10.0);
        let guesses = feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[
                InputEvent::MouseDown { pos },
                InputEvent::MouseMove { pos },
                InputEvent::MouseUp { pos },
            ],
        );
        assert_eq!(guesses.len(), 1);
    }

    #[test]
    fn test_click_outside_guessing_phase_is_ignored() {
        let mut cam = camera_at(0.0, 0.0, 1.0);
        let mut gestures = GestureInterpreter::new();
        let pos = Point::new(10.0, 10.0);
        let guesses = feed(
            &mut gestures,
            &mut cam,
            InputContext::default(),
            &[InputEvent::MouseDown { pos }, InputEvent::MouseUp { pos }],
        );
        assert!(guesses.is_empty());
    }

    #[test]
    fn test_release_without_press_does_not_commit() {
        let mut cam = camera_at(0.0, 0.0, 1.0);
        let mut gestures = GestureInterpreter::new();
        let guesses = feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[InputEvent::MouseUp {
                pos: Point::new(5.0, 5.0),
            }],
        );
        assert!(guesses.is_empty());
    }

    #[test]
    fn test_mouse_leave_cancels_drag_without_commit() {
        let mut cam = camera_at(0.0, 0.0, 1.0);
        let mut gestures = GestureInterpreter::new();
        let pos = Point::new(10.0, 10.0);
        let guesses = feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[
                InputEvent::MouseDown { pos },
                InputEvent::MouseLeave,
                InputEvent::MouseMove {
                    pos: Point::new(50.0, 50.0),
                },
                InputEvent::MouseUp { pos },
            ],
        );
        assert!(guesses.is_empty());
        assert_eq!(cam.current().x, 0.0);
    }

    #[test]
    fn test_blocked_input_ignored_but_release_ends_drag() {
        let mut cam = camera_at(0.0, 0.0, 1.0);
        let mut gestures = GestureInterpreter::new();
        gestures.handle(
            &InputEvent::MouseDown {
                pos: Point::new(0.0, 0.0),
            },
            &mut cam,
            CANVAS,
            GUESSING,
        );

        let blocked = InputContext {
            input_blocked: true,
            accepting_guess: true,
        };
        let guesses = feed(
            &mut gestures,
            &mut cam,
            blocked,
            &[
                InputEvent::MouseMove {
                    pos: Point::new(40.0, 0.0),
                },
                InputEvent::Wheel {
                    pos: Point::new(0.0, 0.0),
                    delta_y: -500.0,
                },
                InputEvent::MouseUp {
                    pos: Point::new(0.0, 0.0),
                },
            ],
        );
        assert!(guesses.is_empty());
        assert_eq!(cam.current().x, 0.0);
        assert_eq!(cam.target().zoom, 1.0);
        assert!(!gestures.is_dragging());
    }

    #[test]
    fn test_wheel_zooms_towards_pointer() {
        let mut cam = camera_at(0.0, 0.0, 1.0);
        let mut gestures = GestureInterpreter::new();
        let pos = Point::new(700.0, 100.0);
        gestures.handle(
            &InputEvent::Wheel {
                pos,
                delta_y: -100.0,
            },
            &mut cam,
            CANVAS,
            GUESSING,
        );
        assert!((cam.target().zoom - 0.1_f64.exp()).abs() < 1e-9);
        assert_eq!(cam.zoom_focus(), pos);
        assert_eq!(gestures.pointer(), Some(pos));
    }

    #[test]
    fn test_tap_commits_guess() {
        let mut cam = camera_at(0.0, 0.0, 1.0);
        let mut gestures = GestureInterpreter::new();
        let finger = Point::new(400.0, 300.0);
        let guesses = feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[
                InputEvent::TouchStart(vec![finger]),
                InputEvent::TouchEnd(vec![]),
            ],
        );
        assert_eq!(guesses, vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_touch_drag_pans() {
        let mut cam = camera_at(0.0, 0.0, 0.5);
        let mut gestures = GestureInterpreter::new();
        let guesses = feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[
                InputEvent::TouchStart(vec![Point::new(10.0, 10.0)]),
                InputEvent::TouchMove(vec![Point::new(20.0, 15.0)]),
                InputEvent::TouchEnd(vec![]),
            ],
        );
        assert!(guesses.is_empty());
        assert!((cam.current().x - 20.0).abs() < 1e-9);
        assert!((cam.current().y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_scales_from_start_zoom() {
        let mut cam = camera_at(0.0, 0.0, 1.0);
        let mut gestures = GestureInterpreter::new();
        feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[
                InputEvent::TouchStart(vec![Point::new(300.0, 300.0)]),
                InputEvent::TouchStart(vec![Point::new(300.0, 300.0), Point::new(400.0, 300.0)]),
                InputEvent::TouchMove(vec![Point::new(250.0, 300.0), Point::new(450.0, 300.0)]),
            ],
        );
        assert!(gestures.is_pinching());
        assert!((cam.target().zoom - 2.0).abs() < 1e-9);
        assert_eq!(cam.zoom_focus(), Point::new(350.0, 300.0));

        // Ratio is measured against the start, not the previous move
        gestures.handle(
            &InputEvent::TouchMove(vec![Point::new(250.0, 300.0), Point::new(450.0, 300.0)]),
            &mut cam,
            CANVAS,
            GUESSING,
        );
        assert!((cam.target().zoom - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_with_zero_start_distance_keeps_zoom() {
        let mut cam = camera_at(0.0, 0.0, 1.5);
        let mut gestures = GestureInterpreter::new();
        let p = Point::new(100.0, 100.0);
        feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[
                InputEvent::TouchStart(vec![p, p]),
                InputEvent::TouchMove(vec![p, Point::new(300.0, 100.0)]),
            ],
        );
        assert!((cam.target().zoom - 1.5).abs() < 1e-12);
        assert!(cam.target().zoom.is_finite());
    }

    #[test]
    fn test_lifting_one_finger_continues_without_jump_or_guess() {
        let mut cam = camera_at(0.0, 0.0, 1.0);
        let mut gestures = GestureInterpreter::new();
        let guesses = feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[
                InputEvent::TouchStart(vec![Point::new(100.0, 100.0), Point::new(200.0, 100.0)]),
                InputEvent::TouchEnd(vec![Point::new(200.0, 100.0)]),
            ],
        );
        assert!(guesses.is_empty());
        assert!(!gestures.is_pinching());
        assert_eq!(cam.current().x, 0.0);

        let guesses = feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[
                InputEvent::TouchMove(vec![Point::new(210.0, 100.0)]),
                InputEvent::TouchEnd(vec![]),
            ],
        );
        assert!(guesses.is_empty());
        assert!((cam.current().x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_touch_cancel_ends_gesture() {
        let mut cam = camera_at(0.0, 0.0, 1.0);
        let mut gestures = GestureInterpreter::new();
        let guesses = feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[
                InputEvent::TouchStart(vec![Point::new(1.0, 1.0)]),
                InputEvent::TouchCancel,
                InputEvent::TouchEnd(vec![]),
            ],
        );
        assert!(guesses.is_empty());
        assert!(!gestures.is_dragging());
    }

    #[test]
    fn test_blocked_touch_leaves_zoom_and_ends_pinch() {
        let blocked = InputContext {
            input_blocked: true,
            accepting_guess: true,
        };
        let mut cam = camera_at(0.0, 0.0, 1.0);
        let mut gestures = GestureInterpreter::new();
        feed(
            &mut gestures,
            &mut cam,
            GUESSING,
            &[InputEvent::TouchStart(vec![Point::new(300.0, 300.0), Point::new(400.0, 300.0)])],
        );
        assert!(gestures.is_pinching());

        let guesses = feed(
            &mut gestures,
            &mut cam,
            blocked,
            &[
                InputEvent::TouchMove(vec![Point::new(200.0, 300.0), Point::new(500.0, 300.0)]),
                InputEvent::TouchEnd(vec![Point::new(500.0, 300.0)]),
            ],
        );
        assert!(guesses.is_empty());
        assert_eq!(cam.target().zoom, 1.0);
        assert!(!gestures.is_pinching());
        assert!(!gestures.is_dragging());

        // A new pinch can't start while blocked either
        feed(
            &mut gestures,
            &mut cam,
            blocked,
            &[
                InputEvent::TouchStart(vec![Point::new(300.0, 300.0), Point::new(400.0, 300.0)]),
                InputEvent::TouchMove(vec![Point::new(100.0, 300.0), Point::new(600.0, 300.0)]),
            ],
        );
        assert!(!gestures.is_pinching());
        assert_eq!(cam.target().zoom, 1.0);
    }
}
