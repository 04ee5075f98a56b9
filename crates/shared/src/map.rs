//! The engine facade: one camera, one gesture interpreter, the map image and
//! the round's markers.

use std::cell::RefCell;
use std::future::Future;

use tracing::{debug, info, warn};

use crate::camera::Camera;
use crate::config::{MapConfig, RenderConfig};
use crate::error::{MapError, Result};
use crate::gesture::{GestureInterpreter, InputContext, InputEvent};
use crate::models::{Point, Size};
use crate::render::{self, FrameReport, ImageSource, Scene, Surface, Viewport};
use crate::transform;

/// Handle for one map image request. Only the ticket from the most recent
/// [`MapEngine::begin_map_load`] call can commit its image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    url: String,
}

#[derive(Debug)]
struct LoadedMap<I> {
    generation: u64,
    image: I,
    size: Size,
    url: String,
}

#[derive(Debug)]
pub struct MapEngine<I> {
    camera: Camera,
    gestures: GestureInterpreter,
    style: RenderConfig,
    map: Option<LoadedMap<I>>,
    requested: Option<LoadTicket>,
    next_generation: u64,
    guess_marker: Option<I>,
    correct_marker: Option<I>,
    guess: Option<Point>,
    correct: Option<Point>,
    resolved: bool,
}

impl<I: ImageSource> MapEngine<I> {
    pub fn new(config: MapConfig) -> Self {
        Self {
            camera: Camera::new(config.camera),
            gestures: GestureInterpreter::new(),
            style: config.render,
            map: None,
            requested: None,
            next_generation: 0,
            guess_marker: None,
            correct_marker: None,
            guess: None,
            correct: None,
            resolved: false,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn guess(&self) -> Option<Point> {
        self.guess
    }

    pub fn correct_location(&self) -> Option<Point> {
        self.correct
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Natural size of the current map image, if one is loaded.
    pub fn map_size(&self) -> Option<Size> {
        self.map.as_ref().map(|m| m.size)
    }

    pub fn map_url(&self) -> Option<&str> {
        self.map.as_ref().map(|m| m.url.as_str())
    }

    /// A requested map has not finished loading yet.
    pub fn is_loading(&self) -> bool {
        match (&self.requested, &self.map) {
            (Some(ticket), Some(map)) => ticket.generation != map.generation,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// A drag or pinch is in progress.
    pub fn is_interacting(&self) -> bool {
        self.gestures.is_dragging() || self.gestures.is_pinching()
    }

    /// Feed one input event. A committed guess is stored and returned.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        canvas: Size,
        ctx: InputContext,
    ) -> Option<Point> {
        let guess = self.gestures.handle(event, &mut self.camera, canvas, ctx)?;
        self.guess = Some(guess);
        Some(guess)
    }

    /// World position under the last known pointer position.
    pub fn pointer_world(&self, canvas: Size) -> Option<Point> {
        let pointer = self.gestures.pointer()?;
        Some(transform::screen_to_world(
            pointer,
            self.camera.current(),
            canvas,
        ))
    }

    /// Place the guess wherever the pointer is, as when a round times out.
    pub fn commit_guess_at_pointer(&mut self, canvas: Size) -> Option<Point> {
        let world = self.pointer_world(canvas)?;
        info!(x = world.x, y = world.y, "guess placed at pointer");
        self.guess = Some(world);
        Some(world)
    }

    /// Render one frame, advancing the camera animation.
    pub fn frame<S>(&mut self, surface: &mut S, viewport: Viewport) -> FrameReport
    where
        S: Surface<Image = I>,
    {
        let scene = Scene {
            map: self.map.as_ref().map(|m| &m.image),
            guess: self.guess,
            correct: self.correct,
            resolved: self.resolved,
            guess_marker: self.guess_marker.as_ref(),
            correct_marker: self.correct_marker.as_ref(),
        };
        render::render_frame(surface, &mut self.camera, viewport, &scene, &self.style)
    }

    pub fn set_markers(&mut self, guess_marker: I, correct_marker: I) {
        self.guess_marker = Some(guess_marker);
        self.correct_marker = Some(correct_marker);
    }

    pub fn set_correct_location(&mut self, correct: Option<Point>) {
        self.correct = correct;
    }

    pub fn set_round_resolved(&mut self, resolved: bool) {
        self.resolved = resolved;
    }

    /// Clear the guess, the answer and the resolved flag for a new round.
    pub fn start_round(&mut self) {
        self.guess = None;
        self.correct = None;
        self.resolved = false;
    }

    /// Mark the round resolved and move the camera to show the outcome: both
    /// points when a guess exists, otherwise the answer alone.
    ///
    /// Returns `false` when no correct location has been supplied.
    pub fn reveal_result(&mut self, canvas: Size) -> bool {
        let Some(correct) = self.correct else {
            return false;
        };
        self.resolved = true;
        let padding = self.camera.config().fit_padding;
        let focus_zoom = self.camera.config().result_focus_zoom;
        match self.guess {
            Some(guess) => self.camera.fit_points_in_view(guess, correct, padding, canvas),
            None => self.camera.set_target(correct, focus_zoom),
        }
        true
    }

    /// Animate back to the map center at the default zoom.
    pub fn reset_view(&mut self) {
        if let Some(size) = self.map_size() {
            self.camera.reset_to_center(size);
        }
    }

    /// Start a map image request, superseding any request in flight.
    pub fn begin_map_load(&mut self, url: &str) -> LoadTicket {
        self.next_generation += 1;
        let ticket = LoadTicket {
            generation: self.next_generation,
            url: url.to_string(),
        };
        debug!(url, generation = ticket.generation, "map load requested");
        self.requested = Some(ticket.clone());
        ticket
    }

    /// Complete a map request. On success the image replaces the current map
    /// and the camera animates to its center at the default zoom. Errors leave
    /// the current map in place.
    pub fn finish_map_load(
        &mut self,
        ticket: LoadTicket,
        loaded: std::result::Result<I, String>,
    ) -> Result<()> {
        let current = self.requested.as_ref().map(|t| t.generation);
        if current != Some(ticket.generation) {
            warn!(url = %ticket.url, "discarding superseded map load");
            return Err(MapError::Superseded { url: ticket.url });
        }

        let image = match loaded {
            Ok(image) => image,
            Err(message) => {
                warn!(url = %ticket.url, %message, "map image failed to load");
                self.requested = None;
                return Err(MapError::ImageLoad {
                    url: ticket.url,
                    message,
                });
            }
        };

        let size = image.natural_size();
        let usable = size.width.is_finite() && size.height.is_finite() && !size.is_empty();
        if !image.is_ready() || !usable {
            warn!(url = %ticket.url, ?size, "map image has unusable dimensions");
            self.requested = None;
            return Err(MapError::InvalidDimensions {
                url: ticket.url,
                width: size.width,
                height: size.height,
            });
        }

        debug!(url = %ticket.url, width = size.width, height = size.height, "map swapped");
        self.camera.reset_to_center(size);
        self.map = Some(LoadedMap {
            generation: ticket.generation,
            image,
            size,
            url: ticket.url,
        });
        Ok(())
    }
}

/// Load a map image through `fetch` and install it once decoded.
///
/// The engine is only borrowed before and after the await, so input and
/// frames keep flowing while the image downloads. A newer call made in the
/// meantime wins and this one resolves to [`MapError::Superseded`].
pub async fn load_map<I, F, Fut>(engine: &RefCell<MapEngine<I>>, url: &str, fetch: F) -> Result<()>
where
    I: ImageSource,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = std::result::Result<I, String>>,
{
    let ticket = engine.borrow_mut().begin_map_load(url);
    let loaded = fetch(url.to_string()).await;
    engine.borrow_mut().finish_map_load(ticket, loaded)
}
