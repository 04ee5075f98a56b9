//! Camera, gesture and viewport engine for the map-guessing game.
//!
//! Everything in this crate is browser independent: drawing goes through the
//! [`render::Surface`] trait and input arrives as [`gesture::InputEvent`]s with
//! canvas-relative coordinates.

pub mod camera;
pub mod config;
pub mod error;
pub mod gesture;
pub mod interp;
pub mod map;
pub mod models;
pub mod render;
pub mod score;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

pub use camera::{Camera, CameraMode};
pub use config::{CameraConfig, MapConfig, RenderConfig};
pub use error::{MapError, Result};
pub use gesture::{GestureInterpreter, InputContext, InputEvent};
pub use map::{load_map, LoadTicket, MapEngine};
pub use models::{Point, Pose, Rect, Size};
pub use render::{FrameOutcome, FrameReport, FrameStats, ImageSource, Scene, Surface, Viewport};
pub use score::{round_score, RoundTally, MAX_ROUND_SCORE};
