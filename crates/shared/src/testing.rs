//! Test doubles: an image with a fixed size and a surface that records calls.

use crate::models::{Point, Rect, Size};
use crate::render::{ImageSource, Surface};

#[derive(Debug, Clone, PartialEq)]
pub struct TestImage {
    pub name: &'static str,
    pub size: Size,
    pub ready: bool,
}

impl TestImage {
    pub fn ready(name: &'static str, width: f64, height: f64) -> Self {
        Self {
            name,
            size: Size::new(width, height),
            ready: true,
        }
    }

    pub fn pending(name: &'static str) -> Self {
        Self {
            name,
            size: Size::default(),
            ready: false,
        }
    }
}

impl ImageSource for TestImage {
    fn natural_size(&self) -> Size {
        self.size
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Resize(u32, u32),
    Clear,
    Save,
    Restore,
    Translate(f64, f64),
    Scale(f64, f64),
    DrawRegion {
        image: &'static str,
        src: Rect,
        dst: Rect,
    },
    DrawImage {
        image: &'static str,
        x: f64,
        y: f64,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: String,
    },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub backing: (u32, u32),
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn region_draws(&self) -> Vec<(Rect, Rect)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::DrawRegion { src, dst, .. } => Some((*src, *dst)),
                _ => None,
            })
            .collect()
    }

    /// Whether every `Save` has a matching `Restore`.
    pub fn balanced(&self) -> bool {
        let mut depth: i32 = 0;
        for call in &self.calls {
            match call {
                DrawCall::Save => depth += 1,
                DrawCall::Restore => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }
}

impl Surface for RecordingSurface {
    type Image = TestImage;

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
        self.calls.push(DrawCall::Resize(width, height));
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn save(&mut self) {
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.calls.push(DrawCall::Translate(dx, dy));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.calls.push(DrawCall::Scale(sx, sy));
    }

    fn draw_image_region(&mut self, image: &TestImage, src: Rect, dst: Rect) {
        self.calls.push(DrawCall::DrawRegion {
            image: image.name,
            src,
            dst,
        });
    }

    fn draw_image(&mut self, image: &TestImage, x: f64, y: f64) {
        self.calls.push(DrawCall::DrawImage {
            image: image.name,
            x,
            y,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: &str) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            width,
            color: color.to_string(),
        });
    }
}
