//! `web-sys` canvas backend for the engine's drawing traits.

use mapguess_shared::{ImageSource, Point, Rect, Size, Surface};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// A decoded `<img>` element.
#[derive(Debug, Clone)]
pub struct WebImage(pub HtmlImageElement);

impl ImageSource for WebImage {
    fn natural_size(&self) -> Size {
        Size::new(
            f64::from(self.0.natural_width()),
            f64::from(self.0.natural_height()),
        )
    }

    fn is_ready(&self) -> bool {
        self.0.complete() && self.0.natural_width() > 0
    }
}

pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebSurface {
    /// Wrap the canvas with the given element id, if it is mounted.
    pub fn from_element_id(id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas = document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    /// CSS size of the canvas element.
    pub fn css_size(&self) -> Size {
        let rect = self.canvas.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }
}

impl Surface for WebSurface {
    type Image = WebImage;

    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ctx.translate(dx, dy).ok();
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ctx.scale(sx, sy).ok();
    }

    fn draw_image_region(&mut self, image: &WebImage, src: Rect, dst: Rect) {
        self.ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &image.0, src.x, src.y, src.width, src.height, dst.x, dst.y, dst.width, dst.height,
            )
            .ok();
    }

    fn draw_image(&mut self, image: &WebImage, x: f64, y: f64) {
        self.ctx
            .draw_image_with_html_image_element(&image.0, x, y)
            .ok();
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: &str) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_line_width(width);
        self.ctx.set_stroke_style_str(color);
        self.ctx.stroke();
    }
}
