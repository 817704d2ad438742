//! # Capture Session
//!
//! A drawing surface scoped to one signing target. Strokes are kept as point
//! lists and only rasterized at commit time.
//!
//! Dropping a session cancels the capture. Nothing is written until a commit
//! succeeds, so an abandoned drawing never becomes visible.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use shared_types::{RasterImage, SignatureRequest};

use super::errors::CaptureError;

/// Canvas geometry and pen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    /// Stroke width in pixels.
    pub pen_width: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 200,
            pen_width: 2.5,
        }
    }
}

impl CaptureConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("capture canvas must have a non-zero size".into());
        }
        if self.pen_width.is_nan() || self.pen_width <= 0.0 {
            return Err("pen width must be positive".into());
        }
        Ok(())
    }
}

/// What a session will sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureTarget {
    Request(SignatureRequest),
    LegacyQuote,
}

impl CaptureTarget {
    pub const REQUEST_LABEL: &'static str = "a signature request";
    pub const LEGACY_QUOTE_LABEL: &'static str = "the legacy quote";

    pub fn name(&self) -> &'static str {
        match self {
            Self::Request(_) => Self::REQUEST_LABEL,
            Self::LegacyQuote => Self::LEGACY_QUOTE_LABEL,
        }
    }
}

/// Canvas coordinate in pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Scoped drawing surface.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    target: CaptureTarget,
    config: CaptureConfig,
    strokes: Vec<Vec<Point>>,
    drawing: bool,
}

impl CaptureSession {
    pub fn new(target: CaptureTarget, config: CaptureConfig) -> Self {
        Self {
            target,
            config,
            strokes: Vec::new(),
            drawing: false,
        }
    }

    pub fn target(&self) -> &CaptureTarget {
        &self.target
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Pen down.
    pub fn begin_stroke(&mut self, at: Point) {
        let at = self.clamp(at);
        self.strokes.push(vec![at]);
        self.drawing = true;
    }

    /// Pen move. Starts a stroke if the pen was up.
    pub fn extend_stroke(&mut self, to: Point) {
        let to = self.clamp(to);
        if self.drawing {
            if let Some(stroke) = self.strokes.last_mut() {
                stroke.push(to);
                return;
            }
        }
        self.begin_stroke(to);
    }

    /// Pen up.
    pub fn end_stroke(&mut self) {
        self.drawing = false;
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.drawing = false;
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(Vec::is_empty)
    }

    pub fn strokes(&self) -> &[Vec<Point>] {
        &self.strokes
    }

    /// Black strokes on a transparent canvas, PNG encoded.
    pub fn rasterize(&self) -> Result<RasterImage, CaptureError> {
        if self.is_empty() {
            return Err(CaptureError::EmptyInput);
        }

        let mut canvas = RgbaImage::new(self.config.width, self.config.height);
        let radius = self.config.pen_width / 2.0;
        for stroke in &self.strokes {
            match stroke.as_slice() {
                [] => {}
                [only] => stamp(&mut canvas, *only, radius),
                points => {
                    for pair in points.windows(2) {
                        draw_segment(&mut canvas, pair[0], pair[1], radius);
                    }
                }
            }
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| CaptureError::Rasterize(e.to_string()))?;
        RasterImage::from_png(png).map_err(|e| CaptureError::Rasterize(e.to_string()))
    }

    fn clamp(&self, p: Point) -> Point {
        let max_x = self.config.width.saturating_sub(1) as f32;
        let max_y = self.config.height.saturating_sub(1) as f32;
        Point::new(p.x.clamp(0.0, max_x), p.y.clamp(0.0, max_y))
    }
}

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn draw_segment(canvas: &mut RgbaImage, from: Point, to: Point, radius: f32) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let steps = (dx.hypot(dy) * 2.0).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        stamp(canvas, Point::new(from.x + dx * t, from.y + dy * t), radius);
    }
}

/// Fills a disc of `radius` around `center`, always including the pixel
/// under the center.
fn stamp(canvas: &mut RgbaImage, center: Point, radius: f32) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    let x0 = (center.x - radius).floor() as i64;
    let x1 = (center.x + radius).ceil() as i64;
    let y0 = (center.y - radius).floor() as i64;
    let y1 = (center.y + radius).ceil() as i64;
    let r2 = radius * radius;

    for py in y0.max(0)..=y1.min(h - 1) {
        for px in x0.max(0)..=x1.min(w - 1) {
            let cx = px as f32 + 0.5 - center.x;
            let cy = py as f32 + 0.5 - center.y;
            if cx * cx + cy * cy <= r2 {
                canvas.put_pixel(px as u32, py as u32, INK);
            }
        }
    }

    let (cx, cy) = (center.x.floor() as i64, center.y.floor() as i64);
    if (0..w).contains(&cx) && (0..h).contains(&cy) {
        canvas.put_pixel(cx as u32, cy as u32, INK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CaptureSession {
        CaptureSession::new(CaptureTarget::LegacyQuote, CaptureConfig::default())
    }

    fn decode(raster: &RasterImage) -> RgbaImage {
        image::load_from_memory_with_format(raster.png_bytes(), image::ImageFormat::Png)
            .unwrap()
            .to_rgba8()
    }

    #[test]
    fn test_new_session_is_empty() {
        let s = session();
        assert!(s.is_empty());
        assert_eq!(s.rasterize().unwrap_err(), CaptureError::EmptyInput);
    }

    #[test]
    fn test_stroke_rasterizes_to_canvas_size() {
        let mut s = session();
        s.begin_stroke(Point::new(10.0, 10.0));
        s.extend_stroke(Point::new(100.0, 50.0));
        s.end_stroke();

        let img = decode(&s.rasterize().unwrap());
        assert_eq!(img.dimensions(), (500, 200));
        assert_eq!(img.get_pixel(10, 10), &INK);
        assert_eq!(img.get_pixel(55, 30), &INK);
        assert_eq!(img.get_pixel(400, 180)[3], 0);
    }

    #[test]
    fn test_single_tap_leaves_a_dot() {
        let mut s = session();
        s.begin_stroke(Point::new(250.2, 100.7));
        let img = decode(&s.rasterize().unwrap());
        assert_eq!(img.get_pixel(250, 100), &INK);
    }

    #[test]
    fn test_points_clamped_to_canvas() {
        let mut s = session();
        s.begin_stroke(Point::new(-40.0, 900.0));
        assert_eq!(s.strokes()[0][0], Point::new(0.0, 199.0));
    }

    #[test]
    fn test_extend_after_pen_up_starts_new_stroke() {
        let mut s = session();
        s.begin_stroke(Point::new(1.0, 1.0));
        s.end_stroke();
        s.extend_stroke(Point::new(5.0, 5.0));
        assert_eq!(s.strokes().len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut s = session();
        s.begin_stroke(Point::new(1.0, 1.0));
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        let mut s = session();
        s.begin_stroke(Point::new(20.0, 20.0));
        s.extend_stroke(Point::new(480.0, 180.0));
        assert_eq!(s.rasterize().unwrap(), s.rasterize().unwrap());
    }

    #[test]
    fn test_config_validation() {
        assert!(CaptureConfig::default().validate().is_ok());
        let bad = CaptureConfig {
            width: 0,
            ..CaptureConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
