//! Viewport and coordinate transformation for sheet rendering.
//!
//! Handles conversion between pixel coordinates (screen space, origin
//! top-left) and sheet coordinates (mm space, origin bottom-left). The
//! viewport is pure presentation state: nothing here ever touches the
//! layout's mm geometry.

use std::fmt;

use imposekit_core::geometry::Point;

use crate::model::Sheet;

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 50.0;
/// Floor for the fit-derived base scale so degenerate containers still
/// produce a usable transform.
const MIN_BASE_SCALE: f64 = 0.05;

/// Viewport transformation state: the fit-to-container base scale plus a
/// user zoom multiplier and pan.
#[derive(Debug, Clone)]
pub struct SheetViewport {
    base_scale: f64,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    container_width: f64,
    container_height: f64,
}

impl SheetViewport {
    /// Creates a viewport sized to the container, fitted to the sheet.
    pub fn new(container_width: f64, container_height: f64, sheet: &Sheet) -> Self {
        let mut vp = Self {
            base_scale: 1.0,
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            container_width,
            container_height,
        };
        vp.fit_to_sheet(sheet);
        vp
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn container_height(&self) -> f64 {
        self.container_height
    }

    /// Updates the container dimensions (window resize) and re-derives the
    /// base scale. User zoom and pan are preserved.
    pub fn set_container_size(&mut self, width: f64, height: f64, sheet: &Sheet) {
        self.container_width = width;
        self.container_height = height;
        self.base_scale = base_scale_for(width, height, sheet);
    }

    /// The fit-to-container scale, px per mm at 100% zoom.
    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    /// The user zoom multiplier (1.0 = sheet fits the container).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Effective px-per-mm scale.
    pub fn scale(&self) -> f64 {
        self.base_scale * self.zoom
    }

    /// Sets the zoom multiplier, constrained between 0.1 and 50.0.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom > MIN_ZOOM && zoom < MAX_ZOOM {
            self.zoom = zoom;
        }
    }

    /// Zooms in by one 1.2x step.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * 1.2);
    }

    /// Zooms out by one 1.2x step.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / 1.2);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Re-derives the base scale so the whole sheet fits the container, and
    /// centers it. Resets user zoom.
    pub fn fit_to_sheet(&mut self, sheet: &Sheet) {
        self.base_scale = base_scale_for(self.container_width, self.container_height, sheet);
        self.zoom = 1.0;
        let s = self.scale();
        self.pan_x = (self.container_width - sheet.width_mm * s) / 2.0;
        self.pan_y = (self.container_height - sheet.height_mm * s) / 2.0;
    }

    /// Converts pixel coordinates (origin top-left, +Y down) to sheet
    /// coordinates (origin bottom-left, +Y up).
    ///
    /// Formula:
    /// ```text
    /// mm_x = (pixel_x - pan_x) / scale
    /// mm_y = (container_height - pixel_y - pan_y) / scale  // Flip Y-axis
    /// ```
    pub fn pixel_to_mm(&self, pixel_x: f64, pixel_y: f64) -> Point {
        let s = self.scale();
        let mm_x = (pixel_x - self.pan_x) / s;
        let mm_y = (self.container_height - pixel_y - self.pan_y) / s;
        Point::new(mm_x, mm_y)
    }

    /// Converts sheet coordinates to pixel coordinates, inverse of
    /// [`pixel_to_mm`](Self::pixel_to_mm).
    pub fn mm_to_pixel(&self, mm_x: f64, mm_y: f64) -> (f64, f64) {
        let s = self.scale();
        let pixel_x = mm_x * s + self.pan_x;
        let pixel_y = self.container_height - (mm_y * s + self.pan_y);
        (pixel_x, pixel_y)
    }

    /// Zooms to a sheet point, keeping that point's screen position fixed.
    pub fn zoom_to_point(&mut self, mm_point: &Point, new_zoom: f64) {
        if new_zoom <= MIN_ZOOM || new_zoom >= MAX_ZOOM {
            return;
        }
        let (pixel_x, pixel_y) = self.mm_to_pixel(mm_point.x, mm_point.y);
        self.zoom = new_zoom;
        let s = self.scale();
        self.pan_x = pixel_x - mm_point.x * s;
        self.pan_y = self.container_height - pixel_y - mm_point.y * s;
    }

    /// Zooms in one step at a sheet point (cursor-anchored zoom).
    pub fn zoom_in_at(&mut self, mm_point: &Point) {
        self.zoom_to_point(mm_point, self.zoom * 1.2);
    }

    /// Zooms out one step at a sheet point.
    pub fn zoom_out_at(&mut self, mm_point: &Point) {
        self.zoom_to_point(mm_point, self.zoom / 1.2);
    }

    /// Centers the viewport on a sheet coordinate.
    pub fn center_on(&mut self, mm_x: f64, mm_y: f64) {
        let s = self.scale();
        self.pan_x = self.container_width / 2.0 - mm_x * s;
        self.pan_y = self.container_height / 2.0 - mm_y * s;
    }
}

fn base_scale_for(container_width: f64, container_height: f64, sheet: &Sheet) -> f64 {
    if sheet.width_mm <= 0.0 || sheet.height_mm <= 0.0 {
        return MIN_BASE_SCALE;
    }
    let sx = container_width / sheet.width_mm;
    let sy = container_height / sheet.height_mm;
    sx.min(sy).max(MIN_BASE_SCALE)
}

impl fmt::Display for SheetViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Scale: {:.3} px/mm | Pan: ({:.1}, {:.1})",
            self.zoom,
            self.scale(),
            self.pan_x,
            self.pan_y
        )
    }
}

impl Default for SheetViewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0, &Sheet::default())
    }
}
