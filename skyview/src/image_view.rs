//! Pan/zoom bookkeeping for the full-size map image viewer.
//!
//! Offsets are in screen pixels relative to the image's resting position;
//! zoom is a scale factor. Zooming keeps the point under the pointer fixed.

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
/// Pixels of a dragged panel that must stay inside the viewport.
pub const PANEL_MIN_VISIBLE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageTransform {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl ImageTransform {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Scales by `factor` around `anchor`, given relative to the image center.
    ///
    /// Does nothing when the zoom is already pinned at a limit in the
    /// requested direction.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if new_zoom == self.zoom {
            return;
        }

        let applied = new_zoom / self.zoom;
        self.x += anchor.x * (1.0 - applied);
        self.y += anchor.y * (1.0 - applied);
        self.zoom = new_zoom;
    }

    /// Wheel deltas greater than zero zoom out, like scrolling down.
    pub fn wheel(&mut self, delta_y: f64, anchor: Point) {
        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_OUT
        } else {
            WHEEL_ZOOM_IN
        };
        self.zoom_at(factor, anchor);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.x, self.y, self.zoom
        )
    }
}

/// Tracks a one- or two-finger gesture on the image.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    last_pan: Option<Point>,
    last_pinch: Option<(f64, Point)>,
}

impl GestureTracker {
    pub fn begin_pan(&mut self, at: Point) {
        self.last_pan = Some(at);
        self.last_pinch = None;
    }

    pub fn begin_pinch(&mut self, a: Point, b: Point) {
        self.last_pinch = Some((a.distance(&b), a.midpoint(&b)));
        self.last_pan = None;
    }

    pub fn move_pan(&mut self, transform: &mut ImageTransform, to: Point) {
        if let Some(from) = self.last_pan {
            transform.pan(to.x - from.x, to.y - from.y);
            self.last_pan = Some(to);
        }
    }

    /// `image_center` is in the same screen space as the touch points.
    pub fn move_pinch(
        &mut self,
        transform: &mut ImageTransform,
        a: Point,
        b: Point,
        image_center: Point,
    ) {
        let Some((last_distance, _)) = self.last_pinch else {
            return;
        };

        let distance = a.distance(&b);
        let center = a.midpoint(&b);
        if last_distance > 0.0 {
            let anchor = Point::new(center.x - image_center.x, center.y - image_center.y);
            transform.zoom_at(distance / last_distance, anchor);
        }
        self.last_pinch = Some((distance, center));
    }

    pub fn end(&mut self) {
        self.last_pan = None;
        self.last_pinch = None;
    }
}

/// Clamps a dragged panel's offset so `PANEL_MIN_VISIBLE` pixels stay on screen.
pub fn clamp_panel_offset(offset: Point, panel_size: Point, viewport: Point) -> Point {
    let min_x = -panel_size.x + PANEL_MIN_VISIBLE;
    let max_x = viewport.x - PANEL_MIN_VISIBLE;
    let min_y = -panel_size.y + PANEL_MIN_VISIBLE;
    let max_y = viewport.y - PANEL_MIN_VISIBLE;

    Point::new(
        offset.x.max(min_x).min(max_x),
        offset.y.max(min_y).min(max_y),
    )
}
