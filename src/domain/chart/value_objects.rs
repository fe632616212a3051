use serde::{Deserialize, Serialize};

/// Value Object - pan/zoom state of the viewport in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ViewState {
    /// World time (epoch seconds) under the horizontal centre of the plot
    pub center_time_sec: f64,
    /// Horizontal zoom; smaller is more zoomed in
    pub seconds_per_pixel: f64,
    pub center_price: f64,
    /// Vertical zoom
    pub price_per_pixel: f64,
    pub visible_min_price: f64,
    pub visible_max_price: f64,
}

impl ViewState {
    pub fn is_initialized(&self) -> bool {
        self.seconds_per_pixel > 0.0 && self.price_per_pixel > 0.0
    }

    /// Copy of the four user-controlled fields.
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            center_time_sec: self.center_time_sec,
            seconds_per_pixel: self.seconds_per_pixel,
            center_price: self.center_price,
            price_per_pixel: self.price_per_pixel,
        }
    }

    pub fn restore(&mut self, snapshot: ViewSnapshot) {
        self.center_time_sec = snapshot.center_time_sec;
        self.seconds_per_pixel = snapshot.seconds_per_pixel;
        self.center_price = snapshot.center_price;
        self.price_per_pixel = snapshot.price_per_pixel;
    }

    /// Derive the visible price band from the centre and vertical zoom.
    pub fn refresh_visible_prices(&mut self, plot_height: f64) {
        let span = plot_height * self.price_per_pixel;
        self.visible_min_price = self.center_price - span / 2.0;
        self.visible_max_price = self.center_price + span / 2.0;
        if self.visible_max_price <= self.visible_min_price {
            self.visible_max_price = self.visible_min_price + 1e-9;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSnapshot {
    pub center_time_sec: f64,
    pub seconds_per_pixel: f64,
    pub center_price: f64,
    pub price_per_pixel: f64,
}

/// Value Object - plot area inside the control, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlotRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Carve the plot out of the control bounds, leaving a price gutter on
    /// the left and a time axis strip at the bottom.
    pub fn from_bounds(bounds_width: f64, bounds_height: f64, layout: &LayoutConfig) -> Self {
        let left = layout.left_axis_width + layout.padding;
        Self {
            x: left,
            y: layout.padding,
            width: (bounds_width - left - layout.padding).max(0.0),
            height: (bounds_height - layout.bottom_axis_height - 2.0 * layout.padding).max(0.0),
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    /// Price axis gutter: left of the plot, within its vertical extent.
    pub fn in_price_gutter(&self, x: f64, y: f64) -> bool {
        x < self.left() && y >= self.top() && y <= self.bottom()
    }
}

/// Value Object - pixel bounds on candle bodies and the gaps between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingLimits {
    pub body_min: f64,
    pub body_max: f64,
    pub gap_min: f64,
    pub gap_max: f64,
}

impl Default for SpacingLimits {
    fn default() -> Self {
        Self { body_min: 3.0, body_max: 250.0, gap_min: 2.0, gap_max: 4.0 }
    }
}

impl SpacingLimits {
    pub fn min_pitch(&self) -> f64 {
        self.body_min + self.gap_min
    }

    pub fn max_pitch(&self) -> f64 {
        self.body_max + self.gap_max
    }
}

/// Value Object - fixed layout around the plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub left_axis_width: f64,
    pub bottom_axis_height: f64,
    pub padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { left_axis_width: 70.0, bottom_axis_height: 28.0, padding: 10.0 }
    }
}
