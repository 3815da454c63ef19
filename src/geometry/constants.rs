//! Dimensions of the virtual slide canvas and the bounds applied to boxes on it.

/// Width of the virtual canvas all layouts are authored on.
pub const CANVAS_W: f64 = 800.0;
/// Height of the virtual canvas.
pub const CANVAS_H: f64 = 600.0;

// Size bounds for any placeholder box.
pub const MIN_W: f64 = 40.0;
pub const MIN_H: f64 = 30.0;

// Font size bounds used when a resize rescales text.
pub const MIN_FONT_SIZE: f64 = 6.0;
pub const MAX_FONT_SIZE: f64 = 200.0;

/// Outer margin used by the auto-layout variants and for new boxes.
pub const MARGIN: f64 = 40.0;
/// Gap between the two columns of the auto-layout variants.
pub const GUTTER: f64 = 20.0;

pub const DEFAULT_TEXT_COLOR: &str = "#111827";
pub const DEFAULT_FONT_FAMILY: &str = "Noto Sans JP";
