//! Playing-field geometry for a viewport
//!
//! The field is 10 cells wide and 20 high, with two rows of header space above it
//! (score and next-piece preview) and half a row of margin below. The cell size is the
//! largest that fits both dimensions, and the field is centered horizontally.

use crate::types::{Geometry, BOARD_HEIGHT, BOARD_WIDTH};

/// Header rows reserved above the field
pub const HEADER_ROWS: f32 = 2.0;

/// Margin rows reserved below the field
pub const FOOTER_ROWS: f32 = 0.5;

/// Compute the field geometry for a `width x height` viewport.
///
/// Returns `None` for non-finite or non-positive viewports.
///
/// # Examples
///
/// ```
/// use blockfall_core::layout::field_geometry;
///
/// let g = field_geometry(450.0, 900.0).unwrap();
/// assert_eq!(g.side, 40.0);
/// assert_eq!(g.left, 25.0);
/// assert_eq!(g.top, 80.0);
/// ```
pub fn field_geometry(width: f32, height: f32) -> Option<Geometry> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return None;
    }

    let cols = f32::from(BOARD_WIDTH);
    let total_rows = f32::from(BOARD_HEIGHT) + HEADER_ROWS + FOOTER_ROWS;

    let side = (height / total_rows).min(width / cols);
    let left = (width - cols * side) / 2.0;
    let top = (height - total_rows * side) / 2.0 + HEADER_ROWS * side;

    Some(Geometry {
        width,
        height,
        top,
        left,
        side,
    })
}
