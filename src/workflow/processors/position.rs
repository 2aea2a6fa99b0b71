//! Overlay placement.
//!
//! The anchor picks a base term per axis; margins add signed terms on top. Both
//! margins of an axis are always applied, so e.g. an east margin still shifts
//! a watermark anchored to the west edge.

use crate::models::placement::{
    Adjustment, AnchorPosition, Axis, AxisExpression, MarginSet, Placement, Sign,
};

pub fn position(anchor: AnchorPosition, margins: &MarginSet) -> Placement {
    Placement {
        x: AxisExpression {
            axis: Axis::Horizontal,
            base: anchor.horizontal(),
            adjustments: [
                signed_term(margins.east(), false),
                signed_term(margins.west(), true),
            ],
        },
        y: AxisExpression {
            axis: Axis::Vertical,
            base: anchor.vertical(),
            adjustments: [
                signed_term(margins.nord(), false),
                signed_term(margins.south(), true),
            ],
        },
    }
}

/// A positive margin pushes away from its own edge: added for the leading
/// edge (east/nord), subtracted for the trailing one (`inverse`, west/south).
pub fn signed_term(value: f64, inverse: bool) -> Adjustment {
    let sign = match (value > 0.0, inverse) {
        (true, false) | (false, true) => Sign::Plus,
        (true, true) | (false, false) => Sign::Minus,
    };
    Adjustment {
        sign,
        magnitude: value.abs(),
    }
}
