use crate::hex::EdgeType;

/// Geometry used to fill the gap where three cells meet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CornerShape {
    /// Both legs from the pivot are slopes; terraces fan out from it.
    Terraces,
    /// Terraced left leg, cliff right leg, joined at a boundary point on the cliff.
    TerracesCliff,
    /// Cliff left leg, terraced right leg; mirror of [`CornerShape::TerracesCliff`].
    CliffTerraces,
    /// No terraces involved; a single triangle.
    Flat,
}

/// Which of the three cells the corner shape is built from.
///
/// The three cells are always passed as `(bottom, left, right)` in clockwise
/// order with `bottom` the lowest. Rotating keeps that winding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CornerPivot {
    /// `(bottom, left, right)`.
    Bottom,
    /// `(left, right, bottom)`.
    Left,
    /// `(right, bottom, left)`.
    Right,
}

/// Result of [`classify_corner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CornerKind {
    /// Geometry to emit.
    pub shape: CornerShape,
    /// Rotation to apply to `(bottom, left, right)` first.
    pub pivot: CornerPivot,
}

impl CornerKind {
    const fn new(shape: CornerShape, pivot: CornerPivot) -> Self {
        Self { shape, pivot }
    }
}

/// Decision table for corner triangulation.
///
/// `left` and `right` classify the edges from the bottom cell to the left
/// and right cells; `left_right` the edge between those two. When neither
/// bottom edge is a slope but the far edge is, the lower of left/right
/// (`left_is_lower`) decides which side becomes the terraced leg.
pub fn classify_corner(
    left: EdgeType,
    right: EdgeType,
    left_right: EdgeType,
    left_is_lower: bool,
) -> CornerKind {
    use CornerPivot::*;
    use CornerShape::*;
    use EdgeType::{Cliff, Flat as Level, Slope};

    match (left, right) {
        (Slope, Slope) => CornerKind::new(Terraces, Bottom),
        (Slope, Level) => CornerKind::new(Terraces, Left),
        (Slope, Cliff) => CornerKind::new(TerracesCliff, Bottom),
        (Level, Slope) => CornerKind::new(Terraces, Right),
        (Cliff, Slope) => CornerKind::new(CliffTerraces, Bottom),
        (Level | Cliff, Level | Cliff) => match left_right {
            Slope if left_is_lower => CornerKind::new(CliffTerraces, Right),
            Slope => CornerKind::new(TerracesCliff, Left),
            Level | Cliff => CornerKind::new(Flat, Bottom),
        },
    }
}
