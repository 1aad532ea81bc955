//! A single hex cell: elevation, color, rivers, and neighbor links.
//!
//! Cells live in the [`HexGrid`](crate::grid::HexGrid) arena and refer to each
//! other by [`CellId`]. All mutation goes through the grid so that neighbor
//! symmetry, the downhill river rule, and dirty-chunk bookkeeping stay intact.

use bevy::prelude::*;

use crate::hex::{EdgeType, HexCoordinates, HexDirection};

/// Stable index of a cell inside its grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct CellId(pub usize);

impl CellId {
    /// Position of the cell in the grid's row-major cell array.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Node of the cell graph.
#[derive(Clone, Debug)]
pub struct HexCell {
    pub(crate) coordinates: HexCoordinates,
    pub(crate) position: Vec3,
    pub(crate) elevation: i32,
    pub(crate) color: LinearRgba,
    pub(crate) neighbors: [Option<CellId>; 6],
    pub(crate) incoming_river: Option<HexDirection>,
    pub(crate) outgoing_river: Option<HexDirection>,
    pub(crate) chunk: usize,
}

impl HexCell {
    /// Elevation of a freshly allocated cell, before the grid assigns a real one.
    pub const UNSET_ELEVATION: i32 = i32::MIN;

    pub(crate) fn new(
        coordinates: HexCoordinates,
        position: Vec3,
        color: LinearRgba,
        chunk: usize,
    ) -> Self {
        Self {
            coordinates,
            position,
            elevation: Self::UNSET_ELEVATION,
            color,
            neighbors: [None; 6],
            incoming_river: None,
            outgoing_river: None,
            chunk,
        }
    }

    /// Cube coordinate of this cell.
    pub fn coordinates(&self) -> HexCoordinates {
        self.coordinates
    }

    /// World position of the cell center; `y` includes elevation and its perturbation.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Integer elevation level.
    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    /// Cell color.
    pub fn color(&self) -> LinearRgba {
        self.color
    }

    /// Chunk this cell is triangulated with.
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// Neighbor in `direction`, if the grid has one there.
    pub fn neighbor(&self, direction: HexDirection) -> Option<CellId> {
        self.neighbors[direction.index()]
    }

    /// Edge classification between this cell and `other`.
    pub fn edge_type_to(&self, other: &HexCell) -> EdgeType {
        EdgeType::between(self.elevation, other.elevation)
    }

    /// Direction of the river flowing in, if any.
    pub fn incoming_river(&self) -> Option<HexDirection> {
        self.incoming_river
    }

    /// Direction of the river flowing out, if any.
    pub fn outgoing_river(&self) -> Option<HexDirection> {
        self.outgoing_river
    }

    /// Whether any river touches this cell.
    pub fn has_river(&self) -> bool {
        self.incoming_river.is_some() || self.outgoing_river.is_some()
    }

    /// Whether a river starts or ends here (exactly one of in/out).
    pub fn has_river_begin_or_end(&self) -> bool {
        self.incoming_river.is_some() != self.outgoing_river.is_some()
    }

    /// Whether a river crosses the edge facing `direction`.
    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction) || self.outgoing_river == Some(direction)
    }

    /// For a river source or mouth, the edge the river uses.
    pub fn river_begin_or_end_direction(&self) -> Option<HexDirection> {
        match (self.incoming_river, self.outgoing_river) {
            (Some(dir), None) | (None, Some(dir)) => Some(dir),
            _ => None,
        }
    }
}
