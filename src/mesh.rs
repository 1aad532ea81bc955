//! Triangulation of the cell graph into one vertex-colored triangle mesh.
//!
//! Each cell contributes a flat fan per direction. Cells connect to their
//! NE, E, and SE neighbors with a bridge strip (straight for flat and cliff
//! edges, stepped for slopes) and fill the corner gaps toward NE and E, so
//! every shared edge and corner is emitted exactly once.

mod corner;
mod edge_vertices;
mod triangulator;

pub use corner::{CornerKind, CornerPivot, CornerShape, classify_corner};
pub use edge_vertices::EdgeVertices;
pub use triangulator::{HexMesh, TriangulationStats, triangulate};
