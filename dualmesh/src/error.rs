//! Library-facing error types. Hand-rolled, no `std::error::Error` derive
//! macro crate: the library never needs more than `Display` + `Error`.

use std::fmt;

use crate::ids::{RegionId, SideId};

/// Errors that can occur while building a mesh from caller-supplied points.
///
/// Everything downstream of a successfully built [`crate::mesh::DualMesh`] is
/// total: out-of-range ids are a programming error and panic rather than
/// returning a `Result` (see `CheckError` for the one place structural
/// violations are reported instead of panicking, when that is explicitly
/// asked for).
#[derive(Debug)]
pub enum MeshError {
    /// Fewer than 3 points were supplied; no triangle can be formed.
    TooFewPoints { got: usize },
    /// The triangulator could not produce a triangulation, most commonly
    /// because all input points are collinear.
    TriangulationFailed,
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::TooFewPoints { got } => {
                write!(f, "need at least 3 points to triangulate, got {got}")
            }
            MeshError::TriangulationFailed => {
                write!(f, "triangulation failed (points may be collinear)")
            }
        }
    }
}

impl std::error::Error for MeshError {}

/// A violation of one of the mesh's structural invariants, as found by
/// [`crate::check::check_mesh`].
#[derive(Debug)]
pub enum CheckError {
    NotInvolution { s: SideId, opposite: SideId, back: SideId },
    RegionMismatch { s: SideId, expected: RegionId, got: RegionId },
    TriangleMismatch { s: SideId, expected: crate::ids::TriangleId, got: crate::ids::TriangleId },
    PrimalDualMismatch { s: SideId },
    CirculationDidNotClose { region: RegionId, steps: usize },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::NotInvolution { s, opposite, back } => write!(
                f,
                "halfedges[halfedges[{s}]] != {s}: halfedges[{s}] = {opposite}, halfedges[{opposite}] = {back}"
            ),
            CheckError::RegionMismatch { s, expected, got } => {
                write!(f, "side {s}: expected region {expected}, got {got}")
            }
            CheckError::TriangleMismatch { s, expected, got } => {
                write!(f, "side {s}: expected triangle {expected}, got {got}")
            }
            CheckError::PrimalDualMismatch { s } => {
                write!(f, "side {s}: r_begin(s_next(s)) != r_begin(s_opposite(s))")
            }
            CheckError::CirculationDidNotClose { region, steps } => write!(
                f,
                "circulation around region {region} did not return to its start within {steps} steps"
            ),
        }
    }
}

impl std::error::Error for CheckError {}
