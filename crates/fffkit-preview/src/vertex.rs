//! Preview vertex and mesh buffer types

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use fffkit_core::FillType;

/// One vertex of a toolpath run: the toolhead state at a stream point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintVertex {
    /// Toolhead position
    pub position: DVec3,
    /// Feedrate (mm/min)
    pub feedrate: f64,
    /// Cumulative extrusion at this point
    pub extrusion: f64,
    /// Bead cross-section (width, height)
    pub dimensions: DVec2,
    /// Fill type of the move
    pub fill_type: FillType,
}

impl Default for PrintVertex {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            feedrate: 0.0,
            extrusion: 0.0,
            dimensions: DVec2::ZERO,
            fill_type: FillType::Unknown,
        }
    }
}

/// One vertex of an emitted preview mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewVertex {
    /// Position in bed-origin coordinates
    pub position: DVec3,
    /// Fill-type wire code of the originating move
    pub fill_type: i32,
    /// Bead cross-section (width, height)
    pub dimensions: DVec2,
    /// Feedrate of the originating move (mm/min)
    pub feedrate: f64,
    /// Layer the vertex belongs to
    pub layer_index: u32,
    /// Running stream point index of the originating move
    pub point_index: u32,
    /// Placeholder shading scalar (ridge corners bright, side corners dark)
    pub brightness: f32,
}

/// Mesh buffers for one finalized extrusion run.
///
/// Ownership transfers to the caller via the preview sink; the layer tag,
/// not arrival order, places the mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewMesh {
    /// Vertex buffer
    pub vertices: Vec<PreviewVertex>,
    /// Triangle index buffer, three indices per triangle
    pub triangles: Vec<u32>,
    /// Layer the run belongs to
    pub layer_index: usize,
}

impl PreviewMesh {
    /// Number of triangles in the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}
