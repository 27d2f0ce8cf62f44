//! Miter and bevel joint generation for extruded ribbon meshes
//!
//! A finalized run of path vertices becomes a closed quad tube: one
//! four-corner cross-section ring per joint, eight triangles per edge
//! between consecutive rings. Gentle turns get a single miter ring on the
//! tangent bisector, widened by the secant of the half-angle to keep wall
//! thickness constant; sharp turns split the ring into incoming/outgoing
//! halves (a bevel) and close the notch with two extra triangles.

use glam::{DVec2, DVec3};

use crate::vertex::{PreviewMesh, PreviewVertex, PrintVertex};

/// Turn angles with magnitude above this (radians, ~40 degrees) use a bevel
/// joint instead of a miter.
pub const SHARP_TURN_THRESHOLD_RAD: f64 = 0.698132;

/// True when a signed turn angle requires a bevel joint. The boundary is
/// exclusive: exactly at the threshold stays a miter.
pub fn is_sharp(angle_rad: f64) -> bool {
    angle_rad.abs() > SHARP_TURN_THRESHOLD_RAD
}

/// Cross-section ring corners in (lateral, vertical) half-extent space,
/// with their shading scalar: side corners dark, ridge corners bright.
const RING_CORNERS: [(f64, f64, f32); 4] = [
    (0.5, -0.5, 0.0),
    (0.0, 0.0, 1.0),
    (-0.5, -0.5, 0.0),
    (0.0, -1.0, 1.0),
];

/// Vertex-buffer indices of one joint's ring corners. Miter joints share
/// one ring for both sides; bevel joints split one corner.
#[derive(Debug, Clone, Copy, Default)]
struct Joint {
    incoming: [u32; 4],
    outgoing: [u32; 4],
}

/// Build the ribbon mesh for one finalized run.
pub fn build_run_mesh(
    run: &[PrintVertex],
    layer_index: usize,
    position_shift: DVec2,
    start_point_index: usize,
) -> PreviewMesh {
    let mut mesh = PreviewMesh {
        vertices: Vec::new(),
        triangles: Vec::new(),
        layer_index,
    };
    if run.len() < 2 {
        return mesh;
    }

    let mut emit = JointEmitter {
        run,
        layer_index,
        position_shift,
        start_point_index,
        mesh: &mut mesh,
    };

    let mut joints = vec![Joint::default(); run.len()];
    for (index, joint) in joints.iter_mut().enumerate() {
        if index == 0 || index == run.len() - 1 {
            *joint = emit.miter_joint(index);
            continue;
        }

        let a = run[index - 1].position;
        let b = run[index].position;
        let c = run[index + 1].position;
        let angle = signed_angle_rad((b - a).truncate(), (c - b).truncate());
        *joint = if is_sharp(angle) {
            if angle < 0.0 {
                emit.right_bevel_joint(index)
            } else {
                emit.left_bevel_joint(index)
            }
        } else {
            emit.miter_joint(index)
        };
    }

    add_edges(&joints, &mut mesh.triangles);
    mesh
}

struct JointEmitter<'a> {
    run: &'a [PrintVertex],
    layer_index: usize,
    position_shift: DVec2,
    start_point_index: usize,
    mesh: &'a mut PreviewMesh,
}

impl JointEmitter<'_> {
    /// Single-ring joint. Endpoints use the bare segment normal; interior
    /// vertices bisect the neighboring tangents and widen by the secant.
    fn miter_joint(&mut self, index: usize) -> Joint {
        let (normal, secant) = if index == 0 {
            let tangent = self.run[1].position - self.run[0].position;
            (segment_normal(tangent), 1.0)
        } else if index == self.run.len() - 1 {
            let tangent = self.run[index].position - self.run[index - 1].position;
            (segment_normal(tangent), 1.0)
        } else {
            let ab = (self.run[index].position - self.run[index - 1].position).normalize_or_zero();
            let bc = (self.run[index + 1].position - self.run[index].position).normalize_or_zero();
            normal_and_secant(ab, bc)
        };

        let mut joint = Joint::default();
        for (corner, &(lateral, vertical, brightness)) in RING_CORNERS.iter().enumerate() {
            let v = self.add_vertex(index, normal, lateral, vertical, secant, brightness);
            joint.incoming[corner] = v;
            joint.outgoing[corner] = v;
        }
        joint
    }

    /// Bevel joint for a sharp right (clockwise) turn: the outer corner 0
    /// splits into incoming/outgoing vertices, stitched by two notch
    /// triangles.
    fn right_bevel_joint(&mut self, index: usize) -> Joint {
        let ab = (self.run[index].position - self.run[index - 1].position).normalize_or_zero();
        let bc = (self.run[index + 1].position - self.run[index].position).normalize_or_zero();
        let (miter_normal, miter_secant) = normal_and_secant(ab, bc);
        let miter_tangent = ab + bc;

        let (lateral, vertical, brightness) = RING_CORNERS[0];

        let mut joint = Joint::default();

        let (normal_in, secant_in) = normal_and_secant(ab, miter_tangent);
        joint.incoming[0] =
            self.add_vertex(index, normal_in, lateral, vertical, secant_in, brightness);
        let (normal_out, secant_out) = normal_and_secant(miter_tangent, bc);
        joint.outgoing[0] =
            self.add_vertex(index, normal_out, lateral, vertical, secant_out, brightness);

        for ring_corner in 1..4 {
            let (lateral, vertical, brightness) = RING_CORNERS[ring_corner];
            let v = self.add_vertex(index, miter_normal, lateral, vertical, miter_secant, brightness);
            joint.incoming[ring_corner] = v;
            joint.outgoing[ring_corner] = v;
        }

        self.mesh.triangles.extend_from_slice(&[
            joint.incoming[0],
            joint.incoming[1],
            joint.outgoing[0],
            joint.incoming[0],
            joint.outgoing[0],
            joint.incoming[3],
        ]);
        joint
    }

    /// Bevel joint for a sharp left (counter-clockwise) turn: corner 2
    /// splits instead.
    fn left_bevel_joint(&mut self, index: usize) -> Joint {
        let ab = (self.run[index].position - self.run[index - 1].position).normalize_or_zero();
        let bc = (self.run[index + 1].position - self.run[index].position).normalize_or_zero();
        let (miter_normal, miter_secant) = normal_and_secant(ab, bc);
        let miter_tangent = ab + bc;

        let mut joint = Joint::default();

        for ring_corner in [0, 1] {
            let (lateral, vertical, brightness) = RING_CORNERS[ring_corner];
            let v = self.add_vertex(index, miter_normal, lateral, vertical, miter_secant, brightness);
            joint.incoming[ring_corner] = v;
            joint.outgoing[ring_corner] = v;
        }

        let (lateral, vertical, brightness) = RING_CORNERS[2];
        let (normal_in, secant_in) = normal_and_secant(ab, miter_tangent);
        joint.incoming[2] = self.add_vertex(index, normal_in, lateral, vertical, secant_in, brightness);
        let (normal_out, secant_out) = normal_and_secant(miter_tangent, bc);
        joint.outgoing[2] =
            self.add_vertex(index, normal_out, lateral, vertical, secant_out, brightness);

        let (lateral, vertical, brightness) = RING_CORNERS[3];
        let v = self.add_vertex(index, miter_normal, lateral, vertical, miter_secant, brightness);
        joint.incoming[3] = v;
        joint.outgoing[3] = v;

        self.mesh.triangles.extend_from_slice(&[
            joint.incoming[2],
            joint.incoming[3],
            joint.outgoing[2],
            joint.incoming[2],
            joint.outgoing[2],
            joint.incoming[1],
        ]);
        joint
    }

    fn add_vertex(
        &mut self,
        index: usize,
        normal: DVec3,
        lateral: f64,
        vertical: f64,
        secant: f64,
        brightness: f32,
    ) -> u32 {
        let vertex = &self.run[index];
        let offset = normal * (vertex.dimensions.x * lateral * secant)
            + DVec3::new(0.0, 0.0, vertex.dimensions.y * vertical);
        let position =
            vertex.position - DVec3::new(self.position_shift.x, self.position_shift.y, 0.0) + offset;

        self.mesh.vertices.push(PreviewVertex {
            position,
            fill_type: vertex.fill_type.code(),
            dimensions: vertex.dimensions,
            feedrate: vertex.feedrate,
            layer_index: self.layer_index as u32,
            point_index: (self.start_point_index + index) as u32,
            brightness,
        });
        (self.mesh.vertices.len() - 1) as u32
    }
}

/// Connect consecutive joints with eight triangles per edge, one quad per
/// ring-corner pair.
fn add_edges(joints: &[Joint], triangles: &mut Vec<u32>) {
    for pair in joints.windows(2) {
        let start = pair[0];
        let end = pair[1];
        for corner in 0..4 {
            let next = (corner + 1) % 4;
            triangles.extend_from_slice(&[
                start.outgoing[corner],
                start.outgoing[next],
                end.incoming[corner],
            ]);
            triangles.extend_from_slice(&[
                end.incoming[corner],
                start.outgoing[next],
                end.incoming[next],
            ]);
        }
    }
}

/// Perpendicular of a tangent in the XY plane.
fn segment_normal(tangent: DVec3) -> DVec3 {
    DVec3::new(-tangent.y, tangent.x, 0.0).normalize_or_zero()
}

/// Bisector normal of two unit tangents and the secant of the half-angle
/// between them.
fn normal_and_secant(ab: DVec3, bc: DVec3) -> (DVec3, f64) {
    let tangent = ab + bc;
    if ab.length_squared() < 1e-12 || bc.length_squared() < 1e-12 {
        // degenerate segment; take the normal of whichever side exists
        let fallback = if ab.length_squared() >= 1e-12 { ab } else { bc };
        return (segment_normal(fallback), 1.0);
    }
    if tangent.length_squared() < 1e-12 {
        // 180-degree reversal has no bisector; use the incoming normal
        return (segment_normal(ab), 1.0);
    }
    let secant = 1.0 / (ab.angle_between(bc) * 0.5).cos();
    (segment_normal(tangent), secant)
}

/// Signed XY turn angle from tangent `a` to tangent `b`, in (-pi, pi].
fn signed_angle_rad(a: DVec2, b: DVec2) -> f64 {
    use std::f64::consts::{PI, TAU};
    let mut angle = b.y.atan2(b.x) - a.y.atan2(a.x);
    if angle > PI {
        angle -= TAU;
    }
    if angle < -PI {
        angle += TAU;
    }
    angle
}
