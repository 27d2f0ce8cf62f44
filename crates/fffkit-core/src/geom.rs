//! Shared geometry primitives

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned 2D bounding box.
///
/// Starts out empty (contains nothing) and grows lazily as points are
/// contained. An empty box has `min > max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    /// Minimum corner
    pub min: DVec2,
    /// Maximum corner
    pub max: DVec2,
}

impl Aabb2 {
    /// The empty box; containing any point makes it non-empty.
    pub const EMPTY: Self = Self {
        min: DVec2::INFINITY,
        max: DVec2::NEG_INFINITY,
    };

    /// Box spanning exactly one point.
    pub fn from_point(point: DVec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// True until the first point is contained.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Grow the box to contain `point`.
    pub fn contain(&mut self, point: DVec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// True when `other` lies fully inside this box. The empty box is
    /// contained by every box.
    pub fn contains_box(&self, other: &Aabb2) -> bool {
        if other.is_empty() {
            return true;
        }
        !self.is_empty()
            && self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    /// Diagonal extents; zero for the empty box.
    pub fn extents(&self) -> DVec2 {
        if self.is_empty() {
            DVec2::ZERO
        } else {
            self.max - self.min
        }
    }
}

impl Default for Aabb2 {
    fn default() -> Self {
        Self::EMPTY
    }
}
