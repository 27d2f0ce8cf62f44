//! Layer-parallel region solving
//!
//! Each layer task reads only the shared, read-only slice stack and writes
//! to its own output slot, so layers solve independently with no ordering
//! dependency. A shared cancellation flag is polled once per layer before
//! its work begins; cancelled layers leave their slot unset ("not
//! computed", distinct from "empty by design").

use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use geo::MultiPolygon;
use rayon::prelude::*;
use tracing::debug;

use crate::polygon::{inset, intersection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    /// Intersect both floor and roof neighbors (infill anchoring)
    Both,
    /// Intersect floor neighbors only (floor skin decision)
    FloorOnly,
    /// Intersect roof neighbors only (roof skin decision)
    RoofOnly,
}

/// Decides where roofs/floors must be solid by intersecting a window of
/// neighboring layers and insetting the result.
///
/// A layer is eligible for interior regions only when it has `floor_layers`
/// full layers below and `roof_layers` full layers above inside the stack:
/// `layer_index >= floor_layers && layer_index + roof_layers < layer_count`.
/// With floor and roof windows of 2 over a 10-layer stack, layers 2..=7 are
/// eligible.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSolver {
    /// Number of layers below that must back an interior region
    pub floor_layers: usize,
    /// Number of layers above that must back an interior region
    pub roof_layers: usize,
    /// Inward inset anchoring the infill boundary away from the shells
    pub infill_inset_mm: f64,
    /// Polygon fragments below this area are discarded
    pub minimum_area_mm2: f64,
}

impl Default for RegionSolver {
    fn default() -> Self {
        Self {
            floor_layers: 2,
            roof_layers: 2,
            infill_inset_mm: 1.0,
            minimum_area_mm2: 0.0,
        }
    }
}

impl RegionSolver {
    /// Compute the interior (infill-capable) regions for every layer in
    /// `layer_range`, in parallel.
    ///
    /// The result has one slot per layer of `slices`: `None` for layers
    /// outside the range or skipped by cancellation, `Some` (possibly
    /// empty) for computed layers.
    pub fn compute_interior_regions(
        &self,
        slices: &[MultiPolygon<f64>],
        layer_range: Range<usize>,
        cancel: &AtomicBool,
        progress: &AtomicUsize,
    ) -> Vec<Option<MultiPolygon<f64>>> {
        self.solve(slices, layer_range, cancel, progress, Window::Both)
    }

    /// Floor-only variant: regions backed by enough layers below, used to
    /// decide where solid floor skin must print.
    pub fn compute_floor_regions(
        &self,
        slices: &[MultiPolygon<f64>],
        layer_range: Range<usize>,
        cancel: &AtomicBool,
        progress: &AtomicUsize,
    ) -> Vec<Option<MultiPolygon<f64>>> {
        self.solve(slices, layer_range, cancel, progress, Window::FloorOnly)
    }

    /// Roof-only variant: regions backed by enough layers above, used to
    /// decide where solid roof skin must print.
    pub fn compute_roof_regions(
        &self,
        slices: &[MultiPolygon<f64>],
        layer_range: Range<usize>,
        cancel: &AtomicBool,
        progress: &AtomicUsize,
    ) -> Vec<Option<MultiPolygon<f64>>> {
        self.solve(slices, layer_range, cancel, progress, Window::RoofOnly)
    }

    fn solve(
        &self,
        slices: &[MultiPolygon<f64>],
        layer_range: Range<usize>,
        cancel: &AtomicBool,
        progress: &AtomicUsize,
        window: Window,
    ) -> Vec<Option<MultiPolygon<f64>>> {
        let layer_count = slices.len();
        let start = layer_range.start.min(layer_count);
        let end = layer_range.end.min(layer_count);

        (0..layer_count)
            .into_par_iter()
            .map(|layer_index| {
                if layer_index < start || layer_index >= end {
                    return None;
                }
                if cancel.load(Ordering::Relaxed) {
                    debug!(layer_index, "region solve cancelled");
                    return None;
                }

                let regions = if self.eligible(layer_index, layer_count, window) {
                    self.interiors_for_layer(slices, layer_index, window)
                } else {
                    MultiPolygon(Vec::new())
                };

                progress.fetch_add(1, Ordering::Relaxed);
                Some(regions)
            })
            .collect()
    }

    fn eligible(&self, layer_index: usize, layer_count: usize, window: Window) -> bool {
        let floor_ok = layer_index >= self.floor_layers;
        let roof_ok = layer_index + self.roof_layers < layer_count;
        match window {
            Window::Both => floor_ok && roof_ok,
            Window::FloorOnly => floor_ok,
            Window::RoofOnly => roof_ok,
        }
    }

    /// Intersect the layer's own solids with each window neighbor, then
    /// inset inward. Any area contained on the whole window does not need
    /// to be solid; the inset anchors solid fill away from the shells.
    fn interiors_for_layer(
        &self,
        slices: &[MultiPolygon<f64>],
        layer_index: usize,
        window: Window,
    ) -> MultiPolygon<f64> {
        let mut interior = slices[layer_index].clone();

        if window != Window::RoofOnly {
            for neighbor in layer_index - self.floor_layers..layer_index {
                if interior.0.is_empty() {
                    break;
                }
                interior = intersection(&interior, &slices[neighbor], self.minimum_area_mm2);
            }
        }
        if window != Window::FloorOnly {
            for neighbor in layer_index + 1..=layer_index + self.roof_layers {
                if interior.0.is_empty() {
                    break;
                }
                interior = intersection(&interior, &slices[neighbor], self.minimum_area_mm2);
            }
        }

        inset(&interior, self.infill_inset_mm, self.minimum_area_mm2)
    }
}
