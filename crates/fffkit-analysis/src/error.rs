//! Failure taxonomy for feature comparison
//!
//! Every comparison failure carries the layer index and fill type it was
//! found at; metric mismatches additionally carry both values and the
//! computed error fraction. All types use `thiserror`.

use std::fmt;

use thiserror::Error;

use fffkit_core::FillType;

/// Which of the two compared maps a feature was missing from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The map under test
    Result,
    /// The reference map
    Expected,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Result => write!(f, "result"),
            Self::Expected => write!(f, "expected"),
        }
    }
}

/// Analysis failure type
///
/// Comparison failures are raised in order: layer count, then feature key
/// sets, then per-metric tolerances. Degenerate accumulation covers
/// malformed-input conditions that would otherwise divide by zero.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Result/expected layer counts differ
    #[error("Result has {result} layers, expected {expected}")]
    LayerCountMismatch {
        /// Layer count of the map under test.
        result: usize,
        /// Layer count of the reference map.
        expected: usize,
    },

    /// A fill-type key present in one map is absent from the other
    #[error("Fill type {fill_type} on layer {layer_index} is missing from the {missing_in} map")]
    MissingFeature {
        /// The layer the key was found on.
        layer_index: usize,
        /// The fill type key.
        fill_type: FillType,
        /// Which map lacks the key.
        missing_in: Side,
    },

    /// A bounding-box coordinate exceeded tolerance
    #[error("Expected bounding box {metric} to be {expected}, got {result} (layer {layer_index}, fill type {fill_type}); error fraction {error_fraction}")]
    FeatureBoundingBoxMismatch {
        /// The layer the mismatch was found on.
        layer_index: usize,
        /// The fill type key.
        fill_type: FillType,
        /// Which coordinate mismatched.
        metric: &'static str,
        /// Value from the map under test.
        result: f64,
        /// Value from the reference map.
        expected: f64,
        /// The computed error fraction.
        error_fraction: f64,
    },

    /// A center-of-mass coordinate exceeded tolerance
    #[error("Expected center of mass {metric} to be {expected}, got {result} (layer {layer_index}, fill type {fill_type}); error fraction {error_fraction}")]
    FeatureCenterOfMassMismatch {
        /// The layer the mismatch was found on.
        layer_index: usize,
        /// The fill type key.
        fill_type: FillType,
        /// Which coordinate mismatched.
        metric: &'static str,
        /// Value from the map under test.
        result: f64,
        /// Value from the reference map.
        expected: f64,
        /// The computed error fraction.
        error_fraction: f64,
    },

    /// Cumulative extrusion amount exceeded tolerance
    #[error("Expected extrusion amount to be {expected}, got {result} (layer {layer_index}, fill type {fill_type}); error fraction {error_fraction}")]
    FeatureCumulativeExtrusionMismatch {
        /// The layer the mismatch was found on.
        layer_index: usize,
        /// The fill type key.
        fill_type: FillType,
        /// Value from the map under test.
        result: f64,
        /// Value from the reference map.
        expected: f64,
        /// The computed error fraction.
        error_fraction: f64,
    },

    /// Cumulative travel distance exceeded tolerance
    #[error("Expected extrusion distance to be {expected}, got {result} (layer {layer_index}, fill type {fill_type}); error fraction {error_fraction}")]
    FeatureCumulativeDistanceMismatch {
        /// The layer the mismatch was found on.
        layer_index: usize,
        /// The fill type key.
        fill_type: FillType,
        /// Value from the map under test.
        result: f64,
        /// Value from the reference map.
        expected: f64,
        /// The computed error fraction.
        error_fraction: f64,
    },

    /// Cumulative duration exceeded tolerance
    #[error("Expected extrusion time to be {expected}, got {result} (layer {layer_index}, fill type {fill_type}); error fraction {error_fraction}")]
    FeatureCumulativeDurationMismatch {
        /// The layer the mismatch was found on.
        layer_index: usize,
        /// The fill type key.
        fill_type: FillType,
        /// Value from the map under test.
        result: f64,
        /// Value from the reference map.
        expected: f64,
        /// The computed error fraction.
        error_fraction: f64,
    },

    /// A derived value was requested from a degenerate accumulation
    /// (e.g. center of mass with zero accumulated extrusion)
    #[error("Degenerate accumulation on layer {layer_index}, fill type {fill_type}: {reason}")]
    DegenerateAccumulation {
        /// The layer the degeneracy was found on.
        layer_index: usize,
        /// The fill type key.
        fill_type: FillType,
        /// What made the accumulation degenerate.
        reason: String,
    },
}

/// Result type using AnalysisError
pub type Result<T> = std::result::Result<T, AnalysisError>;
