//! Layer feature accumulation and regression comparison
//!
//! This crate provides:
//! - Per-layer, per-fill-type physical feature accumulation over a stream walk
//! - Tolerance-based comparison of two accumulated feature maps with a
//!   structured failure taxonomy

pub mod compare;
pub mod error;
pub mod features;

pub use compare::{compare_gcode, compare_layers, CompareTolerances};
pub use error::{AnalysisError, Side};
pub use features::{Degeneracy, FeatureAccumulator, FeatureInfo, LayerFeatures};
