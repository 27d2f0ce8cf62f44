//! Print profile consumed from the settings layer
//!
//! The profile is a read-only input: fffkit never validates or persists
//! machine settings, it only reads the handful of values the analyses need.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Machine/process values consumed by the region solver and preview builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintProfile {
    /// Layer height in millimeters
    pub layer_height_mm: f64,
    /// Nozzle diameter in millimeters
    pub nozzle_diameter_mm: f64,
    /// Number of perimeter shells
    pub shells: u32,
    /// Solid floor layer count
    pub floor_layers: u32,
    /// Solid roof layer count
    pub roof_layers: u32,
    /// Bed extents in millimeters
    pub bed_size_mm: [f64; 2],
    /// Fraction of the bed size the origin is shifted by (0 = corner origin,
    /// 0.5 = center origin)
    pub bed_origin_factor: [f64; 2],
}

impl Default for PrintProfile {
    fn default() -> Self {
        Self {
            layer_height_mm: 0.2,
            nozzle_diameter_mm: 0.4,
            shells: 2,
            floor_layers: 2,
            roof_layers: 2,
            bed_size_mm: [200.0, 200.0],
            bed_origin_factor: [0.0, 0.0],
        }
    }
}

impl PrintProfile {
    /// Populate a profile from a settings JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| CoreError::Profile {
            reason: e.to_string(),
        })
    }

    /// XY shift from machine coordinates to bed-origin coordinates.
    pub fn position_shift(&self) -> DVec2 {
        DVec2::new(
            self.bed_origin_factor[0] * self.bed_size_mm[0],
            self.bed_origin_factor[1] * self.bed_size_mm[1],
        )
    }

    /// Default extruded bead cross-section: nozzle diameter wide, one layer
    /// height tall.
    pub fn bead_dimensions(&self) -> DVec2 {
        DVec2::new(self.nozzle_diameter_mm, self.layer_height_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_partial() {
        let profile = PrintProfile::from_json(r#"{"layer_height_mm": 0.3, "roof_layers": 4}"#)
            .expect("profile should parse");
        assert_eq!(profile.layer_height_mm, 0.3);
        assert_eq!(profile.roof_layers, 4);
        // untouched fields keep their defaults
        assert_eq!(profile.nozzle_diameter_mm, 0.4);
    }

    #[test]
    fn test_position_shift() {
        let profile = PrintProfile {
            bed_size_mm: [200.0, 100.0],
            bed_origin_factor: [0.5, 0.5],
            ..Default::default()
        };
        assert_eq!(profile.position_shift(), DVec2::new(100.0, 50.0));
    }

    #[test]
    fn test_invalid_json() {
        assert!(PrintProfile::from_json("not json").is_err());
    }
}
