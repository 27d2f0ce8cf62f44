//! Fill-type classification of extrusion moves

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a given extrusion move exists.
///
/// Carried in the command stream as a `"Fill Type <int>"` comment tag. The
/// integer codes are flag values assigned by the print generator; codes this
/// build does not recognize round-trip through [`FillType::Custom`] so they
/// still key feature maps correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillType {
    /// No fill-type tag observed yet
    Unknown,
    /// Interior perimeter shell
    PerimeterShell,
    /// Outermost (visible) perimeter shell
    OutermostShell,
    /// Open shell curve (single-extrusion feature)
    OpenShellCurve,
    /// Solid roof/floor infill
    SolidInfill,
    /// Sparse interior infill
    SparseInfill,
    /// Support structure material
    SupportMaterial,
    /// Support directly under a bridged region
    BridgeSupport,
    /// Unrecognized wire code, preserved verbatim
    Custom(i32),
}

impl FillType {
    /// Map a `"Fill Type <int>"` wire code to a fill type.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::PerimeterShell,
            2 => Self::OutermostShell,
            4 => Self::OpenShellCurve,
            256 => Self::SolidInfill,
            512 => Self::SparseInfill,
            1024 => Self::SupportMaterial,
            2048 => Self::BridgeSupport,
            other => Self::Custom(other),
        }
    }

    /// The wire code written into `"Fill Type <int>"` tags.
    pub fn code(&self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::PerimeterShell => 1,
            Self::OutermostShell => 2,
            Self::OpenShellCurve => 4,
            Self::SolidInfill => 256,
            Self::SparseInfill => 512,
            Self::SupportMaterial => 1024,
            Self::BridgeSupport => 2048,
            Self::Custom(code) => *code,
        }
    }
}

impl Default for FillType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for FillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::PerimeterShell => write!(f, "PerimeterShell"),
            Self::OutermostShell => write!(f, "OutermostShell"),
            Self::OpenShellCurve => write!(f, "OpenShellCurve"),
            Self::SolidInfill => write!(f, "SolidInfill"),
            Self::SparseInfill => write!(f, "SparseInfill"),
            Self::SupportMaterial => write!(f, "SupportMaterial"),
            Self::BridgeSupport => write!(f, "BridgeSupport"),
            Self::Custom(code) => write!(f, "Custom({})", code),
        }
    }
}
