//! Fold policy configuration
//!
//! Controls how the chi perturbation is folded into the orientation quaternion.

use serde::{Deserialize, Serialize};

/// Chi norm above which a perturbation is folded into the quaternion [rad]
pub const CHI_FOLD_TOLERANCE: f64 = 1e-6;

/// Policy for folding chi into the orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoldPolicy {
    /// Chi is folded only when its Euclidean norm exceeds this value [rad]
    pub tolerance: f64,
    /// Zero chi even when it is below `tolerance`
    ///
    /// Off by default: negligible chi stays in the vector, where callers may inspect it.
    pub clear_negligible: bool,
}

impl Default for FoldPolicy {
    fn default() -> Self {
        Self {
            tolerance: CHI_FOLD_TOLERANCE,
            clear_negligible: false,
        }
    }
}

impl FoldPolicy {
    /// Policy that leaves chi exactly zero after every fold
    pub fn strict() -> Self {
        Self {
            clear_negligible: true,
            ..Self::default()
        }
    }
}
