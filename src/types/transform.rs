//! Remapping from the authoring tool's axes into the exported convention.

use super::axis::AxisConvention;
use crate::error::Result;
use glam::{DMat3, DQuat, DVec3};

/// A fixed axis-remap applied to every exported position, normal and
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    convention: AxisConvention,
    matrix: DMat3,
}

impl CoordinateTransform {
    /// Build the remap from [`AxisConvention::SOURCE`] to `target`.
    pub fn new(target: AxisConvention) -> Result<Self> {
        target.validate()?;
        let source = AxisConvention::SOURCE;

        let from = DMat3::from_cols(
            source.forward.unit_vector(),
            source.up.unit_vector(),
            source.right().unit_vector(),
        );
        let to = DMat3::from_cols(
            target.forward.unit_vector(),
            target.up.unit_vector(),
            target.right().unit_vector(),
        );

        // `from` is orthonormal, so its transpose is its inverse.
        Ok(Self {
            convention: target,
            matrix: to * from.transpose(),
        })
    }

    /// The convention this transform produces.
    pub fn convention(&self) -> AxisConvention {
        self.convention
    }

    pub fn position(&self, v: DVec3) -> DVec3 {
        self.matrix * v
    }

    pub fn normal(&self, n: DVec3) -> DVec3 {
        self.matrix * n
    }

    /// Rotate the rotation axis of `q` into the target convention, keeping
    /// its angle.
    pub fn orientation(&self, q: DQuat) -> DQuat {
        let (axis, angle) = q.to_axis_angle();
        DQuat::from_axis_angle((self.matrix * axis).normalize(), angle)
    }

    /// Remap a per-axis scale. Scales carry no sign, so only the axis
    /// permutation applies.
    pub fn scale(&self, s: DVec3) -> DVec3 {
        let m = self.matrix;
        DMat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs()) * s
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        // Forward -Z, up +Y: (x, y, z) -> (x, z, -y)
        Self {
            convention: AxisConvention::default(),
            matrix: DMat3::from_cols(DVec3::X, -DVec3::Z, DVec3::Y),
        }
    }
}
