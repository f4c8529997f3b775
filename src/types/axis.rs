//! Signed axis and coordinate system types.

use crate::error::{ExportError, Result};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// The three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Get the unit vector for this axis.
    pub fn unit_vector(&self) -> DVec3 {
        match self {
            Axis::X => DVec3::X,
            Axis::Y => DVec3::Y,
            Axis::Z => DVec3::Z,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// An axis together with a direction along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignedAxis {
    #[serde(rename = "+x")]
    PositiveX,
    #[serde(rename = "-x")]
    NegativeX,
    #[serde(rename = "+y")]
    PositiveY,
    #[serde(rename = "-y")]
    NegativeY,
    #[serde(rename = "+z")]
    PositiveZ,
    #[serde(rename = "-z")]
    NegativeZ,
}

impl SignedAxis {
    /// All six signed axes.
    pub const ALL: [SignedAxis; 6] = [
        SignedAxis::PositiveX,
        SignedAxis::NegativeX,
        SignedAxis::PositiveY,
        SignedAxis::NegativeY,
        SignedAxis::PositiveZ,
        SignedAxis::NegativeZ,
    ];

    /// Get the axis this signed axis lies on.
    pub fn axis(&self) -> Axis {
        match self {
            SignedAxis::PositiveX | SignedAxis::NegativeX => Axis::X,
            SignedAxis::PositiveY | SignedAxis::NegativeY => Axis::Y,
            SignedAxis::PositiveZ | SignedAxis::NegativeZ => Axis::Z,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            SignedAxis::PositiveX | SignedAxis::PositiveY | SignedAxis::PositiveZ
        )
    }

    /// Get the unit vector pointing along this signed axis.
    pub fn unit_vector(&self) -> DVec3 {
        if self.is_positive() {
            self.axis().unit_vector()
        } else {
            -self.axis().unit_vector()
        }
    }

    /// Find the signed axis matching a unit vector, if it is axis-aligned.
    pub fn from_vector(v: DVec3) -> Option<Self> {
        SignedAxis::ALL
            .into_iter()
            .find(|a| a.unit_vector().abs_diff_eq(v, 1.0e-9))
    }

    /// Parse from string (case-insensitive). The sign is optional and
    /// defaults to positive, so `x`, `+X` and `-z` are all accepted.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "x" | "+x" => Some(SignedAxis::PositiveX),
            "-x" => Some(SignedAxis::NegativeX),
            "y" | "+y" => Some(SignedAxis::PositiveY),
            "-y" => Some(SignedAxis::NegativeY),
            "z" | "+z" => Some(SignedAxis::PositiveZ),
            "-z" => Some(SignedAxis::NegativeZ),
            _ => None,
        }
    }
}

impl std::fmt::Display for SignedAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.is_positive() { '+' } else { '-' };
        write!(f, "{}{}", sign, self.axis())
    }
}

/// Triangle winding order of the emitted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindingOrder {
    #[default]
    CounterClockwise,
    Clockwise,
}

impl std::fmt::Display for WindingOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindingOrder::CounterClockwise => write!(f, "counter-clockwise"),
            WindingOrder::Clockwise => write!(f, "clockwise"),
        }
    }
}

/// A forward/up pair describing an axis convention.
///
/// The right axis is implied as `forward × up`, which keeps every
/// convention right-handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConvention {
    pub forward: SignedAxis,
    pub up: SignedAxis,
}

impl AxisConvention {
    /// The authoring tool's convention: forward +Y, up +Z.
    pub const SOURCE: AxisConvention = AxisConvention {
        forward: SignedAxis::PositiveY,
        up: SignedAxis::PositiveZ,
    };

    pub fn new(forward: SignedAxis, up: SignedAxis) -> Result<Self> {
        let convention = Self { forward, up };
        convention.validate()?;
        Ok(convention)
    }

    /// Check that forward and up lie on different axes.
    pub fn validate(&self) -> Result<()> {
        if self.forward.axis() == self.up.axis() {
            return Err(ExportError::Config(format!(
                "forward ({}) and up ({}) must lie on different axes",
                self.forward, self.up
            )));
        }
        Ok(())
    }

    /// The implied right axis.
    pub fn right(&self) -> SignedAxis {
        let right = self.forward.unit_vector().cross(self.up.unit_vector());
        // Forward and up are perpendicular unit axes once validated, so the
        // cross product is always axis-aligned.
        SignedAxis::from_vector(right).unwrap_or(SignedAxis::PositiveX)
    }
}

impl Default for AxisConvention {
    /// The exported convention: forward -Z, up +Y.
    fn default() -> Self {
        Self {
            forward: SignedAxis::NegativeZ,
            up: SignedAxis::PositiveY,
        }
    }
}

/// The coordinate system declared in the SMF/T header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinateSystem {
    pub axes: AxisConvention,
    pub winding: WindingOrder,
}

impl CoordinateSystem {
    pub fn new(axes: AxisConvention, winding: WindingOrder) -> Self {
        Self { axes, winding }
    }
}

impl std::fmt::Display for CoordinateSystem {
    /// Formats as `<right> <up> <forward> <winding>`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.axes.right(),
            self.axes.up,
            self.axes.forward,
            self.winding
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_coordinate_system_line() {
        let system = CoordinateSystem::default();
        assert_eq!(system.to_string(), "+x +y -z counter-clockwise");
    }

    #[test]
    fn test_source_right_axis() {
        assert_eq!(AxisConvention::SOURCE.right(), SignedAxis::PositiveX);
    }

    #[test]
    fn test_parse_signed_axis() {
        assert_eq!(SignedAxis::from_str("-z"), Some(SignedAxis::NegativeZ));
        assert_eq!(SignedAxis::from_str("Y"), Some(SignedAxis::PositiveY));
        assert_eq!(SignedAxis::from_str("+x"), Some(SignedAxis::PositiveX));
        assert_eq!(SignedAxis::from_str("w"), None);
    }

    #[test]
    fn test_same_axis_rejected() {
        let result = AxisConvention::new(SignedAxis::PositiveZ, SignedAxis::NegativeZ);
        assert!(matches!(result, Err(ExportError::Config(_))));
    }

    #[test]
    fn test_every_valid_convention_has_perpendicular_right() {
        for forward in SignedAxis::ALL {
            for up in SignedAxis::ALL {
                if let Ok(convention) = AxisConvention::new(forward, up) {
                    let right = convention.right();
                    assert_ne!(right.axis(), forward.axis());
                    assert_ne!(right.axis(), up.axis());
                }
            }
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&AxisConvention::default()).unwrap();
        assert_eq!(json, r#"{"forward":"-z","up":"+y"}"#);
        let winding: WindingOrder = serde_json::from_str("\"clockwise\"").unwrap();
        assert_eq!(winding, WindingOrder::Clockwise);
    }
}
