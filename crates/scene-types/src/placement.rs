use serde::{Deserialize, Serialize};

/// Orientation of a node as a unit quaternion `[x, y, z, w]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub q: [f64; 4],
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        q: [0.0, 0.0, 0.0, 1.0],
    };

    /// Build a rotation of `angle_deg` degrees about `axis`.
    /// A zero-length axis yields the identity.
    pub fn from_axis_angle(axis: [f64; 3], angle_deg: f64) -> Self {
        let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
        if len < 1e-12 {
            return Self::IDENTITY;
        }
        let half = angle_deg.to_radians() / 2.0;
        let s = half.sin() / len;
        Self {
            q: [axis[0] * s, axis[1] * s, axis[2] * s, half.cos()],
        }
    }

    pub fn is_identity(&self) -> bool {
        self.q[0] == 0.0 && self.q[1] == 0.0 && self.q[2] == 0.0
    }

    /// Return the same rotation rescaled to unit length.
    pub fn normalized(&self) -> Self {
        let [x, y, z, w] = self.q;
        let len = (x * x + y * y + z * z + w * w).sqrt();
        if len < 1e-12 {
            return Self::IDENTITY;
        }
        Self {
            q: [x / len, y / len, z / len, w / len],
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Position and orientation of a node relative to its document frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    /// Translation in millimetres.
    pub base: [f64; 3],
    pub rotation: Rotation,
}

impl Placement {
    pub fn new(base: [f64; 3], rotation: Rotation) -> Self {
        Self { base, rotation }
    }

    pub fn from_translation(base: [f64; 3]) -> Self {
        Self {
            base,
            rotation: Rotation::IDENTITY,
        }
    }

    pub fn has_translation(&self) -> bool {
        self.base.iter().any(|c| *c != 0.0)
    }
}
