//! Offset angles and the offset recorder
//!
//! An offset is a fixed rotation applied after the look rotation. Recording
//! runs the orientation backwards: given a controller the user has posed by
//! hand, it finds the offset that reproduces that pose.

use glam::EulerRot;
use serde::{Deserialize, Serialize};

use crate::orient::{look_rotation, Pose};

/// Smallest angle the settings accept, in degrees
pub const MIN_ANGLE: f32 = -180.0;

/// Largest angle the settings accept, in degrees
pub const MAX_ANGLE: f32 = 180.0;

/// Pitch/yaw/roll offset in degrees, each within [`MIN_ANGLE`, `MAX_ANGLE`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Offset {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create an offset, clamping each angle into range
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }.clamped()
    }

    /// Copy with every angle clamped to [`MIN_ANGLE`, `MAX_ANGLE`]
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(MIN_ANGLE, MAX_ANGLE),
            y: self.y.clamp(MIN_ANGLE, MAX_ANGLE),
            z: self.z.clamp(MIN_ANGLE, MAX_ANGLE),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<[f32; 3]> for Offset {
    fn from(angles: [f32; 3]) -> Self {
        Self::new(angles[0], angles[1], angles[2])
    }
}

/// Fold an angle from [0, 360) into (-180, 180].
///
/// Only angles above 180 move; exactly 180 is kept as-is.
pub fn normalize_angle(angle: f32) -> f32 {
    if angle > 180.0 {
        angle - 360.0
    } else {
        angle
    }
}

/// Wrap degrees into [0, 360), the range the host reports Euler angles in
fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Offset that makes `orient(local, remote, offset)` reproduce `local.rotation`.
///
/// Returns `None` when the two positions coincide.
pub fn record_offset(local: &Pose, remote: &Pose) -> Option<Offset> {
    let look = look_rotation(remote.position - local.position)?;
    let relative = look.inverse() * local.rotation;
    let (x, y, z) = relative.normalize().to_euler(EulerRot::XYZ);

    Some(Offset {
        x: normalize_angle(wrap_degrees(x.to_degrees())),
        y: normalize_angle(wrap_degrees(y.to_degrees())),
        z: normalize_angle(wrap_degrees(z.to_degrees())),
    })
}
