//! Look-at orientation with a post-applied offset
//!
//! Rotations follow the host convention: a controller's forward axis is +Z
//! and its up axis is +Y, both in the controller's local frame.

use glam::{EulerRot, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::offset::Offset;

/// Local forward axis of a controller
pub const FORWARD: Vec3 = Vec3::Z;

/// World up axis used to settle roll of the look rotation
pub const UP: Vec3 = Vec3::Y;

/// Directions shorter than this have no usable heading
const MIN_DIRECTION_LENGTH: f32 = 1e-6;

/// Squared length of `UP x forward` below which the two are treated as parallel
const PARALLEL_EPSILON: f32 = 1e-12;

/// World-space position and rotation of a controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` with identity rotation
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Same position, different rotation
    pub fn with_rotation(self, rotation: Quat) -> Self {
        Self { rotation, ..self }
    }
}

/// Rotation that turns [`FORWARD`] onto `direction`.
///
/// Roll is chosen so the rotated up axis stays in the plane spanned by
/// `direction` and world [`UP`]. When `direction` is parallel to [`UP`] there
/// is no such plane and the shortest arc from [`FORWARD`] is used instead.
///
/// Returns `None` for a (near) zero direction.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    if direction.length() < MIN_DIRECTION_LENGTH {
        return None;
    }
    let forward = direction.normalize();

    let right = UP.cross(forward);
    if right.length_squared() < PARALLEL_EPSILON {
        return Some(Quat::from_rotation_arc(FORWARD, forward));
    }
    let right = right.normalize();
    let up = forward.cross(right);

    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize())
}

/// Rotation for an offset, as intrinsic XYZ Euler angles in degrees
pub fn offset_rotation(offset: Offset) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        offset.x.to_radians(),
        offset.y.to_radians(),
        offset.z.to_radians(),
    )
}

/// New world rotation for `local` so it faces `remote`, with `offset` applied
/// in the frame of the look rotation.
///
/// Returns `None` when the two positions coincide; callers keep whatever
/// rotation the controller already has.
pub fn orient(local: &Pose, remote: &Pose, offset: Offset) -> Option<Quat> {
    let look = look_rotation(remote.position - local.position)?;
    Some((look * offset_rotation(offset)).normalize())
}
