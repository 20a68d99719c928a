use bevy::prelude::*;
use constants::camera::{FOCUS_OFFSET, HOME_POSITION, INITIAL_POSITION, ORIGIN, RESET_POSITION};

/// Camera position plus the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    /// Pose the camera starts in.
    pub const fn initial() -> Self {
        Self::new(INITIAL_POSITION, ORIGIN)
    }

    /// Pose a cleared selection returns to.
    pub const fn home() -> Self {
        Self::new(HOME_POSITION, ORIGIN)
    }

    /// Pose the reset control snaps to.
    pub const fn reset() -> Self {
        Self::new(RESET_POSITION, ORIGIN)
    }

    /// Pose that frames `point` from just in front of it.
    pub fn focusing(point: Vec3) -> Self {
        Self::new(point + FOCUS_OFFSET, point)
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.look_at)
    }

    /// Unit vector from the camera towards its look-at point, if they differ.
    pub fn view_axis(&self) -> Option<Vec3> {
        (self.look_at - self.position).try_normalize()
    }

    /// Move both position and look-at a fraction `t` of the way to `target`.
    pub fn lerp(&self, target: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(target.position, t),
            look_at: self.look_at.lerp(target.look_at, t),
        }
    }

    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.look_at, Vec3::Y)
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::initial()
    }
}

/// Request to move the camera from wherever it is now to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRequest {
    pub to: CameraPose,
}

impl TransitionRequest {
    pub fn to(pose: CameraPose) -> Self {
        Self { to: pose }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focusing_offsets_along_z_and_looks_at_point() {
        let point = Vec3::new(3.0, -2.0, 7.0);
        let pose = CameraPose::focusing(point);
        assert_eq!(pose.position, Vec3::new(3.0, -2.0, 8.0));
        assert_eq!(pose.look_at, point);
        assert_eq!(pose.view_axis(), Some(Vec3::NEG_Z));
    }

    #[test]
    fn view_axis_is_none_when_degenerate() {
        let pose = CameraPose::new(Vec3::ONE, Vec3::ONE);
        assert_eq!(pose.view_axis(), None);
    }

    #[test]
    fn transform_faces_look_at() {
        let transform = CameraPose::initial().to_transform();
        assert!(transform.forward().as_vec3().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }
}
