use bevy::prelude::*;
use constants::camera::{
    DAMPING, MAX_DISTANCE, MAX_ORBIT_PITCH, MIN_DISTANCE, ORBIT_SENSITIVITY, SCROLL_ZOOM_FACTOR,
    TRANSITION_EPSILON, ZOOM_STEP,
};

use super::pose::{CameraPose, TransitionRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    Transitioning,
}

/// Camera state machine.
///
/// Owns the current pose and an optional target. `tick` runs once per frame
/// and closes a fixed fraction of the remaining distance, snapping exactly
/// onto the target once it is within epsilon. Scroll zoom is only accepted
/// while idle.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CameraController {
    current: CameraPose,
    target: Option<CameraPose>,
    damping: f32,
    epsilon: f32,
    zoom_step: f32,
}

impl CameraController {
    pub fn new(current: CameraPose) -> Self {
        Self {
            current,
            target: None,
            damping: DAMPING,
            epsilon: TRANSITION_EPSILON,
            zoom_step: ZOOM_STEP,
        }
    }

    pub fn current(&self) -> CameraPose {
        self.current
    }

    pub fn target(&self) -> Option<CameraPose> {
        self.target
    }

    pub fn state(&self) -> TransitionState {
        if self.target.is_some() {
            TransitionState::Transitioning
        } else {
            TransitionState::Idle
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.state() == TransitionState::Transitioning
    }

    /// Scroll zoom is disabled for exactly as long as a transition is in flight.
    pub fn scroll_zoom_enabled(&self) -> bool {
        !self.is_transitioning()
    }

    /// Start moving towards `request.to`, superseding any transition in flight.
    pub fn request(&mut self, request: TransitionRequest) {
        self.target = Some(request.to);
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> TransitionState {
        let Some(target) = self.target else {
            return TransitionState::Idle;
        };

        self.current = self.current.lerp(&target, self.damping);

        if self.current.position.distance(target.position) < self.epsilon {
            self.current = target;
            self.target = None;
        }

        self.state()
    }

    pub fn zoom_in(&mut self) {
        self.target = None;
        self.dolly(self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.target = None;
        self.dolly(-self.zoom_step);
    }

    /// Snap straight to the reset pose, cancelling any transition.
    pub fn reset(&mut self) {
        self.target = None;
        self.current = CameraPose::reset();
    }

    /// Wheel zoom, positive `lines` moves towards the look-at point.
    /// Returns `false` when zoom is currently disabled.
    pub fn scroll_zoom(&mut self, lines: f32) -> bool {
        if !self.scroll_zoom_enabled() {
            return false;
        }
        let step = self.current.distance() * SCROLL_ZOOM_FACTOR * lines;
        self.dolly(step);
        true
    }

    /// Rotate the camera around its look-at point by a mouse drag in pixels.
    /// Ignored while a transition is in flight.
    pub fn orbit(&mut self, drag: Vec2) -> bool {
        if self.is_transitioning() {
            return false;
        }

        let offset = self.current.position - self.current.look_at;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return false;
        }

        let yaw = offset.x.atan2(offset.z) - drag.x * ORBIT_SENSITIVITY;
        let pitch = ((offset.y / distance).clamp(-1.0, 1.0).asin() + drag.y * ORBIT_SENSITIVITY)
            .clamp(-MAX_ORBIT_PITCH, MAX_ORBIT_PITCH);

        let rotated = Vec3::new(
            pitch.cos() * yaw.sin(),
            pitch.sin(),
            pitch.cos() * yaw.cos(),
        ) * distance;
        self.current.position = self.current.look_at + rotated;
        true
    }

    /// Move along the view axis, keeping the look-at distance within limits.
    fn dolly(&mut self, forward: f32) {
        let Some(axis) = self.current.view_axis() else {
            return;
        };

        let distance = (self.current.distance() - forward).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.current.position = self.current.look_at - axis * distance;
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraPose::initial())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ticks after which the remaining distance is guaranteed below epsilon.
    fn frames_to_settle(distance: f32) -> u32 {
        let ratio = (TRANSITION_EPSILON / distance).ln() / (1.0 - DAMPING).ln();
        ratio.ceil().max(0.0) as u32 + 1
    }

    fn settle(controller: &mut CameraController, max_frames: u32) -> Option<u32> {
        (1..=max_frames).find(|_| controller.tick() == TransitionState::Idle)
    }

    #[test]
    fn idle_tick_is_a_no_op() {
        let mut controller = CameraController::default();
        assert_eq!(controller.tick(), TransitionState::Idle);
        assert_eq!(controller.current(), CameraPose::initial());
    }

    #[test]
    fn request_disables_scroll_zoom_until_idle() {
        let mut controller = CameraController::default();
        controller.request(TransitionRequest::to(CameraPose::focusing(Vec3::new(10.0, 0.0, 0.0))));

        assert_eq!(controller.state(), TransitionState::Transitioning);
        assert!(!controller.scroll_zoom_enabled());
        assert!(!controller.scroll_zoom(1.0));

        settle(&mut controller, 200).expect("transition settles");
        assert!(controller.scroll_zoom_enabled());
    }

    #[test]
    fn first_tick_closes_damping_fraction() {
        let mut controller = CameraController::new(CameraPose::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO));
        controller.request(TransitionRequest::to(CameraPose::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0))));

        controller.tick();

        let pose = controller.current();
        assert!(pose.position.abs_diff_eq(Vec3::new(0.0, 0.0, 80.0), 1e-4));
        assert!(pose.look_at.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn converges_within_bound_and_snaps_exactly() {
        let start = CameraPose::initial();
        let target = CameraPose::focusing(Vec3::new(12.5, -40.0, 3.0));
        let mut controller = CameraController::new(start);
        let bound = frames_to_settle(start.position.distance(target.position));

        controller.request(TransitionRequest::to(target));
        let frames = settle(&mut controller, bound).expect("settles within bound");

        assert!(frames <= bound);
        assert_eq!(controller.current(), target);
        assert_eq!(controller.state(), TransitionState::Idle);
        assert_eq!(controller.target(), None);
    }

    #[test]
    fn new_request_supersedes_old_target() {
        let mut controller = CameraController::default();
        let a = CameraPose::focusing(Vec3::new(100.0, 0.0, 0.0));
        let b = CameraPose::focusing(Vec3::new(-100.0, 0.0, 0.0));

        controller.request(TransitionRequest::to(a));
        controller.tick();
        controller.request(TransitionRequest::to(b));

        assert_eq!(controller.target(), Some(b));
        settle(&mut controller, 200).expect("settles");
        assert_eq!(controller.current(), b);
    }

    #[test]
    fn reset_mid_transition_snaps_to_reset_pose() {
        let mut controller = CameraController::default();
        controller.request(TransitionRequest::to(CameraPose::focusing(Vec3::splat(20.0))));
        controller.tick();
        controller.tick();

        controller.reset();

        assert_eq!(controller.state(), TransitionState::Idle);
        assert_eq!(controller.current(), CameraPose::reset());
        assert!(controller.scroll_zoom_enabled());
    }

    #[test]
    fn zoom_cancels_transition_and_moves_along_view_axis() {
        let mut controller = CameraController::default();
        controller.request(TransitionRequest::to(CameraPose::home()));

        controller.zoom_in();
        assert_eq!(controller.state(), TransitionState::Idle);
        assert_eq!(controller.current().position, Vec3::new(0.0, 0.0, 250.0));

        controller.zoom_out();
        controller.zoom_out();
        assert_eq!(controller.current().position, Vec3::new(0.0, 0.0, 350.0));
        assert_eq!(controller.current().look_at, Vec3::ZERO);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut controller = CameraController::new(CameraPose::new(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO));
        controller.zoom_in();
        assert_eq!(controller.current().distance(), MIN_DISTANCE);

        let mut controller = CameraController::new(CameraPose::new(Vec3::new(0.0, 0.0, 980.0), Vec3::ZERO));
        controller.zoom_out();
        assert_eq!(controller.current().distance(), MAX_DISTANCE);
    }

    #[test]
    fn orbit_keeps_distance_and_is_blocked_while_transitioning() {
        let mut controller = CameraController::default();
        assert!(controller.orbit(Vec2::new(120.0, -40.0)));
        assert!((controller.current().distance() - 300.0).abs() < 1e-3);
        assert_ne!(controller.current().position, CameraPose::initial().position);

        controller.request(TransitionRequest::to(CameraPose::home()));
        let before = controller.current();
        assert!(!controller.orbit(Vec2::new(50.0, 0.0)));
        assert_eq!(controller.current(), before);
    }
}
