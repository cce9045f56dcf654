use glam::Vec2;

use crate::world::grid::{ray_dir, wrap_deg};

/// Player view-point in world space.
///
/// * Only heading is simulated; the vertical axis is faked by `eye_height`,
///   a fraction in `[0, 1]` that shifts where projected wall strips sit on
///   screen (0.5 = horizon centred). There is no true pitch.
/// * Angles are degrees in `[0, 360)`, converted to radians only at trig
///   call sites.
///
/// The renderer reads this state every frame and never mutates it; movement
/// belongs to the input collaborator, which validates candidate positions
/// against [`GridMap::can_enter`](crate::world::GridMap::can_enter).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: Vec2,
    angle_deg: f32,
    eye_height: f32,
}

impl Camera {
    pub fn new(pos: Vec2, angle_deg: f32, eye_height: f32) -> Self {
        Self {
            pos,
            angle_deg: wrap_deg(angle_deg),
            eye_height: eye_height.clamp(0.0, 1.0),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    #[inline]
    pub fn eye_height(&self) -> f32 {
        self.eye_height
    }

    /// Rotate by `delta_deg` (positive = turn left / counter-clockwise).
    pub fn turn(&mut self, delta_deg: f32) {
        self.angle_deg = wrap_deg(self.angle_deg + delta_deg);
    }

    /// Candidate position `dist` world units ahead; negative walks backward.
    /// The caller decides whether the move is legal.
    pub fn walk_target(&self, dist: f32) -> Vec2 {
        self.pos + ray_dir(self.angle_deg) * dist
    }

    pub fn step_to(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    pub fn set_eye_height(&mut self, fraction: f32) {
        self.eye_height = fraction.clamp(0.0, 1.0);
    }
}
