//! The two auto-running characters. They are the position feed for the zone
//! core and know nothing about zones or effects.

use glam::Vec3;
use rand::Rng;
use zone_core::Positioned;

use crate::constants::*;

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    pub move_speed: f32,
    pub forward_speed: f32,
    pub forward_speed_variation: f32,
    pub smooth_time: f32,
    /// Closer than this and the runner slows down.
    pub min_distance: f32,
    /// Farther than this and the runner speeds up.
    pub max_distance: f32,
    pub distance_speed_step: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            forward_speed: FORWARD_SPEED,
            forward_speed_variation: FORWARD_SPEED_VARIATION,
            smooth_time: SMOOTH_TIME,
            min_distance: zone_core::MIN_DISTANCE,
            max_distance: zone_core::MAX_DISTANCE,
            distance_speed_step: DISTANCE_SPEED_STEP,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunnerActor {
    pub config: RunnerConfig,
    pub position: Vec3,
    forward_speed: f32,
    lateral_velocity: f32,
    steer: f32,
}

impl RunnerActor {
    pub fn new<R: Rng>(start: Vec3, config: RunnerConfig, rng: &mut R) -> Self {
        let variation = config.forward_speed_variation.abs();
        let offset = if variation > 0.0 {
            rng.gen_range(-variation..=variation)
        } else {
            0.0
        };
        Self {
            forward_speed: config.forward_speed + offset,
            config,
            position: start,
            lateral_velocity: 0.0,
            steer: 0.0,
        }
    }

    pub fn forward_speed(&self) -> f32 {
        self.forward_speed
    }

    pub fn set_steer(&mut self, input: f32) {
        self.steer = input.clamp(-1.0, 1.0);
    }

    pub fn is_steering(&self) -> bool {
        self.steer != 0.0
    }

    /// Nudge forward speed to keep the pair between min and max distance.
    pub fn govern_speed(&mut self, other: Vec3) {
        let distance = self.position.distance(other);
        if distance > self.config.max_distance {
            self.forward_speed += self.config.distance_speed_step;
        } else if distance < self.config.min_distance {
            self.forward_speed -= self.config.distance_speed_step;
        }
        let base = self.config.forward_speed;
        let variation = self.config.forward_speed_variation.abs();
        self.forward_speed = self.forward_speed.clamp(base - variation, base + variation);
    }

    pub fn advance(&mut self, dt_sec: f32, other: Vec3) {
        self.govern_speed(other);

        let target = self.steer * self.config.move_speed;
        let t = if self.config.smooth_time > 0.0 {
            (dt_sec / self.config.smooth_time).min(1.0)
        } else {
            1.0
        };
        self.lateral_velocity += (target - self.lateral_velocity) * t;
        self.position.x += self.lateral_velocity * dt_sec;

        // Left alone, the runners drift apart.
        if !self.is_steering() {
            let away = if self.position.x < other.x { -1.0 } else { 1.0 };
            self.position.x += away * self.config.move_speed * dt_sec;
        }

        self.position.z += self.forward_speed * dt_sec;
    }
}

impl Positioned for RunnerActor {
    fn position(&self) -> Option<Vec3> {
        Some(self.position)
    }
}
