//! Distance metric between the two runners.
//!
//! Polarity is fixed across the crate: a normalized distance of 0 means the
//! runners are at or inside `min_distance`, 1 means they are at or beyond
//! `proximity_range`. "Closeness" is the complement.

use glam::Vec3;

use crate::constants::{EXIT_HYSTERESIS, MAX_DISTANCE, MIN_DISTANCE, PROXIMITY_RANGE};
use crate::fade::inverse_lerp;

/// Anything the tracker can read a world position from.
///
/// `None` means the actor has not spawned yet.
pub trait Positioned {
    fn position(&self) -> Option<Vec3>;
}

impl Positioned for Vec3 {
    fn position(&self) -> Option<Vec3> {
        Some(*self)
    }
}

impl Positioned for Option<Vec3> {
    fn position(&self) -> Option<Vec3> {
        *self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProximityConfig {
    pub min_distance: f32,
    pub proximity_range: f32,
    /// Upper bound used by the trail falloff.
    pub max_distance: f32,
    /// Multiplier on `proximity_range` past which the bubble lets go.
    pub exit_hysteresis: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            min_distance: MIN_DISTANCE,
            proximity_range: PROXIMITY_RANGE,
            max_distance: MAX_DISTANCE,
            exit_hysteresis: EXIT_HYSTERESIS,
        }
    }
}

/// Clamped inverse interpolation of `distance` between `min_distance` and `range`.
#[inline]
pub fn normalize(distance: f32, min_distance: f32, range: f32) -> f32 {
    inverse_lerp(min_distance, range, distance)
}

#[derive(Clone, Debug)]
pub struct ProximityTracker {
    pub config: ProximityConfig,
    last_distance: Option<f32>,
    normalized: f32,
    midpoint: Option<Vec3>,
}

impl ProximityTracker {
    pub fn new(config: ProximityConfig) -> Self {
        Self {
            config,
            last_distance: None,
            normalized: 1.0,
            midpoint: None,
        }
    }

    /// Recompute from two raw positions. Returns `None` if either is absent.
    pub fn update(&mut self, a: Option<Vec3>, b: Option<Vec3>) -> Option<f32> {
        match (a, b) {
            (Some(a), Some(b)) => {
                let distance = a.distance(b);
                self.last_distance = Some(distance);
                self.normalized =
                    normalize(distance, self.config.min_distance, self.config.proximity_range);
                self.midpoint = Some((a + b) * 0.5);
                log::trace!(
                    "[proximity] distance={:.3} normalized={:.3}",
                    distance,
                    self.normalized
                );
            }
            _ => {
                self.last_distance = None;
                self.normalized = 1.0;
                self.midpoint = None;
            }
        }
        self.last_distance
    }

    pub fn track(&mut self, a: &dyn Positioned, b: &dyn Positioned) -> Option<f32> {
        self.update(a.position(), b.position())
    }

    pub fn last_distance(&self) -> Option<f32> {
        self.last_distance
    }

    /// Always in \[0, 1\]; 1 while the distance is undefined.
    pub fn normalized(&self) -> f32 {
        self.normalized
    }

    pub fn closeness(&self) -> f32 {
        1.0 - self.normalized
    }

    pub fn midpoint(&self) -> Option<Vec3> {
        self.midpoint
    }

    pub fn within_range(&self) -> bool {
        self.last_distance
            .is_some_and(|d| d <= self.config.proximity_range)
    }

    /// True once the runners are past the hysteresis band, or untracked.
    pub fn beyond_exit(&self) -> bool {
        match self.last_distance {
            Some(d) => d > self.config.proximity_range * self.config.exit_hysteresis,
            None => true,
        }
    }

    /// Trail strength in \[0, 1\]: 1 at `min_distance`, 0 at `max_distance` or untracked.
    pub fn trail_factor(&self) -> f32 {
        match self.last_distance {
            Some(d) => 1.0 - inverse_lerp(self.config.min_distance, self.config.max_distance, d),
            None => 0.0,
        }
    }
}

impl Default for ProximityTracker {
    fn default() -> Self {
        Self::new(ProximityConfig::default())
    }
}
