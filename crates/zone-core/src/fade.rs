//! Scalar easing helpers shared by the proximity and zone code.
//!
//! Everything here is plain per-tick arithmetic: fades carry their own
//! elapsed time so callers advance them from `tick` instead of waiting.

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where `value` sits between `a` and `b`, clamped to \[0, 1\].
///
/// A degenerate span (`b <= a`) behaves as a step at `a`.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if b <= a {
        return if value <= a { 0.0 } else { 1.0 };
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// How a smoothed scalar moves toward its target each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Approach {
    /// Jump straight to the target.
    Snap,
    /// `current = lerp(current, target, rate * dt)`, with the factor capped at 1.
    Exponential { rate: f32 },
}

impl Approach {
    pub fn step(self, current: f32, target: f32, dt_sec: f32) -> f32 {
        match self {
            Approach::Snap => target,
            Approach::Exponential { rate } => {
                let t = (rate * dt_sec.max(0.0)).clamp(0.0, 1.0);
                lerp(current, target, t)
            }
        }
    }
}

/// Fixed-duration linear fade driven by elapsed time.
///
/// Once triggered a fade runs to completion regardless of what happens to its
/// inputs; replacing it with a new `FadeState` is how a newer trigger wins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeState {
    pub start: f32,
    pub target: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl FadeState {
    pub fn new(start: f32, target: f32, duration: f32) -> Self {
        Self {
            start,
            target,
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.target;
        }
        lerp(self.start, self.target, (self.elapsed / self.duration).clamp(0.0, 1.0))
    }

    /// Advance by `dt_sec` and return the new value.
    pub fn advance(&mut self, dt_sec: f32) -> f32 {
        self.elapsed = (self.elapsed + dt_sec.max(0.0)).min(self.duration);
        self.value()
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}
