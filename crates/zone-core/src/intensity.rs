//! Proximity-driven effect intensity for one lit zone.
//!
//! The bubble runs a small state machine:
//!
//! ```text
//! Inactive --enter range--> Activating --fade-in done--> Active
//!     ^                         |  ^                        |
//!     |                   past  |  | back in range          | past range * hysteresis
//!     |                         v  |                        v
//!     +------fade-out done---- FadingOut <------------------+
//! ```
//!
//! The energy pulse is triggered only on `Inactive -> Activating`; after that
//! it is switched on or off when closeness crosses the pulse threshold.
//! Trails and background emission track the distance every tick.

use crate::constants::*;
use crate::fade::{lerp, Approach, FadeState};
use crate::proximity::ProximityTracker;
use crate::registry::{absorb, switch, EffectRegistry};
use crate::timeline::ProximityBinding;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BubblePhase {
    #[default]
    Inactive,
    Activating,
    Active,
    FadingOut,
}

impl BubblePhase {
    pub fn is_lit(self) -> bool {
        self != BubblePhase::Inactive
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntensityConfig {
    pub bubble_fade_sec: f32,
    pub bubble_min_scale: f32,
    pub bubble_max_scale: f32,
    pub bubble_max_emission: f32,
    pub bubble_scale: Approach,
    pub pulse_threshold: f32,
    pub pulse_min_size: f32,
    pub pulse_max_size: f32,
    pub pulse_min_alpha: f32,
    pub pulse_max_alpha: f32,
    pub trail_min_width: f32,
    pub trail_max_width: f32,
    pub trail_near_alpha: f32,
    pub trail_far_alpha: f32,
    pub background_min_emission: f32,
    pub background_max_emission: f32,
    pub background: Approach,
}

impl Default for IntensityConfig {
    fn default() -> Self {
        Self {
            bubble_fade_sec: BUBBLE_FADE_SEC,
            bubble_min_scale: BUBBLE_MIN_SCALE,
            bubble_max_scale: BUBBLE_MAX_SCALE,
            bubble_max_emission: BUBBLE_MAX_EMISSION,
            bubble_scale: Approach::Exponential {
                rate: BUBBLE_SCALE_RATE,
            },
            pulse_threshold: PULSE_THRESHOLD,
            pulse_min_size: PULSE_MIN_SIZE,
            pulse_max_size: PULSE_MAX_SIZE,
            pulse_min_alpha: PULSE_MIN_ALPHA,
            pulse_max_alpha: PULSE_MAX_ALPHA,
            trail_min_width: TRAIL_MIN_WIDTH,
            trail_max_width: TRAIL_MAX_WIDTH,
            trail_near_alpha: TRAIL_NEAR_ALPHA,
            trail_far_alpha: TRAIL_FAR_ALPHA,
            background_min_emission: BACKGROUND_MIN_EMISSION,
            background_max_emission: BACKGROUND_MAX_EMISSION,
            background: Approach::Exponential {
                rate: BACKGROUND_EMISSION_RATE,
            },
        }
    }
}

/// Smoothed scalars pushed to one effect handle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectIntensity {
    pub alpha: f32,
    pub scale: f32,
    pub emission_rate: f32,
}

impl EffectIntensity {
    fn clamped(self) -> Self {
        Self {
            alpha: self.alpha.clamp(0.0, 1.0),
            scale: self.scale.max(0.0),
            emission_rate: self.emission_rate.max(0.0),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Bubble {
    phase: BubblePhase,
    intensity: EffectIntensity,
    alpha_fade: Option<FadeState>,
    scale_fade: Option<FadeState>,
}

#[derive(Clone, Debug, Default)]
struct Pulse {
    intensity: EffectIntensity,
    lit: bool,
}

impl Pulse {
    fn trigger(
        &mut self,
        handle: &str,
        closeness: f32,
        config: &IntensityConfig,
        registry: &mut dyn EffectRegistry,
    ) {
        self.intensity.scale = lerp(config.pulse_min_size, config.pulse_max_size, closeness);
        self.intensity.alpha = lerp(config.pulse_min_alpha, config.pulse_max_alpha, closeness);
        self.intensity = self.intensity.clamped();
        absorb(registry.set_scale(handle, self.intensity.scale));
        absorb(registry.set_alpha(handle, self.intensity.alpha));
        self.follow(handle, closeness, config.pulse_threshold, registry);
    }

    // Edge-triggered: only crossings reach the registry.
    fn follow(
        &mut self,
        handle: &str,
        closeness: f32,
        threshold: f32,
        registry: &mut dyn EffectRegistry,
    ) {
        let want = closeness > threshold;
        if want != self.lit {
            switch(registry, handle, want);
            self.lit = want;
        }
    }

    fn release(&mut self, handle: &str, registry: &mut dyn EffectRegistry) {
        if self.lit {
            switch(registry, handle, false);
        }
        *self = Pulse::default();
    }
}

/// Intensity state for the proximity effects of one zone.
///
/// Created when the zone is lit and cleared when it goes dark.
#[derive(Clone, Debug)]
pub struct ProximityEffects {
    binding: ProximityBinding,
    config: IntensityConfig,
    bubble: Bubble,
    pulse: Pulse,
    trail: EffectIntensity,
    background: EffectIntensity,
}

impl ProximityEffects {
    pub fn new(binding: ProximityBinding, config: IntensityConfig) -> Self {
        let background = EffectIntensity {
            emission_rate: config.background_min_emission,
            ..EffectIntensity::default()
        };
        Self {
            binding,
            config,
            bubble: Bubble::default(),
            pulse: Pulse::default(),
            trail: EffectIntensity::default(),
            background,
        }
    }

    pub fn binding(&self) -> &ProximityBinding {
        &self.binding
    }

    pub fn phase(&self) -> BubblePhase {
        self.bubble.phase
    }

    pub fn bubble(&self) -> EffectIntensity {
        self.bubble.intensity
    }

    pub fn pulse(&self) -> EffectIntensity {
        self.pulse.intensity
    }

    pub fn pulse_lit(&self) -> bool {
        self.pulse.lit
    }

    pub fn trail(&self) -> EffectIntensity {
        self.trail
    }

    pub fn background(&self) -> EffectIntensity {
        self.background
    }

    /// Advance one tick. Returns the bubble phase if it changed.
    ///
    /// `proximity` must already hold this tick's distance.
    pub fn update(
        &mut self,
        proximity: &ProximityTracker,
        dt_sec: f32,
        registry: &mut dyn EffectRegistry,
    ) -> Option<BubblePhase> {
        let before = self.bubble.phase;
        self.update_bubble(proximity, dt_sec, registry);
        self.update_trails(proximity, registry);
        self.update_background(proximity.normalized(), dt_sec, registry);
        let after = self.bubble.phase;
        (after != before).then_some(after)
    }

    fn update_bubble(
        &mut self,
        proximity: &ProximityTracker,
        dt_sec: f32,
        registry: &mut dyn EffectRegistry,
    ) {
        let Some(handle) = self.binding.bubble.as_deref() else {
            return;
        };
        let pulse_handle = self.binding.pulse.as_deref();
        let config = &self.config;
        let bubble = &mut self.bubble;
        let normalized = proximity.normalized();
        let closeness = proximity.closeness();

        // Phase changes first; a fade started this tick begins advancing next tick.
        let mut changed = true;
        match bubble.phase {
            BubblePhase::Inactive if proximity.within_range() => {
                switch(registry, handle, true);
                bubble.intensity = EffectIntensity::default();
                bubble.alpha_fade = Some(FadeState::new(0.0, 1.0, config.bubble_fade_sec));
                bubble.scale_fade = None;
                bubble.phase = BubblePhase::Activating;
                log::debug!("[proximity] {handle} activating (closeness {closeness:.2})");
                if let Some(pulse) = pulse_handle {
                    self.pulse.trigger(pulse, closeness, config, registry);
                }
            }
            BubblePhase::FadingOut if proximity.within_range() => {
                bubble.alpha_fade = Some(FadeState::new(
                    bubble.intensity.alpha,
                    1.0,
                    config.bubble_fade_sec,
                ));
                bubble.scale_fade = None;
                bubble.phase = BubblePhase::Activating;
                log::debug!("[proximity] {handle} fade-out cancelled");
            }
            BubblePhase::Activating | BubblePhase::Active if proximity.beyond_exit() => {
                let current = bubble.intensity;
                bubble.alpha_fade = Some(FadeState::new(current.alpha, 0.0, config.bubble_fade_sec));
                bubble.scale_fade = Some(FadeState::new(current.scale, 0.0, config.bubble_fade_sec));
                bubble.intensity.emission_rate = 0.0;
                bubble.phase = BubblePhase::FadingOut;
                log::debug!("[proximity] {handle} fading out");
            }
            _ => changed = false,
        }

        match bubble.phase {
            BubblePhase::Inactive => {}
            BubblePhase::Activating | BubblePhase::Active => {
                if !changed {
                    if let Some(fade) = bubble.alpha_fade.as_mut() {
                        bubble.intensity.alpha = fade.advance(dt_sec);
                        if fade.is_done() {
                            bubble.alpha_fade = None;
                            bubble.phase = BubblePhase::Active;
                        }
                    }
                }
                let target = lerp(config.bubble_max_scale, config.bubble_min_scale, normalized);
                bubble.intensity.scale = config.bubble_scale.step(bubble.intensity.scale, target, dt_sec);
                bubble.intensity.emission_rate = lerp(config.bubble_max_emission, 0.0, normalized);
            }
            BubblePhase::FadingOut => {
                if !changed {
                    let alpha = bubble.alpha_fade.as_mut().map(|f| (f.advance(dt_sec), f.is_done()));
                    let scale = bubble.scale_fade.as_mut().map(|f| (f.advance(dt_sec), f.is_done()));
                    if let Some((value, _)) = alpha {
                        bubble.intensity.alpha = value;
                    }
                    if let Some((value, _)) = scale {
                        bubble.intensity.scale = value;
                    }
                    let done = alpha.map_or(true, |(_, d)| d) && scale.map_or(true, |(_, d)| d);
                    if done {
                        absorb(registry.set_alpha(handle, 0.0));
                        absorb(registry.set_scale(handle, 0.0));
                        absorb(registry.set_emission_rate(handle, 0.0));
                        switch(registry, handle, false);
                        *bubble = Bubble::default();
                        log::debug!("[proximity] {handle} cleared");
                    }
                }
            }
        }

        if bubble.phase.is_lit() {
            bubble.intensity = bubble.intensity.clamped();
            let intensity = bubble.intensity;
            absorb(registry.set_alpha(handle, intensity.alpha));
            absorb(registry.set_scale(handle, intensity.scale));
            absorb(registry.set_emission_rate(handle, intensity.emission_rate));
            if let Some(midpoint) = proximity.midpoint() {
                absorb(registry.set_position(handle, midpoint));
            }
        }

        if let Some(pulse) = pulse_handle {
            if bubble.phase.is_lit() {
                self.pulse
                    .follow(pulse, closeness, config.pulse_threshold, registry);
            } else {
                self.pulse.release(pulse, registry);
            }
        }
    }

    fn update_trails(&mut self, proximity: &ProximityTracker, registry: &mut dyn EffectRegistry) {
        if self.binding.trails.is_empty() {
            return;
        }
        let c = proximity.trail_factor();
        self.trail = EffectIntensity {
            alpha: lerp(self.config.trail_far_alpha, self.config.trail_near_alpha, c),
            scale: lerp(self.config.trail_min_width, self.config.trail_max_width, c),
            emission_rate: 0.0,
        }
        .clamped();
        for trail in &self.binding.trails {
            absorb(registry.set_scale(trail, self.trail.scale));
            absorb(registry.set_alpha(trail, self.trail.alpha));
        }
    }

    fn update_background(
        &mut self,
        normalized: f32,
        dt_sec: f32,
        registry: &mut dyn EffectRegistry,
    ) {
        let Some(handle) = self.binding.background.as_deref() else {
            return;
        };
        let target = lerp(
            self.config.background_max_emission,
            self.config.background_min_emission,
            normalized,
        );
        let rate = self
            .config
            .background
            .step(self.background.emission_rate, target, dt_sec);
        self.background.emission_rate = rate.max(0.0);
        absorb(registry.set_emission_rate(handle, self.background.emission_rate));
    }

    /// Switch off whatever this model lit and forget all smoothed state.
    pub fn clear(&mut self, registry: &mut dyn EffectRegistry) {
        if let Some(handle) = self.binding.bubble.as_deref() {
            if self.bubble.phase.is_lit() {
                switch(registry, handle, false);
            }
        }
        if let Some(pulse) = self.binding.pulse.as_deref() {
            self.pulse.release(pulse, registry);
        }
        self.bubble = Bubble::default();
        self.pulse = Pulse::default();
        self.trail = EffectIntensity::default();
        self.background = EffectIntensity {
            emission_rate: self.config.background_min_emission,
            ..EffectIntensity::default()
        };
    }
}
