//! Timed, manually overridable progression through the zone timeline.

use std::time::Duration;

use glam::Vec3;
use smallvec::SmallVec;

use crate::constants::AMBIENT_BLEND_SEC;
use crate::error::ZoneError;
use crate::fade::FadeState;
use crate::registry::{switch, EffectRegistry};
use crate::timeline::{Ambient, ZoneDefinition, ZoneTimeline};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZonePhase {
    #[default]
    NotStarted,
    Running,
    /// The last zone's timer ran out. Its effects stay lit and manual
    /// selection still works.
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneChangeCause {
    Start,
    Timer,
    Manual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneChange {
    pub from: Option<usize>,
    pub to: usize,
    pub cause: ZoneChangeCause,
    /// The outgoing zone's effects were kept lit.
    pub carried: bool,
}

/// Runs with the registry right before the lit zones are switched off, so
/// dependent effects can go dark ahead of the incoming zone.
pub type BeforeDarken<'a> = &'a mut dyn FnMut(&mut dyn EffectRegistry);

#[derive(Clone, Debug)]
struct AmbientBlend {
    from: Vec3,
    to: Vec3,
    fade: FadeState,
}

pub struct ZoneStateMachine {
    timeline: ZoneTimeline,
    phase: ZonePhase,
    current: usize,
    remaining: Duration,
    // Zones whose effects are lit, oldest first.
    lit: SmallVec<[usize; 2]>,
    ambient: Ambient,
    blend: Option<AmbientBlend>,
}

impl ZoneStateMachine {
    pub fn new(timeline: ZoneTimeline) -> Self {
        Self {
            timeline,
            phase: ZonePhase::NotStarted,
            current: 0,
            remaining: Duration::ZERO,
            lit: SmallVec::new(),
            ambient: Ambient::default(),
            blend: None,
        }
    }

    pub fn timeline(&self) -> &ZoneTimeline {
        &self.timeline
    }

    pub fn phase(&self) -> ZonePhase {
        self.phase
    }

    pub fn current_zone_index(&self) -> usize {
        self.current
    }

    pub fn current_zone(&self) -> Option<&ZoneDefinition> {
        self.timeline.get(self.current)
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Zones whose effects are currently lit, oldest first.
    pub fn lit_zones(&self) -> &[usize] {
        &self.lit
    }

    pub fn ambient(&self) -> Ambient {
        self.ambient
    }

    /// Start progression at zone 0. Only the first call does anything.
    pub fn start_game(&mut self, registry: &mut dyn EffectRegistry) -> Option<ZoneChange> {
        self.start_game_with(registry, &mut |_| {})
    }

    /// Like [`start_game`](Self::start_game), calling `before_darken` just
    /// before the lit zones go dark.
    pub fn start_game_with(
        &mut self,
        registry: &mut dyn EffectRegistry,
        before_darken: BeforeDarken<'_>,
    ) -> Option<ZoneChange> {
        if self.phase != ZonePhase::NotStarted {
            log::debug!("[zone] start ignored, already {:?}", self.phase);
            return None;
        }
        Some(self.enter(0, ZoneChangeCause::Start, registry, before_darken))
    }

    /// Jump straight to `index`, bypassing the timer.
    ///
    /// Before the game has started this starts it at `index`. An invalid index
    /// leaves everything untouched.
    pub fn select_zone(
        &mut self,
        index: usize,
        registry: &mut dyn EffectRegistry,
    ) -> Result<ZoneChange, ZoneError> {
        self.select_zone_with(index, registry, &mut |_| {})
    }

    pub fn select_zone_with(
        &mut self,
        index: usize,
        registry: &mut dyn EffectRegistry,
        before_darken: BeforeDarken<'_>,
    ) -> Result<ZoneChange, ZoneError> {
        let index = self.timeline.jump(index)?;
        Ok(self.enter(index, ZoneChangeCause::Manual, registry, before_darken))
    }

    pub fn tick(&mut self, dt: Duration, registry: &mut dyn EffectRegistry) -> Option<ZoneChange> {
        self.tick_with(dt, registry, &mut |_| {})
    }

    pub fn tick_with(
        &mut self,
        dt: Duration,
        registry: &mut dyn EffectRegistry,
        before_darken: BeforeDarken<'_>,
    ) -> Option<ZoneChange> {
        self.advance_ambient(dt.as_secs_f32(), registry);
        if self.phase != ZonePhase::Running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if !self.remaining.is_zero() {
            return None;
        }
        match self.timeline.next(self.current) {
            Some(next) => Some(self.enter(next, ZoneChangeCause::Timer, registry, before_darken)),
            None => {
                self.phase = ZonePhase::Finished;
                log::info!("[zone] reached the last zone ({}), holding", self.current + 1);
                None
            }
        }
    }

    /// Switch off everything that is lit and return to `NotStarted`.
    pub fn shutdown(&mut self, registry: &mut dyn EffectRegistry) {
        self.darken_all(registry);
        self.phase = ZonePhase::NotStarted;
        self.current = 0;
        self.remaining = Duration::ZERO;
        self.blend = None;
    }

    fn enter(
        &mut self,
        index: usize,
        cause: ZoneChangeCause,
        registry: &mut dyn EffectRegistry,
        before_darken: BeforeDarken<'_>,
    ) -> ZoneChange {
        let from = (self.phase != ZonePhase::NotStarted).then_some(self.current);
        let carried = match (from, self.timeline.get(index)) {
            (Some(prev), Some(zone)) => zone.carry_over && prev + 1 == index,
            _ => false,
        };

        // Everything outgoing goes dark before anything incoming lights up.
        if !carried {
            if !self.lit.is_empty() {
                before_darken(registry);
            }
            self.darken_all(registry);
        }
        if let Some(zone) = self.timeline.get(index) {
            for handle in &zone.effects {
                if !self.is_lit(handle) {
                    switch(registry, handle, true);
                }
            }
            self.remaining = zone.duration;
            if let Some(ambient) = zone.ambient {
                self.begin_ambient(ambient, registry);
            }
        }
        if !self.lit.contains(&index) {
            self.lit.push(index);
        }

        self.current = index;
        self.phase = ZonePhase::Running;
        log::info!(
            "[zone] {:?}: zone {} -> {}{}",
            cause,
            from.map_or_else(|| "-".to_string(), |f| (f + 1).to_string()),
            index + 1,
            if carried { " (carrying effects)" } else { "" }
        );
        ZoneChange {
            from,
            to: index,
            cause,
            carried,
        }
    }

    fn is_lit(&self, handle: &str) -> bool {
        self.lit
            .iter()
            .filter_map(|&i| self.timeline.get(i))
            .any(|z| z.effects.iter().any(|h| h == handle))
    }

    fn darken_all(&mut self, registry: &mut dyn EffectRegistry) {
        for &zone_index in self.lit.iter().rev() {
            if let Some(zone) = self.timeline.get(zone_index) {
                for handle in zone.effects.iter().rev() {
                    switch(registry, handle, false);
                }
            }
        }
        self.lit.clear();
    }

    fn begin_ambient(&mut self, target: Ambient, registry: &mut dyn EffectRegistry) {
        self.ambient.fog_density = target.fog_density;
        self.blend = Some(AmbientBlend {
            from: self.ambient.color,
            to: target.color,
            fade: FadeState::new(0.0, 1.0, AMBIENT_BLEND_SEC),
        });
        registry.set_ambient(self.ambient);
    }

    fn advance_ambient(&mut self, dt_sec: f32, registry: &mut dyn EffectRegistry) {
        let Some(blend) = self.blend.as_mut() else {
            return;
        };
        let t = blend.fade.advance(dt_sec);
        self.ambient.color = blend.from.lerp(blend.to, t);
        if blend.fade.is_done() {
            self.blend = None;
        }
        registry.set_ambient(self.ambient);
    }
}
