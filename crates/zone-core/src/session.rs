//! One game session: the zone machine, the proximity tracker and the
//! intensity models of whichever zones are lit, advanced together.

use std::time::Duration;

use smallvec::SmallVec;

use crate::error::ZoneError;
use crate::intensity::{BubblePhase, IntensityConfig, ProximityEffects};
use crate::proximity::{Positioned, ProximityConfig, ProximityTracker};
use crate::registry::{switch, EffectRegistry};
use crate::timeline::ZoneTimeline;
use crate::zones::{ZoneChange, ZonePhase, ZoneStateMachine};

#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    pub proximity: ProximityConfig,
    pub intensity: IntensityConfig,
}

pub struct Session {
    machine: ZoneStateMachine,
    proximity: ProximityTracker,
    intensity: IntensityConfig,
    effects: SmallVec<[(usize, ProximityEffects); 2]>,
}

impl Session {
    pub fn new(timeline: ZoneTimeline, config: SessionConfig) -> Self {
        Self {
            machine: ZoneStateMachine::new(timeline),
            proximity: ProximityTracker::new(config.proximity),
            intensity: config.intensity,
            effects: SmallVec::new(),
        }
    }

    /// Put every handle the timeline knows about into a known, dark state.
    pub fn init(&mut self, registry: &mut dyn EffectRegistry) {
        let handles = self.machine.timeline().handles();
        log::info!(
            "[session] init: {} zones, {} effect handles",
            self.machine.timeline().len(),
            handles.len()
        );
        for handle in handles {
            switch(registry, handle, false);
        }
    }

    pub fn start_game(&mut self, registry: &mut dyn EffectRegistry) -> Option<ZoneChange> {
        let effects = &mut self.effects;
        let change = self
            .machine
            .start_game_with(registry, &mut |registry| darken_models(effects, registry))?;
        self.reconcile(Some(&change), registry);
        Some(change)
    }

    pub fn select_zone(
        &mut self,
        index: usize,
        registry: &mut dyn EffectRegistry,
    ) -> Result<ZoneChange, ZoneError> {
        let effects = &mut self.effects;
        let change = self
            .machine
            .select_zone_with(index, registry, &mut |registry| {
                darken_models(effects, registry)
            })?;
        self.reconcile(Some(&change), registry);
        Ok(change)
    }

    /// Advance one frame: proximity first, then the zone timer, then the
    /// intensity of every lit zone.
    pub fn tick(
        &mut self,
        dt: Duration,
        primary: &dyn Positioned,
        secondary: &dyn Positioned,
        registry: &mut dyn EffectRegistry,
    ) -> Option<ZoneChange> {
        self.proximity.track(primary, secondary);
        let effects = &mut self.effects;
        let change = self
            .machine
            .tick_with(dt, registry, &mut |registry| darken_models(effects, registry));
        if change.is_some() {
            self.reconcile(change.as_ref(), registry);
        }
        let dt_sec = dt.as_secs_f32();
        for (zone, effects) in self.effects.iter_mut() {
            if let Some(phase) = effects.update(&self.proximity, dt_sec, registry) {
                log::debug!("[session] zone {} bubble -> {:?}", *zone + 1, phase);
            }
        }
        change
    }

    pub fn shutdown(&mut self, registry: &mut dyn EffectRegistry) {
        darken_models(&mut self.effects, registry);
        self.machine.shutdown(registry);
        log::info!("[session] shut down");
    }

    pub fn current_zone_index(&self) -> usize {
        self.machine.current_zone_index()
    }

    pub fn normalized_proximity(&self) -> f32 {
        self.proximity.normalized()
    }

    pub fn phase(&self) -> ZonePhase {
        self.machine.phase()
    }

    pub fn machine(&self) -> &ZoneStateMachine {
        &self.machine
    }

    pub fn proximity(&self) -> &ProximityTracker {
        &self.proximity
    }

    pub fn effects_for(&self, zone: usize) -> Option<&ProximityEffects> {
        self.effects
            .iter()
            .find(|(z, _)| *z == zone)
            .map(|(_, effects)| effects)
    }

    /// Bubble phase of the newest lit zone that has a bubble.
    pub fn bubble_phase(&self) -> BubblePhase {
        self.effects
            .iter()
            .rev()
            .find(|(_, e)| e.binding().bubble.is_some())
            .map_or(BubblePhase::Inactive, |(_, e)| e.phase())
    }

    // Keep one intensity model per lit zone with a proximity binding. Models of
    // zones that went dark were already cleared before the new zone lit up.
    fn reconcile(&mut self, change: Option<&ZoneChange>, registry: &mut dyn EffectRegistry) {
        let fresh = change.is_some_and(|c| !c.carried);
        let lit = self.machine.lit_zones();
        let mut kept: SmallVec<[(usize, ProximityEffects); 2]> = SmallVec::new();
        for (zone, mut effects) in self.effects.drain(..) {
            if fresh || !lit.contains(&zone) {
                effects.clear(registry);
            } else {
                kept.push((zone, effects));
            }
        }
        for &zone in lit {
            if kept.iter().any(|(z, _)| *z == zone) {
                continue;
            }
            let binding = self
                .machine
                .timeline()
                .get(zone)
                .and_then(|z| z.proximity.clone());
            if let Some(binding) = binding {
                kept.push((zone, ProximityEffects::new(binding, self.intensity.clone())));
            }
        }
        self.effects = kept;
    }
}

// Switch off every model's bubble and pulse, newest zone first.
fn darken_models(
    effects: &mut SmallVec<[(usize, ProximityEffects); 2]>,
    registry: &mut dyn EffectRegistry,
) {
    for (_, model) in effects.iter_mut().rev() {
        model.clear(registry);
    }
    effects.clear();
}
