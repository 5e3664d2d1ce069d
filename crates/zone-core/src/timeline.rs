//! Ordered zone definitions and the index arithmetic over them.

use std::time::Duration;

use glam::Vec3;

use crate::constants::{DEFAULT_ZONE_COUNT, DEFAULT_ZONE_DURATION};
use crate::error::ZoneError;

/// Scene lighting a zone blends toward when it is entered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ambient {
    pub color: Vec3,
    pub fog_density: f32,
}

/// Handles the proximity model drives while a zone is lit.
///
/// `bubble` and `pulse` are owned by the model: list them here, not in the
/// zone's `effects`. `trails` and `background` are only modulated, so they
/// should also appear in `effects` to be switched on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProximityBinding {
    pub bubble: Option<String>,
    pub pulse: Option<String>,
    pub trails: Vec<String>,
    pub background: Option<String>,
}

impl ProximityBinding {
    pub fn with_bubble(mut self, bubble: impl Into<String>) -> Self {
        self.bubble = Some(bubble.into());
        self
    }

    pub fn with_pulse(mut self, pulse: impl Into<String>) -> Self {
        self.pulse = Some(pulse.into());
        self
    }

    pub fn with_trails<I, S>(mut self, trails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trails = trails.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    /// Every handle name this binding touches.
    pub fn handles(&self) -> impl Iterator<Item = &str> {
        self.bubble
            .as_deref()
            .into_iter()
            .chain(self.pulse.as_deref())
            .chain(self.trails.iter().map(String::as_str))
            .chain(self.background.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ZoneDefinition {
    pub name: String,
    /// Handles switched on when the zone is entered, in this order.
    pub effects: Vec<String>,
    pub duration: Duration,
    /// Keep the predecessor's effects lit when entered from it.
    pub carry_over: bool,
    pub proximity: Option<ProximityBinding>,
    pub ambient: Option<Ambient>,
}

impl ZoneDefinition {
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            effects: Vec::new(),
            duration,
            carry_over: false,
            proximity: None,
            ambient: None,
        }
    }

    pub fn with_effects<I, S>(mut self, effects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.effects = effects.into_iter().map(Into::into).collect();
        self
    }

    pub fn carrying_over(mut self) -> Self {
        self.carry_over = true;
        self
    }

    pub fn with_proximity(mut self, binding: ProximityBinding) -> Self {
        self.proximity = Some(binding);
        self
    }

    pub fn with_ambient(mut self, ambient: Ambient) -> Self {
        self.ambient = Some(ambient);
        self
    }
}

#[derive(Clone, Debug)]
pub struct ZoneTimeline {
    zones: Vec<ZoneDefinition>,
}

impl ZoneTimeline {
    pub fn new(zones: Vec<ZoneDefinition>) -> Result<Self, ZoneError> {
        if zones.is_empty() {
            return Err(ZoneError::EmptyTimeline);
        }
        if let Some(index) = zones.iter().position(|z| z.duration.is_zero()) {
            return Err(ZoneError::InvalidDuration { index });
        }
        Ok(Self { zones })
    }

    /// `count` zones of equal length, each lighting a single root handle
    /// named `zone1`, `zone2`, ...
    pub fn uniform(count: usize, duration: Duration) -> Result<Self, ZoneError> {
        let zones = (1..=count)
            .map(|n| {
                ZoneDefinition::new(format!("zone{n}"), duration).with_effects([format!("zone{n}")])
            })
            .collect();
        Self::new(zones)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Always false for a constructed timeline.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ZoneDefinition> {
        self.zones.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneDefinition> {
        self.zones.iter()
    }

    /// The zone after `current`, or `None` at the end of the timeline.
    pub fn next(&self, current: usize) -> Option<usize> {
        let next = current.checked_add(1)?;
        (next < self.zones.len()).then_some(next)
    }

    pub fn jump(&self, index: usize) -> Result<usize, ZoneError> {
        if index < self.zones.len() {
            Ok(index)
        } else {
            Err(ZoneError::IndexOutOfRange {
                index,
                len: self.zones.len(),
            })
        }
    }

    /// Every handle name any zone references, deduplicated, in first-seen order.
    pub fn handles(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for zone in &self.zones {
            let bound = zone.proximity.iter().flat_map(|p| p.handles());
            for name in zone.effects.iter().map(String::as_str).chain(bound) {
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
        }
        seen
    }
}

/// The six-zone progression of the game: plain run, moving lines, trails,
/// proximity bubble, coloured background, then an orbiting finale that keeps
/// the fifth zone's effects alive.
pub fn default_zones() -> ZoneTimeline {
    let d = DEFAULT_ZONE_DURATION;
    let zones = vec![
        ZoneDefinition::new("zone1", d)
            .with_effects(["zone1"])
            .with_ambient(ambient(0.55, 0.55, 0.6, 0.005)),
        ZoneDefinition::new("zone2", d)
            .with_effects(["zone2", "zone2MovingLines"])
            .with_ambient(ambient(0.45, 0.45, 0.6, 0.01)),
        ZoneDefinition::new("zone3", d)
            .with_effects(["zone3", "zone3MovingLines", "zone3CubeTrail", "zone3SphereTrail"])
            .with_proximity(
                ProximityBinding::default().with_trails(["zone3CubeTrail", "zone3SphereTrail"]),
            )
            .with_ambient(ambient(0.35, 0.3, 0.55, 0.015)),
        ZoneDefinition::new("zone4", d)
            .with_effects(["zone4", "zone4MovingLines", "zone4CubeTrail", "zone4SphereTrail"])
            .with_proximity(
                ProximityBinding::default()
                    .with_bubble("zone4ProximityBubble")
                    .with_pulse("zone4ProximityPulse")
                    .with_trails(["zone4CubeTrail", "zone4SphereTrail"]),
            )
            .with_ambient(ambient(0.25, 0.2, 0.45, 0.02)),
        ZoneDefinition::new("zone5", d)
            .with_effects([
                "zone5",
                "zone5MovingLines",
                "zone5CubeTrail",
                "zone5SphereTrail",
                "zone5ColoredBackgroundParticles",
            ])
            .with_proximity(
                ProximityBinding::default()
                    .with_bubble("zone5ProximityBubble")
                    .with_pulse("zone5ProximityPulse")
                    .with_trails(["zone5CubeTrail", "zone5SphereTrail"])
                    .with_background("zone5ColoredBackgroundParticles"),
            )
            .with_ambient(ambient(0.2, 0.1, 0.3, 0.025)),
        ZoneDefinition::new("zone6", d)
            .with_effects([
                "zone6",
                "zone6MovingLines",
                "zone6CubeTrail",
                "zone6SphereTrail",
                "zone6OrbitingCircle",
                "zone6BackgroundParticles",
            ])
            .carrying_over()
            .with_ambient(ambient(0.1, 0.05, 0.2, 0.03)),
    ];
    debug_assert_eq!(zones.len(), DEFAULT_ZONE_COUNT);
    ZoneTimeline { zones }
}

fn ambient(r: f32, g: f32, b: f32, fog_density: f32) -> Ambient {
    Ambient {
        color: Vec3::new(r, g, b),
        fog_density,
    }
}
