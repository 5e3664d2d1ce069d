//! Title-screen gate: the runners are drawn together, the prompt fades in
//! once they touch, and accepting it starts the session after a short outro.

use glam::Vec3;
use zone_core::FadeState;

use crate::constants::*;
use crate::runner::RunnerActor;

#[derive(Clone, Debug)]
pub struct StartGateConfig {
    pub proximity_threshold: f32,
    pub magnetic_range_factor: f32,
    pub magnetic_pull_strength: f32,
    pub prompt_fade_sec: f32,
    pub start_delay_sec: f32,
}

impl Default for StartGateConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: START_PROXIMITY_THRESHOLD,
            magnetic_range_factor: MAGNETIC_RANGE_FACTOR,
            magnetic_pull_strength: MAGNETIC_PULL_STRENGTH,
            prompt_fade_sec: PROMPT_FADE_SEC,
            start_delay_sec: START_DELAY_SEC,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateState {
    /// Waiting for the runners to touch.
    Waiting,
    /// Prompt shown; the start command is accepted.
    Ready,
    /// Start accepted; prompt fading out, then a short pause.
    Starting { delay_left: f32 },
    Started,
}

pub struct StartGate {
    pub config: StartGateConfig,
    state: GateState,
    prompt: FadeState,
}

impl StartGate {
    pub fn new(config: StartGateConfig) -> Self {
        Self {
            config,
            state: GateState::Waiting,
            prompt: FadeState::new(0.0, 0.0, 0.0),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn prompt_alpha(&self) -> f32 {
        self.prompt.value()
    }

    /// Accept the start command. Returns false if the prompt is not up yet
    /// or the game is already on its way.
    pub fn request_start(&mut self) -> bool {
        if self.state != GateState::Ready {
            log::debug!("[gate] start ignored in {:?}", self.state);
            return false;
        }
        self.prompt = FadeState::new(self.prompt.value(), 0.0, self.config.prompt_fade_sec);
        self.state = GateState::Starting {
            delay_left: self.config.start_delay_sec,
        };
        log::info!("[gate] start accepted");
        true
    }

    /// Advance one frame. Returns true on the single frame the session
    /// should start.
    pub fn update(&mut self, dt_sec: f32, a: &mut RunnerActor, b: &mut RunnerActor) -> bool {
        match self.state {
            GateState::Started => false,
            GateState::Starting { delay_left } => {
                // The pause only begins once the prompt is gone.
                if !self.prompt.is_done() {
                    self.prompt.advance(dt_sec);
                    return false;
                }
                let delay_left = delay_left - dt_sec;
                if delay_left > 0.0 {
                    self.state = GateState::Starting { delay_left };
                    return false;
                }
                self.state = GateState::Started;
                true
            }
            GateState::Waiting | GateState::Ready => {
                self.prompt.advance(dt_sec);
                let distance = a.position.distance(b.position);
                if distance < self.config.proximity_threshold * self.config.magnetic_range_factor {
                    let (pa, pb) = magnetic_pull(
                        a.position,
                        b.position,
                        (dt_sec * self.config.magnetic_pull_strength).min(1.0),
                    );
                    a.position = pa;
                    b.position = pb;
                }
                if self.state == GateState::Waiting && distance < self.config.proximity_threshold {
                    self.state = GateState::Ready;
                    self.prompt = FadeState::new(self.prompt.value(), 1.0, self.config.prompt_fade_sec);
                    log::info!("[gate] runners connected, prompt up");
                }
                false
            }
        }
    }
}

impl Default for StartGate {
    fn default() -> Self {
        Self::new(StartGateConfig::default())
    }
}

/// Pull both points toward each other; the second moves toward the first's
/// updated position.
pub fn magnetic_pull(a: Vec3, b: Vec3, t: f32) -> (Vec3, Vec3) {
    let a = a.lerp(b, t);
    let b = b.lerp(a, t);
    (a, b)
}
