use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use zone_core::{
    RecordingRegistry, Session, SessionConfig, ZoneChange, ZonePhase, ZoneTimeline,
};

use crate::constants::*;
use crate::input::{command_for_key, Command, Runner};
use crate::runner::{RunnerActor, RunnerConfig};
use crate::start_gate::{GateState, StartGate, StartGateConfig};

#[derive(Clone, Debug)]
pub struct SimConfig {
    pub timestep: Duration,
    pub run_for: Duration,
    pub seed: u64,
    pub session: SessionConfig,
    pub runner: RunnerConfig,
    pub gate: StartGateConfig,
    /// Steer the runners automatically instead of from steering keys.
    pub autopilot: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timestep: Duration::from_secs(1) / TIMESTEP_HZ,
            run_for: Duration::from_secs(DEFAULT_RUN_SECS),
            seed: DEFAULT_SEED,
            session: SessionConfig::default(),
            runner: RunnerConfig::default(),
            gate: StartGateConfig::default(),
            autopilot: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedKey {
    pub at: Duration,
    pub key: String,
    pub pressed: bool,
}

impl ScriptedKey {
    pub fn press(at_secs: f32, key: &str) -> Self {
        Self {
            at: Duration::from_secs_f32(at_secs),
            key: key.to_string(),
            pressed: true,
        }
    }

    pub fn release(at_secs: f32, key: &str) -> Self {
        Self {
            pressed: false,
            ..Self::press(at_secs, key)
        }
    }
}

/// Press Enter once the runners have met, then try two zone cheats.
pub fn default_script() -> Vec<ScriptedKey> {
    vec![
        ScriptedKey::press(3.0, "Enter"),
        ScriptedKey::release(3.1, "Enter"),
        // Again, in case the runners had not met yet.
        ScriptedKey::press(6.0, "Enter"),
        ScriptedKey::release(6.1, "Enter"),
        ScriptedKey::press(40.0, "5"),
        ScriptedKey::release(40.1, "5"),
        ScriptedKey::press(55.0, "3"),
        ScriptedKey::release(55.1, "3"),
    ]
}

/// Keeps the runners' lateral separation near a target that breathes in and
/// out, so proximity effects get entered and left.
#[derive(Clone, Debug)]
pub struct Autopilot {
    pub resting: f32,
    pub swing: f32,
    pub period_sec: f32,
    pub approach: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            resting: 2.5,
            swing: 2.0,
            period_sec: 12.0,
            approach: 0.5,
        }
    }
}

impl Autopilot {
    pub fn target_separation(&self, t_sec: f32, started: bool) -> f32 {
        if !started {
            return self.approach;
        }
        let phase = t_sec / self.period_sec * std::f32::consts::TAU;
        (self.resting + self.swing * phase.sin()).max(0.0)
    }

    /// Steering for (sphere, cube). Positive separation means the cube is to
    /// the right of the sphere.
    pub fn steer(&self, separation: f32, target: f32) -> (f32, f32) {
        let err = separation - target;
        let input = (err * 0.5).clamp(-1.0, 1.0);
        (input, -input)
    }
}

#[derive(Clone, Debug)]
pub struct SimSummary {
    pub elapsed: Duration,
    pub final_zone: usize,
    pub phase: ZonePhase,
    pub transitions: Vec<ZoneChange>,
    pub toggles: usize,
    pub active_handles: Vec<String>,
}

pub struct Simulation {
    pub config: SimConfig,
    pub session: Session,
    pub registry: RecordingRegistry,
    pub sphere: RunnerActor,
    pub cube: RunnerActor,
    pub gate: StartGate,
    autopilot: Option<Autopilot>,
    script: VecDeque<ScriptedKey>,
    clock: Duration,
    transitions: Vec<ZoneChange>,
}

impl Simulation {
    pub fn new(config: SimConfig, timeline: ZoneTimeline, mut script: Vec<ScriptedKey>) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let sphere = RunnerActor::new(SPHERE_START, config.runner.clone(), &mut rng);
        let cube = RunnerActor::new(CUBE_START, config.runner.clone(), &mut rng);
        let mut registry = RecordingRegistry::with_handles(timeline.handles());
        let mut session = Session::new(timeline, config.session.clone());
        session.init(&mut registry);
        registry.clear_log();
        script.sort_by_key(|k| k.at);
        Self {
            gate: StartGate::new(config.gate.clone()),
            autopilot: config.autopilot.then(Autopilot::default),
            config,
            session,
            registry,
            sphere,
            cube,
            script: script.into(),
            clock: Duration::ZERO,
            transitions: Vec::new(),
        }
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn transitions(&self) -> &[ZoneChange] {
        &self.transitions
    }

    pub fn handle_key(&mut self, key: &str, pressed: bool) {
        let Some(command) = command_for_key(key) else {
            log::trace!("[sim] unbound key {key:?}");
            return;
        };
        match command {
            Command::StartGame if pressed => {
                self.gate.request_start();
            }
            Command::SelectZone(index) if pressed => {
                match self.session.select_zone(index, &mut self.registry) {
                    Ok(change) => self.transitions.push(change),
                    Err(err) => log::warn!("[sim] {err}"),
                }
            }
            Command::Steer { runner, direction } => {
                let input = if pressed { direction } else { 0.0 };
                match runner {
                    Runner::Sphere => self.sphere.set_steer(input),
                    Runner::Cube => self.cube.set_steer(input),
                }
            }
            _ => {}
        }
    }

    pub fn step(&mut self) -> Option<ZoneChange> {
        let dt = self.config.timestep;
        let dt_sec = dt.as_secs_f32();

        while self.script.front().is_some_and(|k| k.at <= self.clock) {
            if let Some(k) = self.script.pop_front() {
                self.handle_key(&k.key, k.pressed);
            }
        }

        if let Some(pilot) = &self.autopilot {
            let started = !matches!(self.gate.state(), GateState::Waiting | GateState::Ready);
            let target = pilot.target_separation(self.clock.as_secs_f32(), started);
            let separation = self.cube.position.x - self.sphere.position.x;
            let (sphere, cube) = pilot.steer(separation, target);
            self.sphere.set_steer(sphere);
            self.cube.set_steer(cube);
        }

        let (sphere_at, cube_at) = (self.sphere.position, self.cube.position);
        self.sphere.advance(dt_sec, cube_at);
        self.cube.advance(dt_sec, sphere_at);

        if self.gate.update(dt_sec, &mut self.sphere, &mut self.cube) {
            if let Some(change) = self.session.start_game(&mut self.registry) {
                self.transitions.push(change);
            }
        }

        let change = self
            .session
            .tick(dt, &self.sphere, &self.cube, &mut self.registry);
        if let Some(change) = change {
            self.transitions.push(change);
        }
        self.clock += dt;
        change
    }

    pub fn run(&mut self) -> SimSummary {
        while self.clock < self.config.run_for {
            self.step();
        }
        self.summary()
    }

    pub fn summary(&self) -> SimSummary {
        SimSummary {
            elapsed: self.clock,
            final_zone: self.session.current_zone_index(),
            phase: self.session.phase(),
            transitions: self.transitions.clone(),
            toggles: self.registry.toggles().count(),
            active_handles: self
                .registry
                .active_handles()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown(&mut self.registry);
    }
}
