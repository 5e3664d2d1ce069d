use glam::Vec3;

// Runner and start-screen tuning used by the headless front-end.

// Runner motion
pub const MOVE_SPEED: f32 = 5.0; // lateral speed at full steering input
pub const FORWARD_SPEED: f32 = 10.0; // base auto-forward speed
pub const FORWARD_SPEED_VARIATION: f32 = 1.0; // per-runner random offset and governor clamp
pub const SMOOTH_TIME: f32 = 0.1; // lateral velocity smoothing (seconds)
pub const DISTANCE_SPEED_STEP: f32 = 0.1; // forward speed change per tick when too near/far

// Spawn points
pub const SPHERE_START: Vec3 = Vec3::new(-5.0, 0.0, 0.0);
pub const CUBE_START: Vec3 = Vec3::new(5.0, 0.0, 0.0);

// Start screen
pub const START_PROXIMITY_THRESHOLD: f32 = 1.0; // runners must be this close to "connect"
pub const MAGNETIC_RANGE_FACTOR: f32 = 3.0; // pull starts at threshold * this
pub const MAGNETIC_PULL_STRENGTH: f32 = 2.0;
pub const PROMPT_FADE_SEC: f32 = 1.5; // prompt fade-in and fade-out
pub const START_DELAY_SEC: f32 = 0.5; // pause between prompt fade-out and zone 1

// Driver
pub const TIMESTEP_HZ: u32 = 60;
pub const DEFAULT_RUN_SECS: u64 = 100;
pub const DEFAULT_SEED: u64 = 42;
