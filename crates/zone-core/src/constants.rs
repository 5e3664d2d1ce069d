use std::time::Duration;

// Shared zone/proximity tuning constants used by the core and the front-end.

// Zone progression
pub const DEFAULT_ZONE_COUNT: usize = 6;
pub const DEFAULT_ZONE_DURATION: Duration = Duration::from_secs(15); // time before switching zones
pub const AMBIENT_BLEND_SEC: f32 = 1.0; // ambient colour cross-fade on zone entry

// Proximity metric
pub const MIN_DISTANCE: f32 = 2.0; // at or inside this, normalized distance is 0
pub const MAX_DISTANCE: f32 = 4.0; // trail intensity falls off toward this
pub const PROXIMITY_RANGE: f32 = 3.0; // at or beyond this, normalized distance is 1
pub const EXIT_HYSTERESIS: f32 = 1.1; // bubble fades out only past range * this

// Proximity bubble
pub const BUBBLE_FADE_SEC: f32 = 0.5; // fade-in and fade-out duration
pub const BUBBLE_MIN_SCALE: f32 = 1.0; // bubble size when at the edge of range
pub const BUBBLE_MAX_SCALE: f32 = 5.0; // bubble size when touching
pub const BUBBLE_MAX_EMISSION: f32 = 10.0; // emission when touching, falls to 0 at range
pub const BUBBLE_SCALE_RATE: f32 = 5.0; // exponential approach rate (per second)

// Energy pulse
pub const PULSE_THRESHOLD: f32 = 0.2; // pulse is lit while closeness exceeds this
pub const PULSE_MIN_SIZE: f32 = 0.5;
pub const PULSE_MAX_SIZE: f32 = 2.0;
pub const PULSE_MIN_ALPHA: f32 = 0.1;
pub const PULSE_MAX_ALPHA: f32 = 1.0;

// Trails
pub const TRAIL_MIN_WIDTH: f32 = 0.1;
pub const TRAIL_MAX_WIDTH: f32 = 0.5;
pub const TRAIL_NEAR_ALPHA: f32 = 0.2; // opacity when close (trail thins out visually)
pub const TRAIL_FAR_ALPHA: f32 = 1.0;

// Background particles
pub const BACKGROUND_MIN_EMISSION: f32 = 5.0;
pub const BACKGROUND_MAX_EMISSION: f32 = 50.0;
pub const BACKGROUND_EMISSION_RATE: f32 = 5.0; // exponential approach rate (per second)
