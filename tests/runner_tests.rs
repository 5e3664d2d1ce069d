use bound_together::constants::*;
use bound_together::runner::{RunnerActor, RunnerConfig};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use zone_core::Positioned;

const DT: f32 = 1.0 / 60.0;

fn runner_at(x: f32, seed: u64) -> RunnerActor {
    let mut rng = StdRng::seed_from_u64(seed);
    RunnerActor::new(Vec3::new(x, 0.0, 0.0), RunnerConfig::default(), &mut rng)
}

#[test]
fn spawn_speed_varies_within_bounds() {
    for seed in 0..50 {
        let r = runner_at(0.0, seed);
        assert!(r.forward_speed() >= FORWARD_SPEED - FORWARD_SPEED_VARIATION);
        assert!(r.forward_speed() <= FORWARD_SPEED + FORWARD_SPEED_VARIATION);
    }
    // Same seed, same runner.
    assert_eq!(runner_at(0.0, 7).forward_speed(), runner_at(0.0, 7).forward_speed());
}

#[test]
fn governor_speeds_up_when_far_and_slows_when_near() {
    let mut r = runner_at(0.0, 1);
    for _ in 0..100 {
        r.govern_speed(Vec3::new(50.0, 0.0, 0.0));
    }
    assert!((r.forward_speed() - (FORWARD_SPEED + FORWARD_SPEED_VARIATION)).abs() < 1e-5);
    for _ in 0..100 {
        r.govern_speed(Vec3::new(0.5, 0.0, 0.0));
    }
    assert!((r.forward_speed() - (FORWARD_SPEED - FORWARD_SPEED_VARIATION)).abs() < 1e-5);

    let before = r.forward_speed();
    r.govern_speed(Vec3::new(3.0, 0.0, 0.0));
    assert_eq!(r.forward_speed(), before);
}

#[test]
fn idle_runners_drift_apart() {
    let mut left = runner_at(-1.0, 2);
    let mut right = runner_at(1.0, 3);
    for _ in 0..60 {
        let (l, r) = (left.position, right.position);
        left.advance(DT, r);
        right.advance(DT, l);
    }
    assert!(left.position.x < -1.0);
    assert!(right.position.x > 1.0);
    assert!(left.position.z > 0.0 && right.position.z > 0.0);
}

#[test]
fn steering_overrides_drift() {
    let mut r = runner_at(-5.0, 4);
    r.set_steer(1.0);
    assert!(r.is_steering());
    for _ in 0..60 {
        r.advance(DT, Vec3::new(5.0, 0.0, 0.0));
    }
    // Smoothing costs a little distance at the start of the second.
    assert!(r.position.x > -5.0 + MOVE_SPEED * 0.8);
    assert!(r.position.x < -5.0 + MOVE_SPEED);

    r.set_steer(7.0);
    r.set_steer(0.0);
    assert!(!r.is_steering());
}

#[test]
fn runner_feeds_positions() {
    let r = runner_at(2.0, 5);
    assert_eq!(r.position(), Some(Vec3::new(2.0, 0.0, 0.0)));
}
