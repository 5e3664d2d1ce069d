// Zone progression: timer, manual selection, ordering and carry-over.

use std::time::Duration;
use zone_core::*;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn six_zones() -> ZoneTimeline {
    ZoneTimeline::uniform(6, secs(15)).expect("valid timeline")
}

fn machine_with_registry(timeline: ZoneTimeline) -> (ZoneStateMachine, RecordingRegistry) {
    let registry = RecordingRegistry::with_handles(timeline.handles());
    (ZoneStateMachine::new(timeline), registry)
}

fn position_of(calls: &[EffectCall], wanted: &EffectCall) -> usize {
    calls
        .iter()
        .position(|c| c == wanted)
        .unwrap_or_else(|| panic!("missing call {wanted:?}"))
}

#[test]
fn nothing_runs_before_start() {
    let (mut machine, mut registry) = machine_with_registry(six_zones());
    for _ in 0..100 {
        assert!(machine.tick(secs(1), &mut registry).is_none());
    }
    assert_eq!(machine.phase(), ZonePhase::NotStarted);
    assert!(registry.calls().is_empty());
}

#[test]
fn exactly_one_transition_when_ticks_sum_to_duration() {
    let steps = [
        vec![secs(15)],
        vec![secs(4), secs(5), secs(3), secs(2), secs(1)],
        vec![Duration::from_millis(2500); 6],
        vec![Duration::ZERO, secs(10), Duration::ZERO, secs(5)],
    ];
    for dts in steps {
        let (mut machine, mut registry) = machine_with_registry(six_zones());
        machine.start_game(&mut registry);
        let changes: Vec<bool> = dts
            .iter()
            .map(|&dt| machine.tick(dt, &mut registry).is_some())
            .collect();
        let last = changes.len() - 1;
        for (i, changed) in changes.iter().enumerate() {
            assert_eq!(*changed, i == last, "sequence {dts:?} changed at tick {i}");
        }
        assert_eq!(machine.current_zone_index(), 1);
        assert_eq!(machine.remaining(), secs(15));
    }
}

#[test]
fn transition_happens_on_first_tick_reaching_duration() {
    let (mut machine, mut registry) = machine_with_registry(six_zones());
    machine.start_game(&mut registry);
    // 4 + 4 + 4 = 12 < 15, the fourth tick overshoots.
    for _ in 0..3 {
        assert!(machine.tick(secs(4), &mut registry).is_none());
    }
    let change = machine.tick(secs(4), &mut registry).expect("transition");
    assert_eq!(change.from, Some(0));
    assert_eq!(change.to, 1);
    assert_eq!(change.cause, ZoneChangeCause::Timer);
    // Overshoot is dropped; the new zone gets its full duration.
    assert_eq!(machine.remaining(), secs(15));
}

#[test]
fn invalid_selection_leaves_state_unchanged() {
    let (mut machine, mut registry) = machine_with_registry(six_zones());
    machine.start_game(&mut registry);
    machine.tick(secs(3), &mut registry);
    let calls_before = registry.calls().len();

    for bad in [6, 7, 100, usize::MAX] {
        let err = machine.select_zone(bad, &mut registry).unwrap_err();
        assert_eq!(err, ZoneError::IndexOutOfRange { index: bad, len: 6 });
    }
    assert_eq!(machine.current_zone_index(), 0);
    assert_eq!(machine.remaining(), secs(12));
    assert_eq!(machine.phase(), ZonePhase::Running);
    assert_eq!(registry.calls().len(), calls_before);
    assert!(registry.is_active("zone1"));
}

#[test]
fn outgoing_handles_go_dark_before_incoming_light_up() {
    let timeline = ZoneTimeline::new(vec![
        ZoneDefinition::new("first", secs(2)).with_effects(["a1", "a2"]),
        ZoneDefinition::new("second", secs(2)).with_effects(["b1", "b2"]),
        ZoneDefinition::new("third", secs(2)).with_effects(["c1"]),
    ])
    .expect("valid timeline");
    let (mut machine, mut registry) = machine_with_registry(timeline);
    machine.start_game(&mut registry);
    registry.clear_log();

    // Automatic.
    machine.tick(secs(2), &mut registry).expect("timer transition");
    let calls = registry.calls().to_vec();
    let last_off = position_of(&calls, &EffectCall::Deactivate("a1".into()))
        .max(position_of(&calls, &EffectCall::Deactivate("a2".into())));
    let first_on = position_of(&calls, &EffectCall::Activate("b1".into()))
        .min(position_of(&calls, &EffectCall::Activate("b2".into())));
    assert!(last_off < first_on, "calls out of order: {calls:?}");

    // Manual.
    registry.clear_log();
    machine.select_zone(2, &mut registry).expect("valid zone");
    let calls = registry.calls().to_vec();
    let last_off = position_of(&calls, &EffectCall::Deactivate("b1".into()))
        .max(position_of(&calls, &EffectCall::Deactivate("b2".into())));
    assert!(last_off < position_of(&calls, &EffectCall::Activate("c1".into())));
    assert_eq!(registry.active_handles(), vec!["c1"]);
}

#[test]
fn starting_twice_activates_zone_zero_once() {
    let (mut machine, mut registry) = machine_with_registry(six_zones());
    let first = machine.start_game(&mut registry).expect("first start");
    assert_eq!(first.from, None);
    assert_eq!(first.to, 0);
    assert_eq!(first.cause, ZoneChangeCause::Start);
    assert!(machine.start_game(&mut registry).is_none());
    machine.tick(secs(1), &mut registry);
    assert!(machine.start_game(&mut registry).is_none());
    assert_eq!(registry.activation_count("zone1"), 1);
    assert_eq!(machine.remaining(), secs(14));
}

#[test]
fn ninety_one_second_ticks_walk_all_six_zones() {
    let (mut machine, mut registry) = machine_with_registry(six_zones());
    machine.start_game(&mut registry);
    let mut changes = Vec::new();
    for tick in 1..=90 {
        if let Some(change) = machine.tick(secs(1), &mut registry) {
            changes.push((tick, change.to));
        }
    }
    assert_eq!(changes, vec![(15, 1), (30, 2), (45, 3), (60, 4), (75, 5)]);
    assert_eq!(machine.current_zone_index(), 5);
    assert_eq!(machine.phase(), ZonePhase::Finished);
    assert_eq!(machine.remaining(), Duration::ZERO);

    assert!(machine.tick(secs(1), &mut registry).is_none());
    assert_eq!(machine.current_zone_index(), 5);
    assert!(registry.is_active("zone6"));
}

#[test]
fn selection_after_finish_resumes_progression() {
    let (mut machine, mut registry) = machine_with_registry(six_zones());
    machine.start_game(&mut registry);
    for _ in 0..90 {
        machine.tick(secs(1), &mut registry);
    }
    assert_eq!(machine.phase(), ZonePhase::Finished);

    let change = machine.select_zone(2, &mut registry).expect("valid zone");
    assert_eq!(change.from, Some(5));
    assert_eq!(machine.phase(), ZonePhase::Running);
    assert_eq!(machine.remaining(), secs(15));
    assert!(!registry.is_active("zone6"));
    assert!(registry.is_active("zone3"));
}

#[test]
fn manual_selection_supersedes_pending_transition() {
    let (mut machine, mut registry) = machine_with_registry(six_zones());
    machine.start_game(&mut registry);
    machine.tick(secs(14), &mut registry);
    machine.select_zone(3, &mut registry).expect("valid zone");
    // The old timer would have fired here.
    assert!(machine.tick(secs(1), &mut registry).is_none());
    assert_eq!(machine.current_zone_index(), 3);
    assert_eq!(registry.activation_count("zone4"), 1);
    assert_eq!(registry.activation_count("zone2"), 0);
}

#[test]
fn selecting_before_start_starts_at_that_zone() {
    let (mut machine, mut registry) = machine_with_registry(six_zones());
    let change = machine.select_zone(4, &mut registry).expect("valid zone");
    assert_eq!(change.from, None);
    assert_eq!(machine.phase(), ZonePhase::Running);
    assert_eq!(machine.current_zone_index(), 4);
    assert!(machine.start_game(&mut registry).is_none());
    assert_eq!(registry.activation_count("zone1"), 0);
}

#[test]
fn reselecting_current_zone_restarts_it() {
    let (mut machine, mut registry) = machine_with_registry(six_zones());
    machine.start_game(&mut registry);
    machine.tick(secs(10), &mut registry);
    machine.select_zone(0, &mut registry).expect("valid zone");
    assert_eq!(machine.remaining(), secs(15));
    assert_eq!(registry.activation_count("zone1"), 2);
    assert!(registry.is_active("zone1"));
}

#[test]
fn carry_over_keeps_predecessor_effects_lit() {
    let timeline = default_zones();
    let (mut machine, mut registry) = machine_with_registry(timeline);
    machine.select_zone(4, &mut registry).expect("valid zone");
    registry.clear_log();

    let change = machine.tick(DEFAULT_ZONE_DURATION, &mut registry).expect("transition");
    assert_eq!(change.to, 5);
    assert!(change.carried);
    assert_eq!(machine.lit_zones(), &[4, 5]);
    assert!(registry
        .toggles()
        .all(|c| matches!(c, EffectCall::Activate(_))));
    for handle in ["zone5MovingLines", "zone5CubeTrail", "zone6OrbitingCircle", "zone6"] {
        assert!(registry.is_active(handle), "{handle} should be lit");
    }

    // Leaving the finale darkens both zones.
    machine.select_zone(0, &mut registry).expect("valid zone");
    assert_eq!(machine.lit_zones(), &[0]);
    assert_eq!(registry.active_handles(), vec!["zone1"]);
}

#[test]
fn carry_over_only_applies_from_the_predecessor() {
    let (mut machine, mut registry) = machine_with_registry(default_zones());
    machine.select_zone(2, &mut registry).expect("valid zone");
    let change = machine.select_zone(5, &mut registry).expect("valid zone");
    assert!(!change.carried);
    assert!(!registry.is_active("zone3MovingLines"));
    assert_eq!(machine.lit_zones(), &[5]);
}

#[test]
fn before_darken_runs_only_when_lit_zones_go_dark() {
    let (mut machine, mut registry) = machine_with_registry(default_zones());
    let mut darkened = 0;

    machine
        .select_zone_with(3, &mut registry, &mut |_| darkened += 1)
        .expect("valid zone");
    assert_eq!(darkened, 0);

    machine
        .select_zone_with(4, &mut registry, &mut |registry| {
            darkened += 1;
            assert!(registry.deactivate("zone4").is_ok());
        })
        .expect("valid zone");
    assert_eq!(darkened, 1);
    assert!(registry.is_active("zone5"));

    let change = machine
        .tick_with(DEFAULT_ZONE_DURATION, &mut registry, &mut |_| darkened += 1)
        .expect("transition");
    assert!(change.carried);
    assert_eq!(darkened, 1);
    assert_eq!(registry.activation_count("zone5"), 1);
}

#[test]
fn missing_handle_does_not_block_the_rest() {
    let timeline = ZoneTimeline::new(vec![
        ZoneDefinition::new("only", secs(5)).with_effects(["ghost", "real", "other"]),
    ])
    .expect("valid timeline");
    let mut registry = RecordingRegistry::with_handles(["real", "other"]);
    let mut machine = ZoneStateMachine::new(timeline);
    machine.start_game(&mut registry).expect("start");
    assert!(registry.is_active("real"));
    assert!(registry.is_active("other"));
    assert_eq!(machine.phase(), ZonePhase::Running);
}

#[test]
fn ambient_blends_over_one_second() {
    let target = Ambient {
        color: glam::Vec3::new(0.4, 0.8, 0.2),
        fog_density: 0.02,
    };
    let timeline = ZoneTimeline::new(vec![
        ZoneDefinition::new("lit", secs(10)).with_ambient(target),
    ])
    .expect("valid timeline");
    let mut registry = RecordingRegistry::new();
    let mut machine = ZoneStateMachine::new(timeline);
    machine.start_game(&mut registry);

    // Fog snaps, colour starts from black.
    let now = registry.ambient().expect("ambient pushed");
    assert!((now.fog_density - 0.02).abs() < 1e-6);
    assert_eq!(now.color, glam::Vec3::ZERO);

    machine.tick(Duration::from_millis(500), &mut registry);
    let half = machine.ambient().color;
    assert!((half - target.color * 0.5).length() < 1e-4, "half-way colour {half:?}");

    machine.tick(Duration::from_millis(500), &mut registry);
    assert!((machine.ambient().color - target.color).length() < 1e-5);
    assert_eq!(registry.ambient(), Some(machine.ambient()));
}

#[test]
fn shutdown_darkens_everything() {
    let (mut machine, mut registry) = machine_with_registry(default_zones());
    machine.select_zone(4, &mut registry).expect("valid zone");
    machine.tick(DEFAULT_ZONE_DURATION, &mut registry);
    machine.shutdown(&mut registry);
    assert!(registry.active_handles().is_empty());
    assert_eq!(machine.phase(), ZonePhase::NotStarted);
    assert!(machine.lit_zones().is_empty());
    assert!(machine.start_game(&mut registry).is_some());
}
