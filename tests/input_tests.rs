// Host-side tests for key bindings.

use bound_together::input::*;

#[test]
fn digit_keys_select_zones() {
    for (i, key) in ["1", "2", "3", "4", "5", "6"].iter().enumerate() {
        assert_eq!(zone_for_digit(key), Some(i));
        assert_eq!(command_for_key(key), Some(Command::SelectZone(i)));
    }
}

#[test]
fn other_digits_are_unbound() {
    for key in ["0", "7", "8", "9", "10", ""] {
        assert_eq!(zone_for_digit(key), None, "{key:?}");
        assert_eq!(command_for_key(key), None, "{key:?}");
    }
}

#[test]
fn enter_starts_the_game() {
    assert_eq!(command_for_key("Enter"), Some(Command::StartGame));
    assert_eq!(command_for_key("Return"), Some(Command::StartGame));
    assert_eq!(command_for_key("enter"), None);
}

#[test]
fn steering_keys_map_to_their_runner() {
    assert_eq!(steer_for_key("a"), Some((Runner::Sphere, -1.0)));
    assert_eq!(steer_for_key("D"), Some((Runner::Sphere, 1.0)));
    assert_eq!(steer_for_key("ArrowLeft"), Some((Runner::Cube, -1.0)));
    assert_eq!(steer_for_key("ArrowRight"), Some((Runner::Cube, 1.0)));
    assert_eq!(steer_for_key("w"), None);
    assert_eq!(
        command_for_key("ArrowRight"),
        Some(Command::Steer {
            runner: Runner::Cube,
            direction: 1.0
        })
    );
}
