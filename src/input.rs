//! Key bindings for the two runners and the zone cheats.

/// Which runner a steering key belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Runner {
    Sphere,
    Cube,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    StartGame,
    SelectZone(usize),
    Steer { runner: Runner, direction: f32 },
}

/// Digit keys 1-6 jump straight to zones 0-5.
#[inline]
pub fn zone_for_digit(key: &str) -> Option<usize> {
    match key {
        "1" => Some(0),
        "2" => Some(1),
        "3" => Some(2),
        "4" => Some(3),
        "5" => Some(4),
        "6" => Some(5),
        _ => None,
    }
}

#[inline]
pub fn steer_for_key(key: &str) -> Option<(Runner, f32)> {
    match key {
        "a" | "A" => Some((Runner::Sphere, -1.0)),
        "d" | "D" => Some((Runner::Sphere, 1.0)),
        "ArrowLeft" => Some((Runner::Cube, -1.0)),
        "ArrowRight" => Some((Runner::Cube, 1.0)),
        _ => None,
    }
}

pub fn command_for_key(key: &str) -> Option<Command> {
    if matches!(key, "Enter" | "Return") {
        return Some(Command::StartGame);
    }
    if let Some(zone) = zone_for_digit(key) {
        return Some(Command::SelectZone(zone));
    }
    steer_for_key(key).map(|(runner, direction)| Command::Steer { runner, direction })
}
