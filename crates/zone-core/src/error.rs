use thiserror::Error;

/// Failures surfaced to callers of the zone timeline and state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    #[error("zone index {index} out of range (timeline has {len} zones)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("a zone timeline needs at least one zone")]
    EmptyTimeline,
    #[error("zone {index} has a zero duration")]
    InvalidDuration { index: usize },
}

/// Failures reported by an effect collaborator.
///
/// These never leave the core: visual effects are non-critical, so a missing
/// handle is logged and that single effect is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("effect handle `{handle}` is not registered")]
    MissingCollaborator { handle: String },
}
