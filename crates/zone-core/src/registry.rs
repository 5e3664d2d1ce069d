//! The seam between the core and whatever actually renders effects.
//!
//! The core only decides which named handles are lit and what scalar
//! parameters they carry. A collaborator that does not know a handle answers
//! with `EffectError::MissingCollaborator`; the core logs it and moves on.

use fnv::FnvHashMap;
use glam::Vec3;

use crate::error::EffectError;
use crate::timeline::Ambient;

pub trait EffectRegistry {
    fn activate(&mut self, handle: &str) -> Result<(), EffectError>;
    fn deactivate(&mut self, handle: &str) -> Result<(), EffectError>;
    fn set_scale(&mut self, handle: &str, scale: f32) -> Result<(), EffectError>;
    fn set_alpha(&mut self, handle: &str, alpha: f32) -> Result<(), EffectError>;
    fn set_emission_rate(&mut self, handle: &str, rate: f32) -> Result<(), EffectError>;
    fn set_position(&mut self, handle: &str, position: Vec3) -> Result<(), EffectError>;

    /// Scene-wide lighting; collaborators without an environment may ignore it.
    fn set_ambient(&mut self, _ambient: Ambient) {}
}

/// Toggle a handle, absorbing a missing collaborator.
pub(crate) fn switch(registry: &mut dyn EffectRegistry, handle: &str, on: bool) {
    let result = if on {
        registry.activate(handle)
    } else {
        registry.deactivate(handle)
    };
    if let Err(err) = result {
        log::warn!("[effects] {err}; skipping");
    }
}

/// Absorb a failed parameter push. These happen every tick, so stay quiet.
pub(crate) fn absorb(result: Result<(), EffectError>) {
    if let Err(err) = result {
        log::debug!("[effects] {err}");
    }
}

/// One observable call made against a `RecordingRegistry`.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectCall {
    Activate(String),
    Deactivate(String),
    SetScale(String, f32),
    SetAlpha(String, f32),
    SetEmissionRate(String, f32),
    SetPosition(String, Vec3),
    SetAmbient(Ambient),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandleState {
    pub active: bool,
    pub scale: f32,
    pub alpha: f32,
    pub emission_rate: f32,
    pub position: Vec3,
}

/// In-memory registry that keeps the current state of every known handle and
/// an ordered log of the calls it received.
///
/// Parameter setters are only logged when `with_param_log` is used; toggles
/// and ambient changes are always logged.
#[derive(Clone, Debug, Default)]
pub struct RecordingRegistry {
    handles: FnvHashMap<String, HandleState>,
    calls: Vec<EffectCall>,
    log_params: bool,
    ambient: Option<Ambient>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handles<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for name in names {
            registry.register(name);
        }
        registry
    }

    pub fn with_param_log(mut self) -> Self {
        self.log_params = true;
        self
    }

    pub fn register(&mut self, name: impl Into<String>) {
        self.handles.entry(name.into()).or_default();
    }

    pub fn handle(&self, name: &str) -> Option<&HandleState> {
        self.handles.get(name)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.handles.get(name).is_some_and(|h| h.active)
    }

    /// Names of every lit handle, sorted.
    pub fn active_handles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .handles
            .iter()
            .filter(|(_, h)| h.active)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn calls(&self) -> &[EffectCall] {
        &self.calls
    }

    /// Only the activate/deactivate calls, in order.
    pub fn toggles(&self) -> impl Iterator<Item = &EffectCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, EffectCall::Activate(_) | EffectCall::Deactivate(_)))
    }

    pub fn activation_count(&self, name: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, EffectCall::Activate(n) if n == name))
            .count()
    }

    pub fn ambient(&self) -> Option<Ambient> {
        self.ambient
    }

    pub fn clear_log(&mut self) {
        self.calls.clear();
    }

    fn entry(&mut self, handle: &str) -> Result<&mut HandleState, EffectError> {
        self.handles
            .get_mut(handle)
            .ok_or_else(|| EffectError::MissingCollaborator {
                handle: handle.to_string(),
            })
    }

    fn set_param(
        &mut self,
        handle: &str,
        call: EffectCall,
        apply: impl FnOnce(&mut HandleState),
    ) -> Result<(), EffectError> {
        apply(self.entry(handle)?);
        if self.log_params {
            self.calls.push(call);
        }
        Ok(())
    }
}

impl EffectRegistry for RecordingRegistry {
    fn activate(&mut self, handle: &str) -> Result<(), EffectError> {
        self.entry(handle)?.active = true;
        self.calls.push(EffectCall::Activate(handle.to_string()));
        Ok(())
    }

    fn deactivate(&mut self, handle: &str) -> Result<(), EffectError> {
        self.entry(handle)?.active = false;
        self.calls.push(EffectCall::Deactivate(handle.to_string()));
        Ok(())
    }

    fn set_scale(&mut self, handle: &str, scale: f32) -> Result<(), EffectError> {
        self.set_param(handle, EffectCall::SetScale(handle.to_string(), scale), |h| {
            h.scale = scale
        })
    }

    fn set_alpha(&mut self, handle: &str, alpha: f32) -> Result<(), EffectError> {
        self.set_param(handle, EffectCall::SetAlpha(handle.to_string(), alpha), |h| {
            h.alpha = alpha
        })
    }

    fn set_emission_rate(&mut self, handle: &str, rate: f32) -> Result<(), EffectError> {
        self.set_param(
            handle,
            EffectCall::SetEmissionRate(handle.to_string(), rate),
            |h| h.emission_rate = rate,
        )
    }

    fn set_position(&mut self, handle: &str, position: Vec3) -> Result<(), EffectError> {
        self.set_param(
            handle,
            EffectCall::SetPosition(handle.to_string(), position),
            |h| h.position = position,
        )
    }

    fn set_ambient(&mut self, ambient: Ambient) {
        self.ambient = Some(ambient);
        self.calls.push(EffectCall::SetAmbient(ambient));
    }
}
