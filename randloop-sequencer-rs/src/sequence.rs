//! Fixed-capacity step storage.
//!
//! [`SequenceStore`] holds [`MAX_STEPS`] CV/gate pairs and an independent
//! active length. Slots at or beyond the active length keep whatever they
//! last held; they are simply not visited during playback. Shrinking and
//! re-growing the loop therefore brings old steps back unchanged.

use crate::error::ConfigError;
use crate::scale::ScaleTable;

/// Number of step slots in the store.
pub const MAX_STEPS: usize = 16;

/// Shortest loop the menu allows.
pub const MIN_STEPS: usize = 2;

/// CV and gate arrays plus the active loop length.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceStore {
    cv: [u16; MAX_STEPS],
    gate: [bool; MAX_STEPS],
    active_length: usize,
}

impl SequenceStore {
    /// Create a store filled with the scale root and every gate on.
    ///
    /// The active length starts at [`MAX_STEPS`].
    pub fn new(scale: &ScaleTable) -> Self {
        let mut store = Self {
            cv: [0; MAX_STEPS],
            gate: [true; MAX_STEPS],
            active_length: MAX_STEPS,
        };
        store.initialize_default(scale);
        store
    }

    /// Reset every slot: CV to `scale[0]`, gate on.
    ///
    /// The active length is left untouched.
    pub fn initialize_default(&mut self, scale: &ScaleTable) {
        self.cv = [scale.root(); MAX_STEPS];
        self.gate = [true; MAX_STEPS];
    }

    /// Read a slot as `(cv, gate)`. Returns `None` past [`MAX_STEPS`].
    pub fn get(&self, step: usize) -> Option<(u16, bool)> {
        if step >= MAX_STEPS {
            return None;
        }
        Some((self.cv[step], self.gate[step]))
    }

    /// CV code of a slot, or `None` past [`MAX_STEPS`].
    pub fn cv(&self, step: usize) -> Option<u16> {
        self.cv.get(step).copied()
    }

    /// Gate value of a slot, or `None` past [`MAX_STEPS`].
    pub fn gate(&self, step: usize) -> Option<bool> {
        self.gate.get(step).copied()
    }

    /// Overwrite a slot's CV code.
    pub fn set_cv(&mut self, step: usize, value: u16) -> Result<(), ConfigError> {
        let slot = self
            .cv
            .get_mut(step)
            .ok_or(ConfigError::StepOutOfRange(step))?;
        *slot = value;
        Ok(())
    }

    /// Overwrite a slot's gate value.
    pub fn set_gate(&mut self, step: usize, value: bool) -> Result<(), ConfigError> {
        let slot = self
            .gate
            .get_mut(step)
            .ok_or(ConfigError::StepOutOfRange(step))?;
        *slot = value;
        Ok(())
    }

    /// Force a slot's CV back to `reset` (CV erase mode).
    pub fn erase_cv(&mut self, step: usize, reset: u16) -> Result<(), ConfigError> {
        self.set_cv(step, reset)
    }

    /// Force a slot's gate back to `reset` (gate erase mode).
    pub fn erase_gate(&mut self, step: usize, reset: bool) -> Result<(), ConfigError> {
        self.set_gate(step, reset)
    }

    /// Number of steps in the playback loop.
    pub fn active_length(&self) -> usize {
        self.active_length
    }

    /// Set the loop length, clamped to `MIN_STEPS..=MAX_STEPS`.
    pub fn set_active_length(&mut self, length: usize) {
        self.active_length = length.clamp(MIN_STEPS, MAX_STEPS);
    }

    /// All CV codes, including slots outside the active loop.
    pub fn cv_slots(&self) -> &[u16; MAX_STEPS] {
        &self.cv
    }

    /// All gate values, including slots outside the active loop.
    pub fn gate_slots(&self) -> &[bool; MAX_STEPS] {
        &self.gate
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
