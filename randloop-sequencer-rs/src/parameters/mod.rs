//! Sequencer parameters and change tracking.
//!
//! [`Parameters`] is the single batch of user-editable settings the
//! sequencer reads. The menu produces a fresh batch on every confirmation;
//! the sequencer diffs it against the batch currently in force and reacts
//! only to the entries that changed.
//!
//! # Parameter table
//!
//! ```text
//! Kind            Label         Range     Step  Default
//! Scale           Scale         catalogue    1  major
//! CvProbability   CVProb        0..=100      5  0
//! GateProbability TrigProb      0..=100      5  0
//! GateLength      TrgLngth%     0..=100     10  50
//! Steps           Steps         2..=16       1  16
//! Octaves         Octaves       1..=4        1  1   (bounded by start note)
//! StartNote       Start note    0..=36       1  0   (root note 12, bounded by octaves)
//! EraseCv         CvErase       off/on          off
//! EraseGate       TrigErase     off/on          off
//! TestScale       TestScale     off/on          off
//! TuningScale     TuningScale   off/on          off
//! ```
//!
//! Octaves and start note limit each other: the top of the scale, start
//! note + 12 + 12 × octaves, must not pass [`MAX_NOTE`], the highest note
//! the DAC can reach.
//!
//! # `no_std` Compatibility
//!
//! No heap allocation. Change lists are `heapless::Vec`s sized by
//! [`PARAMETER_COUNT`].

mod kind;
mod values;

pub use kind::{ParameterKind, ParameterValue, PARAMETER_COUNT};
pub use values::{ParameterChange, ParameterChanges, Parameters};

use crate::scale::{MAX_NOTE, MAX_OCTAVES, MIN_OCTAVES, SEMITONES_PER_OCTAVE};

/// Offset added to the menu's start note to form the root note.
///
/// The lowest DAC octave does not track 1 V/oct accurately, so the
/// sequencer never plays below note 12.
pub const ROOT_NOTE_OFFSET: u8 = 12;

/// Highest selectable start note, before [`ROOT_NOTE_OFFSET`] is applied.
pub const MAX_START_NOTE: u8 = 36;

/// Default gate length as a percentage of the measured clock period.
pub const DEFAULT_GATE_LENGTH: u8 = 50;

/// Most octaves that fit above `start_note` without leaving the DAC range.
///
/// Never below [`MIN_OCTAVES`].
pub fn max_octaves(start_note: u8) -> u8 {
    let root = start_note.min(MAX_START_NOTE) + ROOT_NOTE_OFFSET;
    (MAX_NOTE.saturating_sub(root) / SEMITONES_PER_OCTAVE).clamp(MIN_OCTAVES, MAX_OCTAVES)
}

/// Highest start note whose scale of `octaves` octaves stays in the DAC
/// range.
pub fn max_start_note(octaves: u8) -> u8 {
    let span = SEMITONES_PER_OCTAVE * octaves.clamp(MIN_OCTAVES, MAX_OCTAVES);
    MAX_NOTE
        .saturating_sub(ROOT_NOTE_OFFSET + span)
        .min(MAX_START_NOTE)
}
