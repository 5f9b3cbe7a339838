use heapless::Vec;

use super::kind::{ParameterKind, ParameterValue, PARAMETER_COUNT};
use super::{DEFAULT_GATE_LENGTH, MAX_START_NOTE, ROOT_NOTE_OFFSET};
use crate::error::ConfigError;
use crate::mutator::validate_probability;
use crate::scale::{
    default_pattern, ScalePattern, DAC_CODES_PER_SEMITONE, MAX_DAC_CODE, MAX_OCTAVES, MIN_OCTAVES,
    SEMITONES_PER_OCTAVE,
};
use crate::sequence::MAX_STEPS;

/// One parameter that differs between two batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterChange {
    pub kind: ParameterKind,
    /// Value after the change.
    pub value: ParameterValue,
}

/// Changes produced by [`Parameters::diff`], in menu order.
pub type ParameterChanges = Vec<ParameterChange, PARAMETER_COUNT>;

/// Complete set of user-editable sequencer settings.
///
/// [`Parameters::default()`] reproduces the power-on state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Parameters {
    /// Interval pattern used to build the scale table.
    pub scale: &'static ScalePattern,
    /// Absolute root note number (start note + [`ROOT_NOTE_OFFSET`]).
    pub root_note: u8,
    /// Octaves spanned by the scale table.
    pub octaves: u8,
    /// Steps in the playback loop.
    pub active_length: u8,
    /// Chance (percent) that a step's CV is re-rolled when it plays.
    pub cv_probability: u8,
    /// Chance (percent) that a step's gate is re-rolled when it plays.
    pub gate_probability: u8,
    /// Gate-on time as a percentage of the measured clock period.
    pub gate_length_percent: u8,
    /// Force each played step's CV back to the scale root.
    pub erase_cv: bool,
    /// Force each played step's gate back on.
    pub erase_gate: bool,
    /// Play the scale in ascending order instead of the sequence.
    pub test_mode: bool,
    /// Play the alternating tuning pattern instead of the sequence.
    pub tuning_mode: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            scale: default_pattern(),
            root_note: ROOT_NOTE_OFFSET,
            octaves: MIN_OCTAVES,
            active_length: MAX_STEPS as u8,
            cv_probability: 0,
            gate_probability: 0,
            gate_length_percent: DEFAULT_GATE_LENGTH,
            erase_cv: false,
            erase_gate: false,
            test_mode: false,
            tuning_mode: false,
        }
    }
}

impl Parameters {
    /// Start note as the menu shows it (root note minus the offset).
    pub fn start_note(&self) -> u8 {
        self.root_note.saturating_sub(ROOT_NOTE_OFFSET)
    }

    /// Set the root note from a menu start note (0..=MAX_START_NOTE).
    pub fn set_start_note(&mut self, start_note: u8) {
        self.root_note = start_note.min(MAX_START_NOTE) + ROOT_NOTE_OFFSET;
    }

    /// Current value of one parameter.
    pub fn value(&self, kind: ParameterKind) -> ParameterValue {
        match kind {
            ParameterKind::Scale => ParameterValue::Scale(self.scale.name),
            ParameterKind::CvProbability => ParameterValue::Number(self.cv_probability),
            ParameterKind::GateProbability => ParameterValue::Number(self.gate_probability),
            ParameterKind::GateLength => ParameterValue::Number(self.gate_length_percent),
            ParameterKind::Steps => ParameterValue::Number(self.active_length),
            ParameterKind::Octaves => ParameterValue::Number(self.octaves),
            ParameterKind::StartNote => ParameterValue::Number(self.start_note()),
            ParameterKind::EraseCv => ParameterValue::Flag(self.erase_cv),
            ParameterKind::EraseGate => ParameterValue::Flag(self.erase_gate),
            ParameterKind::TestScale => ParameterValue::Flag(self.test_mode),
            ParameterKind::TuningScale => ParameterValue::Flag(self.tuning_mode),
        }
    }

    /// Check the values the core cannot clamp on its own.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidProbability`] for a probability above 100.
    /// * [`ConfigError::GateLengthOutOfRange`] for a gate length above 100.
    /// * [`ConfigError::OctavesOutOfRange`] for an octave count outside
    ///   `MIN_OCTAVES..=MAX_OCTAVES`.
    /// * [`ConfigError::CodeOutOfRange`] when the top of the scale would
    ///   need a code above `MAX_DAC_CODE`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_probability(self.cv_probability)?;
        validate_probability(self.gate_probability)?;
        if self.gate_length_percent > 100 {
            return Err(ConfigError::GateLengthOutOfRange(self.gate_length_percent));
        }
        if !(MIN_OCTAVES..=MAX_OCTAVES).contains(&self.octaves) {
            return Err(ConfigError::OctavesOutOfRange(self.octaves));
        }
        let top = self.root_note as u16 + (SEMITONES_PER_OCTAVE * self.octaves) as u16;
        let top_code = top * DAC_CODES_PER_SEMITONE;
        if top_code > MAX_DAC_CODE {
            return Err(ConfigError::CodeOutOfRange(top_code));
        }
        Ok(())
    }

    /// List the parameters whose value differs from `previous`.
    ///
    /// # Examples
    ///
    /// ```
    /// use randloop::parameters::{ParameterKind, ParameterValue, Parameters};
    ///
    /// let before = Parameters::default();
    /// let after = Parameters { cv_probability: 35, ..before };
    ///
    /// let changes = after.diff(&before);
    /// assert_eq!(changes.len(), 1);
    /// assert_eq!(changes[0].kind, ParameterKind::CvProbability);
    /// assert_eq!(changes[0].value, ParameterValue::Number(35));
    /// ```
    pub fn diff(&self, previous: &Parameters) -> ParameterChanges {
        let mut changes = ParameterChanges::new();
        for kind in ParameterKind::ALL {
            let value = self.value(kind);
            if value != previous.value(kind) {
                // Capacity equals the number of kinds.
                let _ = changes.push(ParameterChange { kind, value });
            }
        }
        changes
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::find_pattern;

    // ── Defaults ─────────────────────────────────────────────────────

    #[test]
    fn default_state() {
        let p = Parameters::default();
        assert_eq!(p.scale.name, "major");
        assert_eq!(p.root_note, 12);
        assert_eq!(p.start_note(), 0);
        assert_eq!(p.octaves, 1);
        assert_eq!(p.active_length, 16);
        assert_eq!(p.cv_probability, 0);
        assert_eq!(p.gate_probability, 0);
        assert_eq!(p.gate_length_percent, 50);
        assert!(!p.erase_cv && !p.erase_gate && !p.test_mode && !p.tuning_mode);
        assert_eq!(p.validate(), Ok(()));
    }

    // ── Start note ───────────────────────────────────────────────────

    #[test]
    fn start_note_applies_offset() {
        let mut p = Parameters::default();
        p.set_start_note(7);
        assert_eq!(p.root_note, 19);
        assert_eq!(p.start_note(), 7);
    }

    #[test]
    fn start_note_is_capped() {
        let mut p = Parameters::default();
        p.set_start_note(200);
        assert_eq!(p.start_note(), MAX_START_NOTE);
    }

    // ── Validation ───────────────────────────────────────────────────

    #[test]
    fn validate_rejects_probabilities_above_100() {
        let p = Parameters { cv_probability: 101, ..Parameters::default() };
        assert_eq!(p.validate(), Err(ConfigError::InvalidProbability(101)));

        let p = Parameters { gate_probability: 150, ..Parameters::default() };
        assert_eq!(p.validate(), Err(ConfigError::InvalidProbability(150)));
    }

    #[test]
    fn validate_reports_gate_length_by_name() {
        let p = Parameters { gate_length_percent: 120, ..Parameters::default() };
        assert_eq!(p.validate(), Err(ConfigError::GateLengthOutOfRange(120)));

        let p = Parameters { gate_length_percent: 100, ..Parameters::default() };
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_scale_above_dac_range() {
        let p = Parameters { octaves: 5, ..Parameters::default() };
        assert_eq!(p.validate(), Err(ConfigError::CodeOutOfRange(4896)));

        let mut p = Parameters { octaves: 1, ..Parameters::default() };
        p.set_start_note(MAX_START_NOTE);
        assert_eq!(p.validate(), Ok(()));
        p.octaves = 2;
        assert_eq!(p.validate(), Err(ConfigError::CodeOutOfRange(72 * 68)));
    }

    // ── Pitch span bounds ────────────────────────────────────────────

    #[test]
    fn span_bounds_match_dac_range() {
        use crate::parameters::{max_octaves, max_start_note};

        assert_eq!(max_octaves(0), 4);
        assert_eq!(max_octaves(12), 3);
        assert_eq!(max_octaves(MAX_START_NOTE), 1);
        assert_eq!(max_start_note(1), 36);
        assert_eq!(max_start_note(4), 0);
        assert_eq!(max_start_note(MAX_OCTAVES), 0);

        for start in 0..=MAX_START_NOTE {
            for octaves in MIN_OCTAVES..=max_octaves(start) {
                let mut p = Parameters { octaves, ..Parameters::default() };
                p.set_start_note(start);
                assert_eq!(p.validate(), Ok(()), "start {} x{}", start, octaves);
                assert!(start <= max_start_note(octaves));
            }
        }
    }

    #[test]
    fn validate_rejects_bad_octaves() {
        let p = Parameters { octaves: 0, ..Parameters::default() };
        assert_eq!(p.validate(), Err(ConfigError::OctavesOutOfRange(0)));

        let p = Parameters { octaves: 6, ..Parameters::default() };
        assert_eq!(p.validate(), Err(ConfigError::OctavesOutOfRange(6)));
    }

    // ── Diff ─────────────────────────────────────────────────────────

    #[test]
    fn diff_of_identical_batches_is_empty() {
        let p = Parameters::default();
        assert!(p.diff(&p).is_empty());
    }

    #[test]
    fn diff_reports_only_changed_entries_in_menu_order() {
        let before = Parameters::default();
        let after = Parameters {
            scale: find_pattern("dorian").unwrap(),
            active_length: 8,
            tuning_mode: true,
            ..before
        };

        let changes = after.diff(&before);
        assert_eq!(changes.len(), 3);
        assert_eq!(
            changes[0],
            ParameterChange {
                kind: ParameterKind::Scale,
                value: ParameterValue::Scale("dorian"),
            }
        );
        assert_eq!(changes[1].kind, ParameterKind::Steps);
        assert_eq!(changes[1].value, ParameterValue::Number(8));
        assert_eq!(changes[2].kind, ParameterKind::TuningScale);
        assert_eq!(changes[2].value, ParameterValue::Flag(true));
    }

    #[test]
    fn diff_can_report_every_parameter() {
        let before = Parameters::default();
        let after = Parameters {
            scale: find_pattern("yo").unwrap(),
            root_note: 20,
            octaves: 3,
            active_length: 4,
            cv_probability: 5,
            gate_probability: 10,
            gate_length_percent: 90,
            erase_cv: true,
            erase_gate: true,
            test_mode: true,
            tuning_mode: true,
        };
        assert_eq!(after.diff(&before).len(), PARAMETER_COUNT);
    }

    #[test]
    fn major_and_ionian_are_different_selections() {
        let before = Parameters::default();
        let after = Parameters {
            scale: find_pattern("ionian").unwrap(),
            ..before
        };
        // Same intervals, but the user picked a different entry.
        assert_eq!(after.diff(&before).len(), 1);
    }

    // ── Labels ───────────────────────────────────────────────────────

    #[test]
    fn labels_match_menu() {
        assert_eq!(ParameterKind::GateLength.label(), "TrgLngth%");
        assert_eq!(ParameterKind::StartNote.label(), "Start note");
        assert_eq!(ParameterKind::ALL.len(), PARAMETER_COUNT);
    }
}
