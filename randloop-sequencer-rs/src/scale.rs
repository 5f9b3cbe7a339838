//! Scale quantization engine.
//!
//! Builds a [`ScaleTable`] of 12-bit DAC codes from a root note, a named
//! interval pattern and an octave count. Codes follow the 1 V/oct
//! convention of the MCP4725 running from a 5 V supply: one semitone is
//! [`DAC_CODES_PER_SEMITONE`] codes.
//!
//! ```text
//! root = 12, "major", 1 octave
//! notes: 12 14 16 17 19 21 23 24
//! codes: 816 952 1088 1156 1292 1428 1564 1632
//! ```

use core::ops::Deref;

use heapless::Vec;

use crate::error::ConfigError;

/// DAC codes per semitone (4096 codes over ~5 V at 1 V/oct).
pub const DAC_CODES_PER_SEMITONE: u16 = 68;

/// Highest code the 12-bit DAC accepts.
pub const MAX_DAC_CODE: u16 = 0x0FFF;

/// Highest note whose code fits the DAC (note 60, code 4080).
pub const MAX_NOTE: u8 = (MAX_DAC_CODE / DAC_CODES_PER_SEMITONE) as u8;

/// Semitones spanned by one pass over an interval pattern.
pub const SEMITONES_PER_OCTAVE: u8 = 12;

/// Lowest selectable octave count.
pub const MIN_OCTAVES: u8 = 1;

/// Highest selectable octave count.
pub const MAX_OCTAVES: u8 = 5;

/// Longest interval pattern in the catalogue (chromatic).
pub const MAX_PATTERN_LEN: usize = 12;

/// Capacity of a [`ScaleTable`]: the root plus every interval of every octave.
pub const MAX_SCALE_LEN: usize = 1 + MAX_OCTAVES as usize * MAX_PATTERN_LEN;

/// A named interval pattern. Intervals are semitone steps summing to 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScalePattern {
    /// Catalogue name, lowercase.
    pub name: &'static str,
    /// Semitone steps for one octave.
    pub intervals: &'static [u8],
}

impl ScalePattern {
    const fn new(name: &'static str, intervals: &'static [u8]) -> Self {
        Self { name, intervals }
    }
}

const IONIAN: &[u8] = &[2, 2, 1, 2, 2, 2, 1];

/// Every registered pattern, sorted alphabetically by name.
///
/// "major" is an alias of "ionian" and shares its intervals.
pub static SCALE_PATTERNS: [ScalePattern; 47] = [
    ScalePattern::new("acoustic", &[2, 2, 2, 1, 2, 1, 2]),
    ScalePattern::new("aeolian", &[2, 1, 2, 2, 1, 2, 2]),
    ScalePattern::new("algerian", &[2, 1, 3, 1, 1, 3, 1]),
    ScalePattern::new("augmented", &[3, 1, 3, 1, 3, 1]),
    ScalePattern::new("bebop dominant", &[2, 2, 1, 2, 2, 1, 1, 1]),
    ScalePattern::new("blues", &[3, 2, 1, 1, 3, 2]),
    ScalePattern::new("chromatic", &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]),
    ScalePattern::new("dorian", &[2, 1, 2, 2, 2, 1, 2]),
    ScalePattern::new("double harmonic", &[1, 3, 1, 2, 1, 3, 1]),
    ScalePattern::new("enigmatic", &[1, 3, 2, 2, 2, 1, 1]),
    ScalePattern::new("flamenco", &[1, 3, 1, 2, 1, 3, 1]),
    ScalePattern::new("half-diminished", &[2, 1, 2, 1, 2, 2, 2]),
    ScalePattern::new("harmonic major", &[2, 2, 1, 2, 1, 3, 1]),
    ScalePattern::new("harmonic minor", &[2, 1, 2, 2, 1, 3, 1]),
    ScalePattern::new("harmonics", &[3, 1, 1, 2, 2, 3]),
    ScalePattern::new("hijaroshi", &[4, 2, 1, 4, 1]),
    ScalePattern::new("hungarian major", &[3, 1, 2, 1, 2, 1, 2]),
    ScalePattern::new("hungarian minor", &[2, 1, 3, 1, 1, 3, 1]),
    ScalePattern::new("in", &[1, 4, 2, 1, 4]),
    ScalePattern::new("insen", &[1, 4, 2, 3, 2]),
    ScalePattern::new("ionian", IONIAN),
    ScalePattern::new("iwato", &[1, 4, 1, 4, 2]),
    ScalePattern::new("locrian", &[1, 2, 2, 1, 2, 2, 2]),
    ScalePattern::new("locrian major", &[2, 2, 1, 1, 2, 2, 2]),
    ScalePattern::new("lydian", &[2, 2, 2, 1, 2, 2, 1]),
    ScalePattern::new("lydian augmented", &[2, 2, 2, 2, 1, 2, 1]),
    ScalePattern::new("major", IONIAN),
    ScalePattern::new("melodic minor ascending", &[2, 1, 2, 2, 2, 2, 1]),
    ScalePattern::new("melodic minor descending", &[2, 1, 2, 2, 2, 2, 1]),
    ScalePattern::new("mixolydian", &[2, 2, 1, 2, 2, 1, 2]),
    ScalePattern::new("neapolitan major", &[1, 2, 2, 2, 2, 2, 1]),
    ScalePattern::new("neapolitan minor", &[1, 2, 2, 2, 1, 3, 1]),
    ScalePattern::new("octatonic c-c#", &[1, 2, 1, 2, 1, 2, 1, 2]),
    ScalePattern::new("octatonic c-d", &[2, 1, 2, 1, 2, 1, 2, 1]),
    ScalePattern::new("pentatonic major", &[2, 2, 3, 2, 3]),
    ScalePattern::new("pentatonic minor", &[3, 2, 2, 3, 2]),
    ScalePattern::new("persian", &[1, 3, 1, 1, 2, 3, 1]),
    ScalePattern::new("phrygian", &[1, 2, 2, 2, 1, 2, 2]),
    ScalePattern::new("phrygian dominant", &[1, 3, 1, 2, 1, 2, 2]),
    ScalePattern::new("prometheus", &[2, 2, 2, 3, 1, 2]),
    ScalePattern::new("romani", &[2, 1, 3, 1, 1, 2, 2]),
    ScalePattern::new("super locrian", &[1, 2, 1, 2, 2, 2, 2]),
    ScalePattern::new("tritone", &[1, 3, 2, 1, 3, 2]),
    ScalePattern::new("two-semitone tritone", &[1, 1, 4, 1, 1, 4]),
    ScalePattern::new("ukranian dorian", &[2, 1, 3, 1, 2, 1, 2]),
    ScalePattern::new("whole-tone scale", &[2, 2, 2, 2, 2, 2]),
    ScalePattern::new("yo", &[3, 2, 2, 3, 2]),
];

/// Pattern selected at power-on.
pub const DEFAULT_PATTERN: &str = "major";

/// The power-on pattern ([`DEFAULT_PATTERN`]).
pub fn default_pattern() -> &'static ScalePattern {
    find_pattern(DEFAULT_PATTERN).unwrap_or(&SCALE_PATTERNS[0])
}

/// Look up a pattern by its catalogue name.
pub fn find_pattern(name: &str) -> Option<&'static ScalePattern> {
    SCALE_PATTERNS
        .binary_search_by(|p| p.name.cmp(name))
        .ok()
        .map(|idx| &SCALE_PATTERNS[idx])
}

/// Position of a pattern within [`SCALE_PATTERNS`].
pub fn pattern_index(name: &str) -> Option<usize> {
    SCALE_PATTERNS.binary_search_by(|p| p.name.cmp(name)).ok()
}

/// Iterate pattern names in alphabetical order.
///
/// The iterator is `Clone`, so a UI can restart enumeration from any point.
pub fn pattern_names() -> impl Iterator<Item = &'static str> + Clone {
    SCALE_PATTERNS.iter().map(|p| p.name)
}

/// Quantized pitch table in DAC codes.
///
/// Invariants: `len() == 1 + octaves * pattern.len()`, values are
/// non-decreasing, the first value is the root note's code and no value
/// exceeds [`MAX_DAC_CODE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleTable {
    codes: Vec<u16, MAX_SCALE_LEN>,
}

impl ScaleTable {
    /// DAC code of the root note.
    pub fn root(&self) -> u16 {
        self.codes[0]
    }
}

impl Deref for ScaleTable {
    type Target = [u16];

    fn deref(&self) -> &[u16] {
        &self.codes
    }
}

/// Convert a note number to its DAC code.
pub const fn note_to_code(note: u8) -> u16 {
    note as u16 * DAC_CODES_PER_SEMITONE
}

/// Build the scale table for a named pattern.
///
/// # Errors
///
/// * [`ConfigError::UnknownPattern`] if `pattern_name` is not registered.
/// * [`ConfigError::OctavesOutOfRange`] if `octaves` is outside
///   `MIN_OCTAVES..=MAX_OCTAVES`.
/// * [`ConfigError::CodeOutOfRange`] if the top of the scale lies above
///   [`MAX_NOTE`].
///
/// # Examples
///
/// ```
/// use randloop::scale::build_scale;
///
/// let scale = build_scale(0, "chromatic", 1).unwrap();
/// assert_eq!(scale.len(), 13);
/// assert_eq!(scale[12], 816);
/// ```
pub fn build_scale(
    root_note: u8,
    pattern_name: &str,
    octaves: u8,
) -> Result<ScaleTable, ConfigError> {
    let pattern = find_pattern(pattern_name).ok_or(ConfigError::UnknownPattern)?;
    build_scale_from(pattern, root_note, octaves)
}

/// Build the scale table for an already resolved pattern.
pub fn build_scale_from(
    pattern: &ScalePattern,
    root_note: u8,
    octaves: u8,
) -> Result<ScaleTable, ConfigError> {
    if !(MIN_OCTAVES..=MAX_OCTAVES).contains(&octaves) {
        return Err(ConfigError::OctavesOutOfRange(octaves));
    }

    let mut codes = Vec::new();
    let mut cursor = root_note as u16;
    codes
        .push(cursor * DAC_CODES_PER_SEMITONE)
        .map_err(|_| ConfigError::OctavesOutOfRange(octaves))?;

    for _ in 0..octaves {
        for &interval in pattern.intervals {
            cursor += interval as u16;
            codes
                .push(cursor * DAC_CODES_PER_SEMITONE)
                .map_err(|_| ConfigError::OctavesOutOfRange(octaves))?;
        }
    }

    let top = cursor * DAC_CODES_PER_SEMITONE;
    if top > MAX_DAC_CODE {
        return Err(ConfigError::CodeOutOfRange(top));
    }

    Ok(ScaleTable { codes })
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chromatic_one_octave_from_zero() {
        let scale = build_scale(0, "chromatic", 1).unwrap();
        let expected: [u16; 13] = core::array::from_fn(|i| i as u16 * 68);
        assert_eq!(&scale[..], &expected[..]);
    }

    #[test]
    fn major_from_twelve() {
        let scale = build_scale(12, "major", 1).unwrap();
        assert_eq!(
            &scale[..],
            &[816, 952, 1088, 1156, 1292, 1428, 1564, 1632][..]
        );
        assert_eq!(scale.root(), 816);
    }

    #[test]
    fn length_and_order_hold_for_every_pattern() {
        for pattern in SCALE_PATTERNS.iter() {
            for octaves in MIN_OCTAVES..=MAX_OCTAVES {
                let scale = build_scale(0, pattern.name, octaves).unwrap();
                assert_eq!(
                    scale.len(),
                    1 + octaves as usize * pattern.intervals.len(),
                    "{} x{}",
                    pattern.name,
                    octaves
                );
                assert!(scale.windows(2).all(|w| w[0] <= w[1]), "{}", pattern.name);
                assert_eq!(scale[0], 0);
                assert!(scale.iter().all(|&c| c <= MAX_DAC_CODE));
            }
        }
    }

    #[test]
    fn every_pattern_spans_one_octave() {
        for pattern in SCALE_PATTERNS.iter() {
            let total: u32 = pattern.intervals.iter().map(|&i| i as u32).sum();
            assert_eq!(total, 12, "{}", pattern.name);
            assert!(pattern.intervals.len() <= MAX_PATTERN_LEN);
        }
    }

    #[test]
    fn octave_ends_on_root_plus_twelve() {
        let scale = build_scale(12, "blues", 3).unwrap();
        assert_eq!(*scale.last().unwrap(), note_to_code(12 + 36));
    }

    #[test]
    fn major_is_ionian() {
        let major = build_scale(5, "major", 2).unwrap();
        let ionian = build_scale(5, "ionian", 2).unwrap();
        assert_eq!(major, ionian);
    }

    #[test]
    fn unknown_pattern_is_rejected() {
        assert_eq!(
            build_scale(12, "lydian dominant", 1),
            Err(ConfigError::UnknownPattern)
        );
        assert_eq!(build_scale(12, "", 1), Err(ConfigError::UnknownPattern));
    }

    #[test]
    fn octaves_out_of_range_are_rejected() {
        assert_eq!(
            build_scale(12, "major", 0),
            Err(ConfigError::OctavesOutOfRange(0))
        );
        assert_eq!(
            build_scale(12, "chromatic", MAX_OCTAVES + 1),
            Err(ConfigError::OctavesOutOfRange(MAX_OCTAVES + 1))
        );
    }

    #[test]
    fn largest_table_fits_capacity() {
        let scale = build_scale(0, "chromatic", MAX_OCTAVES).unwrap();
        assert_eq!(scale.len(), MAX_SCALE_LEN);
        assert_eq!(scale.last(), Some(&note_to_code(MAX_NOTE)));
    }

    // ── DAC range ────────────────────────────────────────────────────

    #[test]
    fn top_note_fits_dac() {
        assert_eq!(MAX_NOTE, 60);
        assert!(note_to_code(MAX_NOTE) <= MAX_DAC_CODE);
        assert!(note_to_code(MAX_NOTE + 1) > MAX_DAC_CODE);

        let scale = build_scale(12, "major", 4).unwrap();
        assert_eq!(scale.last(), Some(&4080));
    }

    #[test]
    fn scale_past_dac_range_is_rejected() {
        assert!(build_scale(48, "chromatic", 1).is_ok());
        assert_eq!(
            build_scale(12, "major", 5),
            Err(ConfigError::CodeOutOfRange(4896))
        );
        assert_eq!(
            build_scale(49, "chromatic", 1),
            Err(ConfigError::CodeOutOfRange(4148))
        );
    }

    // ── Catalogue ────────────────────────────────────────────────────

    #[test]
    fn names_are_sorted_and_unique() {
        let names = pattern_names();
        let mut previous: Option<&str> = None;
        for name in names {
            if let Some(prev) = previous {
                assert!(prev < name, "{} !< {}", prev, name);
            }
            previous = Some(name);
        }
    }

    #[test]
    fn names_are_restartable() {
        let names = pattern_names();
        let first_pass = names.clone().count();
        assert_eq!(first_pass, SCALE_PATTERNS.len());
        assert_eq!(names.clone().next(), Some("acoustic"));
        assert_eq!(names.last(), Some("yo"));
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(find_pattern("dorian").unwrap().intervals, &[2, 1, 2, 2, 2, 1, 2]);
        assert!(find_pattern("Dorian").is_none());
        assert_eq!(pattern_index("acoustic"), Some(0));
        assert_eq!(
            SCALE_PATTERNS[pattern_index(DEFAULT_PATTERN).unwrap()].name,
            "major"
        );
    }
}
