//! Probabilistic step mutation.
//!
//! Each call makes two independent draws: one decides *whether* the slot is
//! overwritten, the other picks the *new value*. A passing check can still
//! write the value already stored, so "mutated" means "overwritten", not
//! "changed".

use rand::{Rng, RngCore};

use crate::error::ConfigError;
use crate::scale::ScaleTable;
use crate::sequence::SequenceStore;

/// Upper bound of the probability scale (percent).
pub const MAX_PROBABILITY: u8 = 100;

/// Reject probabilities outside `0..=100`.
pub fn validate_probability(probability: u8) -> Result<(), ConfigError> {
    if probability > MAX_PROBABILITY {
        return Err(ConfigError::InvalidProbability(probability));
    }
    Ok(())
}

/// Random source for step mutation.
///
/// Generic over any [`RngCore`] so tests can inject a seeded generator.
pub struct Mutator<R> {
    rng: R,
}

impl<R> Mutator<R>
where
    R: RngCore,
{
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw in `[0, 100)` and pass iff the draw is below `probability`.
    ///
    /// Probability 0 never passes; 100 always does.
    pub fn roll(&mut self, probability: u8) -> Result<bool, ConfigError> {
        validate_probability(probability)?;
        let draw = self.rng.gen::<f32>() * MAX_PROBABILITY as f32;
        Ok(draw < probability as f32)
    }

    /// Maybe overwrite `step`'s CV with a random code from `scale`.
    ///
    /// The index is drawn before the probability check so the generator
    /// advances the same way whether or not the slot is written.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::{rngs::SmallRng, SeedableRng};
    /// use randloop::mutator::Mutator;
    /// use randloop::scale::build_scale;
    /// use randloop::sequence::SequenceStore;
    ///
    /// let scale = build_scale(12, "major", 1).unwrap();
    /// let mut store = SequenceStore::new(&scale);
    /// let mut mutator = Mutator::new(SmallRng::seed_from_u64(7));
    ///
    /// assert!(mutator.maybe_mutate_cv(&mut store, 0, &scale, 100).unwrap());
    /// assert!(scale.contains(&store.cv(0).unwrap()));
    /// ```
    pub fn maybe_mutate_cv(
        &mut self,
        store: &mut SequenceStore,
        step: usize,
        scale: &ScaleTable,
        probability: u8,
    ) -> Result<bool, ConfigError> {
        let index = self.rng.gen_range(0..scale.len());
        if !self.roll(probability)? {
            return Ok(false);
        }
        store.set_cv(step, scale[index])?;
        Ok(true)
    }

    /// Maybe overwrite `step`'s gate with a random on/off value.
    pub fn maybe_mutate_gate(
        &mut self,
        store: &mut SequenceStore,
        step: usize,
        probability: u8,
    ) -> Result<bool, ConfigError> {
        let value: bool = self.rng.gen();
        if !self.roll(probability)? {
            return Ok(false);
        }
        store.set_gate(step, value)?;
        Ok(true)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::build_scale;
    use crate::sequence::MAX_STEPS;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const TRIALS: usize = 10_000;

    fn seeded(seed: u64) -> Mutator<SmallRng> {
        Mutator::new(SmallRng::seed_from_u64(seed))
    }

    #[test]
    fn zero_probability_never_mutates() {
        let scale = build_scale(12, "chromatic", 2).unwrap();
        let mut store = SequenceStore::new(&scale);
        let mut mutator = seeded(1);

        for i in 0..TRIALS {
            let step = i % MAX_STEPS;
            assert!(!mutator.maybe_mutate_cv(&mut store, step, &scale, 0).unwrap());
            assert!(!mutator.maybe_mutate_gate(&mut store, step, 0).unwrap());
        }
        // Store still holds the defaults.
        assert!(store.cv_slots().iter().all(|&cv| cv == scale.root()));
        assert!(store.gate_slots().iter().all(|&g| g));
    }

    #[test]
    fn full_probability_always_mutates() {
        let scale = build_scale(12, "chromatic", 2).unwrap();
        let mut store = SequenceStore::new(&scale);
        let mut mutator = seeded(2);

        for i in 0..TRIALS {
            let step = i % MAX_STEPS;
            assert!(mutator.maybe_mutate_cv(&mut store, step, &scale, 100).unwrap());
            assert!(mutator.maybe_mutate_gate(&mut store, step, 100).unwrap());
        }
    }

    #[test]
    fn mutated_cv_stays_in_scale() {
        let scale = build_scale(24, "pentatonic minor", 3).unwrap();
        let mut store = SequenceStore::new(&scale);
        let mut mutator = seeded(3);

        for i in 0..1_000 {
            let step = i % MAX_STEPS;
            mutator.maybe_mutate_cv(&mut store, step, &scale, 100).unwrap();
            assert!(scale.contains(&store.cv(step).unwrap()));
        }
    }

    #[test]
    fn full_probability_reaches_every_scale_degree() {
        let scale = build_scale(12, "major", 1).unwrap();
        let mut store = SequenceStore::new(&scale);
        let mut mutator = seeded(4);
        let mut seen = [false; 8];

        for _ in 0..1_000 {
            mutator.maybe_mutate_cv(&mut store, 0, &scale, 100).unwrap();
            let cv = store.cv(0).unwrap();
            let idx = scale.iter().position(|&c| c == cv).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn gate_mutation_produces_both_values() {
        let scale = build_scale(12, "major", 1).unwrap();
        let mut store = SequenceStore::new(&scale);
        let mut mutator = seeded(5);
        let (mut on, mut off) = (0, 0);

        for _ in 0..1_000 {
            mutator.maybe_mutate_gate(&mut store, 0, 100).unwrap();
            if store.gate(0).unwrap() {
                on += 1;
            } else {
                off += 1;
            }
        }
        assert!(on > 300 && off > 300, "on={} off={}", on, off);
    }

    #[test]
    fn half_probability_is_roughly_half() {
        let mut mutator = seeded(6);
        let passes = (0..TRIALS).filter(|_| mutator.roll(50).unwrap()).count();
        assert!((4_500..5_500).contains(&passes), "passes={}", passes);
    }

    #[test]
    fn same_seed_same_sequence() {
        let scale = build_scale(12, "dorian", 2).unwrap();
        let mut a = SequenceStore::new(&scale);
        let mut b = SequenceStore::new(&scale);
        let mut ma = seeded(42);
        let mut mb = seeded(42);

        for step in 0..MAX_STEPS {
            ma.maybe_mutate_cv(&mut a, step, &scale, 60).unwrap();
            mb.maybe_mutate_cv(&mut b, step, &scale, 60).unwrap();
            ma.maybe_mutate_gate(&mut a, step, 60).unwrap();
            mb.maybe_mutate_gate(&mut b, step, 60).unwrap();
        }
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_probability_is_rejected() {
        let scale = build_scale(12, "major", 1).unwrap();
        let mut store = SequenceStore::new(&scale);
        let mut mutator = seeded(7);

        assert_eq!(
            mutator.maybe_mutate_cv(&mut store, 0, &scale, 101),
            Err(ConfigError::InvalidProbability(101))
        );
        assert_eq!(
            mutator.maybe_mutate_gate(&mut store, 0, 255),
            Err(ConfigError::InvalidProbability(255))
        );
        assert_eq!(validate_probability(100), Ok(()));
    }

    #[test]
    fn out_of_range_step_is_rejected() {
        let scale = build_scale(12, "major", 1).unwrap();
        let mut store = SequenceStore::new(&scale);
        let mut mutator = seeded(8);
        assert_eq!(
            mutator.maybe_mutate_cv(&mut store, MAX_STEPS, &scale, 100),
            Err(ConfigError::StepOutOfRange(MAX_STEPS))
        );
    }
}
