//! Clock-driven step state machine.
//!
//! [`Sequencer`] owns every piece of playback state and is advanced by
//! calling [`Sequencer::tick`] once per control-loop iteration with the
//! current time and clock input level. Each call returns the output changes
//! the caller must apply to the DAC and the gate line.
//!
//! # Clock edges
//!
//! ```text
//! state            input       action                          next
//! WaitingForRise   Asserted    play current step, advance      WaitingForFall
//! WaitingForRise   Deasserted  -                               WaitingForRise
//! WaitingForFall   Deasserted  period = now - last rise        WaitingForRise
//! WaitingForFall   Asserted    -                               WaitingForFall
//! ```
//!
//! # Playing a step
//!
//! 1. Roll the step's CV and gate against their probabilities.
//! 2. Apply erase overrides (CV back to the scale root, gate back on).
//! 3. Pick the CV source: test sequence, tuning sequence, or the store.
//! 4. Emit the CV and, if the step's gate is on, assert the gate and arm the
//!    trigger timer.
//! 5. Advance the cursor, wrapping at the active length.

use embassy_time::{Duration, Instant};
use rand::RngCore;

use crate::error::ConfigError;
use crate::mutator::Mutator;
use crate::parameters::{ParameterChanges, Parameters};
use crate::scale::{build_scale_from, note_to_code, ScaleTable};
use crate::sequence::{SequenceStore, MAX_STEPS};
use crate::trigger::TriggerTimer;

/// Alternating calibration pattern (notes 12 and 24) for tuning
/// oscillators against the DAC.
pub const TUNING_SEQUENCE: [u16; MAX_STEPS] = tuning_sequence();

const fn tuning_sequence() -> [u16; MAX_STEPS] {
    let low = note_to_code(12);
    let high = note_to_code(24);
    let mut codes = [0; MAX_STEPS];
    let mut i = 0;
    while i < MAX_STEPS {
        codes[i] = if i % 2 == 0 { low } else { high };
        i += 1;
    }
    codes
}

/// The scale played upwards, cycled to fill every step.
///
/// A scale shorter than [`MAX_STEPS`] wraps mid-scale.
pub fn test_sequence(scale: &[u16]) -> [u16; MAX_STEPS] {
    if scale.is_empty() {
        return [0; MAX_STEPS];
    }
    core::array::from_fn(|step| scale[step % scale.len()])
}

/// Sampled level of the clock input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockLevel {
    /// A clock pulse is present (the input reads low on inverted hardware).
    Asserted,
    Deasserted,
}

/// Requested level of the gate output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateLevel {
    /// Trigger on (drives the line low on inverted hardware).
    Asserted,
    Deasserted,
}

/// Clock edge detector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeState {
    WaitingForRise,
    WaitingForFall,
}

/// Where a step's CV code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputSource {
    Sequence,
    Test,
    Tuning,
}

/// A step that was just played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepEvent {
    /// Index of the step that played.
    pub step: usize,
    /// DAC code to output.
    pub cv: u16,
    /// Gate value of the step after mutation and erase.
    pub gate: bool,
    pub source: OutputSource,
}

/// Output changes produced by one [`Sequencer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickEvents {
    /// Set when a rising clock edge played a step. Write `cv` to the DAC.
    pub step: Option<StepEvent>,
    /// Set when the gate output must change level.
    pub gate: Option<GateLevel>,
}

/// Step cursor and clock timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackState {
    /// Next step to play.
    pub current_step: usize,
    pub edge: EdgeState,
    /// Time of the most recent rising edge.
    pub last_rise: Instant,
    /// Rise-to-fall time of the last completed clock pulse. Zero until the
    /// first pulse completes.
    pub measured_period: Duration,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_step: 0,
            edge: EdgeState::WaitingForRise,
            last_rise: Instant::from_ticks(0),
            measured_period: Duration::from_ticks(0),
        }
    }
}

/// The step sequencer: scale, step store, mutator, trigger timer and
/// playback state behind one owner.
pub struct Sequencer<R> {
    params: Parameters,
    scale: ScaleTable,
    store: SequenceStore,
    mutator: Mutator<R>,
    playback: PlaybackState,
    trigger: TriggerTimer,
}

impl<R> Sequencer<R>
where
    R: RngCore,
{
    /// Build a sequencer with every step set to the scale root, gate on.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Parameters::validate`] or from building the
    /// scale table.
    ///
    /// # Examples
    ///
    /// ```
    /// use embassy_time::Instant;
    /// use rand::{rngs::SmallRng, SeedableRng};
    /// use randloop::clock::{ClockLevel, GateLevel, Sequencer};
    /// use randloop::parameters::Parameters;
    ///
    /// let mut seq = Sequencer::new(Parameters::default(), SmallRng::seed_from_u64(1)).unwrap();
    ///
    /// let events = seq.tick(Instant::from_millis(0), ClockLevel::Asserted);
    /// let step = events.step.unwrap();
    /// assert_eq!(step.step, 0);
    /// assert_eq!(step.cv, 816);
    /// assert_eq!(events.gate, Some(GateLevel::Asserted));
    /// assert_eq!(seq.current_step(), 1);
    /// ```
    pub fn new(params: Parameters, rng: R) -> Result<Self, ConfigError> {
        params.validate()?;
        let scale = build_scale_from(params.scale, params.root_note, params.octaves)?;
        let mut store = SequenceStore::new(&scale);
        store.set_active_length(params.active_length as usize);

        Ok(Self {
            params,
            scale,
            store,
            mutator: Mutator::new(rng),
            playback: PlaybackState::default(),
            trigger: TriggerTimer::new(),
        })
    }

    // ── Control loop ─────────────────────────────────────────────────

    /// Run one control-loop iteration: clock edge handling, then the
    /// gate-off check.
    ///
    /// The gate-off check is skipped on the tick that armed the gate, so a
    /// zero-length gate is still asserted for one full tick.
    pub fn tick(&mut self, now: Instant, clock: ClockLevel) -> TickEvents {
        let mut events = TickEvents::default();

        match (self.playback.edge, clock) {
            (EdgeState::WaitingForRise, ClockLevel::Asserted) => {
                let step = self.play_step(now);
                if step.gate {
                    events.gate = Some(GateLevel::Asserted);
                }
                events.step = Some(step);
                self.playback.edge = EdgeState::WaitingForFall;
            }
            (EdgeState::WaitingForFall, ClockLevel::Deasserted) => {
                self.playback.measured_period =
                    now.saturating_duration_since(self.playback.last_rise);
                self.playback.edge = EdgeState::WaitingForRise;
            }
            _ => {}
        }

        if events.gate.is_none() && self.trigger.poll(now) {
            events.gate = Some(GateLevel::Deasserted);
        }

        events
    }

    fn play_step(&mut self, now: Instant) -> StepEvent {
        self.playback.last_rise = now;

        // The loop may have been shortened under the cursor.
        if self.playback.current_step >= self.store.active_length() {
            self.playback.current_step = 0;
        }
        let step = self.playback.current_step;

        accept(self.mutator.maybe_mutate_cv(
            &mut self.store,
            step,
            &self.scale,
            self.params.cv_probability,
        ));
        accept(
            self.mutator
                .maybe_mutate_gate(&mut self.store, step, self.params.gate_probability),
        );

        if self.params.erase_cv {
            accept(self.store.erase_cv(step, self.scale.root()).map(|_| true));
        }
        if self.params.erase_gate {
            accept(self.store.erase_gate(step, true).map(|_| true));
        }

        let (stored_cv, gate) = self.store.get(step).unwrap_or((self.scale.root(), false));
        let (source, cv) = if self.params.test_mode {
            (OutputSource::Test, test_sequence(&self.scale)[step])
        } else if self.params.tuning_mode {
            (OutputSource::Tuning, TUNING_SEQUENCE[step])
        } else {
            (OutputSource::Sequence, stored_cv)
        };

        if gate {
            self.trigger.arm(
                self.playback.measured_period,
                self.params.gate_length_percent,
                now,
            );
        }

        self.playback.current_step = step + 1;
        if self.playback.current_step >= self.store.active_length() {
            self.playback.current_step = 0;
        }

        StepEvent {
            step,
            cv,
            gate,
            source,
        }
    }

    // ── Parameters ───────────────────────────────────────────────────

    /// Replace the parameter batch and return the entries that changed.
    ///
    /// The scale table is rebuilt on every call. Stored CV codes are left
    /// as they are; they move onto the new scale as steps get re-rolled or
    /// erased. A new active length takes effect immediately; a cursor left
    /// beyond it restarts at step 0 on the next rising edge.
    ///
    /// # Errors
    ///
    /// On a validation or scale error the previous batch stays in force.
    pub fn apply_parameters(&mut self, params: Parameters) -> Result<ParameterChanges, ConfigError> {
        params.validate()?;
        let scale = build_scale_from(params.scale, params.root_note, params.octaves)?;

        let changes = params.diff(&self.params);
        for _change in changes.iter() {
            #[cfg(feature = "defmt")]
            defmt::info!("{} changed: {}", _change.kind.label(), _change.value);
        }

        self.scale = scale;
        self.store.set_active_length(params.active_length as usize);
        self.params = params;
        Ok(changes)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn scale(&self) -> &ScaleTable {
        &self.scale
    }

    pub fn store(&self) -> &SequenceStore {
        &self.store
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Next step to play.
    pub fn current_step(&self) -> usize {
        self.playback.current_step
    }

    pub fn measured_period(&self) -> Duration {
        self.playback.measured_period
    }

    /// `true` while a gate is waiting to be released.
    pub fn gate_active(&self) -> bool {
        self.trigger.is_active()
    }

    /// Release deadline of the active gate, if any.
    pub fn gate_off_at(&self) -> Option<Instant> {
        self.trigger.off_at()
    }
}

/// Probabilities are validated when parameters are applied and step indices
/// never exceed the active length, so these results are always `Ok`.
fn accept(result: Result<bool, ConfigError>) {
    if let Err(_e) = result {
        #[cfg(feature = "defmt")]
        defmt::error!("Step update rejected: {}", _e);
        debug_assert!(false, "step update rejected");
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
