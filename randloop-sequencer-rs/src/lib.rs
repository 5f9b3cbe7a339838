//! Core of a quantized random looping step sequencer.
//!
//! The sequencer advances one step per rising edge of an external clock,
//! emits a pitch CV (a 12-bit DAC code snapped to a musical scale) and a
//! gate whose length is a fraction of the measured clock period. Each step
//! may be re-rolled on the fly with a user-set probability, so the loop
//! slowly drifts from a fixed pattern towards randomness.
//!
//! Everything here is hardware independent: the firmware samples the clock
//! input, hands the level to [`Sequencer::tick`] and drives the DAC and
//! gate pin from the returned [`TickEvents`].
//!
//! # Architecture
//!
//! - **[`scale`]**: interval pattern catalogue and DAC code tables.
//! - **[`sequence`]**: fixed-capacity CV/gate step store.
//! - **[`mutator`]**: probabilistic re-rolling of steps.
//! - **[`trigger`]**: gate-length timer.
//! - **[`clock`]**: edge detection and the playback loop.
//! - **[`parameters`]** / **[`menu`]**: user settings and the encoder menu
//!   that produces them.
//!
//! # Quick start
//!
//! ```
//! use embassy_time::Instant;
//! use rand::{rngs::SmallRng, SeedableRng};
//! use randloop::{ClockLevel, Parameters, Sequencer};
//!
//! let mut seq = Sequencer::new(Parameters::default(), SmallRng::seed_from_u64(1)).unwrap();
//!
//! let events = seq.tick(Instant::from_millis(0), ClockLevel::Asserted);
//! let step = events.step.unwrap();
//! assert_eq!(step.step, 0);
//! assert_eq!(step.cv, 816);
//! ```
//!
//! # Features
//!
//! - **`defmt`**: derive [`defmt::Format`] on public types and log
//!   parameter changes and rejected batches.

#![no_std]

pub mod clock;
pub mod error;
pub mod menu;
pub mod mutator;
pub mod parameters;
pub mod scale;
pub mod sequence;
pub mod trigger;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use clock::{ClockLevel, GateLevel, OutputSource, Sequencer, StepEvent, TickEvents};
pub use error::ConfigError;
pub use menu::Menu;
pub use parameters::Parameters;
pub use scale::{build_scale, ScaleTable};
pub use sequence::SequenceStore;
