//! Encoder-driven parameter menu.
//!
//! The menu is the sequencer's parameter source. It holds one
//! [`MenuItem`] per [`ParameterKind`], reacts to encoder rotation and button
//! presses, and hands out a complete [`Parameters`] batch exactly once per
//! user confirmation. Drawing the menu is left to the caller.
//!
//! # Navigation
//!
//! ```text
//!             rotate: move highlight
//!            ┌──────────┐
//!            ▼          │
//!      ┌──────────┐─────┘   press on toggle: flip + commit
//!      │ Browsing │────────────────────────────────┐
//!      └──────────┘                                 │
//!        │      ▲                                   ▼
//!  press │      │ press: store pending + commit   (stays Browsing)
//!        ▼      │
//!      ┌──────────┐
//!      │ Editing  │◄─┐ rotate: move pending value
//!      └──────────┘──┘
//! ```

use crate::parameters::{max_octaves, max_start_note, ParameterKind, Parameters, PARAMETER_COUNT};
use crate::scale::{pattern_index, SCALE_PATTERNS, MIN_OCTAVES};
use crate::sequence::{MAX_STEPS, MIN_STEPS};

/// Encoder increment for the two probability items.
pub const PROBABILITY_STEP: i32 = 5;

/// Encoder increment for the gate length item.
pub const GATE_LENGTH_STEP: i32 = 10;

/// The editing behaviour of one menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    /// Pick one entry of the scale catalogue.
    Select { index: usize },
    /// Bounded number moved in fixed increments.
    Range { value: i32, min: i32, max: i32, step: i32 },
    /// On/off switch flipped by a single press.
    Toggle(bool),
}

impl Control {
    fn range(value: u8, min: u8, max: u8, step: i32) -> Self {
        Control::Range {
            value: (value as i32).clamp(min as i32, max as i32),
            min: min as i32,
            max: max as i32,
            step,
        }
    }

    /// Value the control would start editing from.
    pub fn current(&self) -> i32 {
        match *self {
            Control::Select { index } => index as i32,
            Control::Range { value, .. } => value,
            Control::Toggle(on) => on as i32,
        }
    }

    /// Move a pending value by `delta` detents, clamped to the control's
    /// bounds.
    pub fn nudge(&self, pending: i32, delta: i32) -> i32 {
        match *self {
            Control::Select { .. } => {
                pending
                    .saturating_add(delta)
                    .clamp(0, SCALE_PATTERNS.len() as i32 - 1)
            }
            Control::Range { min, max, step, .. } => pending
                .saturating_add(delta.saturating_mul(step))
                .clamp(min, max),
            Control::Toggle(_) => pending,
        }
    }

    /// Lower a range's upper bound, pulling the value down with it.
    fn set_max(&mut self, new_max: i32) {
        if let Control::Range { value, min, max, .. } = self {
            *max = new_max.max(*min);
            *value = (*value).clamp(*min, *max);
        }
    }

    /// Store a confirmed value.
    fn set(&mut self, pending: i32) {
        match self {
            Control::Select { index } => {
                *index = pending.clamp(0, SCALE_PATTERNS.len() as i32 - 1) as usize;
            }
            Control::Range { value, min, max, .. } => *value = pending.clamp(*min, *max),
            Control::Toggle(on) => *on = pending != 0,
        }
    }

    fn as_u8(&self) -> u8 {
        self.current().clamp(0, u8::MAX as i32) as u8
    }

    fn as_bool(&self) -> bool {
        self.current() != 0
    }
}

/// One line of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuItem {
    pub kind: ParameterKind,
    pub control: Control,
}

impl MenuItem {
    /// Build the item for `kind`, seeded from `params`.
    pub fn for_kind(kind: ParameterKind, params: &Parameters) -> Self {
        let control = match kind {
            ParameterKind::Scale => Control::Select {
                index: pattern_index(params.scale.name).unwrap_or(0),
            },
            ParameterKind::CvProbability => {
                Control::range(params.cv_probability, 0, 100, PROBABILITY_STEP)
            }
            ParameterKind::GateProbability => {
                Control::range(params.gate_probability, 0, 100, PROBABILITY_STEP)
            }
            ParameterKind::GateLength => {
                Control::range(params.gate_length_percent, 0, 100, GATE_LENGTH_STEP)
            }
            ParameterKind::Steps => {
                Control::range(params.active_length, MIN_STEPS as u8, MAX_STEPS as u8, 1)
            }
            ParameterKind::Octaves => Control::range(
                params.octaves,
                MIN_OCTAVES,
                max_octaves(params.start_note()),
                1,
            ),
            ParameterKind::StartNote => Control::range(
                params.start_note(),
                0,
                max_start_note(params.octaves),
                1,
            ),
            ParameterKind::EraseCv => Control::Toggle(params.erase_cv),
            ParameterKind::EraseGate => Control::Toggle(params.erase_gate),
            ParameterKind::TestScale => Control::Toggle(params.test_mode),
            ParameterKind::TuningScale => Control::Toggle(params.tuning_mode),
        };
        Self { kind, control }
    }
}

/// Where the user is in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuState {
    /// Scrolling the item list.
    Browsing { highlighted: usize },
    /// Adjusting one item; `pending` is not applied until confirmed.
    Editing { item: usize, pending: i32 },
}

/// Parameter menu driven by one rotary encoder with a push button.
pub struct Menu {
    items: [MenuItem; PARAMETER_COUNT],
    state: MenuState,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new(&Parameters::default())
    }
}

impl Menu {
    /// Create a menu showing `params`, with the first item highlighted.
    ///
    /// Settings that would push the scale past the DAC range are pulled
    /// back, octaves first.
    pub fn new(params: &Parameters) -> Self {
        let mut menu = Self {
            items: ParameterKind::ALL.map(|kind| MenuItem::for_kind(kind, params)),
            state: MenuState::Browsing { highlighted: 0 },
        };
        menu.limit_pitch_span();
        menu
    }

    pub fn items(&self) -> &[MenuItem; PARAMETER_COUNT] {
        &self.items
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Index of the item under the cursor (or being edited).
    pub fn highlighted(&self) -> usize {
        match self.state {
            MenuState::Browsing { highlighted } => highlighted,
            MenuState::Editing { item, .. } => item,
        }
    }

    /// Apply `delta` encoder detents.
    ///
    /// Browsing moves the highlight; editing moves the pending value. Both
    /// stop at their bounds rather than wrapping.
    pub fn rotate(&mut self, delta: i32) {
        self.state = match self.state {
            MenuState::Browsing { highlighted } => MenuState::Browsing {
                highlighted: (highlighted as i32)
                    .saturating_add(delta)
                    .clamp(0, PARAMETER_COUNT as i32 - 1) as usize,
            },
            MenuState::Editing { item, pending } => MenuState::Editing {
                item,
                pending: self.items[item].control.nudge(pending, delta),
            },
        };
    }

    /// Handle a button press.
    ///
    /// Returns the full parameter batch when the press confirms a change:
    /// flipping a toggle, or leaving edit mode. Entering edit mode returns
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use randloop::menu::Menu;
    ///
    /// let mut menu = Menu::default();
    /// menu.rotate(1);            // highlight "CVProb"
    /// assert!(menu.press().is_none());
    /// menu.rotate(3);            // 0 → 15 in steps of 5
    /// let params = menu.press().unwrap();
    /// assert_eq!(params.cv_probability, 15);
    /// ```
    pub fn press(&mut self) -> Option<Parameters> {
        match self.state {
            MenuState::Browsing { highlighted } => {
                let item = &mut self.items[highlighted];
                if let Control::Toggle(on) = &mut item.control {
                    *on = !*on;
                    #[cfg(feature = "defmt")]
                    defmt::debug!("{} toggled: {}", item.kind.label(), *on);
                    return Some(self.parameters());
                }
                self.state = MenuState::Editing {
                    item: highlighted,
                    pending: item.control.current(),
                };
                None
            }
            MenuState::Editing { item, pending } => {
                self.items[item].control.set(pending);
                self.limit_pitch_span();
                self.state = MenuState::Browsing { highlighted: item };
                Some(self.parameters())
            }
        }
    }

    /// Re-derive the octave and start note bounds from each other's
    /// confirmed value, so the top note never passes `MAX_NOTE`.
    fn limit_pitch_span(&mut self) {
        let start_note = self.confirmed(ParameterKind::StartNote);
        self.limit(ParameterKind::Octaves, max_octaves(start_note));
        let octaves = self.confirmed(ParameterKind::Octaves);
        self.limit(ParameterKind::StartNote, max_start_note(octaves));
    }

    fn confirmed(&self, kind: ParameterKind) -> u8 {
        self.items
            .iter()
            .find(|item| item.kind == kind)
            .map_or(0, |item| item.control.as_u8())
    }

    fn limit(&mut self, kind: ParameterKind, max: u8) {
        if let Some(item) = self.items.iter_mut().find(|item| item.kind == kind) {
            item.control.set_max(max as i32);
        }
    }

    /// Collect the confirmed item values into a parameter batch.
    ///
    /// Pending edits are not included.
    pub fn parameters(&self) -> Parameters {
        let mut params = Parameters::default();
        for item in &self.items {
            let control = &item.control;
            match item.kind {
                ParameterKind::Scale => {
                    if let Control::Select { index } = *control {
                        params.scale = &SCALE_PATTERNS[index.min(SCALE_PATTERNS.len() - 1)];
                    }
                }
                ParameterKind::CvProbability => params.cv_probability = control.as_u8(),
                ParameterKind::GateProbability => params.gate_probability = control.as_u8(),
                ParameterKind::GateLength => params.gate_length_percent = control.as_u8(),
                ParameterKind::Steps => params.active_length = control.as_u8(),
                ParameterKind::Octaves => params.octaves = control.as_u8(),
                ParameterKind::StartNote => params.set_start_note(control.as_u8()),
                ParameterKind::EraseCv => params.erase_cv = control.as_bool(),
                ParameterKind::EraseGate => params.erase_gate = control.as_bool(),
                ParameterKind::TestScale => params.test_mode = control.as_bool(),
                ParameterKind::TuningScale => params.tuning_mode = control.as_bool(),
            }
        }
        params
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
