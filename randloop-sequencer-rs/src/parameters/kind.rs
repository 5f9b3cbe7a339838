use core::fmt;

/// Number of distinct parameters.
pub const PARAMETER_COUNT: usize = 11;

/// Identifies one user-editable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterKind {
    Scale,
    CvProbability,
    GateProbability,
    GateLength,
    Steps,
    Octaves,
    StartNote,
    EraseCv,
    EraseGate,
    TestScale,
    TuningScale,
}

impl ParameterKind {
    /// Every kind, in menu order.
    pub const ALL: [ParameterKind; PARAMETER_COUNT] = [
        ParameterKind::Scale,
        ParameterKind::CvProbability,
        ParameterKind::GateProbability,
        ParameterKind::GateLength,
        ParameterKind::Steps,
        ParameterKind::Octaves,
        ParameterKind::StartNote,
        ParameterKind::EraseCv,
        ParameterKind::EraseGate,
        ParameterKind::TestScale,
        ParameterKind::TuningScale,
    ];

    /// Short label as shown on the menu.
    pub fn label(self) -> &'static str {
        match self {
            ParameterKind::Scale => "Scale",
            ParameterKind::CvProbability => "CVProb",
            ParameterKind::GateProbability => "TrigProb",
            ParameterKind::GateLength => "TrgLngth%",
            ParameterKind::Steps => "Steps",
            ParameterKind::Octaves => "Octaves",
            ParameterKind::StartNote => "Start note",
            ParameterKind::EraseCv => "CvErase",
            ParameterKind::EraseGate => "TrigErase",
            ParameterKind::TestScale => "TestScale",
            ParameterKind::TuningScale => "TuningScale",
        }
    }
}

/// Current value of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterValue {
    /// Scale pattern name.
    Scale(&'static str),
    Number(u8),
    Flag(bool),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParameterValue::Scale(name) => write!(f, "{}", name),
            ParameterValue::Number(n) => write!(f, "{}", n),
            ParameterValue::Flag(true) => write!(f, "On"),
            ParameterValue::Flag(false) => write!(f, "Off"),
        }
    }
}
