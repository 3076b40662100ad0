//! Provides the [`Gate`], which signals to the synthesizer whether a note is being held.

/// The level of the gate output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateState {
    /// When the gate is high, the instrument will sound.
    High,
    /// When the gate is low, the instrument will rest.
    #[default]
    Low,
}

/// Note-on/note-off signal derived from touch edges. It starts low.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gate {
    state: GateState,
}

impl Gate {
    /// Constructs a low [`Gate`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the gate.
    pub fn raise(&mut self) {
        self.state = GateState::High;
    }

    /// Closes the gate.
    pub fn lower(&mut self) {
        self.state = GateState::Low;
    }

    /// Returns the state the gate is in.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Convenience function to test whether gate is currently high.
    pub fn is_high(&self) -> bool {
        self.state == GateState::High
    }
}
