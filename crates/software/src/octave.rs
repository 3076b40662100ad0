//! Provides [`Octave`], the clamped octave selection applied on top of every pitch.

use crate::voltage_table::{OCTAVE_COUNT, OCTAVE_OFFSETS};

/// Which way an octave pad moves the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OctaveDirection {
    /// Toward higher pitches.
    Up,
    /// Toward lower pitches.
    Down,
}

/// The selected octave, always within `0..OCTAVE_COUNT`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Octave(u8);

impl Octave {
    /// The highest selectable octave.
    pub const MAX: u8 = OCTAVE_COUNT as u8 - 1;

    /// Constructs an [`Octave`], saturating at [`Octave::MAX`].
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    /// Returns the octave number.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Steps the octave in the given direction. Requests past either end are ignored.
    ///
    /// Returns `true` if the octave changed.
    pub fn adjust(&mut self, direction: OctaveDirection) -> bool {
        let previous = self.0;
        self.0 = match direction {
            OctaveDirection::Up if self.0 < Self::MAX => self.0 + 1,
            OctaveDirection::Down if self.0 > 0 => self.0 - 1,
            _ => self.0,
        };
        previous != self.0
    }

    /// Returns the voltage offset this octave adds, in converter counts.
    pub fn offset(self) -> f32 {
        OCTAVE_OFFSETS[usize::from(self.0)]
    }
}
