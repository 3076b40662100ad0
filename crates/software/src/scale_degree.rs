//! Provides [`ScaleDegree`] and [`ScaleDegreeState`], which tracks the single degree that is currently sounding.

use crate::voltage_table::DEGREE_COUNT;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

/// One step of the diatonic scale, counted from the tonic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScaleDegree {
    /// Tonic.
    #[default]
    I,
    /// Second.
    II,
    /// Third.
    III,
    /// Fourth.
    IV,
    /// Fifth.
    V,
    /// Sixth.
    VI,
    /// Seventh.
    VII,
    /// Tonic, one octave up.
    VIII,
}

impl ScaleDegree {
    /// Every degree, in ascending order.
    pub const ALL: [ScaleDegree; DEGREE_COUNT] = [
        Self::I,
        Self::II,
        Self::III,
        Self::IV,
        Self::V,
        Self::VI,
        Self::VII,
        Self::VIII,
    ];

    /// Returns the degree at a zero-based position in the scale, if there is one.
    pub fn from_index(index: usize) -> Option<Self> {
        <Self as FromPrimitive>::from_usize(index)
    }

    /// Returns the zero-based position of the degree in the scale, suitable for indexing the voltage table.
    pub fn index(self) -> usize {
        // every variant fits; the enum is fieldless and starts from zero
        self.to_usize().unwrap_or_default()
    }
}

/// Which [`ScaleDegree`] is active. The instrument is monophonic, so at most one is.
///
/// The most recently activated degree is also remembered separately as the "last active" degree. It survives any
/// change to switches or octave and is what gets re-voiced when a switch flips; it only changes on a new press.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaleDegreeState {
    active: [bool; DEGREE_COUNT],
    last: ScaleDegree,
}

impl ScaleDegreeState {
    /// Constructs a [`ScaleDegreeState`] in which nothing is active and the last active degree is the tonic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `degree` as the one and only active degree.
    pub fn activate(&mut self, degree: ScaleDegree) {
        for (index, active) in self.active.iter_mut().enumerate() {
            *active = index == degree.index();
        }
        self.last = degree;
    }

    /// Returns the active degree, or `None` before the first press.
    pub fn active_degree(&self) -> Option<ScaleDegree> {
        self.active
            .iter()
            .position(|&active| active)
            .and_then(ScaleDegree::from_index)
    }

    /// Returns the degree that was activated most recently. Until the first press, this is [`ScaleDegree::I`].
    pub fn last_active(&self) -> ScaleDegree {
        self.last
    }

    /// Projects the state onto the row of degree LEDs: lit for the active degree, dark for the rest.
    pub fn leds(&self) -> [bool; DEGREE_COUNT] {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_from_index() {
        for degree in ScaleDegree::ALL {
            assert_eq!(
                Some(degree),
                ScaleDegree::from_index(degree.index()),
                "Expected left but got right"
            );
        }
        assert_eq!(None, ScaleDegree::from_index(DEGREE_COUNT));
    }

    #[test]
    fn nothing_active_at_power_up() {
        let state = ScaleDegreeState::new();
        assert_eq!(None, state.active_degree(), "Expected left but got right");
        assert_eq!(
            ScaleDegree::I,
            state.last_active(),
            "Expected left but got right"
        );
        assert_eq!([false; DEGREE_COUNT], state.leds());
    }

    #[test]
    fn activation_is_monophonic() {
        let mut state = ScaleDegreeState::new();
        for &first in ScaleDegree::ALL.iter() {
            for &second in ScaleDegree::ALL.iter() {
                state.activate(first);
                state.activate(second);

                let lit: usize = state.leds().iter().filter(|&&on| on).count();
                assert_eq!(1, lit, "Exactly one degree should be active");
                assert_eq!(
                    Some(second),
                    state.active_degree(),
                    "Expected left but got right"
                );
                assert!(state.leds()[second.index()]);
            }
        }
    }

    #[test]
    fn last_active_follows_activation() {
        let mut state = ScaleDegreeState::new();
        state.activate(ScaleDegree::VI);
        assert_eq!(
            ScaleDegree::VI,
            state.last_active(),
            "Expected left but got right"
        );
        state.activate(ScaleDegree::II);
        assert_eq!(
            ScaleDegree::II,
            state.last_active(),
            "Expected left but got right"
        );
    }
}
