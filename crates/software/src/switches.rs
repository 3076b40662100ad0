//! Provides the [`SwitchBank`] of accidental toggles and the [`SwitchScanner`] which detects changes to it.

use crate::scale_degree::ScaleDegree;

/// Number of physical toggle switches.
pub const SWITCH_COUNT: usize = 4;

/// The degrees that have a toggle switch wired to them, in the order their inputs are read.
pub const SWITCH_BOUND_DEGREES: [ScaleDegree; SWITCH_COUNT] = [
    ScaleDegree::III,
    ScaleDegree::V,
    ScaleDegree::VI,
    ScaleDegree::VII,
];

/// Bitmask with one bit per scale degree; a set bit means the degree's switch reads high.
///
/// Only bits belonging to [`SWITCH_BOUND_DEGREES`] can ever be set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchBank(u8);

impl SwitchBank {
    const WIRED: u8 = {
        let mut mask = 0;
        let mut i = 0;
        while i < SWITCH_COUNT {
            mask |= 1 << SWITCH_BOUND_DEGREES[i] as u8;
            i += 1;
        }
        mask
    };

    /// Constructs a [`SwitchBank`] from a raw bitmask, clearing any unwired position.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::WIRED)
    }

    /// Constructs a [`SwitchBank`] from input levels ordered as [`SWITCH_BOUND_DEGREES`].
    pub fn from_levels(levels: [bool; SWITCH_COUNT]) -> Self {
        let bits = SWITCH_BOUND_DEGREES
            .iter()
            .zip(levels)
            .filter(|(_, high)| *high)
            .fold(0_u8, |bits, (degree, _)| bits | 1 << degree.index());
        Self(bits)
    }

    /// Returns the raw bitmask.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns the switch bit for `degree`: `true` if its switch reads high. Unwired degrees always read `false`.
    pub fn is_set(self, degree: ScaleDegree) -> bool {
        self.0 & (1 << degree.index()) != 0
    }
}

/// Reads the toggle switches each cycle and reports whether anything moved since the previous cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchScanner {
    previous: SwitchBank,
}

impl SwitchScanner {
    /// Constructs a [`SwitchScanner`] which assumes every switch starts low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records this cycle's switch levels, returning `true` if they differ from the previous cycle's.
    pub fn scan(&mut self, levels: [bool; SWITCH_COUNT]) -> bool {
        let current = SwitchBank::from_levels(levels);
        let changed = current != self.previous;
        self.previous = current;
        changed
    }

    /// Returns the bank as of the most recent scan.
    pub fn bank(&self) -> SwitchBank {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_land_on_bound_degrees() {
        let bank = SwitchBank::from_levels([true, false, true, true]);
        assert_eq!(0b0110_0100, bank.bits(), "Expected left but got right");
        assert!(bank.is_set(ScaleDegree::III));
        assert!(!bank.is_set(ScaleDegree::V));
        assert!(bank.is_set(ScaleDegree::VI));
        assert!(bank.is_set(ScaleDegree::VII));
    }

    #[test]
    fn unwired_positions_read_low() {
        let bank = SwitchBank::from_bits(0xFF);
        assert_eq!(0b0111_0100, bank.bits(), "Expected left but got right");
        for degree in [ScaleDegree::I, ScaleDegree::II, ScaleDegree::IV, ScaleDegree::VIII] {
            assert!(!bank.is_set(degree), "Unwired degree should read low");
        }
    }

    #[test]
    fn scan_reports_changes_only() {
        let mut scanner = SwitchScanner::new();
        assert!(!scanner.scan([false; SWITCH_COUNT]), "Nothing moved yet");
        assert!(scanner.scan([false, true, false, false]), "A switch moved");
        assert!(!scanner.scan([false, true, false, false]), "Nothing moved since");
        assert_eq!(
            SwitchBank::from_bits(0b0001_0000),
            scanner.bank(),
            "Expected left but got right"
        );
        assert!(scanner.scan([false; SWITCH_COUNT]), "Switch moved back");
        assert_eq!(SwitchBank::default(), scanner.bank());
    }
}
