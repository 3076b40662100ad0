//! The pitch computation proper: a table lookup plus an octave offset.

use crate::{
    octave::Octave,
    scale_degree::ScaleDegree,
    voltage_table::VOLTAGE_TABLE,
};

/// Returns the output level, in converter counts, for `degree` in `octave` with the degree's switch reading
/// `switch_bit`.
///
/// The switch bit is inverted before it selects the table column. The toggles are wired so that a switch at rest reads
/// low, and at rest column `1` must sound.
pub fn compute(degree: ScaleDegree, switch_bit: bool, octave: Octave) -> f32 {
    let column = usize::from(!switch_bit);
    VOLTAGE_TABLE[degree.index()][column] + octave.offset()
}
