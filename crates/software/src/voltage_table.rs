//! Constant tables from which every output voltage is derived.
//!
//! Output levels are expressed in counts of a 12-bit converter referenced to 5 V, so that 819 counts is (very nearly)
//! one volt, and thus one octave at 1 V/oct. Fractional counts are kept; they are truncated by the converter driver.

use measurements::Voltage;

/// Number of scale degrees, i.e., note pads.
pub const DEGREE_COUNT: usize = 8;

/// Number of selectable octaves.
pub const OCTAVE_COUNT: usize = 5;

/// Number of channels reported by the touch sensor.
pub const TOUCH_CHANNEL_COUNT: usize = 12;

/// Largest value the converter accepts.
pub const FULL_SCALE_COUNTS: f32 = 4095.0;

/// Reference voltage of the converter, in volts.
pub const REFERENCE_VOLTS: f32 = 5.0;

/// Pitch-class voltages, one row per scale degree.
///
/// The column is selected by the *inverted* switch bit: an unflipped (or unwired) switch reads as `0` and therefore
/// selects column `1`. Only III, V, VI and VII have switches, so the remaining rows are only ever read from column `1`.
/// Those rows are kept as the instrument has always shipped them: II and VIII sound 0 counts and IV sounds the
/// augmented fourth.
pub const VOLTAGE_TABLE: [[f32; 2]; DEGREE_COUNT] = [
    [0.0, 0.0],       // I
    [136.5, 0.0],     // maj2, n/a
    [204.75, 273.0],  // min3, maj3
    [341.25, 409.5],  // per4, aug4
    [409.5, 477.75],  // dim5, per5
    [546.0, 614.25],  // min6, maj6
    [682.5, 750.75],  // min7, maj7
    [819.0, 0.0],     // VIII
];

/// Offset added to the pitch-class voltage for each octave.
pub const OCTAVE_OFFSETS: [f32; OCTAVE_COUNT] = [0.0, 819.0, 1638.0, 2457.0, 3276.0];

/// Converts converter counts to the [`Voltage`] they produce. Used for diagnostics.
pub fn counts_to_voltage(counts: f32) -> Voltage {
    Voltage::from_volts(f64::from(counts / FULL_SCALE_COUNTS * REFERENCE_VOLTS))
}
