//! Build-time settings for the quantizer. There is no persistence; every power-up starts from [`Config::default`].

/// I2C address of the MPR121 touch controller with its ADDR pin tied to ground.
pub const DEFAULT_TOUCH_ADDRESS: u8 = 0x5A;

/// Determines which touch releases close the gate.
///
/// The instrument has historically closed the gate when *any* pad is let go, octave pads included, so that
/// shifting the octave while holding a note cuts the note off. Whether that is intended has not been settled, so
/// both behaviors are available.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateRelease {
    /// Releasing any of the twelve pads closes the gate.
    #[default]
    AnyChannel,
    /// Only releasing one of the eight note pads closes the gate.
    NoteChannels,
}

/// Settings fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// I2C address at which the touch controller is expected.
    pub touch_address: u8,
    /// Which releases close the gate.
    pub gate_release: GateRelease,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            touch_address: DEFAULT_TOUCH_ADDRESS,
            gate_release: GateRelease::default(),
        }
    }
}
