//! The narrow interfaces through which the quantizer reaches its peripherals.
//!
//! Digital inputs and outputs (switches, LEDs, the gate line) go through [`embedded_hal::digital`] directly; the touch
//! sensor and the converter get traits of their own since their bring-up is device-specific.

/// A capacitive touch sensor reporting one bit per channel.
pub trait TouchSensor {
    /// Error reported when the sensor cannot be brought up.
    type Error;

    /// Brings the sensor up at the given bus address.
    fn initialize(&mut self, address: u8) -> Result<(), Self::Error>;

    /// Returns the current touch bitmask. Bit `n` is set while channel `n` is touched.
    ///
    /// Implementations are expected to paper over transient bus trouble (e.g., by returning the previous reading), as
    /// the quantizer has no way to recover from a failed read.
    fn read(&mut self) -> u16;
}

/// A converter producing the control voltage.
pub trait VoltageOutput {
    /// Prepares the converter for writes.
    fn initialize(&mut self);

    /// Sets the output, in converter counts. Fractional counts may be truncated.
    fn write(&mut self, counts: f32);
}
