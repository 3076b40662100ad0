//! Driver for the Microchip MCP4921, the 12-bit SPI converter producing the pitch CV.

use embedded_hal::{digital::OutputPin, spi::SpiBus};
use tonic_quantizer_lib::{capability::VoltageOutput, voltage_table::FULL_SCALE_COUNTS};

/// Write to DAC A, unbuffered reference, 1x gain, output enabled.
const COMMAND: u16 = 0b0011 << 12;

/// An MCP4921 with a manually driven, active-low chip select.
pub struct Mcp4921<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> Mcp4921<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Wraps the bus and chip select, leaving the chip deselected.
    pub fn new(spi: SPI, mut cs: CS) -> Self {
        cs.set_high().ok();
        Self { spi, cs }
    }

    fn send(&mut self, code: u16) {
        let word = COMMAND | (code & 0x0FFF);
        self.cs.set_low().ok();
        let sent = self
            .spi
            .write(&word.to_be_bytes())
            .and_then(|_| self.spi.flush());
        self.cs.set_high().ok();

        if sent.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("DAC write of {} failed", code);
        }
    }
}

impl<SPI, CS> VoltageOutput for Mcp4921<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    fn initialize(&mut self) {
        self.send(0);
    }

    fn write(&mut self, counts: f32) {
        // truncation, as the converter only takes whole counts
        let code = counts.clamp(0.0, FULL_SCALE_COUNTS) as u16;
        #[cfg(feature = "defmt")]
        defmt::info!(
            "Sending {} to DAC to achieve a voltage of {}",
            code,
            tonic_quantizer_lib::voltage_table::counts_to_voltage(counts).as_volts()
        );
        self.send(code);
    }
}
