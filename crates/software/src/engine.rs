//! Wires the peripherals to a [`QuantizerState`] and runs it one polling cycle at a time.

use crate::{
    capability::{TouchSensor, VoltageOutput},
    configuration::Config,
    error::Error,
    state::{Operation, QuantizerState},
    switches::SWITCH_COUNT,
    voltage_table::DEGREE_COUNT,
};
use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// The quantizer with its peripherals attached.
///
/// Pin errors are discarded: on the hardware this targets, GPIO access cannot fail.
pub struct Engine<T, V, G, S, L> {
    touch: T,
    dac: V,
    gate: G,
    switches: [S; SWITCH_COUNT],
    leds: [L; DEGREE_COUNT],
    state: QuantizerState,
}

impl<T, V, G, S, L> Engine<T, V, G, S, L>
where
    T: TouchSensor,
    V: VoltageOutput,
    G: OutputPin,
    S: InputPin,
    L: OutputPin,
{
    /// Brings up the peripherals and returns an [`Engine`] ready to [`cycle`][Self::cycle].
    ///
    /// Switch pins are expected in the order of [`SWITCH_BOUND_DEGREES`][crate::switches::SWITCH_BOUND_DEGREES] and
    /// LED pins in scale order.
    ///
    /// # Errors
    /// * [`Error::TouchSensor`] if the touch sensor does not come up. Nothing else is touched in that case.
    pub fn init(
        mut touch: T,
        mut dac: V,
        mut gate: G,
        switches: [S; SWITCH_COUNT],
        mut leds: [L; DEGREE_COUNT],
        config: Config,
    ) -> Result<Self, Error<T::Error>> {
        touch.initialize(config.touch_address)?;
        #[cfg(feature = "defmt")]
        defmt::info!("Touch sensor found at {=u8:#x}", config.touch_address);

        dac.initialize();
        gate.set_low().ok();
        for led in leds.iter_mut() {
            led.set_low().ok();
        }

        Ok(Self {
            touch,
            dac,
            gate,
            switches,
            leds,
            state: QuantizerState::new(config.gate_release),
        })
    }

    /// Samples the switches and the touch sensor, updates state, and refreshes whichever outputs the update affected.
    pub fn cycle(&mut self) -> Operation {
        let mut levels = [false; SWITCH_COUNT];
        for (level, pin) in levels.iter_mut().zip(self.switches.iter_mut()) {
            *level = pin.is_high().unwrap_or(false);
        }
        let raw_touch = self.touch.read();

        let operation = self.state.update(raw_touch, levels);

        if operation.contains(Operation::VoltageChange) {
            self.dac.write(self.state.voltage());
        }
        if operation.contains(Operation::GateChange) {
            self.gate
                .set_state(PinState::from(self.state.gate().is_high()))
                .ok();
        }
        if operation.contains(Operation::LedChange) {
            for (led, on) in self.leds.iter_mut().zip(self.state.scale_degrees().leds()) {
                led.set_state(PinState::from(on)).ok();
            }
        }

        operation
    }

    /// Returns the state as of the latest cycle.
    pub fn state(&self) -> &QuantizerState {
        &self.state
    }
}
