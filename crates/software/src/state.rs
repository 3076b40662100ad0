//! The complete state of the quantizer, updated once per polling cycle.

use crate::{
    configuration::GateRelease,
    gate::Gate,
    octave::Octave,
    quantizer,
    scale_degree::{ScaleDegree, ScaleDegreeState},
    switches::{SWITCH_COUNT, SwitchBank, SwitchScanner},
    touch::{ChannelRole, TouchChannel, TouchScanner},
};
use bitmask_enum::bitmask;

/// Operations that may be performed during a state update.
#[bitmask(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// The output voltage was recomputed and should be written out.
    VoltageChange,
    /// A touch edge drove the gate; it should be written out, even if its level did not change.
    GateChange,
    /// The octave moved. Nothing needs writing; the new octave is heard on the next voltage change.
    OctaveChange,
    /// The active degree changed, so the degree LEDs should be refreshed.
    LedChange,
}

/// Everything the quantizer remembers between cycles.
///
/// Touch and switch snapshots are replaced wholesale each cycle. The active degree only changes on a note press and the
/// octave only on an octave press; both persist across everything else. Nothing here survives a power cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuantizerState {
    touch: TouchScanner,
    switches: SwitchScanner,
    octave: Octave,
    scale_degrees: ScaleDegreeState,
    gate: Gate,
    voltage: f32,
    gate_release: GateRelease,
}

impl QuantizerState {
    /// Constructs the power-up state: nothing touched, every switch low, lowest octave, gate closed, 0 V.
    pub fn new(gate_release: GateRelease) -> Self {
        Self {
            gate_release,
            ..Self::default()
        }
    }

    /// Runs one cycle given this cycle's raw touch bitmask and switch levels. Returns the [`Operation`]s performed so
    /// the caller knows which outputs to refresh.
    ///
    /// Switches are handled first: if any moved, the last active degree is re-voiced. Touch edges are then handled in
    /// ascending channel order, each channel's press before its release.
    pub fn update(&mut self, raw_touch: u16, switch_levels: [bool; SWITCH_COUNT]) -> Operation {
        let mut operation = Operation::none();

        if self.switches.scan(switch_levels) {
            #[cfg(feature = "defmt")]
            defmt::info!("Switch bank changed to {=u8:b}", self.switches.bank().bits());
            self.revoice(self.scale_degrees.last_active());
            operation |= Operation::VoltageChange;
        }

        let edges = self.touch.scan(raw_touch);
        for channel in TouchChannel::all() {
            if edges.is_pressed(channel) {
                #[cfg(feature = "defmt")]
                defmt::debug!("{} touched", channel.number());

                match channel.role() {
                    ChannelRole::Note(degree) => {
                        self.gate.raise();
                        self.scale_degrees.activate(degree);
                        self.revoice(degree);
                        operation |= Operation::GateChange | Operation::LedChange | Operation::VoltageChange;
                    }
                    ChannelRole::Octave(direction) => {
                        if self.octave.adjust(direction) {
                            #[cfg(feature = "defmt")]
                            defmt::info!("Octave is now {}", self.octave.value());
                            operation |= Operation::OctaveChange;
                        }
                    }
                    ChannelRole::Unassigned => {}
                }
            }

            if edges.is_released(channel) {
                let closes_gate = match self.gate_release {
                    GateRelease::AnyChannel => true,
                    GateRelease::NoteChannels => channel.is_note(),
                };
                if closes_gate {
                    self.gate.lower();
                    operation |= Operation::GateChange;
                }

                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "{} released; voltage {} counts ({} V), octave {}",
                    channel.number(),
                    self.voltage,
                    crate::voltage_table::counts_to_voltage(self.voltage).as_volts(),
                    self.octave.value()
                );
            }
        }

        operation
    }

    /// Recomputes the output for `degree` using the current switches and octave.
    fn revoice(&mut self, degree: ScaleDegree) {
        let switch_bit = self.switches.bank().is_set(degree);
        self.voltage = quantizer::compute(degree, switch_bit, self.octave);
    }

    /// Returns the most recently computed output level, in converter counts.
    pub fn voltage(&self) -> f32 {
        self.voltage
    }

    /// Returns the gate.
    pub fn gate(&self) -> Gate {
        self.gate
    }

    /// Returns the selected octave.
    pub fn octave(&self) -> Octave {
        self.octave
    }

    /// Returns which degree is active.
    pub fn scale_degrees(&self) -> ScaleDegreeState {
        self.scale_degrees
    }

    /// Returns the switch bank as of the latest cycle.
    pub fn switches(&self) -> SwitchBank {
        self.switches.bank()
    }

    /// Returns the touch snapshot as of the latest cycle.
    pub fn touch(&self) -> u16 {
        self.touch.previous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gate::GateState,
        voltage_table::{OCTAVE_OFFSETS, VOLTAGE_TABLE},
    };

    const NO_SWITCHES: [bool; SWITCH_COUNT] = [false; SWITCH_COUNT];
    // the III switch is the first one read
    const III_SWITCH: [bool; SWITCH_COUNT] = [true, false, false, false];

    const fn pad(channel: u8) -> u16 {
        1 << channel
    }

    #[test]
    fn note_press_opens_gate_and_voices_degree() {
        let mut state = QuantizerState::default();
        let operation = state.update(pad(1), NO_SWITCHES);

        assert!(operation.contains(Operation::VoltageChange | Operation::GateChange | Operation::LedChange));
        assert_eq!(GateState::High, state.gate().state(), "Expected left but got right");
        assert_eq!(
            Some(ScaleDegree::I),
            state.scale_degrees().active_degree(),
            "Expected left but got right"
        );
        assert_eq!(
            VOLTAGE_TABLE[0][1] + OCTAVE_OFFSETS[0],
            state.voltage(),
            "Expected left but got right"
        );
    }

    #[test]
    fn switch_flip_revoices_active_degree_without_touching_gate() {
        let mut state = QuantizerState::default();
        state.update(pad(3), NO_SWITCHES);
        let gate_before = state.gate();

        let operation = state.update(pad(3), III_SWITCH);

        assert_eq!(Operation::VoltageChange, operation, "Expected left but got right");
        assert_eq!(
            VOLTAGE_TABLE[2][0] + OCTAVE_OFFSETS[0],
            state.voltage(),
            "Expected left but got right"
        );
        assert_eq!(
            Some(ScaleDegree::III),
            state.scale_degrees().active_degree(),
            "Expected left but got right"
        );
        assert_eq!(gate_before, state.gate(), "Expected left but got right");
    }

    #[test]
    fn release_closes_gate_and_keeps_degree() {
        let mut state = QuantizerState::default();
        state.update(pad(1), NO_SWITCHES);
        assert!(state.gate().is_high());

        let operation = state.update(0, NO_SWITCHES);

        assert_eq!(Operation::GateChange, operation, "Expected left but got right");
        assert_eq!(GateState::Low, state.gate().state(), "Expected left but got right");
        assert_eq!(
            Some(ScaleDegree::I),
            state.scale_degrees().active_degree(),
            "Release should not deactivate the degree"
        );
    }

    #[test]
    fn octave_presses_clamp_and_defer_revoicing() {
        let mut state = QuantizerState::default();
        state.update(pad(5), NO_SWITCHES);
        let voltage = state.voltage();

        // climb to octave 3
        for _ in 0..3 {
            state.update(pad(10), NO_SWITCHES);
            state.update(0, NO_SWITCHES);
        }
        assert_eq!(3, state.octave().value(), "Expected left but got right");

        let operation = state.update(pad(10), NO_SWITCHES);
        assert_eq!(Operation::OctaveChange, operation, "Expected left but got right");
        assert_eq!(4, state.octave().value(), "Expected left but got right");
        state.update(0, NO_SWITCHES);

        let operation = state.update(pad(10), NO_SWITCHES);
        assert!(operation.is_none(), "Clamped press should do nothing");
        assert_eq!(4, state.octave().value(), "Expected left but got right");

        assert_eq!(voltage, state.voltage(), "Octave alone should not revoice");

        state.update(0, NO_SWITCHES);
        state.update(pad(5), NO_SWITCHES);
        assert_eq!(
            VOLTAGE_TABLE[4][1] + OCTAVE_OFFSETS[4],
            state.voltage(),
            "Expected left but got right"
        );
    }

    #[test]
    fn octave_down_at_floor_is_ignored() {
        let mut state = QuantizerState::default();
        let operation = state.update(pad(9), NO_SWITCHES);
        assert!(operation.is_none());
        assert_eq!(Octave::default(), state.octave(), "Expected left but got right");
    }

    #[test]
    fn reserved_channels_do_nothing_on_press() {
        let mut state = QuantizerState::default();
        let operation = state.update(pad(0) | pad(11), NO_SWITCHES);
        assert!(operation.is_none());
        assert!(!state.gate().is_high());
        assert_eq!(None, state.scale_degrees().active_degree());
    }

    #[test]
    fn any_release_closes_gate_by_default() {
        let mut state = QuantizerState::new(GateRelease::AnyChannel);
        state.update(pad(2) | pad(10), NO_SWITCHES);
        let operation = state.update(pad(2), NO_SWITCHES);
        assert!(operation.contains(Operation::GateChange));
        assert!(!state.gate().is_high(), "Octave release should close the gate");
    }

    #[test]
    fn only_note_releases_close_gate_when_configured() {
        let mut state = QuantizerState::new(GateRelease::NoteChannels);
        state.update(pad(2) | pad(10), NO_SWITCHES);
        let operation = state.update(pad(2), NO_SWITCHES);
        assert!(!operation.contains(Operation::GateChange));
        assert!(state.gate().is_high(), "Octave release should leave the gate open");

        state.update(0, NO_SWITCHES);
        assert!(!state.gate().is_high(), "Note release should close the gate");
    }

    #[test]
    fn switch_change_before_any_touch_revoices_tonic() {
        let mut state = QuantizerState::default();
        let operation = state.update(0, [false, false, false, true]);
        assert_eq!(Operation::VoltageChange, operation, "Expected left but got right");
        assert_eq!(
            VOLTAGE_TABLE[0][1],
            state.voltage(),
            "Expected left but got right"
        );
        assert_eq!(None, state.scale_degrees().active_degree());
    }

    #[test]
    fn switch_for_other_degree_revoices_active_one() {
        let mut state = QuantizerState::default();
        state.update(pad(6), NO_SWITCHES);
        let voltage = state.voltage();

        // the III switch has no bearing on degree VI
        let operation = state.update(pad(6), III_SWITCH);
        assert!(operation.contains(Operation::VoltageChange));
        assert_eq!(voltage, state.voltage(), "Expected left but got right");
        assert_eq!(
            SwitchBank::from_levels(III_SWITCH),
            state.switches(),
            "Expected left but got right"
        );
    }

    #[test]
    fn later_channel_wins_within_one_cycle() {
        let mut state = QuantizerState::default();
        state.update(pad(2), NO_SWITCHES);

        // channel 2 released while channels 4 and 7 are pressed in the same cycle
        state.update(pad(4) | pad(7), NO_SWITCHES);

        assert!(state.gate().is_high(), "Press after the release reopens the gate");
        assert_eq!(
            Some(ScaleDegree::VII),
            state.scale_degrees().active_degree(),
            "Expected left but got right"
        );
        assert_eq!(
            VOLTAGE_TABLE[6][1],
            state.voltage(),
            "Expected left but got right"
        );
        assert_eq!(pad(4) | pad(7), state.touch(), "Expected left but got right");
    }

    #[test]
    fn release_after_press_on_higher_channel_closes_gate() {
        let mut state = QuantizerState::default();
        state.update(pad(8), NO_SWITCHES);

        // channel 3 pressed, channel 8 released: the release is handled last
        state.update(pad(3), NO_SWITCHES);

        assert!(!state.gate().is_high());
        assert_eq!(
            Some(ScaleDegree::III),
            state.scale_degrees().active_degree(),
            "Expected left but got right"
        );
    }
}
