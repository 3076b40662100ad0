//! This crate contains architecture-agnostic logic for the Tonic Quantizer, a touch-plate controller which turns
//! presses on eight capacitive pads into a quantized [1 V/oct](https://en.wikipedia.org/wiki/CV/gate) control voltage
//! and a gate signal for a monophonic synthesizer.
//!
//! Each pad is a degree of a diatonic scale; toggle switches select the altered (flattened) variant of the degrees
//! that have one, and two further pads shift the whole scale up or down by an octave. Everything that touches actual
//! hardware is reached through the traits in [`capability`], so the whole cycle can be exercised on the host.

#![deny(missing_docs)]
#![no_std]

pub mod capability;
pub mod configuration;
pub mod engine;
pub mod error;
pub mod gate;
pub mod octave;
pub mod quantizer;
pub mod scale_degree;
pub mod state;
pub mod switches;
pub mod touch;
pub mod voltage_table;
