//! Tonic Quantizer is [Embassy](https://embassy.dev)-based firmware for a touch-plate pitch quantizer. Eight capacitive
//! plates play the degrees of a diatonic scale over a 1 V/oct control voltage and a gate; four toggle switches flatten
//! the third, fifth, sixth and seventh; two further plates shift the scale by octaves. The firmware runs on the
//! [Nucleo-F767ZI development board](https://www.st.com/en/evaluation-tools/nucleo-f767zi.html) with an MPR121 touch
//! controller on I2C and an MCP4921 converter on SPI.
//!
//! All of the musical behavior lives in `tonic_quantizer_lib`; this crate only assigns pins, provides the two
//! device drivers, and runs the polling loop.

#![no_std]
#![no_main]

mod dac;
mod touch;

use crate::{dac::Mcp4921, touch::Mpr121};
use embassy_executor::Spawner;
use embassy_stm32::{
    Config,
    gpio::{Input, Level, Output, Pull, Speed},
    i2c::{self, I2c},
    mode::Blocking,
    spi::{self, Spi},
    time::Hertz,
};
use embassy_time::Delay;
use tonic_quantizer_lib::{configuration::Config as QuantizerConfig, engine::Engine};

#[cfg(feature = "defmt-rtt")]
use defmt_rtt as _;
#[cfg(not(feature = "panic-probe"))]
use panic_halt as _;
#[cfg(feature = "panic-probe")]
use panic_probe as _;

type TouchPlates = Mpr121<I2c<'static, Blocking, i2c::Master>, Delay>;
type Converter = Mcp4921<Spi<'static, Blocking>, Output<'static>>;
type Quantizer = Engine<TouchPlates, Converter, Output<'static>, Input<'static>, Output<'static>>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    defmt::info!("Initializing Tonic Quantizer");

    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        // hse: high-speed external clock, supplied by the ST-LINK's MCO
        config.rcc.hse = Some(Hse {
            freq: Hertz(8_000_000),
            mode: HseMode::Bypass,
        });

        // pll: phase-locked loop
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL216,
            divp: Some(PllPDiv::DIV2), // 8mhz / 4 * 216 / 2 = 216Mhz
            divq: None,
            divr: None,
        });
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;
        config.rcc.sys = Sysclk::PLL1_P;
    }
    let p = embassy_stm32::init(config);

    // MPR121 breakout on the Arduino header's I2C pins: SCL on D15, SDA on D14
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = Hertz(100_000);
    let i2c = I2c::new_blocking(p.I2C1, p.PB8, p.PB9, i2c_config);
    let touch = Mpr121::new(i2c, Delay);

    // MCP4921 on SPI1: SCK on D13, SDI on D11, chip select on D10
    let mut spi_config = spi::Config::default();
    spi_config.frequency = Hertz(1_000_000);
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PA5, p.PA7, spi_config);
    let dac = Mcp4921::new(spi, Output::new(p.PD14, Level::High, Speed::VeryHigh));

    // gate jack driver on D12, free because the converter bus is transmit-only
    let gate = Output::new(p.PA6, Level::Low, Speed::Low);

    // III, V, VI, VII: A3, A2, A1, A0
    let switches = [
        Input::new(p.PF3, Pull::None),
        Input::new(p.PC3, Pull::None),
        Input::new(p.PC0, Pull::None),
        Input::new(p.PA3, Pull::None),
    ];

    // I through VIII: D2 through D9
    let leds = [
        Output::new(p.PF15, Level::Low, Speed::Low),
        Output::new(p.PE13, Level::Low, Speed::Low),
        Output::new(p.PF14, Level::Low, Speed::Low),
        Output::new(p.PE11, Level::Low, Speed::Low),
        Output::new(p.PE9, Level::Low, Speed::Low),
        Output::new(p.PF13, Level::Low, Speed::Low),
        Output::new(p.PF12, Level::Low, Speed::Low),
        Output::new(p.PD15, Level::Low, Speed::Low),
    ];

    let quantizer = match Engine::init(touch, dac, gate, switches, leds, QuantizerConfig::default()) {
        Ok(quantizer) => quantizer,
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::error!("MPR121 not found, check wiring? {}", _e);
            halt();
        }
    };

    #[cfg(feature = "defmt")]
    defmt::info!("Tonic Quantizer ready");

    spawner.must_spawn(poll(quantizer));
}

/// Task running the quantizer. Each cycle runs to completion; control is handed back to the executor between cycles,
/// but there is no delay.
#[embassy_executor::task]
async fn poll(mut quantizer: Quantizer) -> ! {
    loop {
        quantizer.cycle();
        embassy_futures::yield_now().await;
    }
}

/// Parks the core for good. The only way out is a reset or power cycle.
fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
