//! Driver for the NXP MPR121 capacitive touch controller, as wired to the twelve touch plates.

use embedded_hal::{delay::DelayNs, i2c::I2c};
use tonic_quantizer_lib::capability::TouchSensor;

const TOUCH_STATUS_L: u8 = 0x00;
const MHD_RISING: u8 = 0x2B;
const TOUCH_THRESHOLD_0: u8 = 0x41;
const DEBOUNCE: u8 = 0x5B;
const CONFIG1: u8 = 0x5C;
const CONFIG2: u8 = 0x5D;
const ELECTRODE_CONFIG: u8 = 0x5E;
const SOFT_RESET: u8 = 0x80;

/// Value CONFIG2 holds after a soft reset; anything else means something other than an MPR121 answered.
const CONFIG2_RESET_VALUE: u8 = 0x24;

const ELECTRODES: u8 = 12;
const TOUCH_THRESHOLD: u8 = 12;
const RELEASE_THRESHOLD: u8 = 6;

/// Baseline/filter registers from MHD rising (0x2B) through FDL touched (0x35), in order.
const FILTER_DEFAULTS: [u8; 11] = [
    0x01, 0x01, 0x0E, 0x00, // rising: MHD, NHD, NCL, FDL
    0x01, 0x05, 0x01, 0x00, // falling: MHD, NHD, NCL, FDL
    0x00, 0x00, 0x00, // touched: NHD, NCL, FDL
];

/// Errors that can occur while bringing the MPR121 up.
#[derive(Debug)]
pub enum Mpr121Error<E> {
    /// Underlying I2C bus error.
    I2c(E),
    /// A device answered but did not look like an MPR121 after reset.
    UnexpectedConfig(u8),
}

impl<E> From<E> for Mpr121Error<E> {
    fn from(error: E) -> Self {
        Mpr121Error::I2c(error)
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Mpr121Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Mpr121Error::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            Mpr121Error::UnexpectedConfig(v) => {
                defmt::write!(f, "unexpected CONFIG2 value {=u8:#x}", v)
            }
        }
    }
}

/// An MPR121 on an I2C bus.
pub struct Mpr121<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    last_reading: u16,
}

impl<I2C, D> Mpr121<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Wraps the bus. Nothing is sent until [`TouchSensor::initialize`] is called.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: 0,
            last_reading: 0,
        }
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut buf = [0_u8; 1];
        self.i2c.write_read(self.address, &[register], &mut buf)?;
        Ok(buf[0])
    }

    fn touch_status(&mut self) -> Result<u16, I2C::Error> {
        let mut buf = [0_u8; 2];
        self.i2c
            .write_read(self.address, &[TOUCH_STATUS_L], &mut buf)?;
        Ok(u16::from_le_bytes(buf) & 0x0FFF)
    }
}

impl<I2C, D> TouchSensor for Mpr121<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = Mpr121Error<I2C::Error>;

    fn initialize(&mut self, address: u8) -> Result<(), Self::Error> {
        self.address = address;

        self.write_register(SOFT_RESET, 0x63)?;
        self.delay.delay_ms(1);
        // electrodes must be stopped while configuring
        self.write_register(ELECTRODE_CONFIG, 0x00)?;

        let config2 = self.read_register(CONFIG2)?;
        if config2 != CONFIG2_RESET_VALUE {
            return Err(Mpr121Error::UnexpectedConfig(config2));
        }

        for electrode in 0..ELECTRODES {
            self.write_register(TOUCH_THRESHOLD_0 + 2 * electrode, TOUCH_THRESHOLD)?;
            self.write_register(TOUCH_THRESHOLD_0 + 2 * electrode + 1, RELEASE_THRESHOLD)?;
        }
        for (offset, value) in (0_u8..).zip(FILTER_DEFAULTS) {
            self.write_register(MHD_RISING + offset, value)?;
        }
        self.write_register(DEBOUNCE, 0x00)?;
        // 16 uA charge current
        self.write_register(CONFIG1, 0x10)?;
        // 0.5 us charge time, 1 ms sample interval
        self.write_register(CONFIG2, 0x20)?;

        // baseline tracking on, all twelve electrodes running
        self.write_register(ELECTRODE_CONFIG, 0x80 | ELECTRODES)?;
        Ok(())
    }

    fn read(&mut self) -> u16 {
        match self.touch_status() {
            Ok(reading) => self.last_reading = reading,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Touch status read failed; reusing previous reading");
            }
        }
        self.last_reading
    }
}
