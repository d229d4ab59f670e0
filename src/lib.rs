//! Blocking driver for the STPM32 energy metering IC, built on `embedded-hal` 1.0.
//!
//! [`StpmSpiDriver`] handles the SPI frame protocol and the reset sequence,
//! [`Stpm`] turns the data registers into calibrated RMS voltage, RMS current,
//! active power and active energy.
//!
//! ```ignore
//! let driver = StpmSpiDriver::new(spi, scs, en, Some(syn), delay, SpiSettings::default())?;
//! let mut stpm = Stpm::new(driver, StpmConfiguration::default())?;
//! stpm.init()?;
//! let (voltage, current) = stpm.read_rms(1)?;
//! let energy = stpm.read_active_energy(0)?;
//! ```

#![cfg_attr(not(test), no_std)]

pub mod calibration;
pub mod chip;
pub mod driver;
pub mod fields;
mod sample;

pub use calibration::{Calibration, ChannelCalibration};
pub use chip::{Channel, LatchMode, LineFrequency, Stpm, StpmConfiguration, StpmError};
pub use driver::spi::{NoPin, SpiSettings, StpmSpiDriver, StpmSpiError, MAX_SPI_FREQUENCY};
pub use driver::{Frame, StpmDriver};
pub use sample::ChannelReading;
