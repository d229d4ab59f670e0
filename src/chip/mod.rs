mod registers;
pub use registers::{register_for, Channel, Quantity, Reg};

mod configuration;
pub use configuration::*;

mod latch;
pub use latch::software_latch_frame;

use core::fmt;

use log::{debug, info, warn};

use crate::calibration::{self, ChannelCalibration};
use crate::driver::StpmDriver;
use crate::fields;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StpmError<E> {
    /// error of the underlying transport
    Driver(E),
    /// channel number without the requested register, nothing was sent
    InvalidChannel(u8),
    /// calibration multipliers must be positive and finite
    InvalidCalibration,
}

impl<E: fmt::Debug> fmt::Display for StpmError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StpmError::Driver(e) => write!(f, "STPM transport error: {e:?}"),
            StpmError::InvalidChannel(ch) => write!(f, "invalid STPM channel {ch}"),
            StpmError::InvalidCalibration => write!(f, "invalid calibration factor"),
        }
    }
}

/// Handle to one STPM32 chip.
pub struct Stpm<D: StpmDriver> {
    driver: D,
    config: StpmConfiguration,
}

impl<D: StpmDriver> Stpm<D> {
    pub fn new(driver: D, mut config: StpmConfiguration) -> Result<Self, StpmError<D::Error>> {
        if !config.calibration.is_valid() {
            return Err(StpmError::InvalidCalibration);
        }
        if config.latch_mode == LatchMode::SyncPin && !driver.has_syn_pin() {
            warn!("stpm has no SYN pin, latching through DSP_CR3 instead");
            config.latch_mode = LatchMode::Software;
        }
        Ok(Self { driver, config })
    }

    /// Resets the chip and its SPI peripheral. Can be repeated at any time; the
    /// chip sends no handshake, so a missing chip is not detected here.
    pub fn init(&mut self) -> Result<(), StpmError<D::Error>> {
        self.driver.hardware_reset().map_err(StpmError::Driver)?;
        info!(
            "stpm initialized ({:?}, {:?} latch)",
            self.config.line_frequency, self.config.latch_mode
        );
        Ok(())
    }

    pub fn config(&self) -> &StpmConfiguration {
        &self.config
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn release(self) -> D {
        self.driver
    }

    /// same multipliers for every channel
    pub fn set_calibration(
        &mut self,
        voltage: f32,
        current: f32,
    ) -> Result<(), StpmError<D::Error>> {
        let cal = ChannelCalibration { voltage, current };
        if !cal.is_valid() {
            return Err(StpmError::InvalidCalibration);
        }
        self.config.calibration.channels = [cal; 3];
        Ok(())
    }

    pub fn set_channel_calibration(
        &mut self,
        channel: u8,
        voltage: f32,
        current: f32,
    ) -> Result<(), StpmError<D::Error>> {
        let channel = Channel::try_from(channel).map_err(StpmError::InvalidChannel)?;
        let cal = ChannelCalibration { voltage, current };
        if !cal.is_valid() {
            return Err(StpmError::InvalidCalibration);
        }
        self.config.calibration.channels[channel.index()] = cal;
        Ok(())
    }

    pub fn set_auto_latch(&mut self, enabled: bool) {
        self.config.auto_latch = enabled;
    }

    // TODO: check the CRC byte of received frames once the transport sends 5 byte frames
    pub fn set_crc_enabled(&mut self, enabled: bool) {
        self.config.crc_enabled = enabled;
    }

    /// only used for the reference frequency bit of the software latch
    pub fn set_line_frequency(&mut self, frequency: LineFrequency) {
        self.config.line_frequency = frequency;
    }

    /// Resolves a channel number, before any bus activity.
    pub(crate) fn route(
        &self,
        channel: u8,
        quantity: Quantity,
    ) -> Result<(Channel, Reg), StpmError<D::Error>> {
        Channel::try_from(channel)
            .ok()
            .and_then(|ch| register_for(ch, quantity).map(|reg| (ch, reg)))
            .ok_or(StpmError::InvalidChannel(channel))
    }

    pub(crate) fn read_data(&mut self, reg: Reg) -> Result<[u8; 4], StpmError<D::Error>> {
        self.driver.read_frame(reg.addr()).map_err(StpmError::Driver)
    }

    fn read_latched(
        &mut self,
        channel: u8,
        quantity: Quantity,
    ) -> Result<(Channel, [u8; 4]), StpmError<D::Error>> {
        let (channel, reg) = self.route(channel, quantity)?;
        self.latch_for_read()?;
        let buf = self.read_data(reg)?;
        Ok((channel, buf))
    }

    /// RMS voltage and current of channel 1 or 2, from a single register read
    pub fn read_rms(&mut self, channel: u8) -> Result<(f32, f32), StpmError<D::Error>> {
        let (channel, buf) = self.read_latched(channel, Quantity::Rms)?;
        let cal = self.config.calibration.get(channel);
        let voltage = calibration::voltage(fields::field_0_14(&buf), cal);
        let current = calibration::current(fields::field_15_32(&buf), cal);
        debug!("stpm {channel:?}: {voltage} V, {current} A");
        Ok((voltage, current))
    }

    pub fn read_rms_voltage(&mut self, channel: u8) -> Result<f32, StpmError<D::Error>> {
        let (channel, buf) = self.read_latched(channel, Quantity::Rms)?;
        Ok(calibration::voltage(
            fields::field_0_14(&buf),
            self.config.calibration.get(channel),
        ))
    }

    pub fn read_rms_current(&mut self, channel: u8) -> Result<f32, StpmError<D::Error>> {
        let (channel, buf) = self.read_latched(channel, Quantity::Rms)?;
        Ok(calibration::current(
            fields::field_15_32(&buf),
            self.config.calibration.get(channel),
        ))
    }

    /// signed active power of channel 1 or 2
    pub fn read_active_power(&mut self, channel: u8) -> Result<f32, StpmError<D::Error>> {
        let (channel, buf) = self.read_latched(channel, Quantity::ActivePower)?;
        Ok(calibration::power(
            fields::field_0_28(&buf),
            self.config.calibration.get(channel),
        ))
    }

    /// Accumulated active energy of channel 1 or 2, or of both (channel 0).
    /// The accumulators are free running, so no latch is needed.
    pub fn read_active_energy(&mut self, channel: u8) -> Result<f64, StpmError<D::Error>> {
        let (_, reg) = self.route(channel, Quantity::ActiveEnergy)?;
        let buf = self
            .driver
            .read_frame_settled(reg.addr())
            .map_err(StpmError::Driver)?;
        Ok(calibration::energy(fields::field_0_32(&buf)))
    }
}
