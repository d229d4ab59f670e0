use crate::calibration;
use crate::chip::{register_for, Quantity, Stpm, StpmError};
use crate::driver::StpmDriver;
use crate::fields;

/// All measurements of one channel, taken from a single latch.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ChannelReading {
    /// in volts
    pub voltage: f32,
    /// in amperes
    pub current: f32,
    /// in watts
    pub active_power: f32,
    pub active_energy: f64,
}

impl<D: StpmDriver> Stpm<D> {
    /// Latches once and reads RMS values, active power and energy of channel 1
    /// or 2.
    pub fn read_channel(&mut self, channel: u8) -> Result<ChannelReading, StpmError<D::Error>> {
        let (channel, reg_rms) = self.route(channel, Quantity::Rms)?;
        // every channel with RMS data also has power and energy registers
        let (Some(reg_power), Some(reg_energy)) = (
            register_for(channel, Quantity::ActivePower),
            register_for(channel, Quantity::ActiveEnergy),
        ) else {
            return Err(StpmError::InvalidChannel(channel as u8));
        };

        self.latch_for_read()?;
        let rms = self.read_data(reg_rms)?;
        let power = self.read_data(reg_power)?;
        let energy = self
            .driver()
            .read_frame_settled(reg_energy.addr())
            .map_err(StpmError::Driver)?;

        let cal = self.config().calibration.get(channel);
        Ok(ChannelReading {
            voltage: calibration::voltage(fields::field_0_14(&rms), cal),
            current: calibration::current(fields::field_15_32(&rms), cal),
            active_power: calibration::power(fields::field_0_28(&power), cal),
            active_energy: calibration::energy(fields::field_0_32(&energy)),
        })
    }
}
