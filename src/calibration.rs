use serde::{Deserialize, Serialize};

use crate::chip::Channel;

// LSB weights of the data registers. Not configurable, existing calibration
// data depends on these exact values.

/// in volts
pub const VOLTAGE_RMS_LSB: f64 = 0.0354840440;
/// in amperes
pub const CURRENT_RMS_LSB: f64 = 0.2143;
/// in watts
pub const POWER_LSB: f64 = 0.0001217;
/// per count of the active energy accumulators
pub const ENERGY_LSB: f64 = 0.00000000886162;

/// Correction multipliers for a single channel, 1.0 = no correction
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelCalibration {
    pub voltage: f32,
    pub current: f32,
}

impl Default for ChannelCalibration {
    fn default() -> Self {
        Self {
            voltage: 1.0,
            current: 1.0,
        }
    }
}

impl ChannelCalibration {
    /// both multipliers strictly positive and finite
    pub fn is_valid(&self) -> bool {
        [self.voltage, self.current]
            .iter()
            .all(|f| f.is_finite() && *f > 0.0)
    }
}

/// Calibration table indexed by channel (0 = total, 1 = A, 2 = B).
///
/// The total channel has a pair too, but the chip has no aggregate RMS or power
/// registers and energy is never calibrated, so it is only kept for symmetry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub channels: [ChannelCalibration; 3],
}

impl Calibration {
    pub fn get(&self, channel: Channel) -> ChannelCalibration {
        self.channels[channel.index()]
    }

    pub fn is_valid(&self) -> bool {
        self.channels.iter().all(ChannelCalibration::is_valid)
    }
}

// -----------------------------------------------------------------------------
// conversion, LSB products are computed in double precision

pub fn voltage(raw: u16, cal: ChannelCalibration) -> f32 {
    (raw as f64 * VOLTAGE_RMS_LSB) as f32 * cal.voltage
}

pub fn current(raw: u32, cal: ChannelCalibration) -> f32 {
    (raw as f64 * CURRENT_RMS_LSB) as f32 * cal.current
}

/// positive when power flows towards the load
pub fn power(raw: i32, cal: ChannelCalibration) -> f32 {
    (raw as f64 * POWER_LSB) as f32 * cal.voltage * cal.current
}

/// energy counters are not calibrated
pub fn energy(raw: u32) -> f64 {
    raw as f64 * ENERGY_LSB
}
