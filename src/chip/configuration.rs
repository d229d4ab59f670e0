use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineFrequency {
    #[default]
    F50 = 0,
    F60 = 1,
}

/// How live measurements are frozen before they are read.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatchMode {
    /// pulse on the SYN pin
    #[default]
    SyncPin,
    /// SW_Latch1/2 bits in DSP_CR3, for boards without a SYN pin
    Software,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StpmConfiguration {
    pub line_frequency: LineFrequency,
    pub latch_mode: LatchMode,
    /// latching is done externally (e.g. a timer driving SYN), reads never latch
    pub auto_latch: bool,
    /// reserved, frames are not CRC checked yet
    pub crc_enabled: bool,
    pub calibration: Calibration,
}

impl Default for StpmConfiguration {
    fn default() -> Self {
        Self {
            line_frequency: Default::default(),
            latch_mode: Default::default(),
            auto_latch: false,
            crc_enabled: true,
            calibration: Default::default(),
        }
    }
}

impl StpmConfiguration {
    /// Parses a JSON configuration, missing fields keep their defaults.
    pub fn from_json(json: &[u8]) -> Result<Self, serde_json_core::de::Error> {
        let (config, _) = serde_json_core::from_slice(json)?;
        Ok(config)
    }
}
