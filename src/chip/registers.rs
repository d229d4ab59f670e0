/// Register indices of the subset of the STPM32 map this driver touches.
///
/// Registers are 32 bit wide and addressed in 16 bit words, so the byte address
/// of a register is twice its index (see [`Reg::addr`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Reg {
    /// DSP control register 3 (latch, reference frequency)
    DSP_CR3 = 2,

    // C1, V1 RMS Data
    DSP_REG14 = 36,
    // C2, V2 RMS Data
    DSP_REG15 = 37,

    // PH1 Active Energy
    PH1_REG1 = 42,
    // PH1 Active Power
    PH1_REG5 = 46,

    // PH2 Active Energy
    PH2_REG1 = 54,
    // PH2 Active Power
    PH2_REG5 = 58,

    // Total Active Energy
    TOT_REG1 = 66,
}

impl Reg {
    /// byte address of the least significant word
    pub fn addr(&self) -> u8 {
        2 * (*self as u8)
    }

    /// byte address of the most significant word
    pub fn addr_msw(&self) -> u8 {
        self.addr() + 1
    }
}

/// Measurement path of the chip. Channel 0 is the aggregate of both phases and
/// only carries an energy counter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    Total = 0,
    A = 1,
    B = 2,
}

impl Channel {
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl TryFrom<u8> for Channel {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0 => Ok(Channel::Total),
            1 => Ok(Channel::A),
            2 => Ok(Channel::B),
            other => Err(other),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Quantity {
    /// packed RMS voltage and current
    Rms,
    ActivePower,
    ActiveEnergy,
}

/// Register holding `quantity` for `channel`, `None` if the chip has no such
/// register (e.g. aggregate RMS values).
pub fn register_for(channel: Channel, quantity: Quantity) -> Option<Reg> {
    use Channel::*;
    use Quantity::*;

    match (channel, quantity) {
        (A, Rms) => Some(Reg::DSP_REG14),
        (B, Rms) => Some(Reg::DSP_REG15),
        (A, ActivePower) => Some(Reg::PH1_REG5),
        (B, ActivePower) => Some(Reg::PH2_REG5),
        (A, ActiveEnergy) => Some(Reg::PH1_REG1),
        (B, ActiveEnergy) => Some(Reg::PH2_REG1),
        (Total, ActiveEnergy) => Some(Reg::TOT_REG1),
        (Total, Rms | ActivePower) => None,
    }
}
