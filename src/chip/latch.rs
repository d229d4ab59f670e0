use log::trace;

use super::{LatchMode, LineFrequency, Reg, Stpm, StpmError};
use crate::driver::{Frame, StpmDriver};

// DSP_CR3 bits, counted within the most significant word
const SW_LATCH1: u16 = 1 << (22 - 16);
const SW_LATCH2: u16 = 1 << (23 - 16);
const REF_FREQ_SHIFT: u16 = 27 - 16;

/// Write of the DSP_CR3 upper word requesting a latch of both channels. The
/// other bits of that word are left at their reset value of zero. The frame
/// also addresses that same word as the next read; every register read
/// addresses its own register again, so nothing consumes that response.
pub fn software_latch_frame(line_frequency: LineFrequency) -> Frame {
    let addr = Reg::DSP_CR3.addr_msw();
    let msw = SW_LATCH1 | SW_LATCH2 | ((line_frequency as u16) << REF_FREQ_SHIFT);
    Frame {
        next_read_addr: Some(addr),
        write: Some((addr, msw)),
    }
}

impl<D: StpmDriver> Stpm<D> {
    /// Freezes the live measurement registers of both channels.
    pub fn latch(&mut self) -> Result<(), StpmError<D::Error>> {
        trace!("stpm latch ({:?})", self.config.latch_mode);
        let result = match self.config.latch_mode {
            LatchMode::SyncPin => self.driver.syn_pulse(),
            LatchMode::Software => self
                .driver
                .send_frame(software_latch_frame(self.config.line_frequency)),
        };
        result.map_err(StpmError::Driver)
    }

    /// latch before a data register read, unless latching happens externally
    pub(crate) fn latch_for_read(&mut self) -> Result<(), StpmError<D::Error>> {
        if self.config.auto_latch {
            return Ok(());
        }
        self.latch()
    }
}
