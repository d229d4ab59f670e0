mod frame;
pub mod spi;

#[cfg(test)]
pub(crate) mod fake;

pub use frame::{Frame, FILLER};

/// Frame level access to the chip.
///
/// The chip answers every frame with the content of the register addressed in
/// the previous frame, so a register read always takes two bus transactions.
pub trait StpmDriver {
    type Error;

    /// clock out a single frame, the bytes shifted in are discarded
    fn send_frame(&mut self, frame: Frame) -> Result<(), Self::Error>;

    /// address `addr`, then read its content with a filler frame
    fn read_frame(&mut self, addr: u8) -> Result<[u8; 4], Self::Error>;

    /// Read variant for the energy accumulators: the data frame is clocked four
    /// times in one transaction and only the last four bytes are kept, the
    /// counters need the extra shift cycles to settle.
    fn read_frame_settled(&mut self, addr: u8) -> Result<[u8; 4], Self::Error>;

    // After POR, to ensure a correct initialization, it is necessary to perform a reset of DSP
    // and communication peripherals through three SYN pulses and a single SCS pulse. Without a
    // SYN pin only the SCS pulse is sent.
    fn hardware_reset(&mut self) -> Result<(), Self::Error>;

    /// latch the live measurement registers into the data registers
    fn syn_pulse(&mut self) -> Result<(), Self::Error>;

    fn has_syn_pin(&self) -> bool;
}
