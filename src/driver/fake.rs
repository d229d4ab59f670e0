//! In-memory transport recording every call, for tests above the bus level.

use super::{Frame, StpmDriver};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Send(Frame),
    Read(u8),
    ReadSettled(u8),
    Reset,
    Syn,
}

pub struct FakeDriver {
    pub calls: Vec<Call>,
    /// returned by every read
    pub response: [u8; 4],
    pub syn_pin: bool,
}

impl FakeDriver {
    pub fn new(response: [u8; 4]) -> Self {
        Self {
            calls: Vec::new(),
            response,
            syn_pin: true,
        }
    }

    pub fn without_syn(response: [u8; 4]) -> Self {
        Self {
            syn_pin: false,
            ..Self::new(response)
        }
    }

    pub fn syn_pulses(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Syn).count()
    }
}

impl StpmDriver for FakeDriver {
    type Error = ();

    fn send_frame(&mut self, frame: Frame) -> Result<(), ()> {
        self.calls.push(Call::Send(frame));
        Ok(())
    }

    fn read_frame(&mut self, addr: u8) -> Result<[u8; 4], ()> {
        self.calls.push(Call::Read(addr));
        Ok(self.response)
    }

    fn read_frame_settled(&mut self, addr: u8) -> Result<[u8; 4], ()> {
        self.calls.push(Call::ReadSettled(addr));
        Ok(self.response)
    }

    fn hardware_reset(&mut self) -> Result<(), ()> {
        self.calls.push(Call::Reset);
        Ok(())
    }

    fn syn_pulse(&mut self) -> Result<(), ()> {
        if !self.syn_pin {
            return Err(());
        }
        self.calls.push(Call::Syn);
        Ok(())
    }

    fn has_syn_pin(&self) -> bool {
        self.syn_pin
    }
}
