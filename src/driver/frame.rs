/// filler byte, also the "no register" address
pub const FILLER: u8 = 0xff;

/// One 4 byte SPI frame: the address whose content the chip shifts out in the
/// next frame, and an optional 16 bit word write.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub next_read_addr: Option<u8>,
    pub write: Option<(u8, u16)>,
}

impl Frame {
    /// addresses `addr` for the next frame, nothing is written
    pub fn read(addr: u8) -> Self {
        Self {
            next_read_addr: Some(addr),
            write: None,
        }
    }

    pub fn write(addr: u8, value: u16) -> Self {
        Self {
            next_read_addr: None,
            write: Some((addr, value)),
        }
    }

    /// frame that neither addresses nor writes anything, used to clock data out
    pub fn filler() -> Self {
        Self {
            next_read_addr: None,
            write: None,
        }
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        let mut buf = [FILLER; 4];
        buf[0] = self.next_read_addr.unwrap_or(FILLER);
        if let Some((addr, val)) = self.write {
            buf[1] = addr;
            buf[2..].copy_from_slice(&val.to_le_bytes());
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_frame_layout() {
        assert_eq!(Frame::read(0x48).to_bytes(), [0x48, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn write_frame_is_little_endian() {
        assert_eq!(Frame::write(0x05, 0x08c0).to_bytes(), [0xff, 0x05, 0xc0, 0x08]);
    }

    #[test]
    fn filler_frame() {
        assert_eq!(Frame::filler().to_bytes(), [0xff; 4]);
    }
}
