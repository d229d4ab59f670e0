//! Bit fields packed into the 32 bit data registers. Buffers are in the order
//! the bytes arrive on the bus, byte 0 being the least significant.

/// bits 0..14: RMS voltage (lower half of DSP_REG14/15)
pub fn field_0_14(buf: &[u8; 4]) -> u16 {
    (((buf[1] & 0x7f) as u16) << 8) | buf[0] as u16
}

/// bits 15..32: RMS current (upper part of DSP_REG14/15)
pub fn field_15_32(buf: &[u8; 4]) -> u32 {
    (((buf[3] as u32) << 16) | ((buf[2] as u32) << 8) | buf[1] as u32) >> 7
}

/// bits 0..28: signed active power, sign extended by the chip
pub fn field_0_28(buf: &[u8; 4]) -> i32 {
    i32::from_le_bytes(*buf)
}

/// full unsigned word, used for the energy counters
pub fn field_0_32(buf: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voltage_field() {
        assert_eq!(field_0_14(&[0x34, 0x12, 0xff, 0xff]), 0x1234);
        // bit 15 belongs to the current field
        assert_eq!(field_0_14(&[0xff, 0xff, 0x00, 0x00]), 0x7fff);
    }

    #[test]
    fn current_field() {
        assert_eq!(field_15_32(&[0xff, 0x01, 0x02, 0x03]), 0x030201 >> 7);
        assert_eq!(field_15_32(&[0xff, 0x01, 0x02, 0x03]), 1540);
        assert_eq!(field_15_32(&[0x00, 0x80, 0x00, 0x00]), 1);
        assert_eq!(field_15_32(&[0xff, 0xff, 0xff, 0xff]), (1 << 17) - 1);
    }

    #[test]
    fn power_field_is_signed() {
        assert_eq!(field_0_28(&[0x00, 0x00, 0x00, 0x80]), i32::MIN);
        assert_eq!(field_0_28(&[0xff, 0xff, 0xff, 0xff]), -1);
        assert_eq!(field_0_28(&[0x78, 0x56, 0x34, 0x12]), 0x12345678);
    }

    #[test]
    fn energy_field_is_unsigned() {
        assert_eq!(field_0_32(&[0x00, 0x00, 0x00, 0x80]), 0x8000_0000);
        assert_eq!(field_0_32(&[0x01, 0x00, 0x00, 0x00]), 1);
    }
}
