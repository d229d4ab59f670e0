use core::convert::Infallible;
use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, Mode, SpiBus, MODE_3};
use fugit::HertzU32;
use log::{debug, info, trace};

use super::{Frame, StpmDriver};

/// highest SPI clock the chip supports
pub const MAX_SPI_FREQUENCY: HertzU32 = HertzU32::MHz(12);

// SYN timings from table 4 of the datasheet
// minimum pulse width: t_lpw = 4 us
// minimum pulse spacing: t_w = 4 us
const SYN_PULSE_US: u32 = 4;
// chip select high time between addressing and reading an energy accumulator
const ENERGY_ADDRESS_US: u32 = 4;
// data frames clocked for an energy read, only the last one is kept
const ENERGY_EXCHANGES: usize = 4;

/// Bus settings the chip needs: full duplex, MSB first, clock idle high with
/// sampling on the trailing edge.
///
/// `embedded-hal` buses are configured by the HAL when they are created, so the
/// transport only checks the settings it is handed against what the chip
/// accepts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpiSettings {
    pub mode: Mode,
    pub frequency: HertzU32,
}

impl Default for SpiSettings {
    fn default() -> Self {
        Self {
            mode: MODE_3,
            frequency: MAX_SPI_FREQUENCY,
        }
    }
}

impl SpiSettings {
    pub fn is_supported(&self) -> bool {
        self.mode == MODE_3 && self.frequency.raw() > 0 && self.frequency <= MAX_SPI_FREQUENCY
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StpmSpiError {
    Spi(spi::ErrorKind),
    Pin(digital::ErrorKind),
    /// bus settings outside of what the chip supports
    BusConfig,
    /// a SYN pulse was requested but no SYN pin is connected
    NoSynPin,
}

impl fmt::Display for StpmSpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StpmSpiError::Spi(kind) => write!(f, "SPI error: {kind:?}"),
            StpmSpiError::Pin(kind) => write!(f, "GPIO error: {kind:?}"),
            StpmSpiError::BusConfig => write!(f, "unsupported SPI settings"),
            StpmSpiError::NoSynPin => write!(f, "no SYN pin connected"),
        }
    }
}

fn spi_error<E: spi::Error>(e: E) -> StpmSpiError {
    StpmSpiError::Spi(e.kind())
}

fn pin_error<E: digital::Error>(e: E) -> StpmSpiError {
    StpmSpiError::Pin(e.kind())
}

fn low<P: OutputPin>(pin: &mut P) -> Result<(), StpmSpiError> {
    pin.set_low().map_err(pin_error)
}

fn high<P: OutputPin>(pin: &mut P) -> Result<(), StpmSpiError> {
    pin.set_high().map_err(pin_error)
}

/// Placeholder for boards that leave the SYN pin unconnected.
pub struct NoPin;

impl digital::ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// SPI transport with software chip select. The chip needs SCS toggled outside
/// of regular transactions during reset, so the bus is used directly instead of
/// through an `SpiDevice`.
pub struct StpmSpiDriver<SPI, CS, EN, SYN, D> {
    spi_device: SPI,
    pin_scs: CS,
    pin_en: EN,
    pin_syn: Option<SYN>,
    delay: D,
    settings: SpiSettings,
}

impl<SPI, CS, EN, SYN, D> StpmSpiDriver<SPI, CS, EN, SYN, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    EN: OutputPin,
    SYN: OutputPin,
    D: DelayNs,
{
    pub fn new(
        spi_device: SPI,
        pin_scs: CS,
        pin_en: EN,
        pin_syn: Option<SYN>,
        delay: D,
        settings: SpiSettings,
    ) -> Result<Self, StpmSpiError> {
        if !settings.is_supported() {
            return Err(StpmSpiError::BusConfig);
        }
        Ok(Self {
            spi_device,
            pin_scs,
            pin_en,
            pin_syn,
            delay,
            settings,
        })
    }

    pub fn settings(&self) -> &SpiSettings {
        &self.settings
    }

    pub fn release(self) -> (SPI, CS, EN, Option<SYN>, D) {
        (
            self.spi_device,
            self.pin_scs,
            self.pin_en,
            self.pin_syn,
            self.delay,
        )
    }

    /// Runs `f` with SCS asserted. The bus is flushed and SCS released on every
    /// path, also when `f` fails.
    fn transaction<R>(
        &mut self,
        f: impl FnOnce(&mut SPI) -> Result<R, SPI::Error>,
    ) -> Result<R, StpmSpiError> {
        low(&mut self.pin_scs)?;
        let result = f(&mut self.spi_device).and_then(|r| self.spi_device.flush().map(|()| r));
        let released = high(&mut self.pin_scs);
        let value = result.map_err(spi_error)?;
        released?;
        Ok(value)
    }
}

impl<SPI, CS, EN, D> StpmSpiDriver<SPI, CS, EN, NoPin, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    EN: OutputPin,
    D: DelayNs,
{
    pub fn without_syn(
        spi_device: SPI,
        pin_scs: CS,
        pin_en: EN,
        delay: D,
        settings: SpiSettings,
    ) -> Result<Self, StpmSpiError> {
        Self::new(spi_device, pin_scs, pin_en, None, delay, settings)
    }
}

impl<SPI, CS, EN, SYN, D> StpmDriver for StpmSpiDriver<SPI, CS, EN, SYN, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    EN: OutputPin,
    SYN: OutputPin,
    D: DelayNs,
{
    type Error = StpmSpiError;

    fn send_frame(&mut self, frame: Frame) -> Result<(), StpmSpiError> {
        let buf_tx = frame.to_bytes();
        trace!("stpm tx {buf_tx:02x?}");
        self.transaction(|spi| spi.write(&buf_tx))
    }

    fn read_frame(&mut self, addr: u8) -> Result<[u8; 4], StpmSpiError> {
        self.send_frame(Frame::read(addr))?;

        let mut buf = Frame::filler().to_bytes();
        self.transaction(|spi| spi.transfer_in_place(&mut buf))?;
        trace!("stpm rx {addr:#04x}: {buf:02x?}");
        Ok(buf)
    }

    fn read_frame_settled(&mut self, addr: u8) -> Result<[u8; 4], StpmSpiError> {
        self.send_frame(Frame::read(addr))?;
        self.delay.delay_us(ENERGY_ADDRESS_US);

        let mut buf = [0u8; 4];
        self.transaction(|spi| {
            for _ in 0..ENERGY_EXCHANGES {
                buf = Frame::filler().to_bytes();
                spi.transfer_in_place(&mut buf)?;
            }
            Ok(())
        })?;
        trace!("stpm rx {addr:#04x} (settled): {buf:02x?}");
        Ok(buf)
    }

    fn hardware_reset(&mut self) -> Result<(), StpmSpiError> {
        info!(
            "stpm hardware reset, spi {:?} at {} kHz",
            self.settings.mode.polarity,
            self.settings.frequency.to_kHz()
        );

        // reset sequence for SPI
        low(&mut self.pin_scs)?;
        low(&mut self.pin_en)?;
        self.delay.delay_ms(35);
        high(&mut self.pin_en)?;
        self.delay.delay_ms(35);
        high(&mut self.pin_scs)?;
        self.delay.delay_ms(2);

        // global reset, also resynchronizes the line frequency tracking
        if let Some(syn) = self.pin_syn.as_mut() {
            for _ in 0..3 {
                low(syn)?;
                self.delay.delay_ms(2);
                high(syn)?;
                self.delay.delay_ms(2);
            }
        } else {
            debug!("stpm has no SYN pin, skipping global reset pulses");
        }
        self.delay.delay_ms(2);

        low(&mut self.pin_scs)?;
        self.delay.delay_ms(5);
        high(&mut self.pin_scs)
    }

    fn syn_pulse(&mut self) -> Result<(), StpmSpiError> {
        let Some(syn) = self.pin_syn.as_mut() else {
            return Err(StpmSpiError::NoSynPin);
        };
        low(syn)?;
        self.delay.delay_us(SYN_PULSE_US);
        high(syn)?;
        self.delay.delay_us(SYN_PULSE_US);
        Ok(())
    }

    fn has_syn_pin(&self) -> bool {
        self.pin_syn.is_some()
    }
}
