//! Operations on one bound SPI register block.

use embedded_hal::spi::{Mode, Phase, Polarity};
use stm32_spi_regs::spi::{cr1, sr, SpiRegs};

use crate::lock::Lock;

/// PCLK divisor for the SPI bit clock.
///
/// Discriminants are the CR1 baud rate field already shifted into place,
/// so a value can be or-ed into a CR1 image directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Divisor {
    Div2 = 0 << 3,
    Div4 = 1 << 3,
    Div8 = 2 << 3,
    Div16 = 3 << 3,
    Div32 = 4 << 3,
    Div64 = 5 << 3,
    Div128 = 6 << 3,
    Div256 = 7 << 3,
}

impl Divisor {
    /// Decodes the divisor out of a CR1 image.
    pub const fn from_cr1(value: u32) -> Self {
        match (value & cr1::BR) >> 3 {
            0 => Self::Div2,
            1 => Self::Div4,
            2 => Self::Div8,
            3 => Self::Div16,
            4 => Self::Div32,
            5 => Self::Div64,
            6 => Self::Div128,
            _ => Self::Div256,
        }
    }
}

pub(crate) const fn cpol_bits(polarity: Polarity) -> u32 {
    match polarity {
        Polarity::IdleLow => 0,
        Polarity::IdleHigh => cr1::CPOL,
    }
}

pub(crate) const fn cpha_bits(phase: Phase) -> u32 {
    match phase {
        Phase::CaptureOnFirstTransition => 0,
        Phase::CaptureOnSecondTransition => cr1::CPHA,
    }
}

/// The CR1 image written at bring-up: software NSS master with the
/// requested clocking, enabled in the same write.
pub(crate) const fn initial_cr1(divisor: Divisor, polarity: Polarity, phase: Phase) -> u32 {
    cr1::MSTR
        | cr1::SSM
        | cr1::SSI
        | cr1::SPE
        | divisor as u32
        | cpol_bits(polarity)
        | cpha_bits(phase)
}

/// Driver for one SPI register block.
///
/// Reached through [`Spi`](crate::Spi), which owns clock and pin bring-up;
/// the bus itself only ever touches SPI registers. All operations take
/// `&self`, callers sharing a bus arbitrate through [`SpiBus::lock`].
pub struct SpiBus {
    regs: &'static SpiRegs,
    lock: Lock,
}

impl SpiBus {
    pub(crate) const fn new(regs: &'static SpiRegs) -> Self {
        Self {
            regs,
            lock: Lock::new(),
        }
    }

    pub(crate) fn regs(&self) -> &'static SpiRegs {
        self.regs
    }

    /// Sends `out` and returns the byte clocked in during the same frame.
    ///
    /// Spins until the receive flag reports the frame complete.
    pub fn transfer(&self, out: u8) -> u8 {
        self.regs.dr.set(u32::from(out));
        while self.regs.sr.get() & sr::RXNE == 0 {}
        self.regs.dr.get() as u8
    }

    /// Sends one byte, discarding the byte clocked in.
    pub fn write_byte(&self, out: u8) {
        let _ = self.transfer(out);
    }

    /// Clocks one byte in while sending the idle filler `0xFF`.
    pub fn read_byte(&self) -> u8 {
        self.transfer(0xFF)
    }

    /// Acquires the bus lock, spinning while another context holds it.
    pub fn lock(&self) {
        self.lock.acquire();
    }

    /// Releases the bus lock.
    pub fn unlock(&self) {
        self.lock.release();
    }

    /// Acquires the bus lock if it is free, without blocking.
    #[must_use]
    pub fn try_lock(&self) -> bool {
        self.lock.try_acquire()
    }

    /// Returns true while the bus lock is held.
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Enables the peripheral (sets CR1 SPE).
    pub fn enable(&self) {
        self.regs.cr1.set(self.regs.cr1.get() | cr1::SPE);
    }

    /// Disables the peripheral (clears CR1 SPE).
    pub fn disable(&self) {
        self.regs.cr1.set(self.regs.cr1.get() & !cr1::SPE);
    }

    /// Sets the bit clock divisor, leaving the rest of CR1 untouched.
    pub fn set_divisor(&self, divisor: Divisor) {
        self.update_cr1(cr1::BR, divisor as u32);
    }

    /// Reads the bit clock divisor back from CR1.
    pub fn divisor(&self) -> Divisor {
        Divisor::from_cr1(self.regs.cr1.get())
    }

    /// Sets the clock polarity, leaving the rest of CR1 untouched.
    pub fn set_polarity(&self, polarity: Polarity) {
        self.update_cr1(cr1::CPOL, cpol_bits(polarity));
    }

    /// Reads the clock polarity back from CR1.
    pub fn polarity(&self) -> Polarity {
        if self.regs.cr1.get() & cr1::CPOL == 0 {
            Polarity::IdleLow
        } else {
            Polarity::IdleHigh
        }
    }

    /// Sets the clock phase, leaving the rest of CR1 untouched.
    pub fn set_phase(&self, phase: Phase) {
        self.update_cr1(cr1::CPHA, cpha_bits(phase));
    }

    /// Reads the clock phase back from CR1.
    pub fn phase(&self) -> Phase {
        if self.regs.cr1.get() & cr1::CPHA == 0 {
            Phase::CaptureOnFirstTransition
        } else {
            Phase::CaptureOnSecondTransition
        }
    }

    /// Applies polarity and phase together from an [`embedded_hal`] mode.
    pub fn set_mode(&self, mode: Mode) {
        self.update_cr1(
            cr1::CPOL | cr1::CPHA,
            cpol_bits(mode.polarity) | cpha_bits(mode.phase),
        );
    }

    /// Reads polarity and phase back as an [`embedded_hal`] mode.
    pub fn mode(&self) -> Mode {
        Mode {
            polarity: self.polarity(),
            phase: self.phase(),
        }
    }

    /// Spins until the shift register has drained onto the wire.
    ///
    /// Needed before releasing a chip select after the last write; the
    /// transmit-empty flag leads the end of the frame by up to one byte.
    pub fn wait_tx_done(&self) {
        while self.regs.sr.get() & sr::BSY != 0 {}
    }

    /// Full SPI block bring-up: force plain SPI mode on shared SPI/I2S
    /// blocks, clear CR2 and write the whole CR1 image in one go.
    pub(crate) fn initialize(&self, divisor: Divisor, polarity: Polarity, phase: Phase) {
        use stm32_spi_regs::spi::i2scfgr;

        self.regs
            .i2scfgr
            .set(self.regs.i2scfgr.get() & !i2scfgr::I2SMOD);
        self.regs.cr2.set(0);
        self.regs.cr1.set(initial_cr1(divisor, polarity, phase));
    }

    /// Clears the control registers, the block level part of teardown.
    pub(crate) fn deinitialize(&self) {
        self.regs.cr2.set(0);
        self.regs.cr1.set(0);
    }

    fn update_cr1(&self, mask: u32, bits: u32) {
        let value = self.regs.cr1.get();
        self.regs.cr1.set((value & !mask) | bits);
    }
}

impl embedded_hal::spi::ErrorType for SpiBus {
    type Error = core::convert::Infallible;
}

impl embedded_hal::spi::SpiBus for SpiBus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for word in words.iter_mut() {
            *word = self.read_byte();
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        for word in words {
            self.write_byte(*word);
        }
        Ok(())
    }

    // `&*self` keeps the byte transfer calls on the inherent method; plain
    // `self.transfer(..)` would resolve to this trait method again.
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        let bus = &*self;
        let frames = read.len().max(write.len());
        let mut outgoing = write.iter().copied();
        let mut incoming = read.iter_mut();
        for _ in 0..frames {
            let returned = bus.transfer(outgoing.next().unwrap_or(0xFF));
            if let Some(slot) = incoming.next() {
                *slot = returned;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let bus = &*self;
        for word in words.iter_mut() {
            *word = bus.transfer(*word);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.wait_tx_done();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::spi::{MODE_0, MODE_3};
    use stm32_spi_regs::spi::i2scfgr;

    fn fake_regs() -> &'static SpiRegs {
        // SAFETY: zero is a valid image for a block of plain integers.
        Box::leak(Box::new(unsafe { core::mem::zeroed::<SpiRegs>() }))
    }

    fn bus() -> SpiBus {
        SpiBus::new(fake_regs())
    }

    #[test]
    fn initialize_writes_the_full_cr1_image() {
        let bus = bus();
        bus.regs().i2scfgr.set(i2scfgr::I2SMOD);
        bus.regs().cr2.set(0xFF);

        bus.initialize(
            Divisor::Div8,
            Polarity::IdleHigh,
            Phase::CaptureOnSecondTransition,
        );

        let expected =
            cr1::MSTR | cr1::SSM | cr1::SSI | cr1::SPE | (2 << 3) | cr1::CPOL | cr1::CPHA;
        assert_eq!(bus.regs().cr1.get(), expected);
        assert_eq!(bus.regs().cr2.get(), 0);
        assert_eq!(bus.regs().i2scfgr.get(), 0);
    }

    #[test]
    fn deinitialize_then_initialize_restores_the_same_image() {
        let bus = bus();
        bus.initialize(Divisor::Div32, Polarity::IdleLow, Phase::CaptureOnFirstTransition);
        let first = bus.regs().cr1.get();

        bus.deinitialize();
        assert_eq!(bus.regs().cr1.get(), 0);
        assert_eq!(bus.regs().cr2.get(), 0);

        bus.initialize(Divisor::Div32, Polarity::IdleLow, Phase::CaptureOnFirstTransition);
        assert_eq!(bus.regs().cr1.get(), first);
    }

    #[test]
    fn transfer_echoes_the_data_register() {
        let bus = bus();
        bus.regs().sr.set(sr::RXNE | sr::TXE);

        assert_eq!(bus.transfer(0xA5), 0xA5);
        assert_eq!(bus.regs().dr.get(), 0xA5);
    }

    #[test]
    fn read_byte_sends_the_idle_filler() {
        let bus = bus();
        bus.regs().sr.set(sr::RXNE | sr::TXE);

        assert_eq!(bus.read_byte(), 0xFF);
        assert_eq!(bus.regs().dr.get(), 0xFF);
    }

    #[test]
    fn write_byte_pushes_the_byte_out() {
        let bus = bus();
        bus.regs().sr.set(sr::RXNE | sr::TXE);

        bus.write_byte(0x12);
        assert_eq!(bus.regs().dr.get(), 0x12);
    }

    #[test]
    fn each_accessor_leaves_the_other_fields_alone() {
        let bus = bus();
        bus.initialize(Divisor::Div32, Polarity::IdleLow, Phase::CaptureOnFirstTransition);
        let baseline = bus.regs().cr1.get();

        bus.set_divisor(Divisor::Div256);
        assert_eq!(bus.divisor(), Divisor::Div256);
        assert_eq!(bus.polarity(), Polarity::IdleLow);
        assert_eq!(bus.phase(), Phase::CaptureOnFirstTransition);
        assert_eq!(
            bus.regs().cr1.get() & !cr1::BR,
            baseline & !cr1::BR,
            "divisor write strayed outside the BR field"
        );

        bus.set_polarity(Polarity::IdleHigh);
        assert_eq!(bus.polarity(), Polarity::IdleHigh);
        assert_eq!(bus.divisor(), Divisor::Div256);

        bus.set_phase(Phase::CaptureOnSecondTransition);
        assert_eq!(bus.phase(), Phase::CaptureOnSecondTransition);
        assert_eq!(bus.polarity(), Polarity::IdleHigh);
        assert_eq!(bus.divisor(), Divisor::Div256);
    }

    #[test]
    fn mode_combines_polarity_and_phase() {
        let bus = bus();
        bus.initialize(Divisor::Div32, Polarity::IdleLow, Phase::CaptureOnFirstTransition);
        assert_eq!(bus.mode(), MODE_0);

        bus.set_mode(MODE_3);
        assert_eq!(bus.polarity(), Polarity::IdleHigh);
        assert_eq!(bus.phase(), Phase::CaptureOnSecondTransition);
        assert_eq!(bus.mode(), MODE_3);
        assert_eq!(bus.divisor(), Divisor::Div32);
    }

    #[test]
    fn enable_and_disable_only_touch_spe() {
        let bus = bus();
        bus.initialize(Divisor::Div2, Polarity::IdleLow, Phase::CaptureOnFirstTransition);
        let enabled = bus.regs().cr1.get();
        assert_ne!(enabled & cr1::SPE, 0);

        bus.disable();
        assert_eq!(bus.regs().cr1.get(), enabled & !cr1::SPE);

        bus.enable();
        assert_eq!(bus.regs().cr1.get(), enabled);
    }

    #[test]
    fn wait_tx_done_returns_once_busy_clears() {
        let bus = bus();
        bus.regs().sr.set(sr::TXE);
        bus.wait_tx_done();
    }

    #[test]
    fn bus_lock_protocol() {
        let bus = bus();
        assert!(bus.try_lock());
        assert!(bus.is_locked());
        assert!(!bus.try_lock());
        bus.unlock();
        assert!(!bus.is_locked());
        bus.lock();
        assert!(bus.is_locked());
        bus.unlock();
    }

    #[test]
    fn embedded_hal_ops_reuse_the_byte_transfer() {
        use embedded_hal::spi::SpiBus as _;

        let mut bus = bus();
        bus.regs().sr.set(sr::RXNE | sr::TXE);

        let mut incoming = [0u8; 2];
        embedded_hal::spi::SpiBus::transfer(&mut bus, &mut incoming, &[0x0B, 0xEE]).unwrap();
        assert_eq!(incoming, [0x0B, 0xEE]);

        let mut words = [0x55u8];
        bus.transfer_in_place(&mut words).unwrap();
        assert_eq!(words, [0x55]);

        bus.write(&[1, 2, 3]).unwrap();
        assert_eq!(bus.regs().dr.get(), 3);

        let mut buffer = [0u8; 1];
        bus.read(&mut buffer).unwrap();
        assert_eq!(buffer, [0xFF]);

        bus.flush().unwrap();
    }

    #[test]
    fn uneven_transfer_pads_with_the_idle_filler() {
        use embedded_hal::spi::SpiBus as _;

        let bus = &mut bus();
        bus.regs().sr.set(sr::RXNE | sr::TXE);

        let mut incoming = [0u8; 3];
        embedded_hal::spi::SpiBus::transfer(bus, &mut incoming, &[0x42]).unwrap();
        assert_eq!(incoming, [0x42, 0xFF, 0xFF]);

        embedded_hal::spi::SpiBus::transfer(bus, &mut [], &[9, 9]).unwrap();
        assert_eq!(bus.regs().dr.get(), 9);
    }

    #[test]
    fn divisor_decodes_every_br_value() {
        let all = [
            Divisor::Div2,
            Divisor::Div4,
            Divisor::Div8,
            Divisor::Div16,
            Divisor::Div32,
            Divisor::Div64,
            Divisor::Div128,
            Divisor::Div256,
        ];
        for divisor in all {
            assert_eq!(Divisor::from_cr1(divisor as u32), divisor);
        }
    }
}
