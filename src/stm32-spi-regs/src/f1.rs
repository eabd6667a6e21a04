//! F1 family system blocks: clock gating, alternate-function remap and the
//! legacy CNF/MODE style GPIO ports.

use vcell::VolatileCell;

/// Reset and clock control.
#[repr(C)]
pub struct Rcc {
    pub cr: VolatileCell<u32>,
    pub cfgr: VolatileCell<u32>,
    pub cir: VolatileCell<u32>,
    pub apb2rstr: VolatileCell<u32>,
    pub apb1rstr: VolatileCell<u32>,
    pub ahbenr: VolatileCell<u32>,
    pub apb2enr: VolatileCell<u32>,
    pub apb1enr: VolatileCell<u32>,
    pub bdcr: VolatileCell<u32>,
    pub csr: VolatileCell<u32>,
}

// SAFETY: all fields are volatile cells over plain integers and the block
// is only reached through shared references.
unsafe impl Sync for Rcc {}

pub const RCC_BASE: usize = 0x4002_1000;

/// APB2ENR bits.
pub mod apb2enr {
    pub const SPI1EN: u32 = 1 << 12;
}

/// APB1ENR bits.
pub mod apb1enr {
    pub const SPI2EN: u32 = 1 << 14;
    /// Connectivity line only.
    pub const SPI3EN: u32 = 1 << 15;
}

/// Alternate function IO.
#[repr(C)]
pub struct Afio {
    pub evcr: VolatileCell<u32>,
    pub mapr: VolatileCell<u32>,
    pub exticr: [VolatileCell<u32>; 4],
    _reserved: [u8; 4],
    pub mapr2: VolatileCell<u32>,
}

// SAFETY: see `Rcc`.
unsafe impl Sync for Afio {}

pub const AFIO_BASE: usize = 0x4001_0000;

/// MAPR bits.
pub mod mapr {
    pub const SPI1_REMAP: u32 = 1 << 0;
    /// Connectivity line only.
    pub const SPI3_REMAP: u32 = 1 << 28;
}

/// One GPIO port.
#[repr(C)]
pub struct Gpio {
    pub crl: VolatileCell<u32>,
    pub crh: VolatileCell<u32>,
    pub idr: VolatileCell<u32>,
    pub odr: VolatileCell<u32>,
    pub bsrr: VolatileCell<u32>,
    pub brr: VolatileCell<u32>,
    pub lckr: VolatileCell<u32>,
}

// SAFETY: see `Rcc`.
unsafe impl Sync for Gpio {}

pub const GPIOA_BASE: usize = 0x4001_0800;
pub const GPIOB_BASE: usize = 0x4001_0C00;
pub const GPIOC_BASE: usize = 0x4001_1000;

/// CNF/MODE nibble images for CRL/CRH.
///
/// The low two bits are MODE (output speed or input), the high two are CNF.
pub mod cnf_mode {
    /// Alternate function push-pull output, 50 MHz.
    pub const ALT_OUTPUT_50MHZ: u32 = 0b1011;
    /// Input with pull-up/pull-down, direction chosen through ODR.
    pub const INPUT_PULLED: u32 = 0b1000;
    /// Floating input, the reset state.
    pub const INPUT_FLOATING: u32 = 0b0100;
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::offset_of;

    #[test]
    fn rcc_enable_registers_sit_at_their_documented_offsets() {
        assert_eq!(offset_of!(Rcc, apb2enr), 0x18);
        assert_eq!(offset_of!(Rcc, apb1enr), 0x1C);
    }

    #[test]
    fn afio_padding_keeps_mapr2_at_0x1c() {
        assert_eq!(offset_of!(Afio, mapr), 0x04);
        assert_eq!(offset_of!(Afio, mapr2), 0x1C);
    }

    #[test]
    fn gpio_block_layout_matches_the_reference_manual() {
        assert_eq!(offset_of!(Gpio, crh), 0x04);
        assert_eq!(offset_of!(Gpio, odr), 0x0C);
        assert_eq!(offset_of!(Gpio, brr), 0x14);
    }
}
