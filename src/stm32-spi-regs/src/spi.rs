//! The SPI register block, shared unchanged by the F1, F2 and F4 families.

use vcell::VolatileCell;

/// One SPI peripheral instance.
#[repr(C)]
pub struct SpiRegs {
    /// Control register 1.
    pub cr1: VolatileCell<u32>,
    /// Control register 2.
    pub cr2: VolatileCell<u32>,
    /// Status register.
    pub sr: VolatileCell<u32>,
    /// Data register.
    pub dr: VolatileCell<u32>,
    /// CRC polynomial register.
    pub crcpr: VolatileCell<u32>,
    /// RX CRC register.
    pub rxcrcr: VolatileCell<u32>,
    /// TX CRC register.
    pub txcrcr: VolatileCell<u32>,
    /// I2S configuration register.
    pub i2scfgr: VolatileCell<u32>,
    /// I2S prescaler register.
    pub i2spr: VolatileCell<u32>,
}

// SAFETY: all fields are volatile cells over plain integers and the block
// is only reached through shared references.
unsafe impl Sync for SpiRegs {}

pub const SPI1_BASE: usize = 0x4001_3000;
pub const SPI2_BASE: usize = 0x4000_3800;
pub const SPI3_BASE: usize = 0x4000_3C00;

/// NVIC interrupt numbers, identical across the supported families.
pub const SPI1_IRQ: u16 = 35;
pub const SPI2_IRQ: u16 = 36;
pub const SPI3_IRQ: u16 = 51;

/// CR1 bits.
pub mod cr1 {
    pub const CPHA: u32 = 1 << 0;
    pub const CPOL: u32 = 1 << 1;
    pub const MSTR: u32 = 1 << 2;
    /// Baud rate field, three bits.
    pub const BR: u32 = 0b111 << 3;
    pub const SPE: u32 = 1 << 6;
    pub const LSBFIRST: u32 = 1 << 7;
    pub const SSI: u32 = 1 << 8;
    pub const SSM: u32 = 1 << 9;
    /// Data frame format, 16-bit when set.
    pub const DFF: u32 = 1 << 11;
}

/// SR bits.
pub mod sr {
    pub const RXNE: u32 = 1 << 0;
    pub const TXE: u32 = 1 << 1;
    pub const OVR: u32 = 1 << 6;
    pub const BSY: u32 = 1 << 7;
}

/// I2SCFGR bits.
pub mod i2scfgr {
    /// Selects I2S instead of SPI operation for the shared block.
    pub const I2SMOD: u32 = 1 << 11;
}
