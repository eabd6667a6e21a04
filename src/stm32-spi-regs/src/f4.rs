//! F2/F4 family system blocks: clock gating and the mux style GPIO ports.

use vcell::VolatileCell;

/// Reset and clock control, up to the APB enable registers.
#[repr(C)]
pub struct Rcc {
    pub cr: VolatileCell<u32>,
    pub pllcfgr: VolatileCell<u32>,
    pub cfgr: VolatileCell<u32>,
    pub cir: VolatileCell<u32>,
    pub ahb1rstr: VolatileCell<u32>,
    pub ahb2rstr: VolatileCell<u32>,
    pub ahb3rstr: VolatileCell<u32>,
    _reserved0: [u8; 4],
    pub apb1rstr: VolatileCell<u32>,
    pub apb2rstr: VolatileCell<u32>,
    _reserved1: [u8; 8],
    pub ahb1enr: VolatileCell<u32>,
    pub ahb2enr: VolatileCell<u32>,
    pub ahb3enr: VolatileCell<u32>,
    _reserved2: [u8; 4],
    pub apb1enr: VolatileCell<u32>,
    pub apb2enr: VolatileCell<u32>,
}

// SAFETY: all fields are volatile cells over plain integers and the block
// is only reached through shared references.
unsafe impl Sync for Rcc {}

pub const RCC_BASE: usize = 0x4002_3800;

/// APB2ENR bits.
pub mod apb2enr {
    pub const SPI1EN: u32 = 1 << 12;
}

/// APB1ENR bits.
pub mod apb1enr {
    pub const SPI2EN: u32 = 1 << 14;
    pub const SPI3EN: u32 = 1 << 15;
}

/// One GPIO port.
#[repr(C)]
pub struct Gpio {
    pub moder: VolatileCell<u32>,
    pub otyper: VolatileCell<u32>,
    pub ospeedr: VolatileCell<u32>,
    pub pupdr: VolatileCell<u32>,
    pub idr: VolatileCell<u32>,
    pub odr: VolatileCell<u32>,
    pub bsrr: VolatileCell<u32>,
    pub lckr: VolatileCell<u32>,
    pub afrl: VolatileCell<u32>,
    pub afrh: VolatileCell<u32>,
}

// SAFETY: see `Rcc`.
unsafe impl Sync for Gpio {}

pub const GPIOA_BASE: usize = 0x4002_0000;
pub const GPIOB_BASE: usize = 0x4002_0400;
pub const GPIOC_BASE: usize = 0x4002_0800;

/// MODER field values.
pub mod moder {
    pub const INPUT: u32 = 0b00;
    pub const OUTPUT: u32 = 0b01;
    pub const ALTERNATE: u32 = 0b10;
    pub const ANALOG: u32 = 0b11;
}
