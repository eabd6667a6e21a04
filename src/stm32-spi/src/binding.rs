//! Compile-time binding of a peripheral and remap choice to pins and
//! system resources.
//!
//! | peripheral | remap | SCK  | MISO | MOSI |
//! |------------|-------|------|------|------|
//! | SPI1       | none  | PA5  | PA6  | PA7  |
//! | SPI1       | full  | PB3  | PB4  | PB5  |
//! | SPI2       | none  | PB13 | PB14 | PB15 |
//! | SPI3       | none  | PB3  | PB4  | PB5  |
//! | SPI3       | full  | PC10 | PC11 | PC12 |
//!
//! The resolvers are `const fn`s evaluated for the associated constants of
//! [`Spi`](crate::Spi), so an unsupported combination aborts the build
//! during constant evaluation instead of reaching the device.

use stm32_spi_regs::spi;

cfg_if::cfg_if! {
    if #[cfg(feature = "f1")] {
        use stm32_spi_regs::f1 as sys;
        const SPI1_REMAP_BIT: u32 = sys::mapr::SPI1_REMAP;
        #[cfg(feature = "spi3")]
        const SPI3_REMAP_BIT: u32 = sys::mapr::SPI3_REMAP;
    } else {
        use stm32_spi_regs::f4 as sys;
        // No remap register on these families; routing is all AFR mux.
        const SPI1_REMAP_BIT: u32 = 0;
        #[cfg(feature = "spi3")]
        const SPI3_REMAP_BIT: u32 = 0;
    }
}

/// SPI peripheral id.
///
/// Discriminants are zero-based peripheral numbers and stay fixed when
/// single peripherals are feature-gated off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiNum {
    Spi1 = 0,
    #[cfg(feature = "spi2")]
    Spi2 = 1,
    #[cfg(feature = "spi3")]
    Spi3 = 2,
}

/// Pin routing choice for a peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Remap {
    /// Default pins.
    None,
    /// Remapped pins, available on SPI1 and SPI3.
    Full,
}

/// GPIO port letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
}

/// One GPIO pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    pub port: Port,
    pub index: u8,
}

/// The SCK/MISO/MOSI triple of one peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinSet {
    pub sck: Pin,
    pub miso: Pin,
    pub mosi: Pin,
}

/// The peripheral bus a clock enable bit lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pclk {
    Apb1,
    Apb2,
}

/// Everything the driver needs to know about one peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiDescriptor {
    /// Register block base address.
    pub base: usize,
    /// NVIC interrupt number.
    pub irq: u16,
    /// Bus carrying the clock enable bit.
    pub pclk: Pclk,
    /// Enable bit within that bus enable register.
    pub clock_enable: u32,
    /// AFIO_MAPR bit controlling the remap; zero on families without a
    /// remap register.
    pub remap_bit: u32,
    /// Alternate function number for the mux style GPIO families.
    pub alt_function: u8,
}

const fn pin(port: Port, index: u8) -> Pin {
    Pin { port, index }
}

const fn pin_set(sck: Pin, miso: Pin, mosi: Pin) -> PinSet {
    PinSet { sck, miso, mosi }
}

/// Resolves the pin triple of a peripheral and remap pair.
///
/// # Panics
///
/// At build time, for the one pair without a pin set: SPI2 cannot be
/// remapped.
pub const fn pins(num: SpiNum, remap: Remap) -> PinSet {
    match (num, remap) {
        (SpiNum::Spi1, Remap::None) => {
            pin_set(pin(Port::A, 5), pin(Port::A, 6), pin(Port::A, 7))
        }
        (SpiNum::Spi1, Remap::Full) => {
            pin_set(pin(Port::B, 3), pin(Port::B, 4), pin(Port::B, 5))
        }
        #[cfg(feature = "spi2")]
        (SpiNum::Spi2, Remap::None) => {
            pin_set(pin(Port::B, 13), pin(Port::B, 14), pin(Port::B, 15))
        }
        #[cfg(feature = "spi2")]
        (SpiNum::Spi2, Remap::Full) => panic!("SPI2 has no remapped pin set"),
        #[cfg(feature = "spi3")]
        (SpiNum::Spi3, Remap::None) => {
            pin_set(pin(Port::B, 3), pin(Port::B, 4), pin(Port::B, 5))
        }
        #[cfg(feature = "spi3")]
        (SpiNum::Spi3, Remap::Full) => {
            pin_set(pin(Port::C, 10), pin(Port::C, 11), pin(Port::C, 12))
        }
    }
}

/// Resolves the system resources of a peripheral.
pub const fn descriptor(num: SpiNum) -> SpiDescriptor {
    match num {
        SpiNum::Spi1 => SpiDescriptor {
            base: spi::SPI1_BASE,
            irq: spi::SPI1_IRQ,
            pclk: Pclk::Apb2,
            clock_enable: sys::apb2enr::SPI1EN,
            remap_bit: SPI1_REMAP_BIT,
            alt_function: 5,
        },
        #[cfg(feature = "spi2")]
        SpiNum::Spi2 => SpiDescriptor {
            base: spi::SPI2_BASE,
            irq: spi::SPI2_IRQ,
            pclk: Pclk::Apb1,
            clock_enable: sys::apb1enr::SPI2EN,
            remap_bit: 0,
            alt_function: 5,
        },
        #[cfg(feature = "spi3")]
        SpiNum::Spi3 => SpiDescriptor {
            base: spi::SPI3_BASE,
            irq: spi::SPI3_IRQ,
            pclk: Pclk::Apb1,
            clock_enable: sys::apb1enr::SPI3EN,
            remap_bit: SPI3_REMAP_BIT,
            alt_function: 6,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(set: PinSet) -> [(Port, u8); 3] {
        [
            (set.sck.port, set.sck.index),
            (set.miso.port, set.miso.index),
            (set.mosi.port, set.mosi.index),
        ]
    }

    #[test]
    fn spi1_pin_sets() {
        let default = pins(SpiNum::Spi1, Remap::None);
        assert_eq!(names(default), [(Port::A, 5), (Port::A, 6), (Port::A, 7)]);
        let remapped = pins(SpiNum::Spi1, Remap::Full);
        assert_eq!(names(remapped), [(Port::B, 3), (Port::B, 4), (Port::B, 5)]);
    }

    #[cfg(feature = "spi2")]
    #[test]
    fn spi2_pin_set() {
        let default = pins(SpiNum::Spi2, Remap::None);
        assert_eq!(names(default), [(Port::B, 13), (Port::B, 14), (Port::B, 15)]);
    }

    #[cfg(feature = "spi3")]
    #[test]
    fn spi3_pin_sets() {
        let default = pins(SpiNum::Spi3, Remap::None);
        assert_eq!(names(default), [(Port::B, 3), (Port::B, 4), (Port::B, 5)]);
        let remapped = pins(SpiNum::Spi3, Remap::Full);
        assert_eq!(names(remapped), [(Port::C, 10), (Port::C, 11), (Port::C, 12)]);
    }

    #[test]
    fn descriptors_name_the_documented_resources() {
        let spi1 = descriptor(SpiNum::Spi1);
        assert_eq!(spi1.base, 0x4001_3000);
        assert_eq!(spi1.irq, 35);
        assert_eq!(spi1.pclk, Pclk::Apb2);
        assert_eq!(spi1.clock_enable, 1 << 12);
        assert_eq!(spi1.alt_function, 5);

        #[cfg(feature = "spi2")]
        {
            let spi2 = descriptor(SpiNum::Spi2);
            assert_eq!(spi2.base, 0x4000_3800);
            assert_eq!(spi2.irq, 36);
            assert_eq!(spi2.pclk, Pclk::Apb1);
            assert_eq!(spi2.clock_enable, 1 << 14);
        }

        #[cfg(feature = "spi3")]
        {
            let spi3 = descriptor(SpiNum::Spi3);
            assert_eq!(spi3.base, 0x4000_3C00);
            assert_eq!(spi3.irq, 51);
            assert_eq!(spi3.pclk, Pclk::Apb1);
            assert_eq!(spi3.clock_enable, 1 << 15);
            assert_eq!(spi3.alt_function, 6);
        }
    }

    #[cfg(feature = "f1")]
    #[test]
    fn remap_bits_follow_the_mapr_layout() {
        assert_eq!(descriptor(SpiNum::Spi1).remap_bit, 1 << 0);
        #[cfg(feature = "spi2")]
        assert_eq!(descriptor(SpiNum::Spi2).remap_bit, 0);
        #[cfg(feature = "spi3")]
        assert_eq!(descriptor(SpiNum::Spi3).remap_bit, 1 << 28);
    }
}
