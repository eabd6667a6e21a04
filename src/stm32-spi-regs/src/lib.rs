//! Hand-maintained register description for the `stm32-spi` driver.
//!
//! Covers the SPI block itself plus the slices of RCC, AFIO and GPIO the
//! driver touches. Offsets and bit positions follow RM0008 (F1) and
//! RM0090 (F2/F4); both family modules are always compiled, the driver
//! selects one through its family features.
#![cfg_attr(not(test), no_std)]

pub mod f1;
pub mod f4;
pub mod spi;
