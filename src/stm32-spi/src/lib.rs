//! Blocking SPI master driver for the STM32 F1/F2/F4 families.
//!
//! The driver is split in three:
//!
//! * [`binding`] resolves a peripheral and remap choice to pins, register
//!   base, interrupt and clock bits at compile time; combinations the
//!   hardware does not have fail the build.
//! * [`SpiBus`] drives a bound register block: blocking byte transfers,
//!   bus locking and CR1 field accessors, along with the blocking
//!   [`embedded_hal::spi::SpiBus`] implementation built on them.
//! * [`Spi`] owns one peripheral per [`SpiConfig`] type and performs the
//!   full hardware bring-up when taken.
//!
//! Families and peripherals are selected through crate features: exactly
//! one of `f1`/`f4`, plus `spi2`/`spi3` as the part provides them (`spi3`
//! on F1 needs `connectivity`). GPIO and, on F1, AFIO clocks are expected
//! to be enabled by board bring-up before a peripheral is taken.
//!
//! # Examples
//!
//! ```no_run
//! use stm32_spi::{Divisor, Spi, SpiConfig, SpiNum};
//!
//! struct Flash;
//!
//! impl SpiConfig for Flash {
//!     const NUMBER: SpiNum = SpiNum::Spi1;
//!     const INITIAL_DIVISOR: Divisor = Divisor::Div8;
//! }
//!
//! let spi = Spi::<Flash>::take().unwrap();
//! spi.lock();
//! spi.write_byte(0x9F);
//! let id = spi.read_byte();
//! spi.wait_tx_done();
//! spi.unlock();
//! ```
#![cfg_attr(not(test), no_std)]

#[cfg(not(any(feature = "f1", feature = "f4")))]
compile_error!("no family selected: enable feature \"f1\" or feature \"f4\"");

#[cfg(all(feature = "f1", feature = "f4"))]
compile_error!("feature \"f1\" and feature \"f4\" cannot be enabled at the same time");

#[cfg(all(feature = "connectivity", not(feature = "f1")))]
compile_error!("feature \"connectivity\" is an f1 line selection and requires feature \"f1\"");

#[cfg(all(feature = "spi3", feature = "f1", not(feature = "connectivity")))]
compile_error!("SPI3 on the f1 family requires feature \"connectivity\"");

// This mod must go first, so that the others see its macros.
#[macro_use]
mod fmt;

pub mod binding;
pub mod bus;
pub mod lock;

mod gpio;
mod rcc;
#[cfg(feature = "f1")]
mod remap;
mod spi;

pub use binding::{Pin, PinSet, Port, Remap, SpiDescriptor, SpiNum};
pub use bus::{Divisor, SpiBus};
pub use lock::Lock;
pub use spi::{Spi, SpiConfig};

pub use embedded_hal::spi::{Mode, Phase, Polarity, MODE_0, MODE_1, MODE_2, MODE_3};
