//! Configuration driven SPI peripherals.

use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

use embedded_hal::spi::{Phase, Polarity};
use portable_atomic::{AtomicBool, Ordering};
use stm32_spi_regs::spi::SpiRegs;

use crate::binding::{self, PinSet, Remap, SpiDescriptor, SpiNum};
use crate::bus::{Divisor, SpiBus};
use crate::{gpio, rcc};

#[cfg(feature = "f1")]
use crate::remap;

/// Compile-time configuration of one SPI peripheral.
///
/// Only the peripheral id is mandatory; the defaults give the default
/// pins, PCLK/32 and mode 0.
///
/// # Examples
///
/// ```
/// use stm32_spi::{Divisor, Remap, SpiConfig, SpiNum};
///
/// struct Display;
///
/// impl SpiConfig for Display {
///     const NUMBER: SpiNum = SpiNum::Spi1;
///     const REMAP: Remap = Remap::Full;
///     const INITIAL_DIVISOR: Divisor = Divisor::Div8;
/// }
/// ```
pub trait SpiConfig {
    /// Which peripheral to drive.
    const NUMBER: SpiNum;
    /// Pin routing.
    const REMAP: Remap = Remap::None;
    /// Bit clock divisor applied at bring-up.
    const INITIAL_DIVISOR: Divisor = Divisor::Div32;
    /// Clock polarity applied at bring-up.
    const INITIAL_POLARITY: Polarity = Polarity::IdleLow;
    /// Clock phase applied at bring-up.
    const INITIAL_PHASE: Phase = Phase::CaptureOnFirstTransition;
}

static SPI1_TAKEN: AtomicBool = AtomicBool::new(false);
#[cfg(feature = "spi2")]
static SPI2_TAKEN: AtomicBool = AtomicBool::new(false);
#[cfg(feature = "spi3")]
static SPI3_TAKEN: AtomicBool = AtomicBool::new(false);

fn taken_flag(num: SpiNum) -> &'static AtomicBool {
    match num {
        SpiNum::Spi1 => &SPI1_TAKEN,
        #[cfg(feature = "spi2")]
        SpiNum::Spi2 => &SPI2_TAKEN,
        #[cfg(feature = "spi3")]
        SpiNum::Spi3 => &SPI3_TAKEN,
    }
}

/// One SPI peripheral, brought up per the configuration `C`.
///
/// At most one instance per peripheral id is live at a time; [`Spi::take`]
/// hands it out and dropping it returns it. All [`SpiBus`] operations are
/// available through deref.
pub struct Spi<C: SpiConfig> {
    bus: SpiBus,
    _config: PhantomData<C>,
}

impl<C: SpiConfig> Spi<C> {
    /// Resolved pin triple.
    pub const PINS: PinSet = binding::pins(C::NUMBER, C::REMAP);
    /// Resolved system resources.
    pub const DESCRIPTOR: SpiDescriptor = binding::descriptor(C::NUMBER);
    /// NVIC interrupt number of the peripheral.
    pub const IRQ: u16 = Self::DESCRIPTOR.irq;

    /// Takes the peripheral and performs the hardware bring-up.
    ///
    /// Returns `None` while a previously taken instance is still live.
    pub fn take() -> Option<Self> {
        let flag = taken_flag(C::NUMBER);
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            // SAFETY: the taken flag rules out another live instance.
            Some(unsafe { Self::steal() })
        } else {
            None
        }
    }

    /// Creates the peripheral without consulting the taken flag, and
    /// performs the hardware bring-up.
    ///
    /// # Safety
    ///
    /// There must be no other live instance for the same peripheral id.
    pub unsafe fn steal() -> Self {
        let spi = Self {
            bus: SpiBus::new(Self::registers()),
            _config: PhantomData,
        };
        spi.hw_init();
        spi
    }

    fn registers() -> &'static SpiRegs {
        // SAFETY: the descriptor base is the peripheral's always mapped
        // register block.
        unsafe { &*(Self::DESCRIPTOR.base as *const SpiRegs) }
    }

    /// Brings the hardware up: remap, bus clock, pins, then the SPI block
    /// itself with the initial configuration.
    fn hw_init(&self) {
        debug!("spi{}: hw_init", C::NUMBER as u8 + 1);

        #[cfg(feature = "f1")]
        if C::REMAP == Remap::Full {
            remap::apply(&Self::DESCRIPTOR);
        }

        rcc::enable_clock(&Self::DESCRIPTOR);
        gpio::connect(&Self::PINS, Self::DESCRIPTOR.alt_function);
        self.bus
            .initialize(C::INITIAL_DIVISOR, C::INITIAL_POLARITY, C::INITIAL_PHASE);
    }

    /// Reverts everything the bring-up did: control registers cleared,
    /// remap undone, bus clock gated off, pins released to inputs.
    fn hw_deinit(&self) {
        debug!("spi{}: hw_deinit", C::NUMBER as u8 + 1);

        self.bus.deinitialize();

        #[cfg(feature = "f1")]
        if C::REMAP == Remap::Full {
            remap::revert(&Self::DESCRIPTOR);
        }

        rcc::disable_clock(&Self::DESCRIPTOR);
        gpio::disconnect(&Self::PINS);
    }

    /// Switches between the active and inactive states.
    ///
    /// Deactivating tears the peripheral down completely; a later
    /// activation re-runs the full bring-up with the same configuration.
    pub fn set_active(&self, active: bool) {
        if active {
            self.hw_init();
        } else {
            self.hw_deinit();
        }
    }

    /// Gates the peripheral bus clock on.
    pub fn enable_clocks(&self) {
        rcc::enable_clock(&Self::DESCRIPTOR);
    }

    /// Gates the peripheral bus clock off.
    pub fn disable_clocks(&self) {
        rcc::disable_clock(&Self::DESCRIPTOR);
    }
}

impl<C: SpiConfig> Deref for Spi<C> {
    type Target = SpiBus;

    fn deref(&self) -> &SpiBus {
        &self.bus
    }
}

impl<C: SpiConfig> DerefMut for Spi<C> {
    fn deref_mut(&mut self) -> &mut SpiBus {
        &mut self.bus
    }
}

impl<C: SpiConfig> Drop for Spi<C> {
    // Only returns the taken flag; the hardware keeps running. Callers
    // wanting a powered down peripheral deactivate it first.
    fn drop(&mut self) {
        taken_flag(C::NUMBER).store(false, Ordering::Release);
    }
}
