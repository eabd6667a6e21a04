//! Peripheral clock gating.

use crate::binding::{Pclk, SpiDescriptor};

cfg_if::cfg_if! {
    if #[cfg(feature = "f1")] {
        use stm32_spi_regs::f1 as sys;
    } else {
        use stm32_spi_regs::f4 as sys;
    }
}

fn rcc_regs() -> &'static sys::Rcc {
    // SAFETY: the base is the always mapped RCC register block.
    unsafe { &*(sys::RCC_BASE as *const sys::Rcc) }
}

/// Gates the peripheral clock on.
///
/// The barrier orders the enable against the first peripheral register
/// access that follows it.
pub(crate) fn enable_clock(descriptor: &SpiDescriptor) {
    let rcc = rcc_regs();
    critical_section::with(|_| {
        let reg = match descriptor.pclk {
            Pclk::Apb1 => &rcc.apb1enr,
            Pclk::Apb2 => &rcc.apb2enr,
        };
        reg.set(reg.get() | descriptor.clock_enable);
    });
    cortex_m::asm::dsb();
}

/// Gates the peripheral clock off.
pub(crate) fn disable_clock(descriptor: &SpiDescriptor) {
    let rcc = rcc_regs();
    critical_section::with(|_| {
        let reg = match descriptor.pclk {
            Pclk::Apb1 => &rcc.apb1enr,
            Pclk::Apb2 => &rcc.apb2enr,
        };
        reg.set(reg.get() & !descriptor.clock_enable);
    });
    cortex_m::asm::dsb();
}
