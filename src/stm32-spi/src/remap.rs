//! Alternate function remap through AFIO_MAPR, an F1 only concern.

use stm32_spi_regs::f1::{Afio, AFIO_BASE};

use crate::binding::SpiDescriptor;

fn afio_regs() -> &'static Afio {
    // SAFETY: the base is the always mapped AFIO register block.
    unsafe { &*(AFIO_BASE as *const Afio) }
}

/// Routes the peripheral to its remapped pins.
pub(crate) fn apply(descriptor: &SpiDescriptor) {
    let mapr = &afio_regs().mapr;
    critical_section::with(|_| {
        mapr.set(mapr.get() | descriptor.remap_bit);
    });
}

/// Restores the default pin routing.
pub(crate) fn revert(descriptor: &SpiDescriptor) {
    let mapr = &afio_regs().mapr;
    critical_section::with(|_| {
        mapr.set(mapr.get() & !descriptor.remap_bit);
    });
}
