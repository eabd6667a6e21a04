//! Pin configuration for the SPI signals.
//!
//! SCK and MOSI are peripheral driven outputs, MISO is an input. On F1
//! that is a CNF/MODE nibble per pin in CRL/CRH, on F2/F4 an entry in the
//! alternate function mux plus the mode field. The shared registers are
//! read-modify-written under a critical section.

use crate::binding::{Pin, PinSet, Port};

cfg_if::cfg_if! {
    if #[cfg(feature = "f1")] {
        use stm32_spi_regs::f1 as sys;
        use stm32_spi_regs::f1::cnf_mode;
    } else {
        use stm32_spi_regs::f4 as sys;
        use stm32_spi_regs::f4::moder;
    }
}

fn port_regs(port: Port) -> &'static sys::Gpio {
    let base = match port {
        Port::A => sys::GPIOA_BASE,
        Port::B => sys::GPIOB_BASE,
        Port::C => sys::GPIOC_BASE,
    };
    // SAFETY: the base is an always mapped GPIO register block.
    unsafe { &*(base as *const sys::Gpio) }
}

/// New CRL/CRH image with the nibble of `index % 8` replaced.
#[cfg(feature = "f1")]
const fn cr_image(value: u32, index: u8, nibble: u32) -> u32 {
    let shift = (index % 8) as u32 * 4;
    (value & !(0b1111 << shift)) | (nibble << shift)
}

#[cfg(feature = "f1")]
fn set_cnf_mode(pin: &Pin, nibble: u32) {
    let regs = port_regs(pin.port);
    critical_section::with(|_| {
        let reg = if pin.index < 8 { &regs.crl } else { &regs.crh };
        reg.set(cr_image(reg.get(), pin.index, nibble));
    });
}

/// Hands the pins to the peripheral.
#[cfg(feature = "f1")]
pub(crate) fn connect(pins: &PinSet, _alt_function: u8) {
    set_cnf_mode(&pins.sck, cnf_mode::ALT_OUTPUT_50MHZ);
    set_cnf_mode(&pins.mosi, cnf_mode::ALT_OUTPUT_50MHZ);
    set_cnf_mode(&pins.miso, cnf_mode::INPUT_PULLED);
}

/// Releases the pins to floating inputs.
#[cfg(feature = "f1")]
pub(crate) fn disconnect(pins: &PinSet) {
    set_cnf_mode(&pins.sck, cnf_mode::INPUT_FLOATING);
    set_cnf_mode(&pins.mosi, cnf_mode::INPUT_FLOATING);
    set_cnf_mode(&pins.miso, cnf_mode::INPUT_FLOATING);
}

/// New AFRL/AFRH image with the nibble of `index % 8` replaced.
#[cfg(feature = "f4")]
const fn afr_image(value: u32, index: u8, alt_function: u8) -> u32 {
    let shift = (index % 8) as u32 * 4;
    (value & !(0b1111 << shift)) | ((alt_function as u32) << shift)
}

/// New MODER image with the two bit field of `index` replaced.
#[cfg(feature = "f4")]
const fn moder_image(value: u32, index: u8, mode: u32) -> u32 {
    let shift = index as u32 * 2;
    (value & !(0b11 << shift)) | (mode << shift)
}

#[cfg(feature = "f4")]
fn set_alt_function(pin: &Pin, alt_function: u8) {
    let regs = port_regs(pin.port);
    critical_section::with(|_| {
        let reg = if pin.index < 8 { &regs.afrl } else { &regs.afrh };
        reg.set(afr_image(reg.get(), pin.index, alt_function));
    });
}

#[cfg(feature = "f4")]
fn set_mode(pin: &Pin, mode: u32) {
    let regs = port_regs(pin.port);
    critical_section::with(|_| {
        regs.moder
            .set(moder_image(regs.moder.get(), pin.index, mode));
    });
}

/// Hands the pins to the peripheral, mux selection before mode.
#[cfg(feature = "f4")]
pub(crate) fn connect(pins: &PinSet, alt_function: u8) {
    set_alt_function(&pins.sck, alt_function);
    set_alt_function(&pins.mosi, alt_function);
    set_alt_function(&pins.miso, alt_function);

    set_mode(&pins.sck, moder::ALTERNATE);
    set_mode(&pins.mosi, moder::ALTERNATE);
    set_mode(&pins.miso, moder::ALTERNATE);
}

/// Releases the pins to inputs.
#[cfg(feature = "f4")]
pub(crate) fn disconnect(pins: &PinSet) {
    set_mode(&pins.sck, moder::INPUT);
    set_mode(&pins.mosi, moder::INPUT);
    set_mode(&pins.miso, moder::INPUT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "f1")]
    #[test]
    fn cr_image_replaces_only_the_addressed_nibble() {
        // All pins at the floating input reset value.
        let value = 0x4444_4444;
        let updated = cr_image(value, 13, cnf_mode::ALT_OUTPUT_50MHZ);
        assert_eq!(updated, 0x44B4_4444);
        let restored = cr_image(updated, 13, cnf_mode::INPUT_FLOATING);
        assert_eq!(restored, value);
    }

    #[cfg(feature = "f1")]
    #[test]
    fn cr_image_wraps_high_register_pins_to_their_nibble() {
        assert_eq!(cr_image(0, 5, 0b1011), 0b1011 << 20);
        assert_eq!(cr_image(0, 8, 0b1000), 0b1000);
    }

    #[cfg(feature = "f4")]
    #[test]
    fn afr_and_moder_images_replace_only_their_fields() {
        assert_eq!(afr_image(0, 12, 6), 6 << 16);
        assert_eq!(moder_image(0xFFFF_FFFF, 0, moder::INPUT), 0xFFFF_FFFC);
    }
}
