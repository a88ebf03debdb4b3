//! CPU clock constant and the fixed interrupt vector entry points.

/// Crystal frequency of the board in Hz.
pub const CPU_HZ: u32 = 16_000_000;

/// The hardware-dictated vectors. Each one only indirects through the
/// dispatch table; all logic lives in the handlers attached at runtime.
///
/// The `atmega1280` device is used for the vector table: `avr-device` has
/// no plain ATmega128 PAC, and the INT0..INT3 and TIMER1_COMPA vector
/// names are the same on both parts. Register addresses are not taken
/// from the PAC (see `exint` and `timer`).
#[cfg(target_arch = "avr")]
mod vectors {
    macro_rules! define_isr {
        ($name:ident, $handler:expr) => {
            #[avr_device::interrupt(atmega1280)]
            fn $name() {
                $handler;
            }
        };
    }

    define_isr!(INT0, crate::isr::dispatch_ext(0));
    define_isr!(INT1, crate::isr::dispatch_ext(1));
    define_isr!(INT2, crate::isr::dispatch_ext(2));
    define_isr!(INT3, crate::isr::dispatch_ext(3));
    define_isr!(TIMER1_COMPA, crate::isr::dispatch_timer());
}

// vim: ts=4 sw=4 expandtab
