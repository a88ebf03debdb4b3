//! External interrupt line configurator.
//!
//! Maps a logical line number (0..=3) and a trigger mode onto the EIMSK
//! enable mask and the EICRA sense-control register. Each line owns two
//! contiguous sense bits in EICRA at positions 2n+1:2n; the mode encoding
//! carries the same two bits in the opposite order, so the field is written
//! bit-swapped. That quirk is the register contract of the board and must
//! not be "cleaned up".
//!
//! Invalid inputs (line > 3, mode > 3, or the unsupported any-change
//! mode 1) are silently ignored: no error, no register change.

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::register_structs;
use tock_registers::registers::ReadWrite;

use crate::isr::NR_LINES;

/// Data memory address of EIMSK. EICRA sits at 0x6A in extended I/O.
#[cfg(target_arch = "avr")]
const EXINT_BASE: usize = 0x59;

// The external interrupt register bank, EIMSK through EICRA.
register_structs! {
    pub ExIntRegisters {
        (0x00 => eimsk: ReadWrite<u8>),
        (0x01 => _reserved0),
        (0x11 => eicra: ReadWrite<u8>),
        (0x12 => @END),
    }
}

/// The reserved any-change sense encoding. Not supported by the board.
const MODE_RESERVED: u8 = 1;
const MODE_MAX: u8 = 3;

pub struct ExInt<'r> {
    regs: &'r ExIntRegisters,
}

impl<'r> ExInt<'r> {
    pub const fn new(regs: &'r ExIntRegisters) -> Self {
        Self { regs }
    }

    /// Enable external interrupt `line` with trigger `mode`.
    ///
    /// `mode` is one of [`crate::LOW`], [`crate::FALLING`] or
    /// [`crate::RISING`]. The whole update runs with interrupts held off,
    /// so no vector can observe a half-written sense configuration.
    pub fn enable(&self, line: u8, mode: u8) {
        if line as usize >= NR_LINES || mode > MODE_MAX || mode == MODE_RESERVED {
            return;
        }
        let shift = line * 2;
        // The mode's bit 1 lands in the lower sense bit, bit 0 in the upper.
        let sense = ((mode & 0b01) << 1) | ((mode & 0b10) >> 1);
        critical_section::with(|_| {
            self.regs.eimsk.set(self.regs.eimsk.get() | (1 << line));
            let mut eicra = self.regs.eicra.get();
            eicra &= !(0b11 << shift);
            eicra |= sense << shift;
            self.regs.eicra.set(eicra);
        });
    }

    /// Disable external interrupt `line`.
    ///
    /// Clears only the enable-mask bit. The sense bits stay as they are,
    /// so re-enabling the line resumes the previous trigger mode.
    pub fn disable(&self, line: u8) {
        if line as usize >= NR_LINES {
            return;
        }
        critical_section::with(|_| {
            self.regs.eimsk.set(self.regs.eimsk.get() & !(1 << line));
        });
    }
}

/// The live register bank of the MCU.
#[cfg(target_arch = "avr")]
pub fn exint() -> ExInt<'static> {
    // SAFETY: EXINT_BASE is the fixed data memory address of EIMSK on this
    //         MCU and the block layout matches the datasheet register map.
    ExInt::new(unsafe { &*(EXINT_BASE as *const ExIntRegisters) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isr::{attach_isr, dispatch_ext};
    use crate::{FALLING, LOW, RISING};
    use core::sync::atomic::{AtomicUsize, Ordering};

    fn zeroed_regs() -> ExIntRegisters {
        // SAFETY: the block is plain bytes; all-zero is the reset state.
        unsafe { core::mem::zeroed() }
    }

    /// What the pin hardware does on a level/edge event: gate on the
    /// enable mask, decode the sense bits, fire the vector on a match.
    fn pin_event(regs: &ExIntRegisters, line: u8, old: bool, new: bool) {
        if regs.eimsk.get() & (1 << line) == 0 {
            return;
        }
        let sense = (regs.eicra.get() >> (line * 2)) & 0b11;
        let fires = match sense {
            0b00 => !new,        // low level
            0b01 => old && !new, // falling edge
            0b11 => !old && new, // rising edge
            _ => false,
        };
        if fires {
            dispatch_ext(line);
        }
    }

    #[test]
    fn sense_field_is_mode_bit_swapped() {
        for line in 0..NR_LINES as u8 {
            for (mode, field) in [(LOW, 0b00u8), (FALLING, 0b01), (RISING, 0b11)] {
                let regs = zeroed_regs();
                let exint = ExInt::new(&regs);
                // Pre-set every other line's sense bits.
                regs.eicra.set(!(0b11 << (line * 2)));
                exint.enable(line, mode);
                let eicra = regs.eicra.get();
                assert_eq!((eicra >> (line * 2)) & 0b11, field);
                assert_eq!(eicra | (0b11 << (line * 2)), 0xFF);
                assert_eq!(regs.eimsk.get(), 1 << line);
            }
        }
    }

    #[test]
    fn invalid_inputs_leave_registers_unchanged() {
        let regs = zeroed_regs();
        let exint = ExInt::new(&regs);
        regs.eimsk.set(0b1010);
        regs.eicra.set(0xA5);

        for (line, mode) in [(4, RISING), (255, RISING), (0, 1), (0, 4), (2, 255)] {
            exint.enable(line, mode);
            assert_eq!(regs.eimsk.get(), 0b1010);
            assert_eq!(regs.eicra.get(), 0xA5);
        }
        exint.disable(4);
        exint.disable(255);
        assert_eq!(regs.eimsk.get(), 0b1010);
        assert_eq!(regs.eicra.get(), 0xA5);
    }

    #[test]
    fn disable_clears_only_the_mask_bit() {
        let regs = zeroed_regs();
        let exint = ExInt::new(&regs);
        exint.enable(2, FALLING);
        exint.enable(3, RISING);

        exint.disable(2);
        assert_eq!(regs.eimsk.get(), 1 << 3);
        // Sense bits survive, so a later mask-only re-enable resumes
        // falling-edge triggering without the mode being re-specified.
        assert_eq!((regs.eicra.get() >> 4) & 0b11, 0b01);
    }

    static LINE0_HITS: AtomicUsize = AtomicUsize::new(0);
    static LINE1_HITS: AtomicUsize = AtomicUsize::new(0);

    fn line0_handler() {
        LINE0_HITS.fetch_add(1, Ordering::SeqCst);
    }

    fn line1_handler() {
        LINE1_HITS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn rising_edge_fires_once_until_disabled() {
        let regs = zeroed_regs();
        let exint = ExInt::new(&regs);

        exint.enable(0, RISING);
        attach_isr(0, line0_handler);

        pin_event(&regs, 0, false, true);
        assert_eq!(LINE0_HITS.load(Ordering::SeqCst), 1);
        // A falling edge does not match the rising sense config.
        pin_event(&regs, 0, true, false);
        assert_eq!(LINE0_HITS.load(Ordering::SeqCst), 1);

        exint.disable(0);
        pin_event(&regs, 0, false, true);
        assert_eq!(LINE0_HITS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reattach_takes_effect_without_reenable() {
        let regs = zeroed_regs();
        let exint = ExInt::new(&regs);

        exint.enable(1, FALLING);
        attach_isr(1, line0_handler_stand_in);
        attach_isr(1, line1_handler);

        pin_event(&regs, 1, true, false);
        assert_eq!(LINE1_HITS.load(Ordering::SeqCst), 1);
    }

    fn line0_handler_stand_in() {
        unreachable!("overwritten before any event");
    }
}

// vim: ts=4 sw=4 expandtab
