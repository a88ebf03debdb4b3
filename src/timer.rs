//! Timer1 compare-match periodic interrupt.
//!
//! Timer1 counts up from zero and is cleared by hardware when it reaches
//! the 16-bit OCR1A threshold (CTC mode); each match raises the
//! TIMER1_COMPA vector. The count rate is [`CPU_HZ`] divided by one of
//! five fixed prescaler divisors.
//!
//! Attaching a periodic interrupt occupies Timer1 exclusively. Using the
//! same timer for anything else (motor PWM) at the same time is a caller
//! error that this layer does not detect.

use tock_registers::interfaces::{ReadWriteable, Writeable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

use crate::hw::CPU_HZ;
use crate::isr::{self, Handler};

/// Data memory address of OCR1AL. The block runs up to TIMSK at 0x57.
#[cfg(target_arch = "avr")]
const TIMER1_BASE: usize = 0x4A;

// The Timer1 register bank, OCR1A through TIMSK. The 16-bit pairs are
// accessed high byte first: the MCU latches the high byte in its shared
// TEMP register until the low byte is written.
register_structs! {
    pub Timer1Registers {
        (0x00 => ocr1al: ReadWrite<u8>),
        (0x01 => ocr1ah: ReadWrite<u8>),
        (0x02 => tcnt1l: ReadWrite<u8>),
        (0x03 => tcnt1h: ReadWrite<u8>),
        (0x04 => tccr1b: ReadWrite<u8, TCCR1B::Register>),
        (0x05 => tccr1a: ReadWrite<u8>),
        (0x06 => _reserved0),
        (0x0d => timsk: ReadWrite<u8, TIMSK::Register>),
        (0x0e => @END),
    }
}

register_bitfields![u8,
    TCCR1B [
        /// Prescaler select; `divisor index + 1`. 0 stops the timer.
        CS OFFSET(0) NUMBITS(3) [],
        /// Clear-timer-on-compare-match counting mode.
        WGM12 OFFSET(3) NUMBITS(1) [],
    ],
    TIMSK [
        /// Compare-match A interrupt enable. TIMSK is shared with the
        /// other timers' interrupt enables, so only this bit is touched.
        OCIE1A OFFSET(4) NUMBITS(1) [],
    ],
];

const PRESCALER_DIVISORS: [u32; 5] = [1, 8, 64, 256, 1024];

// Only the /1024 entry is ever tried. Scanning from the smaller divisors
// would pick wider thresholds at the same frequency, but every board in
// the field is timed against /1024, so the scan start stays at the last
// entry.
const PRESCALER_SCAN_START: usize = 4;

pub struct Timer1<'r> {
    regs: &'r Timer1Registers,
}

impl<'r> Timer1<'r> {
    pub const fn new(regs: &'r Timer1Registers) -> Self {
        Self { regs }
    }

    /// Configure Timer1 to call `handler` at `freq_hz` (1..=65535 Hz).
    ///
    /// Picks the first scanned prescaler divisor whose compare threshold
    /// `(CPU_HZ / divisor) / freq_hz` fits in 16 bits. If none fits (or
    /// `freq_hz` is 0), nothing is configured: the timer registers keep
    /// their previous state and a previously attached handler stays in
    /// place. No error is reported.
    pub fn attach_interrupt(&self, freq_hz: u16, handler: Handler) {
        if freq_hz == 0 {
            return;
        }
        for idx in PRESCALER_SCAN_START..PRESCALER_DIVISORS.len() {
            let tick_hz = CPU_HZ / PRESCALER_DIVISORS[idx];
            let threshold = tick_hz / u32::from(freq_hz);
            if threshold <= u32::from(u16::MAX) {
                critical_section::with(|cs| {
                    self.regs.tccr1a.set(0);
                    self.write_tcnt1(0);
                    self.write_ocr1a(threshold as u16);
                    self.regs
                        .tccr1b
                        .write(TCCR1B::WGM12::SET + TCCR1B::CS.val(idx as u8 + 1));
                    self.regs.timsk.modify(TIMSK::OCIE1A::SET);
                    isr::set_timer_handler(cs, handler);
                });
                return;
            }
        }
    }

    /// Stop the periodic interrupt.
    ///
    /// Clears only the compare-match interrupt enable. Prescaler and
    /// threshold stay configured, so a later re-attach at the same
    /// frequency resumes the same period.
    pub fn detach_interrupt(&self) {
        critical_section::with(|_| {
            self.regs.timsk.modify(TIMSK::OCIE1A::CLEAR);
        });
    }

    fn write_ocr1a(&self, value: u16) {
        self.regs.ocr1ah.set((value >> 8) as u8);
        self.regs.ocr1al.set(value as u8);
    }

    fn write_tcnt1(&self, value: u16) {
        self.regs.tcnt1h.set((value >> 8) as u8);
        self.regs.tcnt1l.set(value as u8);
    }
}

/// The live register bank of the MCU.
#[cfg(target_arch = "avr")]
pub fn timer1() -> Timer1<'static> {
    // SAFETY: TIMER1_BASE is the fixed data memory address of OCR1AL on
    //         this MCU and the block layout matches the datasheet map.
    Timer1::new(unsafe { &*(TIMER1_BASE as *const Timer1Registers) })
}


// vim: ts=4 sw=4 expandtab
