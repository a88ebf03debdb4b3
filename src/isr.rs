//! The ISR dispatch table.
//!
//! One handler slot per external interrupt line plus one for the Timer1
//! compare-match interrupt. The slots are process-lifetime globals: the
//! single writer is whoever called the attach function last, the single
//! reader is the corresponding hardware vector. All slots start out
//! explicitly empty, so a vector firing before anything was attached is a
//! no-op instead of a call through a wild pointer.

use core::cell::Cell;
use critical_section::{CriticalSection, Mutex};

/// A handler attached to an interrupt vector.
///
/// Runs in interrupt context: asynchronously to the main program, with
/// further interrupts held off until it returns.
pub type Handler = fn();

pub const NR_LINES: usize = 4;

type Slot = Mutex<Cell<Option<Handler>>>;

// Only used as an initializer; the statics below are the real cells.
#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: Slot = Mutex::new(Cell::new(None));

static LINE_HANDLERS: [Slot; NR_LINES] = [EMPTY_SLOT; NR_LINES];
static TIMER_HANDLER: Slot = EMPTY_SLOT;

/// Attach `handler` to external interrupt line `line`.
///
/// Overwrites any previously attached handler; last writer wins. There is
/// no removal, only overwrite. A line outside 0..=3 is silently ignored.
///
/// Attaching does not enable the line. The next event on an already
/// enabled line calls the new handler without a re-enable.
pub fn attach_isr(line: u8, handler: Handler) {
    if let Some(slot) = LINE_HANDLERS.get(line as usize) {
        critical_section::with(|cs| slot.borrow(cs).set(Some(handler)));
    }
}

/// Store the Timer1 compare-match handler.
///
/// Runs inside the caller's critical section so the slot write and the
/// timer register setup are one atomic unit.
pub(crate) fn set_timer_handler(cs: CriticalSection<'_>, handler: Handler) {
    TIMER_HANDLER.borrow(cs).set(Some(handler));
}

/// Choke point for the INT0..INT3 vectors.
///
/// Also callable from a host-side harness that simulates pin events.
pub fn dispatch_ext(line: u8) {
    let handler = LINE_HANDLERS
        .get(line as usize)
        .and_then(|slot| critical_section::with(|cs| slot.borrow(cs).get()));
    if let Some(handler) = handler {
        handler();
    }
}

/// Choke point for the TIMER1_COMPA vector.
pub fn dispatch_timer() {
    let handler = critical_section::with(|cs| TIMER_HANDLER.borrow(cs).get());
    if let Some(handler) = handler {
        handler();
    }
}


// vim: ts=4 sw=4 expandtab
