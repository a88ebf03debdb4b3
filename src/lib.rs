#![no_std]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

//! External pin interrupts and the Timer1 periodic interrupt for the
//! ATmega128 robotics board.
//!
//! The crate covers exactly two things: translating a logical interrupt
//! line number and trigger mode into the EIMSK/EICRA bit patterns, and
//! routing the fixed hardware vectors through runtime-attached handlers.
//! Everything else on the board (pin numbering, motors, the rest of the
//! support library) lives above this layer.
//!
//! Enabling a line and attaching its handler are independent calls and can
//! be issued in either order, but a line must have a handler attached
//! before its first hardware event; a vector firing on an empty slot is
//! silently dropped.

pub mod exint;
pub mod hw;
pub mod isr;
pub mod timer;

pub use crate::exint::ExInt;
pub use crate::isr::{Handler, attach_isr};
pub use crate::timer::Timer1;

/// External interrupt line identifiers.
pub const INT0: u8 = 0;
pub const INT1: u8 = 1;
pub const INT2: u8 = 2;
pub const INT3: u8 = 3;

/// Trigger mode identifiers.
///
/// The hardware defines a fourth encoding (1, trigger on any pin change)
/// that the board does not support. [`ExInt::enable`] rejects it.
pub const LOW: u8 = 0;
pub const FALLING: u8 = 2;
pub const RISING: u8 = 3;

// vim: ts=4 sw=4 expandtab
