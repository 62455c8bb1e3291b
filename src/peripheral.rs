//! # RNG Register Interface
//! Named field accessors for the RNG register block.
//!
//! The driver never touches raw offsets. Everything it needs from the
//! peripheral goes through [`RngRegisters`], which is implemented for the
//! PAC's [`RNG`](crate::pac::RNG) and can be implemented by anything else
//! that behaves like one.

use crate::pac::RNG;

/// DERCEN: bias correction enable bit within CONFIG.
pub const CONFIG_DERCEN: u32 = 1 << 0;
/// VALRDY_STOP: shortcut between the VALRDY event and the STOP task.
pub const SHORTS_VALRDY_STOP: u32 = 1 << 0;

/// Field-level access to an RNG register block.
///
/// Reads take `&self` and writes take `&mut self`, so whoever holds the
/// block by value is the only writer.
pub trait RngRegisters {
    /// Write POWER. `true` powers the peripheral, `false` removes power.
    fn set_powered(&mut self, on: bool);

    /// Set or clear CONFIG.DERCEN, leaving the other CONFIG bits untouched.
    fn set_error_correction(&mut self, enabled: bool);

    /// Enable the VALRDY interrupt source through INTENSET.
    fn enable_ready_interrupt(&mut self);

    /// Trigger TASKS_START.
    fn trigger_start(&mut self);

    /// Trigger TASKS_STOP.
    fn trigger_stop(&mut self);

    /// Set or clear SHORTS.VALRDY_STOP, leaving the other SHORTS bits
    /// untouched.
    fn set_auto_stop(&mut self, enabled: bool);

    /// Whether SHORTS.VALRDY_STOP is currently wired.
    fn auto_stop(&self) -> bool;

    /// Whether EVENTS_VALRDY is set.
    fn is_value_ready(&self) -> bool;

    /// Clear EVENTS_VALRDY.
    fn clear_value_ready(&mut self);

    /// Low byte of VALUE. Only meaningful while EVENTS_VALRDY is set.
    fn value(&self) -> u8;
}

impl RngRegisters for RNG {
    #[inline(always)]
    fn set_powered(&mut self, on: bool) {
        self.power.write(|w| unsafe { w.bits(on as u32) });
    }

    #[inline(always)]
    fn set_error_correction(&mut self, enabled: bool) {
        if enabled {
            self.config.modify(|_, w| w.dercen().enabled());
        } else {
            self.config.modify(|_, w| w.dercen().disabled());
        }
    }

    #[inline(always)]
    fn enable_ready_interrupt(&mut self) {
        self.intenset.write(|w| w.valrdy().set());
    }

    #[inline(always)]
    fn trigger_start(&mut self) {
        self.tasks_start.write(|w| unsafe { w.bits(1) });
    }

    #[inline(always)]
    fn trigger_stop(&mut self) {
        self.tasks_stop.write(|w| unsafe { w.bits(1) });
    }

    #[inline(always)]
    fn set_auto_stop(&mut self, enabled: bool) {
        if enabled {
            self.shorts.modify(|_, w| w.valrdy_stop().enabled());
        } else {
            self.shorts.modify(|_, w| w.valrdy_stop().disabled());
        }
    }

    #[inline(always)]
    fn auto_stop(&self) -> bool {
        self.shorts.read().bits() & SHORTS_VALRDY_STOP != 0
    }

    #[inline(always)]
    fn is_value_ready(&self) -> bool {
        self.events_valrdy.read().bits() != 0
    }

    #[inline(always)]
    fn clear_value_ready(&mut self) {
        self.events_valrdy.write(|w| unsafe { w.bits(0) });
    }

    #[inline(always)]
    fn value(&self) -> u8 {
        self.value.read().value().bits()
    }
}
