//! # Low-Power Event Wait
//!
//! The harvest loop never spins at full speed while waiting for a value.
//! Between checks of the ready flag it parks the core through an
//! [`EventWait`], then checks the flag again no matter what woke it.

use cortex_m::asm;
use cortex_m::peripheral::{NVIC, SCB};

use crate::pac::Interrupt;

/// SEVONPEND: any interrupt becoming pending counts as a wake-up event.
const SCR_SEVONPEND: u32 = 1 << 4;

/// Suspension primitive used between ready-flag checks.
pub trait EventWait {
    /// Arm wake-on-pending, then block until an event arrives.
    ///
    /// The wait is issued twice after a self-signalled event: the first WFE
    /// only consumes the event latch set by SEV (or a stale one) and may
    /// return at once; the second one actually sleeps. Callers must treat
    /// any return as a possibly spurious wake and re-check their condition.
    fn prime_and_wait_twice(&mut self);

    /// Clear the latched pending bit of the RNG interrupt line.
    fn clear_pending(&mut self);
}

/// Cortex-M0 [`EventWait`] built on SEV/WFE and the NVIC.
pub struct WaitForEvent {
    scb: SCB,
}

impl WaitForEvent {
    /// Take the System Control Block, whose SCR holds SEVONPEND.
    pub fn new(scb: SCB) -> Self {
        Self { scb }
    }

    /// Release the System Control Block.
    pub fn free(self) -> SCB {
        self.scb
    }
}

impl EventWait for WaitForEvent {
    #[inline(always)]
    fn prime_and_wait_twice(&mut self) {
        unsafe {
            self.scb.scr.modify(|scr| scr | SCR_SEVONPEND);
        }
        asm::sev();
        asm::wfe();
        asm::wfe();
    }

    #[inline(always)]
    fn clear_pending(&mut self) {
        NVIC::unpend(Interrupt::RNG);
    }
}
