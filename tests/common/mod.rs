//! Simulated nRF51 RNG block for host-side tests.
//!
//! [`SimRegisters`] and [`SimWait`] share one [`Hardware`] model. Every
//! access the driver makes is appended to [`Hardware::log`], and a new
//! value is latched only when the driver actually sleeps.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use nrf51_rng::event::EventWait;
use nrf51_rng::peripheral::{RngRegisters, CONFIG_DERCEN};
use nrf51_rng::rng::{marker, Rng};

/// One driver-visible access to the simulated hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Power(bool),
    ErrorCorrection(bool),
    EnableReadyInterrupt,
    Start,
    Stop,
    AutoStop(bool),
    ReadAutoStop,
    ReadReady,
    ClearReady,
    ReadValue,
    Wait,
    ClearPending,
}

#[derive(Debug, Default)]
pub struct Hardware {
    pub powered: bool,
    pub config: u32,
    pub interrupt_enabled: bool,
    pub running: bool,
    pub auto_stop: bool,
    pub valrdy: bool,
    pub value: u8,
    pub irq_pending: bool,
    /// Values to latch, in order. Once empty, a counter takes over.
    pub samples: VecDeque<u8>,
    pub next_sample: u8,
    /// Wakes that deliver nothing before each value is latched.
    pub spurious_per_value: u32,
    spurious_left: u32,
    pub events_fired: usize,
    pub log: Vec<Access>,
}

impl Hardware {
    fn record(&mut self, access: Access) {
        self.log.push(access);
    }

    fn sleep(&mut self) {
        self.record(Access::Wait);
        if self.spurious_left > 0 {
            self.spurious_left -= 1;
            return;
        }
        if !(self.powered && self.running) {
            return;
        }
        self.value = match self.samples.pop_front() {
            Some(sample) => sample,
            None => {
                let sample = self.next_sample;
                self.next_sample = self.next_sample.wrapping_add(1);
                sample
            }
        };
        self.valrdy = true;
        self.irq_pending = self.interrupt_enabled;
        self.events_fired += 1;
        self.spurious_left = self.spurious_per_value;
        if self.auto_stop {
            self.running = false;
        }
    }

    /// Deliver `wakes` empty wake-ups before every latched value.
    pub fn set_spurious(&mut self, wakes: u32) {
        self.spurious_per_value = wakes;
        self.spurious_left = wakes;
    }

    pub fn count(&self, access: Access) -> usize {
        self.log.iter().filter(|a| **a == access).count()
    }
}

pub type Shared = Rc<RefCell<Hardware>>;

pub struct SimRegisters(pub Shared);
pub struct SimWait(pub Shared);

impl RngRegisters for SimRegisters {
    fn set_powered(&mut self, on: bool) {
        let mut hw = self.0.borrow_mut();
        hw.record(Access::Power(on));
        hw.powered = on;
        if !on {
            hw.running = false;
        }
    }

    fn set_error_correction(&mut self, enabled: bool) {
        let mut hw = self.0.borrow_mut();
        hw.record(Access::ErrorCorrection(enabled));
        if enabled {
            hw.config |= CONFIG_DERCEN;
        } else {
            hw.config &= !CONFIG_DERCEN;
        }
    }

    fn enable_ready_interrupt(&mut self) {
        let mut hw = self.0.borrow_mut();
        hw.record(Access::EnableReadyInterrupt);
        hw.interrupt_enabled = true;
    }

    fn trigger_start(&mut self) {
        let mut hw = self.0.borrow_mut();
        hw.record(Access::Start);
        if hw.powered {
            hw.running = true;
        }
    }

    fn trigger_stop(&mut self) {
        let mut hw = self.0.borrow_mut();
        hw.record(Access::Stop);
        hw.running = false;
    }

    fn set_auto_stop(&mut self, enabled: bool) {
        let mut hw = self.0.borrow_mut();
        hw.record(Access::AutoStop(enabled));
        hw.auto_stop = enabled;
    }

    fn auto_stop(&self) -> bool {
        let mut hw = self.0.borrow_mut();
        hw.record(Access::ReadAutoStop);
        hw.auto_stop
    }

    fn is_value_ready(&self) -> bool {
        let mut hw = self.0.borrow_mut();
        hw.record(Access::ReadReady);
        hw.valrdy
    }

    fn clear_value_ready(&mut self) {
        let mut hw = self.0.borrow_mut();
        hw.record(Access::ClearReady);
        hw.valrdy = false;
    }

    fn value(&self) -> u8 {
        let mut hw = self.0.borrow_mut();
        hw.record(Access::ReadValue);
        hw.value
    }
}

impl EventWait for SimWait {
    fn prime_and_wait_twice(&mut self) {
        self.0.borrow_mut().sleep();
    }

    fn clear_pending(&mut self) {
        let mut hw = self.0.borrow_mut();
        hw.record(Access::ClearPending);
        hw.irq_pending = false;
    }
}

/// A fresh simulated block and a driver bound to it.
pub fn bound() -> (Shared, Rng<marker::Stopped, SimRegisters, SimWait>) {
    let hw: Shared = Rc::new(RefCell::new(Hardware::default()));
    let rng = Rng::new().init(SimRegisters(hw.clone()), SimWait(hw.clone()));
    (hw, rng)
}

/// Like [`bound`], with `samples` queued for latching.
pub fn bound_with_samples(samples: &[u8]) -> (Shared, Rng<marker::Stopped, SimRegisters, SimWait>) {
    let (hw, rng) = bound();
    hw.borrow_mut().samples.extend(samples.iter().copied());
    (hw, rng)
}
