//! # Hardware Random Number Generator Driver for nRF51 Microcontrollers
#![no_std]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

/// Re-export of the Peripheral Access Crate (PAC) for the nRF51.
pub use nrf51_pac as pac;
pub use pac::Interrupt;
/// Entry point for the runtime application.
#[cfg(feature = "rt")]
pub use cortex_m_rt::entry;

mod private {
    pub trait Sealed {}
}
use private::Sealed;

pub mod event;
pub mod peripheral;
pub mod rng;
