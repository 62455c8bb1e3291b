//! # RNG Configuration

/// What happens to the VALRDY→STOP shortcut after a single-byte read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AutoStop {
    /// Leave the shortcut wired. Generation halts after the value is
    /// latched and stays halted. The shortcut also survives
    /// [`stop`](super::Rng::stop) and [`start`](super::Rng::start): a
    /// restart yields one more value, after which generation halts again,
    /// so later multi-byte [`write`](super::Rng::write)s stall after their
    /// first byte.
    Retain,
    /// Unwire the shortcut on [`start`](super::Rng::start) and after every
    /// single-byte [`write`](super::Rng::write), whether it succeeded or
    /// timed out, restarting generation so later reads behave as if freshly
    /// started.
    Release,
}

/// Configuration applied by [`Rng::start`](super::Rng::start).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Enable the hardware bias corrector (CONFIG.DERCEN).
    ///
    /// Correction lowers the generation rate but removes bias from the
    /// raw bit stream.
    pub digital_error_correction: bool,
    /// Reserved. Kept for compatibility with existing configurations and
    /// not consumed by the driver.
    pub power_on_write: bool,
    /// Shortcut handling for single-byte reads.
    pub auto_stop: AutoStop,
}

impl Config {
    /// Configuration used when the driver is started without one.
    pub const DEFAULT: Self = Self {
        digital_error_correction: true,
        power_on_write: true,
        auto_stop: AutoStop::Retain,
    };

    pub const fn digital_error_correction(mut self, enabled: bool) -> Self {
        self.digital_error_correction = enabled;
        self
    }

    pub const fn power_on_write(mut self, enabled: bool) -> Self {
        self.power_on_write = enabled;
        self
    }

    pub const fn auto_stop(mut self, policy: AutoStop) -> Self {
        self.auto_stop = policy;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
