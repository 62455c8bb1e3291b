//! # Random Number Generator (RNG)
//!
//! The RNG generates random bytes from thermal noise. Each value is one
//! byte wide and is announced by the VALRDY event; the driver sleeps the
//! core between events instead of spinning on the flag.
//!
//! The driver is a [typestate](https://docs.rust-embedded.org/book/static-guarantees/typestate-programming.html)
//! machine. [`Rng::new`] gives an unbound driver, [`Rng::init`] binds it to
//! a register block, [`Rng::start`] powers and arms it, and only a started
//! driver can [`write`](Rng::write) bytes.
//!
//! ## Example
//! ```ignore
//! let cp = cortex_m::Peripherals::take().unwrap();
//! let p = hal::pac::Peripherals::take().unwrap();
//! let mut rng = hal::rng::Rng::new()
//!     .init(p.RNG, hal::event::WaitForEvent::new(cp.SCB))
//!     .start(None);
//!
//! let mut key = [0u8; 16];
//! rng.write(&mut key, key.len(), hal::rng::Timeout::Infinite)?;
//! ```
use core::marker::PhantomData;

#[cfg(feature = "rand")]
use rand_core::impls::{next_u32_via_fill, next_u64_via_fill};
#[cfg(feature = "rand")]
use rand_core::{CryptoRng, RngCore};

use crate::event::EventWait;
use crate::peripheral::RngRegisters;

pub mod config;

pub use config::{AutoStop, Config};

/// Lifecycle state of an [`Rng`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Not bound to a register block yet.
    Uninit,
    /// Bound, unpowered and not generating.
    Stopped,
    /// Powered, generating, with the VALRDY interrupt source armed.
    Ready,
}

pub mod marker {
    use super::DriverState;

    /// Marker traits for the lifecycle state of the RNG driver.
    pub trait RngState: crate::Sealed {
        const STATE: DriverState;
    }
    /// States in which the driver holds a register block.
    pub trait Bound: RngState {}

    pub struct Uninit;
    pub struct Stopped;
    pub struct Ready;

    impl crate::Sealed for Uninit {}
    impl crate::Sealed for Stopped {}
    impl crate::Sealed for Ready {}

    impl RngState for Uninit {
        const STATE: DriverState = DriverState::Uninit;
    }
    impl RngState for Stopped {
        const STATE: DriverState = DriverState::Stopped;
    }
    impl RngState for Ready {
        const STATE: DriverState = DriverState::Ready;
    }

    impl Bound for Stopped {}
    impl Bound for Ready {}
}

/// How long [`Rng::write`] may wait for each byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Wait until the hardware delivers, however long that takes.
    #[default]
    Infinite,
    /// Give up on a byte after this many wake-ups without a VALRDY event.
    /// Any wake counts, including ones caused by unrelated interrupts.
    Wakes(u32),
}

/// Errors reported by [`Rng::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No value became ready within the requested [`Timeout`].
    Timeout,
    /// More bytes were requested than the buffer can hold.
    BufferTooSmall { requested: usize, capacity: usize },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Timeout => f.write_str("timed out waiting for a random value"),
            Error::BufferTooSmall { requested, capacity } => write!(
                f,
                "requested {} random bytes into a buffer of {}",
                requested, capacity
            ),
        }
    }
}

/// # Random Number Generator (RNG) Driver
///
/// `REGS` is the register block (normally [`pac::RNG`](crate::pac::RNG))
/// and `WAIT` the low-power wait primitive (normally
/// [`WaitForEvent`](crate::event::WaitForEvent)). The driver owns both
/// for as long as it is bound, so no one else can write the RNG registers
/// while it is generating.
pub struct Rng<STATE, REGS, WAIT> {
    _state: PhantomData<STATE>,
    regs: REGS,
    wait: WAIT,
    config: Option<Config>,
}

impl Rng<marker::Uninit, (), ()> {
    /// Create an unbound driver. Nothing is touched until [`Rng::init`].
    pub const fn new() -> Self {
        Self {
            _state: PhantomData,
            regs: (),
            wait: (),
            config: None,
        }
    }

    /// Bind the driver to its register block and wait primitive.
    ///
    /// This only stores the two; the hardware is not accessed.
    pub fn init<REGS, WAIT>(self, regs: REGS, wait: WAIT) -> Rng<marker::Stopped, REGS, WAIT>
    where
        REGS: RngRegisters,
        WAIT: EventWait,
    {
        debug!("rng: bound to register block");
        Rng {
            _state: PhantomData,
            regs,
            wait,
            config: None,
        }
    }
}

impl Default for Rng<marker::Uninit, (), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<STATE, REGS, WAIT> Rng<STATE, REGS, WAIT>
where
    STATE: marker::RngState,
{
    /// Current lifecycle state.
    #[inline(always)]
    pub fn state(&self) -> DriverState {
        <STATE as marker::RngState>::STATE
    }

    /// Configuration applied by the last [`Rng::start`], if any.
    #[inline(always)]
    pub fn config(&self) -> Option<Config> {
        self.config
    }

    #[inline(always)]
    fn into_state<NEXT: marker::RngState>(self) -> Rng<NEXT, REGS, WAIT> {
        Rng {
            _state: PhantomData,
            regs: self.regs,
            wait: self.wait,
            config: self.config,
        }
    }
}

impl<STATE, REGS, WAIT> Rng<STATE, REGS, WAIT>
where
    STATE: marker::Bound,
    REGS: RngRegisters,
    WAIT: EventWait,
{
    /// Halt generation and remove power.
    ///
    /// Stopping an already stopped driver issues the same commands again
    /// and leaves the peripheral stopped.
    pub fn stop(mut self) -> Rng<marker::Stopped, REGS, WAIT> {
        self.regs.trigger_stop();
        self.regs.set_powered(false);
        debug!("rng: stopped");
        self.into_state()
    }
}

impl<REGS, WAIT> Rng<marker::Stopped, REGS, WAIT>
where
    REGS: RngRegisters,
    WAIT: EventWait,
{
    /// Power the peripheral, apply `config` and start generating.
    ///
    /// `None` selects [`Config::DEFAULT`]. With [`AutoStop::Release`] any
    /// shortcut left wired by an earlier single-byte read is unwired first.
    pub fn start(mut self, config: Option<Config>) -> Rng<marker::Ready, REGS, WAIT> {
        let config = config.unwrap_or(Config::DEFAULT);

        self.regs.set_powered(true);
        self.regs.set_error_correction(config.digital_error_correction);
        self.regs.enable_ready_interrupt();
        if config.auto_stop == AutoStop::Release {
            self.regs.set_auto_stop(false);
        }
        self.regs.trigger_start();

        debug!(
            "rng: started (error correction: {}, auto-stop: {:?})",
            config.digital_error_correction,
            config.auto_stop
        );
        self.config = Some(config);
        self.into_state()
    }

    /// Unbind the driver, returning the register block and wait primitive.
    pub fn free(self) -> (REGS, WAIT) {
        (self.regs, self.wait)
    }
}

impl<REGS, WAIT> Rng<marker::Ready, REGS, WAIT>
where
    REGS: RngRegisters,
    WAIT: EventWait,
{
    /// Write `n` random bytes to the front of `buf`, one per VALRDY event.
    ///
    /// Bytes past `n` are left untouched and `n == 0` returns without
    /// touching the hardware. A single-byte request wires the VALRDY→STOP
    /// shortcut first so generation halts as soon as the value is latched;
    /// see [`AutoStop`] for what happens to the shortcut afterwards.
    ///
    /// On [`Error::Timeout`] the bytes harvested so far are kept in `buf`.
    pub fn write(&mut self, buf: &mut [u8], n: usize, timeout: Timeout) -> Result<(), Error> {
        if n > buf.len() {
            return Err(Error::BufferTooSmall {
                requested: n,
                capacity: buf.len(),
            });
        }
        let buf = &mut buf[..n];
        if n != 1 {
            return self.harvest(buf, timeout);
        }

        self.regs.set_auto_stop(true);
        let result = self.harvest(buf, timeout);
        if self.auto_stop_policy() == AutoStop::Release {
            self.release_auto_stop();
        }
        result
    }

    /// Fill all of `buf`, waiting as long as it takes.
    ///
    /// Unlike [`Rng::write`] this never wires the VALRDY→STOP shortcut, and
    /// unwires it (restarting generation) if an earlier single-byte
    /// [`write`](Rng::write) left it wired.
    pub fn fill(&mut self, buf: &mut [u8]) {
        if buf.is_empty() {
            return;
        }
        if self.regs.auto_stop() {
            self.release_auto_stop();
        }
        if let Err(err) = self.harvest(buf, Timeout::Infinite) {
            error!("rng: unbounded fill failed: {:?}", err);
        }
    }

    /// Return a random `u8`.
    pub fn read_u8(&mut self) -> u8 {
        let mut buf = [0; 1];
        self.fill(&mut buf);
        buf[0]
    }

    /// Return a random `u16`.
    pub fn read_u16(&mut self) -> u16 {
        let mut buf = [0; 2];
        self.fill(&mut buf);
        u16::from_le_bytes(buf)
    }

    /// Return a random `u32`.
    pub fn read_u32(&mut self) -> u32 {
        let mut buf = [0; 4];
        self.fill(&mut buf);
        u32::from_le_bytes(buf)
    }

    /// Return a random `u64`.
    pub fn read_u64(&mut self) -> u64 {
        let mut buf = [0; 8];
        self.fill(&mut buf);
        u64::from_le_bytes(buf)
    }

    /// Whether the VALRDY→STOP shortcut is currently wired.
    #[inline(always)]
    pub fn is_auto_stop_wired(&self) -> bool {
        self.regs.auto_stop()
    }

    fn harvest(&mut self, buf: &mut [u8], timeout: Timeout) -> Result<(), Error> {
        if buf.is_empty() {
            return Ok(());
        }
        // Drop any event left over from an earlier cycle.
        self.regs.clear_value_ready();

        trace!("rng: harvesting {} bytes", buf.len());
        for byte in buf.iter_mut() {
            self.wait_ready(timeout)?;
            *byte = self.regs.value();
            self.regs.clear_value_ready();
            self.wait.clear_pending();
        }
        Ok(())
    }

    /// Unwire VALRDY→STOP and restart the generation it may have halted.
    #[inline(always)]
    fn release_auto_stop(&mut self) {
        self.regs.set_auto_stop(false);
        self.regs.trigger_start();
    }

    /// Sleep until VALRDY is set, re-checking after every wake.
    #[inline(always)]
    fn wait_ready(&mut self, timeout: Timeout) -> Result<(), Error> {
        let mut wakes: u32 = 0;
        while !self.regs.is_value_ready() {
            if let Timeout::Wakes(limit) = timeout {
                if wakes >= limit {
                    warn!("rng: no value after {} wakes", wakes);
                    return Err(Error::Timeout);
                }
            }
            self.wait.prime_and_wait_twice();
            wakes = wakes.saturating_add(1);
        }
        Ok(())
    }

    #[inline(always)]
    fn auto_stop_policy(&self) -> AutoStop {
        self.config.unwrap_or(Config::DEFAULT).auto_stop
    }
}

/// Enhanced functionality for the RNG peripheral using the [`rand`] crate.
/// This trait implementation can be disabled by removing the `rand` feature
/// flag since you may want to implement your own [`RngCore`].
///
/// Example:
/// ```ignore
/// let mut rng = hal::rng::Rng::new().init(p.RNG, wait).start(None);
/// let random_u32 = rng.next_u32(); // Equivalent to rng.read_u32()
/// let random_u64 = rng.next_u64();
/// let mut buffer = [0u8; 16];
/// rng.fill_bytes(&mut buffer);
/// ```
#[cfg(feature = "rand")]
impl<REGS, WAIT> RngCore for Rng<marker::Ready, REGS, WAIT>
where
    REGS: RngRegisters,
    WAIT: EventWait,
{
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        next_u32_via_fill(self)
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        next_u64_via_fill(self)
    }

    #[inline(always)]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.fill(dest);
    }

    #[inline(always)]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill(dest);
        Ok(())
    }
}

#[cfg(feature = "rand")]
impl<REGS, WAIT> CryptoRng for Rng<marker::Ready, REGS, WAIT>
where
    REGS: RngRegisters,
    WAIT: EventWait,
{
}

// Embedded IO traits
impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Error::Timeout => embedded_io::ErrorKind::TimedOut,
            Error::BufferTooSmall { .. } => embedded_io::ErrorKind::InvalidInput,
        }
    }
}

impl<REGS, WAIT> embedded_io::ErrorType for Rng<marker::Ready, REGS, WAIT>
where
    REGS: RngRegisters,
    WAIT: EventWait,
{
    type Error = Error;
}

impl<REGS, WAIT> embedded_io::Read for Rng<marker::Ready, REGS, WAIT>
where
    REGS: RngRegisters,
    WAIT: EventWait,
{
    /// Fills the whole buffer. This is a blocking operation.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.fill(buf);
        Ok(buf.len())
    }
}
