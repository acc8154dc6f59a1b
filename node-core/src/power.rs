//! Power management seam.
//!
//! The node never talks to sleep registers or indicator pins directly; it
//! drives this trait and the platform supplies the implementation. Host-side
//! tests and the emulator use [`NoopPowerManager`].

/// How deeply the platform may sleep between events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SleepDepth {
    /// Peripherals stay clocked; wake on any interrupt.
    Idle,
    /// Core and most clocks stop; bus and encoder interrupts still wake.
    Standby,
}

/// Platform power and status-indicator control.
pub trait PowerManager {
    /// Lights the status indicator.
    fn enable_status_led(&mut self);

    /// Darkens the status indicator.
    fn disable_status_led(&mut self);

    /// Selects the sleep depth used by subsequent [`sleep`](Self::sleep) calls.
    fn set_sleep_depth(&mut self, depth: SleepDepth);

    /// Blocks until the next wake interrupt.
    fn sleep(&mut self);
}

/// Power manager that does nothing, for hosts with no power hardware.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopPowerManager;

impl PowerManager for NoopPowerManager {
    fn enable_status_led(&mut self) {}

    fn disable_status_led(&mut self) {}

    fn set_sleep_depth(&mut self, _depth: SleepDepth) {}

    fn sleep(&mut self) {}
}
