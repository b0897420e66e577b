//! Scoped suppression of the device screen idle-timeout while the map is active.

use std::sync::Arc;

use log::debug;

/// Host capability controlling the screen idle-timeout.
pub trait IdleTimer: Send + Sync {
    /// `true` keeps the screen awake; `false` restores normal idle behavior.
    fn set_disabled(&self, disabled: bool);
}

/// RAII guard pairing the disable with its re-enable. The timer is restored when
/// the guard is dropped, however the owning view ends up exiting.
pub struct WakeGuard {
    timer: Arc<dyn IdleTimer>,
}

impl WakeGuard {
    pub fn acquire(timer: Arc<dyn IdleTimer>) -> Self {
        timer.set_disabled(true);
        debug!("screen idle-timeout disabled");
        Self { timer }
    }
}

impl Drop for WakeGuard {
    fn drop(&mut self) {
        self.timer.set_disabled(false);
        debug!("screen idle-timeout restored");
    }
}

/// No-op idle timer for hosts without screen power management (tests, CLI).
#[derive(Debug, Default)]
pub struct NoopIdleTimer;

impl IdleTimer for NoopIdleTimer {
    fn set_disabled(&self, _disabled: bool) {}
}
