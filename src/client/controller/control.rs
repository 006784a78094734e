use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Enabled/disabled state of a triggering control (a submit or run button).
#[derive(Debug, Clone, Default)]
pub(crate) struct Control {
    busy: Arc<AtomicBool>,
}

/// Keeps its control disabled; dropping it re-enables the control on every exit path.
#[derive(Debug)]
pub(crate) struct ControlGuard {
    busy: Arc<AtomicBool>,
}

impl Control {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        !self.busy.load(Ordering::Acquire)
    }

    /// `None` while another holder has the control disabled.
    pub fn try_disable(&self) -> Option<ControlGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ControlGuard { busy: self.busy.clone() })
    }
}

impl Drop for ControlGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
