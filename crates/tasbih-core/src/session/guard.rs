use std::sync::atomic::{AtomicBool, Ordering};

/// In-flight flag held for the duration of an async operation.
///
/// Acquiring is a check-and-set on the flag; dropping clears it, so every
/// exit path (early return, `?`, success) releases the operation.
pub(crate) struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    /// `None` if the operation is already running.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
