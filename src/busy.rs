//! Guard against duplicate submissions

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "request in flight" flag.
///
/// Clones share the flag, so a UI can observe it while an action is awaiting.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag, or return `None` if it is already set.
    ///
    /// The flag clears when the guard drops, on success and failure alike.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(Arc::clone(&self.0)))
    }
}

/// Clears its [`BusyFlag`] on drop
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_release() {
        let flag = BusyFlag::new();
        let observer = flag.clone();

        let guard = flag.try_acquire().unwrap();
        assert!(observer.is_busy());
        assert!(flag.try_acquire().is_none());

        drop(guard);
        assert!(!observer.is_busy());
        assert!(flag.try_acquire().is_some());
    }
}
