use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared mounted flag for one screen.
///
/// In-flight requests check it when they resolve; once the screen is
/// unmounted their results are discarded instead of applied.
#[derive(Debug, Clone)]
pub struct Liveness {
    mounted: Arc<AtomicBool>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}
