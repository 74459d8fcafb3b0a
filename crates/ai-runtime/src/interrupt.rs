use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use strategy_core::TaskError;

/// Cooperative cancellation handle shared between the game host and the AI.
///
/// The decision loop polls this at its suspension points; once triggered,
/// the current turn winds down without executing further actions. There is
/// no other cancellation mechanism and no timeout.
#[derive(Clone, Debug, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Re-arms the handle at the start of a turn.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn check(&self) -> Result<(), TaskError> {
        if self.is_triggered() {
            Err(TaskError::Interrupted)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_is_visible_through_clones() {
        let interrupt = Interrupt::new();
        let observer = interrupt.clone();

        assert!(observer.check().is_ok());
        interrupt.trigger();
        assert!(observer.check().is_err());

        observer.reset();
        assert!(interrupt.check().is_ok());
    }
}
