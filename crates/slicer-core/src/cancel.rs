use crate::error::{Result, SlicerError};

/// Cooperative cancellation check (spec §5): components poll this between
/// layer iterations and at the start of every region loop, and unwind on
/// the first positive answer without committing any partial output.
pub trait CancellationToken: Sync {
    /// Returns `true` once the caller wants the pipeline to stop.
    fn is_canceled(&self) -> bool;
}

/// A [`CancellationToken`] that never cancels, for callers that don't need
/// the feature (tests, single-shot CLI invocations).
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverCancel;

impl CancellationToken for NeverCancel {
    #[inline]
    fn is_canceled(&self) -> bool {
        false
    }
}

impl CancellationToken for &dyn CancellationToken {
    fn is_canceled(&self) -> bool {
        (**self).is_canceled()
    }
}

/// Polls `token`, converting a positive answer into
/// [`SlicerError::CancellationRequested`].
#[inline]
pub fn throw_if_canceled(token: &dyn CancellationToken) -> Result<()> {
    if token.is_canceled() {
        Err(SlicerError::CancellationRequested)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Flag(AtomicBool);
    impl CancellationToken for Flag {
        fn is_canceled(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn never_cancel_always_ok() {
        assert!(throw_if_canceled(&NeverCancel).is_ok());
    }

    #[test]
    fn flag_propagates_cancellation() {
        let flag = Flag(AtomicBool::new(false));
        assert!(throw_if_canceled(&flag).is_ok());
        flag.0.store(true, Ordering::SeqCst);
        assert_eq!(
            throw_if_canceled(&flag).unwrap_err(),
            SlicerError::CancellationRequested
        );
    }
}
