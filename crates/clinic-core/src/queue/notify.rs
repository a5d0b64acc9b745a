//! Queue change notification interface.

/// Best-effort "queue changed" signal.
///
/// Fired after a successful enqueue commit to prompt clients to refresh.
/// Implementations must not block and must swallow their own failures;
/// delivery is at-most-once with no acknowledgment.
pub trait QueueNotifier {
    fn queue_changed(&self);
}

/// Notifier that drops every signal. Used by tests and batch tooling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl QueueNotifier for NoopNotifier {
    fn queue_changed(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_does_nothing() {
        NoopNotifier.queue_changed();
    }
}
