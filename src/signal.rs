use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};

use tracing::debug;

/// Single-slot mailbox between the detection worker and the notification
/// relay. A raise while a notification is still pending is dropped, so the
/// producer never blocks and the consumer never sees a backlog.
#[derive(Clone)]
pub struct DetectionSignal {
    tx: SyncSender<()>,
}

pub fn channel() -> (DetectionSignal, Receiver<()>) {
    let (tx, rx) = sync_channel(1);
    (DetectionSignal { tx }, rx)
}

impl DetectionSignal {
    /// Returns false when the notification was coalesced into one already
    /// pending (or the consumer is gone).
    pub fn raise(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => {
                debug!("notification already pending, coalesced");
                false
            }
            Err(TrySendError::Disconnected(())) => {
                debug!("notification consumer is gone, dropped");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_while_pending_is_coalesced() {
        let (signal, rx) = channel();
        assert!(signal.raise());
        assert!(!signal.raise());
        assert!(!signal.raise());

        // exactly one notification was queued
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn slot_frees_up_after_consume() {
        let (signal, rx) = channel();
        assert!(signal.raise());
        rx.try_recv().unwrap();
        assert!(signal.raise());
    }

    #[test]
    fn raise_without_consumer_does_not_block() {
        let (signal, rx) = channel();
        drop(rx);
        assert!(!signal.raise());
    }
}
