//! Async Operations
//!
//! Fire-and-poll handles for work that finishes later (file reads on a
//! background thread, coroutines on wasm). The render loop polls once per
//! frame; nothing blocks.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use super::AssetError;

/// Result type for async operations
pub type AsyncResult<T> = Result<T, AssetError>;

/// A handle to a pending async operation that can be polled
pub struct AsyncOp<T> {
    receiver: Receiver<AsyncResult<T>>,
    result: Option<AsyncResult<T>>,
}

/// Sending half of an [`AsyncOp`]; completing consumes it
pub struct Completer<T> {
    sender: Sender<AsyncResult<T>>,
}

impl<T> Completer<T> {
    /// Deliver the result. A dropped operation is not an error.
    pub fn complete(self, result: AsyncResult<T>) {
        let _ = self.sender.send(result);
    }
}

/// Create a connected completer/operation pair
pub fn pending<T>() -> (Completer<T>, AsyncOp<T>) {
    let (sender, receiver) = channel();
    (Completer { sender }, AsyncOp::from_receiver(receiver))
}

impl<T> AsyncOp<T> {
    fn from_receiver(receiver: Receiver<AsyncResult<T>>) -> Self {
        Self {
            receiver,
            result: None,
        }
    }

    /// Check if the operation has completed (polls the channel)
    pub fn is_complete(&mut self) -> bool {
        if self.result.is_some() {
            return true;
        }

        match self.receiver.try_recv() {
            Ok(result) => {
                self.result = Some(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                // Worker panicked or dropped its completer
                self.result = Some(Err(AssetError::Disconnected));
                true
            }
        }
    }

    /// Take the result if complete
    pub fn take(mut self) -> Option<AsyncResult<T>> {
        if !self.is_complete() {
            return None;
        }
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_until_completed() {
        let (completer, mut op) = pending::<u32>();
        assert!(!op.is_complete());
        completer.complete(Ok(7));
        assert!(op.is_complete());
        assert_eq!(op.take(), Some(Ok(7)));
    }

    #[test]
    fn test_dropped_completer_is_disconnected() {
        let (completer, mut op) = pending::<u32>();
        drop(completer);
        assert!(op.is_complete());
        assert_eq!(op.take(), Some(Err(AssetError::Disconnected)));
    }

    #[test]
    fn test_completed_from_another_thread() {
        let (completer, mut op) = pending::<u32>();
        std::thread::spawn(move || completer.complete(Ok(3)))
            .join()
            .unwrap();
        assert!(op.is_complete());
        assert_eq!(op.take(), Some(Ok(3)));
    }
}
