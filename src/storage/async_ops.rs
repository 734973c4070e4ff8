//! Async Operations
//!
//! Non-blocking file reads on background threads, polled once per frame.
//! The 3D view uses this to fetch models and textures without stalling the
//! frame loop.

use super::{LocalStorage, StorageError};

#[cfg(not(target_arch = "wasm32"))]
use std::sync::mpsc::{channel, Receiver, TryRecvError};
#[cfg(not(target_arch = "wasm32"))]
use std::thread;

pub type AsyncResult<T> = Result<T, StorageError>;

/// A handle to a pending operation that can be polled
#[cfg(not(target_arch = "wasm32"))]
pub struct AsyncOp<T> {
    receiver: Receiver<AsyncResult<T>>,
    result: Option<AsyncResult<T>>,
}

#[cfg(not(target_arch = "wasm32"))]
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
                // Worker panicked or dropped the sender
                self.result = Some(Err(StorageError::Other("worker thread exited".into())));
                true
            }
        }
    }

    /// Take the result if complete
    pub fn take(mut self) -> Option<AsyncResult<T>> {
        if self.result.is_none() {
            if let Ok(result) = self.receiver.try_recv() {
                self.result = Some(result);
            }
        }
        self.result
    }
}

/// Start reading `path` below the storage base directory
#[cfg(not(target_arch = "wasm32"))]
pub fn read_async(storage: &LocalStorage, path: &str) -> AsyncOp<Vec<u8>> {
    let (sender, receiver) = channel();
    let storage = storage.clone();
    let path = path.to_string();

    thread::spawn(move || {
        let result = storage.read(&path);
        let _ = sender.send(result);
    });

    AsyncOp::from_receiver(receiver)
}

// ─────────────────────────────────────────────────────────────────────────────
// WASM: no threads, operations complete immediately
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
pub struct AsyncOp<T> {
    result: Option<AsyncResult<T>>,
}

#[cfg(target_arch = "wasm32")]
impl<T> AsyncOp<T> {
    pub fn is_complete(&mut self) -> bool {
        true
    }

    pub fn take(self) -> Option<AsyncResult<T>> {
        self.result
    }
}

#[cfg(target_arch = "wasm32")]
pub fn read_async(storage: &LocalStorage, path: &str) -> AsyncOp<Vec<u8>> {
    AsyncOp {
        result: Some(storage.read(path)),
    }
}
