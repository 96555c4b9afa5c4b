//! Background request runner
//!
//! Runs a blocking backend call on its own thread so the UI loop keeps
//! drawing. The owner polls the handle on each tick. Dropping the handle
//! drops the receiver, so a late reply is silently discarded.

use crate::services::FetchError;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

/// Handle to a request running in the background
pub struct PendingRequest<T> {
    receiver: Receiver<Result<T, FetchError>>,
    start_instant: Instant,
}

/// Spawn `request` on a worker thread
pub fn spawn<T, F>(request: F) -> PendingRequest<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, FetchError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        // Receiver is gone if the owner was dropped; nothing to do then
        let _ = tx.send(request());
    });

    PendingRequest {
        receiver: rx,
        start_instant: Instant::now(),
    }
}

impl<T> PendingRequest<T> {
    /// Non-blocking check for the result
    ///
    /// Returns `None` while the request is still running.
    pub fn poll(&self) -> Option<Result<T, FetchError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(FetchError::Interrupted)),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_instant.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_for<T>(pending: &PendingRequest<T>) -> Result<T, FetchError> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = pending.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "request did not finish in time");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_spawn_delivers_result() {
        let pending = spawn(|| Ok::<_, FetchError>(42));
        assert_eq!(wait_for(&pending).unwrap(), 42);
    }

    #[test]
    fn test_spawn_delivers_error() {
        let pending = spawn(|| Err::<u8, _>(FetchError::UnexpectedShape("boom".to_string())));
        assert!(matches!(
            wait_for(&pending),
            Err(FetchError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_poll_pending_returns_none() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let pending = spawn(move || {
            let _ = release_rx.recv();
            Ok::<_, FetchError>(())
        });

        assert!(pending.poll().is_none());

        release_tx.send(()).unwrap();
        assert!(wait_for(&pending).is_ok());
    }

    #[test]
    fn test_worker_panic_reports_interrupted() {
        let pending = spawn(|| -> Result<u8, FetchError> { panic!("worker died") });
        assert!(matches!(wait_for(&pending), Err(FetchError::Interrupted)));
    }
}
