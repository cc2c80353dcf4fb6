//! Native frame ticker: a thread that emits frame timestamps over a channel

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Emits one frame timestamp (ms since start) per interval until cancelled.
/// Holds at most one unconsumed frame; frames a slow consumer misses are dropped.
pub struct FrameTicker {
    cancel: Arc<AtomicBool>,
    frames: Receiver<f64>,
    interval: Duration,
    thread: Option<JoinHandle<()>>,
}

impl FrameTicker {
    /// Start ticking at `interval` (16.6ms for a 60 Hz display)
    pub fn start(interval: Duration) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, frames) = mpsc::sync_channel(1);

        let thread_cancel = cancel.clone();
        let thread = thread::spawn(move || {
            let start = Instant::now();
            let mut next = start + interval;
            while !thread_cancel.load(Ordering::Acquire) {
                let now = Instant::now();
                if next > now {
                    thread::sleep(next - now);
                }
                next += interval;
                let time_ms = start.elapsed().as_secs_f64() * 1000.0;
                match tx.try_send(time_ms) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Disconnected(_)) => break,
                }
            }
            log::debug!("Frame ticker stopped");
        });

        Self {
            cancel,
            frames,
            interval,
            thread: Some(thread),
        }
    }

    /// Block until the next frame. `None` once the ticker is cancelled.
    pub fn next_frame(&self) -> Option<f64> {
        if self.is_cancelled() {
            return None;
        }
        // A stalled ticker thread should not hang the caller forever
        match self.frames.recv_timeout(self.interval * 10) {
            Ok(time) => Some(time),
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("Frame ticker stalled");
                None
            }
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }
}

impl Drop for FrameTicker {
    fn drop(&mut self) {
        self.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
