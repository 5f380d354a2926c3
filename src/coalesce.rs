// Write coalescer — batches a burst of in-memory edits into a single
// persisted write.
//
// Each submitted value cancels the pending write and restarts the quiescence
// window, so only the last value of a burst reaches storage (last write wins
// per document, not per field). Runs on a dedicated thread fed by a channel;
// dropping the writer tears the thread down under the configured policy.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// What happens to a pending, not-yet-written value at teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownPolicy {
    /// Drop the pending value. An edit still inside the quiescence window at
    /// teardown is lost; accepted data loss, not silently flushed. Default.
    Cancel,
    /// Write the pending value before the thread exits.
    Flush,
}

pub struct CoalescingWriter<T: Send + 'static> {
    tx: Option<mpsc::Sender<T>>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> CoalescingWriter<T> {
    /// Spawn a writer with the given quiescence window. `write` runs on the
    /// writer thread; a failed write is logged and the writer keeps running
    /// (the caller's in-memory state is still the source of truth).
    pub fn new<F>(window: Duration, policy: TeardownPolicy, write: F) -> Self
    where
        F: FnMut(T) -> anyhow::Result<()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<T>();
        let handle = std::thread::Builder::new()
            .name("coalescing-writer".into())
            .spawn(move || writer_loop(rx, window, policy, write))
            .expect("Failed to spawn coalescing writer thread");

        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Writer with the production 300 ms window and cancel-on-teardown.
    pub fn with_default_window<F>(write: F) -> Self
    where
        F: FnMut(T) -> anyhow::Result<()> + Send + 'static,
    {
        Self::new(
            Duration::from_millis(crate::constants::DEBOUNCE_WINDOW_MS),
            TeardownPolicy::Cancel,
            write,
        )
    }

    /// Submit a new value, replacing any pending one and restarting the
    /// quiescence window.
    pub fn submit(&self, value: T) {
        if let Some(tx) = &self.tx {
            // Send only fails if the writer thread is gone; nothing to do then.
            let _ = tx.send(value);
        }
    }
}

impl<T: Send + 'static> Drop for CoalescingWriter<T> {
    fn drop(&mut self) {
        // Closing the channel wakes the thread and triggers teardown.
        drop(self.tx.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn writer_loop<T, F>(rx: mpsc::Receiver<T>, window: Duration, policy: TeardownPolicy, mut write: F)
where
    F: FnMut(T) -> anyhow::Result<()>,
{
    let mut pending: Option<T> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        let msg = match deadline {
            Some(at) => {
                let now = Instant::now();
                if now >= at {
                    Err(mpsc::RecvTimeoutError::Timeout)
                } else {
                    rx.recv_timeout(at - now)
                }
            }
            None => rx.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected),
        };

        match msg {
            Ok(value) => {
                pending = Some(value);
                deadline = Some(Instant::now() + window);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                deadline = None;
                if let Some(value) = pending.take() {
                    if let Err(e) = write(value) {
                        log::error!("Coalesced write failed: {}", e);
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                if policy == TeardownPolicy::Flush {
                    if let Some(value) = pending.take() {
                        if let Err(e) = write(value) {
                            log::error!("Flush-on-teardown write failed: {}", e);
                        }
                    }
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn collector() -> (Arc<Mutex<Vec<i32>>>, impl FnMut(i32) -> anyhow::Result<()>) {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&writes);
        let write = move |value: i32| {
            sink.lock().unwrap().push(value);
            Ok(())
        };
        (writes, write)
    }

    #[test]
    fn test_burst_coalesces_to_one_write() {
        let (writes, write) = collector();
        let writer = CoalescingWriter::new(Duration::from_millis(50), TeardownPolicy::Cancel, write);

        writer.submit(1);
        writer.submit(2);
        writer.submit(3);

        std::thread::sleep(Duration::from_millis(250));
        assert_eq!(*writes.lock().unwrap(), vec![3]);
        drop(writer);
    }

    #[test]
    fn test_separate_bursts_each_write() {
        let (writes, write) = collector();
        let writer = CoalescingWriter::new(Duration::from_millis(30), TeardownPolicy::Cancel, write);

        writer.submit(1);
        std::thread::sleep(Duration::from_millis(150));
        writer.submit(2);
        std::thread::sleep(Duration::from_millis(150));

        assert_eq!(*writes.lock().unwrap(), vec![1, 2]);
        drop(writer);
    }

    #[test]
    fn test_cancel_on_teardown_drops_pending() {
        let (writes, write) = collector();
        let writer = CoalescingWriter::new(Duration::from_secs(60), TeardownPolicy::Cancel, write);

        writer.submit(7);
        drop(writer); // joins the thread

        assert!(writes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_flush_on_teardown_writes_pending() {
        let (writes, write) = collector();
        let writer = CoalescingWriter::new(Duration::from_secs(60), TeardownPolicy::Flush, write);

        writer.submit(7);
        drop(writer);

        assert_eq!(*writes.lock().unwrap(), vec![7]);
    }

    #[test]
    fn test_failed_write_does_not_kill_writer() {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&writes);
        let mut first = true;
        let write = move |value: i32| {
            if first {
                first = false;
                anyhow::bail!("disk full");
            }
            sink.lock().unwrap().push(value);
            Ok(())
        };

        let writer = CoalescingWriter::new(Duration::from_millis(30), TeardownPolicy::Cancel, write);
        writer.submit(1);
        std::thread::sleep(Duration::from_millis(150));
        writer.submit(2);
        std::thread::sleep(Duration::from_millis(150));

        assert_eq!(*writes.lock().unwrap(), vec![2]);
        drop(writer);
    }
}
