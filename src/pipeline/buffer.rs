//! Bounded, lossy byte queue between the worker stage and readers.
//!
//! Writers never block and never overwrite: a push that does not fit keeps
//! only the prefix that does and reports how much was stored. Readers may
//! block until data arrives, poll, or wait with a deadline.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::core::{Result, SimError};

/// Result of a read that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadStatus {
    /// This many bytes were copied out.
    Ready(usize),
    /// Nothing buffered and the caller asked not to wait.
    WouldBlock,
}

impl ReadStatus {
    /// Bytes copied, zero for `WouldBlock`.
    #[must_use]
    pub fn bytes(self) -> usize {
        match self {
            ReadStatus::Ready(n) => n,
            ReadStatus::WouldBlock => 0,
        }
    }
}

#[derive(Debug)]
struct Inner {
    bytes: VecDeque<u8>,
    /// Bumped by [`FrameBuffer::interrupt`]; waiters that see it change bail out.
    interrupts: u64,
    dropped: u64,
}

/// Fixed-capacity byte FIFO with blocking reads.
#[derive(Debug)]
pub struct FrameBuffer {
    inner: Mutex<Inner>,
    readable: Condvar,
    capacity: usize,
}

impl FrameBuffer {
    /// Create an empty buffer holding at most `capacity` bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                bytes: VecDeque::with_capacity(capacity),
                interrupts: 0,
                dropped: 0,
            }),
            readable: Condvar::new(),
            capacity,
        }
    }

    /// Maximum number of buffered bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().bytes.len()
    }

    /// Whether nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().bytes.is_empty()
    }

    /// Total bytes discarded by truncated pushes.
    #[must_use]
    pub fn dropped_bytes(&self) -> u64 {
        self.inner.lock().dropped
    }

    /// Append as much of `data` as fits; returns the number of bytes stored.
    ///
    /// Does not wake readers, see [`FrameBuffer::wake_readers`].
    pub fn push(&self, data: &[u8]) -> usize {
        let mut inner = self.inner.lock();
        let free = self.capacity - inner.bytes.len();
        let stored = free.min(data.len());
        inner.bytes.extend(&data[..stored]);
        inner.dropped += (data.len() - stored) as u64;
        stored
    }

    /// Wake every reader blocked on an empty buffer.
    pub fn wake_readers(&self) {
        self.readable.notify_all();
    }

    /// Make every currently blocked reader return [`SimError::Interrupted`].
    pub fn interrupt(&self) {
        let mut inner = self.inner.lock();
        inner.interrupts = inner.interrupts.wrapping_add(1);
        drop(inner);
        self.readable.notify_all();
    }

    /// Discard all buffered bytes.
    pub fn clear(&self) {
        self.inner.lock().bytes.clear();
    }

    /// Copy up to `out.len()` bytes out of the buffer.
    ///
    /// With `non_blocking` an empty buffer yields [`ReadStatus::WouldBlock`];
    /// otherwise the call waits until data arrives or it is interrupted.
    pub fn read(&self, out: &mut [u8], non_blocking: bool) -> Result<ReadStatus> {
        let mut inner = self.inner.lock();
        if out.is_empty() {
            return Ok(ReadStatus::Ready(0));
        }

        let interrupts = inner.interrupts;
        while inner.bytes.is_empty() {
            if non_blocking {
                return Ok(ReadStatus::WouldBlock);
            }
            self.readable.wait(&mut inner);
            if inner.interrupts != interrupts {
                return Err(SimError::Interrupted);
            }
        }

        Ok(ReadStatus::Ready(drain_into(&mut inner.bytes, out)))
    }

    /// Like a blocking [`FrameBuffer::read`] but gives up after `timeout`,
    /// returning [`ReadStatus::WouldBlock`].
    pub fn read_timeout(&self, out: &mut [u8], timeout: Duration) -> Result<ReadStatus> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();
        if out.is_empty() {
            return Ok(ReadStatus::Ready(0));
        }

        let interrupts = inner.interrupts;
        while inner.bytes.is_empty() {
            if self.readable.wait_until(&mut inner, deadline).timed_out() {
                if inner.bytes.is_empty() {
                    return Ok(ReadStatus::WouldBlock);
                }
                break;
            }
            if inner.interrupts != interrupts {
                return Err(SimError::Interrupted);
            }
        }

        Ok(ReadStatus::Ready(drain_into(&mut inner.bytes, out)))
    }
}

fn drain_into(bytes: &mut VecDeque<u8>, out: &mut [u8]) -> usize {
    let n = out.len().min(bytes.len());
    for (dst, src) in out.iter_mut().zip(bytes.drain(..n)) {
        *dst = src;
    }
    n
}
