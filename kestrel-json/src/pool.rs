//! Reusable buffers for readers and writers.

use parking_lot::Mutex;

/// Buffers kept beyond this capacity are dropped instead of pooled.
const MAX_POOLED_CAPACITY: usize = 1 << 20;

/// Spare buffers kept per pool.
const MAX_POOLED: usize = 64;

/// A free list of byte buffers.
///
/// [`Reader`](crate::Reader) and [`Writer`](crate::Writer) take their
/// buffers from here when created and give them back when dropped, so a
/// buffer returns on every exit path, early error returns included.
pub(crate) struct Pool {
    name: &'static str,
    free: Mutex<Vec<Vec<u8>>>,
}

impl Pool {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self {
            name,
            free: Mutex::new(Vec::new()),
        }
    }

    /// Take an empty buffer, reusing a pooled one if there is one.
    pub(crate) fn take(&self) -> Vec<u8> {
        match self.free.lock().pop() {
            Some(buf) => {
                trace!(pool = self.name, capacity = buf.capacity(), "reusing pooled buffer");
                buf
            }
            None => Vec::new(),
        }
    }

    /// Return a buffer for reuse.
    pub(crate) fn give(&self, mut buf: Vec<u8>) {
        if buf.capacity() == 0 || buf.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < MAX_POOLED {
            free.push(buf);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.free.lock().len()
    }
}
