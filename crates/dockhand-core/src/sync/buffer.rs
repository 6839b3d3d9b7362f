//! Per-stream accumulator for pending results

use std::sync::{Mutex, PoisonError};

/// Ordered results waiting to be flushed by one streaming call
///
/// The lock is only held to append, snapshot and clear; it is never held
/// while sending.
#[derive(Debug)]
pub struct ResponseBuffer<T> {
    pending: Mutex<Vec<T>>,
}

impl<T> Default for ResponseBuffer<T> {
    fn default() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
        }
    }
}

impl<T> ResponseBuffer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item`, then take everything pending in append order
    pub fn push_and_drain(&self, item: T) -> Vec<T> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.push(item);
        std::mem::take(&mut *pending)
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain_empties_buffer() {
        let buffer = ResponseBuffer::new();
        assert_eq!(buffer.push_and_drain(1), vec![1]);
        assert!(buffer.is_empty());
        assert_eq!(buffer.push_and_drain(2), vec![2]);
        assert!(buffer.is_empty());
    }
}
