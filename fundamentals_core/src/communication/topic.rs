//! In-process topic buffer shared by every hub on the same topic

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

/// Bounded keep-last queue of messages for one topic
///
/// When full, pushing drops the oldest message. A closed buffer rejects
/// pushes and is never reopened. Storage grows with use, up to `capacity`.
#[derive(Debug)]
pub struct TopicBuffer<T> {
    queue: Mutex<VecDeque<T>>,
    capacity: usize,
    closed: AtomicBool,
}

/// Outcome of a push into a topic buffer
#[derive(Debug, PartialEq)]
pub enum PushOutcome<T> {
    Stored,
    /// Stored, and the oldest message was evicted to make room
    Evicted(T),
    /// Buffer closed; message handed back
    Rejected(T),
}

impl<T> TopicBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: Mutex::new(VecDeque::new()),
            capacity,
            closed: AtomicBool::new(false),
        }
    }

    pub fn push(&self, msg: T) -> PushOutcome<T> {
        if self.is_closed() {
            return PushOutcome::Rejected(msg);
        }

        let mut queue = self.queue.lock();
        let evicted = if queue.len() >= self.capacity {
            queue.pop_front()
        } else {
            None
        };
        queue.push_back(msg);

        match evicted {
            Some(old) => PushOutcome::Evicted(old),
            None => PushOutcome::Stored,
        }
    }

    pub fn pop(&self) -> Option<T> {
        self.queue.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reject all further pushes and drop pending messages
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.queue.lock().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let buffer = TopicBuffer::new(4);
        buffer.push(1);
        buffer.push(2);
        assert_eq!(buffer.pop(), Some(1));
        assert_eq!(buffer.pop(), Some(2));
        assert_eq!(buffer.pop(), None);
    }

    #[test]
    fn test_full_buffer_evicts_oldest() {
        let buffer = TopicBuffer::new(2);
        assert_eq!(buffer.push(1), PushOutcome::Stored);
        assert_eq!(buffer.push(2), PushOutcome::Stored);
        assert_eq!(buffer.push(3), PushOutcome::Evicted(1));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.pop(), Some(2));
    }

    #[test]
    fn test_closed_buffer_rejects() {
        let buffer = TopicBuffer::new(2);
        buffer.push(1);
        buffer.close();
        assert!(buffer.is_empty());
        assert_eq!(buffer.push(2), PushOutcome::Rejected(2));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let buffer: TopicBuffer<u8> = TopicBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
    }

    #[test]
    fn test_large_capacity_allocates_lazily() {
        let buffer: TopicBuffer<u64> = TopicBuffer::new(usize::MAX);
        assert_eq!(buffer.push(9), PushOutcome::Stored);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.capacity(), usize::MAX);
    }
}
