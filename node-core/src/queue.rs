//! Bounded FIFO bridging interrupt-context producers and the main loop.
//!
//! The queue is the only synchronization point in the design; callers wrap
//! access in whatever critical section their platform needs. Overflow policy
//! is drop-newest: a full queue refuses the incoming event and counts it, so
//! lost traffic stays observable without ever blocking the producer.

use heapless::Deque;

use crate::event::Event;

/// FIFO of pending events, single producer and single consumer.
pub trait EventQueue {
    /// Appends `event`, returning `false` when the queue is full.
    fn enqueue(&mut self, event: Event) -> bool;

    /// Removes and returns the oldest pending event.
    fn dequeue(&mut self) -> Option<Event>;
}

/// Fixed-capacity event queue with a saturating lost-event counter.
pub struct BoundedEventQueue<const N: usize> {
    events: Deque<Event, N>,
    lost_events: u32,
}

impl<const N: usize> BoundedEventQueue<N> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
            lost_events: 0,
        }
    }

    /// Number of events currently pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Compile-time capacity of the queue.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of events refused because the queue was full.
    #[must_use]
    pub const fn lost_events(&self) -> u32 {
        self.lost_events
    }
}

impl<const N: usize> Default for BoundedEventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventQueue for BoundedEventQueue<N> {
    fn enqueue(&mut self, event: Event) -> bool {
        match self.events.push_back(event) {
            Ok(()) => true,
            Err(_) => {
                self.lost_events = self.lost_events.saturating_add(1);
                false
            }
        }
    }

    fn dequeue(&mut self) -> Option<Event> {
        self.events.pop_front()
    }
}
