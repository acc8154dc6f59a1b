//! Event plumbing between the interrupt-driven serial path and the node task.
//!
//! The channel is the firmware's single synchronization point. Overflow
//! policy is drop-newest: a full channel refuses the incoming event and a
//! saturating counter keeps the loss observable over defmt.

#![allow(dead_code)]

use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};
use portable_atomic::{AtomicU32, Ordering};

use node_core::event::Event;

#[cfg(not(target_os = "none"))]
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
#[cfg(target_os = "none")]
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;

#[cfg(target_os = "none")]
type BusMutex = ThreadModeRawMutex;
#[cfg(not(target_os = "none"))]
type BusMutex = NoopRawMutex;

/// Depth of the pending-event channel.
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Channel carrying decoded events toward the node task.
pub type EventChannel = Channel<BusMutex, Event, EVENT_QUEUE_DEPTH>;

/// Sender handle tied to the event channel.
pub type EventSender<'a> = Sender<'a, BusMutex, Event, EVENT_QUEUE_DEPTH>;

/// Receiver handle tied to the event channel.
pub type EventReceiver<'a> = Receiver<'a, BusMutex, Event, EVENT_QUEUE_DEPTH>;

static LOST_EVENTS: AtomicU32 = AtomicU32::new(0);

/// Number of events refused because the channel was full.
pub fn lost_events() -> u32 {
    LOST_EVENTS.load(Ordering::Relaxed)
}

/// Non-blocking producer with the drop-newest overflow policy.
pub struct EventProducer<'a> {
    sender: EventSender<'a>,
}

impl<'a> EventProducer<'a> {
    pub fn new(sender: EventSender<'a>) -> Self {
        Self { sender }
    }

    /// Enqueues `event`, returning `false` when the channel refused it.
    pub fn publish(&self, event: Event) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                let _ = LOST_EVENTS.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }
}
