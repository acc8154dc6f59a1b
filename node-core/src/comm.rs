//! Wire codec for the shared serial bus.
//!
//! A frame is five bytes: sync marker, source code, kind code, data byte,
//! and an XOR checksum over the whole frame. The codec round-trips
//! source/kind/data losslessly; anything that fails to parse is silently
//! discarded and counted, matching the node's no-error-path philosophy.
//! Byte-at-a-time reassembly for the interrupt receive path lives in
//! [`FrameDecoder`].

use heapless::Vec;
use winnow::ModalResult;
use winnow::prelude::*;
use winnow::token::take;

use crate::event::{Event, EventKind, EventSource};

/// Start-of-frame marker.
pub const FRAME_SYNC: u8 = 0xA5;

/// Total frame length in bytes.
pub const FRAME_LEN: usize = 5;

/// Outbound side of the serial link, used for feedback frames.
pub trait FeedbackPort {
    /// Serializes and transmits one event.
    fn send(&mut self, event: &Event);
}

const fn checksum(source: u8, kind: u8, data: u8) -> u8 {
    FRAME_SYNC ^ source ^ kind ^ data
}

/// Serializes an event into its wire frame.
#[must_use]
pub fn encode_frame(event: &Event) -> [u8; FRAME_LEN] {
    let source = event.source.to_raw();
    let kind = event.kind.to_raw();
    [
        FRAME_SYNC,
        source,
        kind,
        event.data,
        checksum(source, kind, event.data),
    ]
}

/// Parses one complete frame off the front of `input`.
pub fn frame(input: &mut &[u8]) -> ModalResult<Event> {
    take(FRAME_LEN)
        .verify(|frame: &[u8]| {
            frame[0] == FRAME_SYNC && frame[4] == checksum(frame[1], frame[2], frame[3])
        })
        .verify_map(|frame: &[u8]| {
            let source = EventSource::from_raw(frame[1])?;
            let kind = EventKind::from_raw(frame[2])?;
            Some(Event::new(source, kind, frame[3]))
        })
        .parse_next(input)
}

/// Incremental frame reassembler for the byte-at-a-time receive path.
///
/// Feed every received byte through [`push`](Self::push); a complete valid
/// frame yields an [`Event`]. Malformed input is dropped up to the next sync
/// candidate and tallied in [`discarded_bytes`](Self::discarded_bytes).
pub struct FrameDecoder {
    buf: Vec<u8, FRAME_LEN>,
    discarded: u32,
}

impl FrameDecoder {
    /// Creates a decoder waiting for a sync byte.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            discarded: 0,
        }
    }

    /// Number of bytes dropped while hunting for frame alignment.
    #[must_use]
    pub const fn discarded_bytes(&self) -> u32 {
        self.discarded
    }

    /// Consumes one received byte, returning a decoded event when it
    /// completes a valid frame.
    pub fn push(&mut self, byte: u8) -> Option<Event> {
        if self.buf.is_empty() && byte != FRAME_SYNC {
            self.discard(1);
            return None;
        }

        // A full buffer is always consumed or resynced below, so this push
        // cannot fail.
        let _ = self.buf.push(byte);
        if self.buf.len() < FRAME_LEN {
            return None;
        }

        let mut input: &[u8] = &self.buf;
        if let Ok(event) = frame(&mut input) {
            self.buf.clear();
            Some(event)
        } else {
            self.resync();
            None
        }
    }

    fn discard(&mut self, count: usize) {
        self.discarded = self.discarded.saturating_add(count as u32);
    }

    /// Drops the bad leading bytes and realigns on the next sync candidate.
    fn resync(&mut self) {
        let next_sync = self
            .buf
            .iter()
            .skip(1)
            .position(|&b| b == FRAME_SYNC)
            .map(|offset| offset + 1);

        match next_sync {
            Some(start) => {
                self.discard(start);
                let mut kept = Vec::new();
                let _ = kept.extend_from_slice(&self.buf[start..]);
                self.buf = kept;
            }
            None => {
                self.discard(self.buf.len());
                self.buf.clear();
            }
        }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}
