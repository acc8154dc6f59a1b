//! Bus addressing and the accept/reply policy shared by every state.
//!
//! Acceptance and reply are deliberately asymmetric: every addressed node
//! acts on a broadcast, but only the node holding address 1 echoes feedback
//! to one. Without the asymmetry, a single broadcast command would make every
//! node on the bus flood the controller with identical replies.

/// Address value meaning "every node should act".
pub const BROADCAST_ADDRESS: u8 = 0;

/// The one node designated to answer broadcast commands.
pub const BROADCAST_REPLY_ADDRESS: u8 = 1;

/// Four-bit bus identity of one physical node, fixed at startup.
///
/// Address 0 is the reserved broadcast address and can never name a node.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NodeAddress(u8);

impl NodeAddress {
    /// Highest address the four DIP switches can express.
    pub const MAX: u8 = 15;

    /// Validates a raw address, rejecting broadcast and out-of-range values.
    #[must_use]
    pub const fn new(raw: u8) -> Option<Self> {
        if raw == BROADCAST_ADDRESS || raw > Self::MAX {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Assembles the address from the four DIP switch bits, switch 1 being
    /// the least significant. All-off reads as broadcast and is rejected.
    #[must_use]
    pub const fn from_dip(switches: [bool; 4]) -> Option<Self> {
        let mut raw = 0;
        let mut bit = 0;
        while bit < 4 {
            if switches[bit] {
                raw |= 1 << bit;
            }
            bit += 1;
        }
        Self::new(raw)
    }

    /// Returns the raw address byte.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Whether a message addressed to `msg_address` should be acted on at all.
#[must_use]
pub const fn should_accept(msg_address: u8, node: NodeAddress) -> bool {
    msg_address == BROADCAST_ADDRESS || msg_address == node.get()
}

/// Whether this node should echo feedback for a message addressed to
/// `msg_address`. Broadcast replies are the address-1 node's job alone;
/// unicast replies always go back to the exact requester.
#[must_use]
pub const fn should_reply(msg_address: u8, node: NodeAddress) -> bool {
    (msg_address == BROADCAST_ADDRESS && node.get() == BROADCAST_REPLY_ADDRESS)
        || (msg_address != BROADCAST_ADDRESS && msg_address == node.get())
}
