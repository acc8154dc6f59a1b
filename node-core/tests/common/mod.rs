#![allow(dead_code)]

use node_core::comm::FeedbackPort;
use node_core::event::Event;
use node_core::led::{ChannelScale, PwmOutput, RgbLed};
use node_core::node::RgbNode;
use node_core::policy::NodeAddress;
use node_core::power::{PowerManager, SleepDepth};

/// PWM backend remembering every level written to the hardware.
#[derive(Default)]
pub struct EmulatedPwm {
    pub levels: Vec<(u8, u8, u8)>,
}

impl PwmOutput for EmulatedPwm {
    fn set_levels(&mut self, r: u8, g: u8, b: u8) {
        self.levels.push((r, g, b));
    }
}

/// Feedback port collecting outbound events instead of framing them.
#[derive(Default)]
pub struct RecordingPort {
    pub sent: Vec<Event>,
}

impl FeedbackPort for RecordingPort {
    fn send(&mut self, event: &Event) {
        self.sent.push(*event);
    }
}

/// Power manager tracking status-indicator calls.
#[derive(Default)]
pub struct RecordingPower {
    pub status_led: bool,
    pub enables: usize,
    pub disables: usize,
}

impl PowerManager for RecordingPower {
    fn enable_status_led(&mut self) {
        self.status_led = true;
        self.enables += 1;
    }

    fn disable_status_led(&mut self) {
        self.status_led = false;
        self.disables += 1;
    }

    fn set_sleep_depth(&mut self, _depth: SleepDepth) {}

    fn sleep(&mut self) {}
}

pub type TestNode = RgbNode<RgbLed<EmulatedPwm>, RecordingPort, RecordingPower>;

/// Builds a node at `address` with the startup announcement discarded.
pub fn node_at(address: u8) -> TestNode {
    let mut node = fresh_node_at(address);
    node.port_mut().sent.clear();
    node
}

/// Builds a node at `address`, keeping whatever it sent while starting up.
pub fn fresh_node_at(address: u8) -> TestNode {
    let led = RgbLed::with_scale(EmulatedPwm::default(), ChannelScale::unity());
    RgbNode::new(
        NodeAddress::new(address).expect("test address must be valid"),
        led,
        RecordingPort::default(),
        RecordingPower::default(),
    )
}

/// Takes and clears the feedback events recorded so far.
pub fn drain(node: &mut TestNode) -> Vec<Event> {
    std::mem::take(&mut node.port_mut().sent)
}
