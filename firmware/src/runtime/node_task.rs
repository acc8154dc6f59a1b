use node_core::led::RgbLed;
use node_core::node::RgbNode;

use crate::bus::EventReceiver;
use crate::runtime::hw::{NodePwm, SerialFeedbackPort, StatusLedPower};

pub type FirmwareNode = RgbNode<RgbLed<NodePwm>, SerialFeedbackPort, StatusLedPower>;

/// Runs every pending event to completion, one at a time. The await point
/// is the only place the node yields, so each event's exit/enter sequence
/// finishes before the next event is looked at.
#[embassy_executor::task]
pub async fn run(receiver: EventReceiver<'static>, mut node: FirmwareNode) -> ! {
    loop {
        let event = receiver.receive().await;
        node.process(&event);
    }
}
