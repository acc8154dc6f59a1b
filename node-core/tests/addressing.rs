mod common;

use common::{drain, node_at};
use node_core::event::{Event, EventKind};
use node_core::led::LedDevice;
use node_core::node::AdjustMode;
use node_core::policy::BROADCAST_ADDRESS;

fn broadcast(kind: EventKind) -> Event {
    Event::command(kind, BROADCAST_ADDRESS)
}

#[test]
fn mismatched_address_is_ignored_entirely() {
    let mut node = node_at(2);
    let writes_before = node.led().output().levels.len();

    node.process(&Event::command(EventKind::SelectRed, 3));
    node.process(&Event::command(EventKind::EncoderClockwise, 3));

    assert_eq!(node.mode(), AdjustMode::Intensity);
    assert_eq!(drain(&mut node), vec![]);
    assert_eq!(node.led().output().levels.len(), writes_before);
}

#[test]
fn higher_nodes_act_on_broadcast_without_replying() {
    let mut node = node_at(2);

    node.process(&broadcast(EventKind::EncoderClockwise));

    assert_eq!(drain(&mut node), vec![]);
    assert!((node.led_mut().hsl().l - 0.29).abs() < 0.001);
}

#[test]
fn only_the_first_node_answers_broadcast() {
    let mut node = node_at(1);

    node.process(&broadcast(EventKind::EncoderClockwise));

    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::IntensityLevel, 74)]
    );
}

#[test]
fn unicast_replies_reach_the_exact_requester() {
    let mut node = node_at(5);

    node.process(&Event::command(EventKind::ForceFeedback, 5));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::IntensityLevel, 64)]
    );

    node.process(&Event::command(EventKind::ForceFeedback, 1));
    assert_eq!(drain(&mut node), vec![]);
}

#[test]
fn force_feedback_is_idempotent() {
    let mut node = node_at(1);

    node.process(&Event::command(EventKind::ForceFeedback, 1));
    node.process(&Event::command(EventKind::ForceFeedback, 1));

    let expected = Event::feedback(EventKind::IntensityLevel, 64);
    assert_eq!(drain(&mut node), vec![expected, expected]);
}

#[test]
fn broadcast_select_blinks_one_node_only() {
    let mut first = node_at(1);
    let mut other = node_at(2);
    let first_before = first.led().output().levels.len();
    let other_before = other.led().output().levels.len();

    first.process(&broadcast(EventKind::Select));
    other.process(&broadcast(EventKind::Select));

    assert!(first.led().output().levels.len() > first_before);
    assert!(
        first
            .led()
            .output()
            .levels
            .iter()
            .any(|&l| l == (255, 255, 255))
    );
    assert_eq!(other.led().output().levels.len(), other_before);
}

#[test]
fn unicast_select_blinks_the_addressed_node() {
    let mut node = node_at(4);
    let before = node.led().output().levels.len();

    node.process(&Event::command(EventKind::Select, 4));

    assert!(node.led().output().levels.len() > before);
    assert_eq!(drain(&mut node), vec![]);
}

#[test]
fn status_led_commands_drive_the_power_seam() {
    let mut node = node_at(2);
    // Startup turned the indicator off once already.
    assert_eq!(node.power().disables, 1);
    assert!(!node.power().status_led);

    node.process(&broadcast(EventKind::EnableStatusLed));
    assert!(node.power().status_led);
    assert_eq!(node.power().enables, 1);

    node.process(&broadcast(EventKind::DisableStatusLed));
    assert!(!node.power().status_led);
    assert_eq!(node.power().disables, 2);
}
