mod common;

use common::{drain, fresh_node_at, node_at};
use node_core::color::Rgb;
use node_core::event::{Event, EventKind};
use node_core::led::LedDevice;
use node_core::node::AdjustMode;

#[test]
fn startup_rests_in_intensity_with_a_dim_warm_color() {
    let node = fresh_node_at(2);

    assert_eq!(node.mode(), AdjustMode::Intensity);
    assert_eq!(node.led().rgb(), Rgb::new(127, 1, 1));
}

#[test]
fn startup_announcement_follows_the_reply_rule() {
    let first = fresh_node_at(1);
    assert_eq!(
        first.port().sent,
        vec![Event::feedback(EventKind::IntensityLevel, 64)]
    );

    let other = fresh_node_at(2);
    assert_eq!(other.port().sent, vec![]);
}

#[test]
fn reselecting_the_active_mode_only_reports() {
    let mut node = node_at(1);

    node.process(&Event::command(EventKind::SelectIntensity, 1));

    assert_eq!(node.mode(), AdjustMode::Intensity);
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::IntensityLevel, 64)]
    );
}

#[test]
fn selecting_a_new_mode_announces_its_value_on_entry() {
    let mut node = node_at(1);

    node.process(&Event::command(EventKind::SelectHue, 1));

    assert_eq!(node.mode(), AdjustMode::Hue);
    // Exactly one frame: the entry announcement, no exit chatter.
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::HueLevel, 0)]
    );
}

#[test]
fn entry_announcements_are_silent_off_the_reply_node() {
    let mut node = node_at(2);

    // The command itself is unicast, but the synthesized entry carries the
    // broadcast address, so only the address-1 node would announce it.
    node.process(&Event::command(EventKind::SelectRed, 2));

    assert_eq!(node.mode(), AdjustMode::Red);
    assert_eq!(drain(&mut node), vec![]);
}

#[test]
fn each_mode_reports_its_own_governed_value() {
    let mut node = node_at(1);

    node.process(&Event::command(EventKind::SelectRed, 1));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::RedLevel, 127)]
    );

    node.process(&Event::command(EventKind::SelectGreen, 1));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::GreenLevel, 1)]
    );

    node.process(&Event::command(EventKind::SelectSaturation, 1));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::SaturationLevel, 252)]
    );
}

#[test]
fn adjustments_survive_a_round_trip_through_other_modes() {
    let mut node = node_at(1);

    node.process(&Event::command(EventKind::SelectRed, 1));
    node.process(&Event::command(EventKind::EncoderClockwise, 1));
    drain(&mut node);

    node.process(&Event::command(EventKind::SelectHue, 1));
    node.process(&Event::command(EventKind::SelectRed, 1));

    // Re-entering red reports the adjusted value, not the startup one.
    let sent = drain(&mut node);
    assert_eq!(
        sent.last(),
        Some(&Event::feedback(EventKind::RedLevel, 137))
    );
}
