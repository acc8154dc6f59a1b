mod common;

use common::{drain, node_at};
use node_core::color::Rgb;
use node_core::event::{Event, EventKind};
use node_core::led::LedDevice;

// All commands in this file are unicast to address 1, so every feedback
// frame the node would put on the bus is visible in the recording port.
const ADDR: u8 = 1;

fn cmd(kind: EventKind) -> Event {
    Event::command(kind, ADDR)
}

#[test]
fn encoder_steps_clamp_at_channel_bounds() {
    let mut node = node_at(ADDR);
    node.process(&cmd(EventKind::SelectRed));
    node.process(&cmd(EventKind::AllOn));
    drain(&mut node);

    node.process(&cmd(EventKind::EncoderClockwise));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::RedLevel, 255)]
    );

    node.process(&cmd(EventKind::EncoderCounterClockwise));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::RedLevel, 245)]
    );
}

#[test]
fn held_button_switches_to_fine_steps() {
    let mut node = node_at(ADDR);
    node.process(&cmd(EventKind::SelectRed));
    drain(&mut node);

    // Startup color holds red at 127.
    node.process(&cmd(EventKind::EncoderPressed));
    node.process(&cmd(EventKind::EncoderClockwise));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::RedLevel, 128)]
    );

    node.process(&cmd(EventKind::EncoderReleased));
    node.process(&cmd(EventKind::EncoderClockwise));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::RedLevel, 138)]
    );
}

#[test]
fn step_registers_are_independent_per_family() {
    let mut node = node_at(ADDR);
    node.process(&cmd(EventKind::SelectRed));
    node.process(&cmd(EventKind::EncoderPressed));
    drain(&mut node);

    // Holding the button in an RGB mode leaves the HSL detent large.
    node.process(&cmd(EventKind::SelectHue));
    drain(&mut node);
    node.process(&cmd(EventKind::EncoderClockwise));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::HueLevel, 10)]
    );

    // And the RGB detent is still fine-grained on the way back.
    node.process(&cmd(EventKind::SelectRed));
    drain(&mut node);
    node.process(&cmd(EventKind::EncoderClockwise));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::RedLevel, 128)]
    );
}

#[test]
fn hue_wraps_at_both_ends() {
    let mut node = node_at(ADDR);
    node.process(&cmd(EventKind::SelectHue));
    drain(&mut node);

    // Startup hue is 0; stepping down re-enters from the top.
    node.process(&cmd(EventKind::EncoderCounterClockwise));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::HueLevel, 245)]
    );

    // And stepping back up wraps around to 0 again.
    node.process(&cmd(EventKind::EncoderClockwise));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::HueLevel, 0)]
    );
}

#[test]
fn saturation_clamps_inside_the_unit_interval() {
    let mut node = node_at(ADDR);
    node.process(&cmd(EventKind::SelectSaturation));
    drain(&mut node);

    // Startup saturation is already at the 0.99 ceiling.
    node.process(&cmd(EventKind::EncoderClockwise));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::SaturationLevel, 252)]
    );

    for _ in 0..30 {
        node.process(&cmd(EventKind::EncoderCounterClockwise));
    }
    let sent = drain(&mut node);
    assert_eq!(
        sent.last(),
        Some(&Event::feedback(EventKind::SaturationLevel, 3))
    );
}

#[test]
fn intensity_reaches_full_dark() {
    let mut node = node_at(ADDR);

    // Startup intensity is 0.25; ten large detents bottom out at zero.
    for _ in 0..10 {
        node.process(&cmd(EventKind::EncoderCounterClockwise));
    }
    let sent = drain(&mut node);
    assert_eq!(
        sent.last(),
        Some(&Event::feedback(EventKind::IntensityLevel, 0))
    );
    assert_eq!(node.led().rgb(), Rgb::OFF);
}

#[test]
fn force_only_echoes_only_in_the_matching_rgb_mode() {
    let mut node = node_at(ADDR);
    node.process(&cmd(EventKind::SelectRed));
    drain(&mut node);

    node.process(&cmd(EventKind::ForceOnlyGreen));
    assert_eq!(drain(&mut node), vec![]);
    assert_eq!(node.led().rgb().g, 128);

    node.process(&cmd(EventKind::ForceOnlyRed));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::RedLevel, 128)]
    );
}

#[test]
fn force_only_is_silent_in_hsl_modes() {
    let mut node = node_at(ADDR);
    node.process(&cmd(EventKind::SelectHue));
    drain(&mut node);

    node.process(&cmd(EventKind::ForceOnlyRed));
    assert_eq!(drain(&mut node), vec![]);
    assert_eq!(node.led().rgb().r, 128);
}

#[test]
fn bulk_commands_set_rgb_levels_directly() {
    let mut node = node_at(ADDR);
    node.process(&cmd(EventKind::SelectBlue));
    drain(&mut node);

    node.process(&cmd(EventKind::AllHalf));
    assert_eq!(node.led().rgb(), Rgb::splat(128));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::BlueLevel, 128)]
    );

    node.process(&cmd(EventKind::AllOff));
    assert_eq!(node.led().rgb(), Rgb::OFF);
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::BlueLevel, 0)]
    );

    node.process(&cmd(EventKind::AllOn));
    assert_eq!(node.led().rgb(), Rgb::WHITE);
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::BlueLevel, 255)]
    );
}

#[test]
fn bulk_commands_move_intensity_in_hsl_modes() {
    let mut node = node_at(ADDR);
    node.process(&cmd(EventKind::SelectHue));
    drain(&mut node);

    // The color dims through intensity while hue stays put.
    node.process(&cmd(EventKind::AllHalf));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::HueLevel, 0)]
    );
    assert!((node.led_mut().hsl().l - 0.5).abs() < 0.001);
}

#[test]
fn intensity_bulk_feedback_reports_command_endpoints() {
    let mut node = node_at(ADDR);

    // Full-on reads 255 even though the intensity itself tops out at 0.99.
    node.process(&cmd(EventKind::AllOn));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::IntensityLevel, 255)]
    );
    assert!((node.led_mut().hsl().l - 0.99).abs() < 0.001);

    node.process(&cmd(EventKind::AllHalf));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::IntensityLevel, 128)]
    );

    node.process(&cmd(EventKind::AllOff));
    assert_eq!(
        drain(&mut node),
        vec![Event::feedback(EventKind::IntensityLevel, 0)]
    );
}
