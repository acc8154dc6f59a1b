//! The six-mode adjustment state machine for one lighting node.
//!
//! A node is always in exactly one [`AdjustMode`]; the mode decides which
//! color property the rotary encoder governs and which feedback kind the
//! node reports. Every mode understands the same command vocabulary, so the
//! behavior lives in one handler parameterized by the active mode rather
//! than six near-identical handlers.

use crate::color::{self, Rgb};
use crate::comm::FeedbackPort;
use crate::engine::{Engine, EventHandler, Transition};
use crate::event::{Event, EventKind, EventSource};
use crate::led::LedDevice;
use crate::policy::{self, NodeAddress};
use crate::power::PowerManager;

/// Encoder detent size for RGB channels with the button released.
pub const RGB_STEP_LARGE: u8 = 10;
/// Encoder detent size for RGB channels with the button held.
pub const RGB_STEP_SMALL: u8 = 1;
/// Encoder detent size for HSL components with the button released.
pub const HSL_STEP_LARGE: f32 = 0.04;
/// Encoder detent size for HSL components with the button held.
pub const HSL_STEP_SMALL: f32 = 0.004;

/// Level a force-only command drives its channel to.
pub const MID_LEVEL: u8 = 128;

// HSL components never quite reach their mathematical bounds; the converter
// degenerates at exactly 0 and 1.
const HSL_CEILING: f32 = 0.99;
const HSL_FLOOR: f32 = 0.01;

/// Which color representation a mode's encoder adjustments flow through.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AdjustFamily {
    Rgb,
    Hsl,
}

/// One hardware PWM channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RgbChannel {
    Red,
    Green,
    Blue,
}

/// The closed set of adjustment modes a node can rest in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AdjustMode {
    Red,
    Green,
    Blue,
    Hue,
    Saturation,
    Intensity,
}

impl AdjustMode {
    /// Every mode, in wire-code order of the select commands.
    pub const ALL: [Self; 6] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Hue,
        Self::Saturation,
        Self::Intensity,
    ];

    /// The representation this mode's adjustments are made in.
    #[must_use]
    pub const fn family(self) -> AdjustFamily {
        match self {
            Self::Red | Self::Green | Self::Blue => AdjustFamily::Rgb,
            Self::Hue | Self::Saturation | Self::Intensity => AdjustFamily::Hsl,
        }
    }

    /// The PWM channel this mode governs directly, for the RGB family.
    #[must_use]
    pub const fn channel(self) -> Option<RgbChannel> {
        match self {
            Self::Red => Some(RgbChannel::Red),
            Self::Green => Some(RgbChannel::Green),
            Self::Blue => Some(RgbChannel::Blue),
            _ => None,
        }
    }

    /// Feedback vocabulary entry reporting this mode's governed property.
    #[must_use]
    pub const fn feedback_kind(self) -> EventKind {
        match self {
            Self::Red => EventKind::RedLevel,
            Self::Green => EventKind::GreenLevel,
            Self::Blue => EventKind::BlueLevel,
            Self::Hue => EventKind::HueLevel,
            Self::Saturation => EventKind::SaturationLevel,
            Self::Intensity => EventKind::IntensityLevel,
        }
    }

    /// Maps a select command to the mode it requests.
    #[must_use]
    pub const fn selected_by(kind: EventKind) -> Option<Self> {
        match kind {
            EventKind::SelectRed => Some(Self::Red),
            EventKind::SelectGreen => Some(Self::Green),
            EventKind::SelectBlue => Some(Self::Blue),
            EventKind::SelectHue => Some(Self::Hue),
            EventKind::SelectSaturation => Some(Self::Saturation),
            EventKind::SelectIntensity => Some(Self::Intensity),
            _ => None,
        }
    }
}

/// Current encoder detent sizes, one register per family.
///
/// The registers are independent: holding the button in an RGB mode leaves
/// the HSL detent untouched, and both survive mode changes.
struct StepRegisters {
    rgb: u8,
    hsl: f32,
}

impl Default for StepRegisters {
    fn default() -> Self {
        Self {
            rgb: RGB_STEP_LARGE,
            hsl: HSL_STEP_LARGE,
        }
    }
}

/// Mode-parameterized command handler dispatched by the engine.
pub struct NodeBehavior<L, C, P> {
    led: L,
    port: C,
    power: P,
    address: NodeAddress,
    steps: StepRegisters,
}

impl<L, C, P> NodeBehavior<L, C, P>
where
    L: LedDevice,
    C: FeedbackPort,
    P: PowerManager,
{
    fn on_command(&mut self, mode: AdjustMode, event: &Event) -> Transition<AdjustMode> {
        let reply_to = event.data;

        if let Some(target) = AdjustMode::selected_by(event.kind) {
            if target == mode {
                // Already there; just re-announce the governed value.
                self.send_feedback(mode, reply_to);
                return Transition::Stay;
            }
            return Transition::To(target);
        }

        match event.kind {
            EventKind::EncoderClockwise => {
                self.turn(mode, true);
                self.send_feedback(mode, reply_to);
            }
            EventKind::EncoderCounterClockwise => {
                self.turn(mode, false);
                self.send_feedback(mode, reply_to);
            }
            EventKind::EncoderPressed => match mode.family() {
                AdjustFamily::Rgb => self.steps.rgb = RGB_STEP_SMALL,
                AdjustFamily::Hsl => self.steps.hsl = HSL_STEP_SMALL,
            },
            EventKind::EncoderReleased => match mode.family() {
                AdjustFamily::Rgb => self.steps.rgb = RGB_STEP_LARGE,
                AdjustFamily::Hsl => self.steps.hsl = HSL_STEP_LARGE,
            },
            EventKind::ForceOnlyRed => self.force_channel(mode, RgbChannel::Red, reply_to),
            EventKind::ForceOnlyGreen => self.force_channel(mode, RgbChannel::Green, reply_to),
            EventKind::ForceOnlyBlue => self.force_channel(mode, RgbChannel::Blue, reply_to),
            EventKind::AllOff | EventKind::AllHalf | EventKind::AllOn => {
                self.bulk(mode, event.kind, reply_to);
            }
            EventKind::Select => {
                // The blink announcement follows the reply rule, not the
                // accept rule, so a broadcast select blinks one node only.
                if policy::should_reply(reply_to, self.address) {
                    self.led.blink();
                }
            }
            EventKind::ForceFeedback => self.send_feedback(mode, reply_to),
            EventKind::EnableStatusLed => self.power.enable_status_led(),
            EventKind::DisableStatusLed => self.power.disable_status_led(),
            _ => {}
        }
        Transition::Stay
    }

    /// Moves the governed property one detent, clamping or wrapping at the
    /// property's bounds.
    fn turn(&mut self, mode: AdjustMode, up: bool) {
        match mode {
            AdjustMode::Red | AdjustMode::Green | AdjustMode::Blue => {
                let step = self.steps.rgb;
                let mut rgb = self.led.rgb();
                let level = match mode {
                    AdjustMode::Red => &mut rgb.r,
                    AdjustMode::Green => &mut rgb.g,
                    _ => &mut rgb.b,
                };
                *level = if up {
                    level.saturating_add(step)
                } else {
                    level.saturating_sub(step)
                };
                self.led.set_rgb(rgb);
            }
            AdjustMode::Hue => {
                // Hue is circular: running off one end re-enters from the
                // other.
                let mut hsl = self.led.hsl();
                if up {
                    hsl.h += self.steps.hsl;
                    if hsl.h > HSL_CEILING {
                        hsl.h -= 1.0;
                    }
                } else {
                    hsl.h -= self.steps.hsl;
                    if hsl.h < HSL_FLOOR {
                        hsl.h += 1.0;
                    }
                }
                self.led.set_hsl(hsl);
            }
            AdjustMode::Saturation => {
                let mut hsl = self.led.hsl();
                hsl.s = if up {
                    (hsl.s + self.steps.hsl).min(HSL_CEILING)
                } else {
                    (hsl.s - self.steps.hsl).max(HSL_FLOOR)
                };
                self.led.set_hsl(hsl);
            }
            AdjustMode::Intensity => {
                // Unlike saturation, intensity is allowed all the way down
                // to fully dark.
                let mut hsl = self.led.hsl();
                hsl.l = if up {
                    (hsl.l + self.steps.hsl).min(HSL_CEILING)
                } else {
                    (hsl.l - self.steps.hsl).max(0.0)
                };
                self.led.set_hsl(hsl);
            }
        }
    }

    /// Drives one channel to [`MID_LEVEL`], leaving the other two alone.
    /// Only the mode governing that exact channel echoes feedback.
    fn force_channel(&mut self, mode: AdjustMode, channel: RgbChannel, reply_to: u8) {
        let mut rgb = self.led.rgb();
        match channel {
            RgbChannel::Red => rgb.r = MID_LEVEL,
            RgbChannel::Green => rgb.g = MID_LEVEL,
            RgbChannel::Blue => rgb.b = MID_LEVEL,
        }
        self.led.set_rgb(rgb);

        if mode.channel() == Some(channel) {
            self.send_feedback(mode, reply_to);
        }
    }

    /// Applies an all-off/half/on command the way the active family
    /// interprets it: raw channel levels for RGB, intensity for HSL.
    fn bulk(&mut self, mode: AdjustMode, kind: EventKind, reply_to: u8) {
        match mode.family() {
            AdjustFamily::Rgb => {
                match kind {
                    EventKind::AllOff => self.led.all_off(),
                    EventKind::AllHalf => self.led.set_rgb(Rgb::splat(MID_LEVEL)),
                    _ => self.led.all_on(),
                }
                self.send_feedback(mode, reply_to);
            }
            AdjustFamily::Hsl => {
                let mut hsl = self.led.hsl();
                hsl.l = match kind {
                    EventKind::AllOff => 0.0,
                    EventKind::AllHalf => 0.5,
                    _ => HSL_CEILING,
                };
                self.led.set_hsl(hsl);

                if mode == AdjustMode::Intensity {
                    // Report the commanded endpoint, not the quantized
                    // intensity, so full-on reads as 255 rather than 252.
                    let literal = match kind {
                        EventKind::AllOff => 0,
                        EventKind::AllHalf => MID_LEVEL,
                        _ => 255,
                    };
                    self.send_feedback_value(mode.feedback_kind(), literal, reply_to);
                } else {
                    self.send_feedback(mode, reply_to);
                }
            }
        }
    }

    /// Byte view of the property `mode` governs.
    fn governed_value(&mut self, mode: AdjustMode) -> u8 {
        match mode {
            AdjustMode::Red => self.led.rgb().r,
            AdjustMode::Green => self.led.rgb().g,
            AdjustMode::Blue => self.led.rgb().b,
            AdjustMode::Hue => color::unit_to_byte(self.led.hsl().h),
            AdjustMode::Saturation => color::unit_to_byte(self.led.hsl().s),
            AdjustMode::Intensity => color::unit_to_byte(self.led.hsl().l),
        }
    }

    fn send_feedback(&mut self, mode: AdjustMode, reply_to: u8) {
        let value = self.governed_value(mode);
        self.send_feedback_value(mode.feedback_kind(), value, reply_to);
    }

    fn send_feedback_value(&mut self, kind: EventKind, value: u8, reply_to: u8) {
        if policy::should_reply(reply_to, self.address) {
            self.port.send(&Event::feedback(kind, value));
        }
    }
}

impl<L, C, P> EventHandler for NodeBehavior<L, C, P>
where
    L: LedDevice,
    C: FeedbackPort,
    P: PowerManager,
{
    type State = AdjustMode;

    fn on_event(&mut self, mode: AdjustMode, event: &Event) -> Transition<AdjustMode> {
        // The address filter runs before anything else; a mismatched
        // message is invisible to the rest of the handler.
        if !policy::should_accept(event.data, self.address) {
            return Transition::Stay;
        }

        match event.source {
            EventSource::StateMachine => {
                if event.kind == EventKind::EnterState {
                    // Entering a mode announces its governed value so the
                    // controller display can follow along.
                    self.send_feedback(mode, event.data);
                }
                Transition::Stay
            }
            EventSource::Controller => self.on_command(mode, event),
            EventSource::Node => Transition::Stay,
        }
    }
}

/// One complete lighting node: the engine plus its behavior and peripherals.
pub struct RgbNode<L, C, P> {
    engine: Engine<AdjustMode>,
    behavior: NodeBehavior<L, C, P>,
}

impl<L, C, P> RgbNode<L, C, P>
where
    L: LedDevice,
    C: FeedbackPort,
    P: PowerManager,
{
    /// Brings a node up: dark status indicator, a dim warm starting color,
    /// and the intensity mode announced as active.
    pub fn new(address: NodeAddress, led: L, port: C, power: P) -> Self {
        let mut behavior = NodeBehavior {
            led,
            port,
            power,
            address,
            steps: StepRegisters::default(),
        };

        behavior.power.disable_status_led();

        behavior.led.all_off();
        let mut hsl = behavior.led.hsl();
        hsl.s = HSL_CEILING;
        behavior.led.set_hsl(hsl);
        let mut hsl = behavior.led.hsl();
        hsl.l = 0.25;
        behavior.led.set_hsl(hsl);

        let engine = Engine::new(AdjustMode::Intensity);
        // Announce the initial mode exactly as a runtime entry would.
        let _ = behavior.on_event(engine.current(), &Event::internal(EventKind::EnterState));

        Self { engine, behavior }
    }

    /// Runs one event to completion, including any mode change it causes.
    pub fn process(&mut self, event: &Event) {
        self.engine.process(&mut self.behavior, event);
    }

    /// The active adjustment mode.
    #[must_use]
    pub fn mode(&self) -> AdjustMode {
        self.engine.current()
    }

    /// This node's bus address.
    #[must_use]
    pub fn address(&self) -> NodeAddress {
        self.behavior.address
    }

    /// Accesses the LED device.
    pub fn led(&self) -> &L {
        &self.behavior.led
    }

    /// Mutably accesses the LED device.
    pub fn led_mut(&mut self) -> &mut L {
        &mut self.behavior.led
    }

    /// Accesses the feedback port.
    pub fn port(&self) -> &C {
        &self.behavior.port
    }

    /// Mutably accesses the feedback port.
    pub fn port_mut(&mut self) -> &mut C {
        &mut self.behavior.port
    }

    /// Accesses the power manager.
    pub fn power(&self) -> &P {
        &self.behavior.power
    }

    /// Mutably accesses the power manager.
    pub fn power_mut(&mut self) -> &mut P {
        &mut self.behavior.power
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_commands_map_onto_every_mode() {
        let selects = [
            EventKind::SelectRed,
            EventKind::SelectGreen,
            EventKind::SelectBlue,
            EventKind::SelectHue,
            EventKind::SelectSaturation,
            EventKind::SelectIntensity,
        ];
        for (kind, mode) in selects.iter().zip(AdjustMode::ALL) {
            assert_eq!(AdjustMode::selected_by(*kind), Some(mode));
        }
        assert_eq!(AdjustMode::selected_by(EventKind::Select), None);
        assert_eq!(AdjustMode::selected_by(EventKind::AllOn), None);
    }

    #[test]
    fn families_split_three_and_three() {
        for mode in [AdjustMode::Red, AdjustMode::Green, AdjustMode::Blue] {
            assert_eq!(mode.family(), AdjustFamily::Rgb);
            assert!(mode.channel().is_some());
        }
        for mode in [
            AdjustMode::Hue,
            AdjustMode::Saturation,
            AdjustMode::Intensity,
        ] {
            assert_eq!(mode.family(), AdjustFamily::Hsl);
            assert_eq!(mode.channel(), None);
        }
    }

    #[test]
    fn feedback_kinds_are_distinct_per_mode() {
        let kinds: [EventKind; 6] = [
            AdjustMode::Red.feedback_kind(),
            AdjustMode::Green.feedback_kind(),
            AdjustMode::Blue.feedback_kind(),
            AdjustMode::Hue.feedback_kind(),
            AdjustMode::Saturation.feedback_kind(),
            AdjustMode::Intensity.feedback_kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in kinds.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
