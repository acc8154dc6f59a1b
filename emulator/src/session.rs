use crossterm::style::{Color, Stylize};

use node_core::color::Hsl;
use node_core::comm::{FeedbackPort, FrameDecoder, encode_frame};
use node_core::event::{Event, EventKind};
use node_core::led::{ChannelScale, LedDevice, PwmOutput, RgbLed};
use node_core::node::{AdjustMode, RgbNode};
use node_core::policy::{BROADCAST_ADDRESS, NodeAddress};
use node_core::power::{PowerManager, SleepDepth};
use node_core::queue::{BoundedEventQueue, EventQueue};

const QUEUE_DEPTH: usize = 16;

pub const HELP_TOPICS: &[(&str, &str)] = &[
    (
        "select",
        "select <red|green|blue|hue|saturation|intensity> - switch adjustment mode",
    ),
    ("cw", "cw [count]                    - turn the encoder up"),
    ("ccw", "ccw [count]                   - turn the encoder down"),
    ("press", "press / release               - hold or drop fine adjustment"),
    ("only", "only <red|green|blue>         - force one channel to half"),
    ("all", "all <off|half|on>             - bulk level command"),
    ("blink", "blink                         - identify the addressed node"),
    ("feedback", "feedback                      - request the governed value"),
    ("status-led", "status-led <on|off>           - drive the status indicator"),
    ("target", "target <1-15|all>             - address for subsequent commands"),
    ("status", "status                        - display node state"),
    ("help", "help [topic]                  - show help for a command"),
];

/// PWM backend holding the most recent duty cycles.
#[derive(Default)]
struct EmulatedPwm {
    levels: (u8, u8, u8),
}

impl PwmOutput for EmulatedPwm {
    fn set_levels(&mut self, r: u8, g: u8, b: u8) {
        self.levels = (r, g, b);
    }
}

/// Feedback port collecting frames for the session to narrate.
#[derive(Default)]
struct CapturePort {
    sent: Vec<Event>,
}

impl FeedbackPort for CapturePort {
    fn send(&mut self, event: &Event) {
        self.sent.push(*event);
    }
}

/// Power manager mirroring the status indicator into a flag.
#[derive(Default)]
struct EmulatedPower {
    status_led: bool,
}

impl PowerManager for EmulatedPower {
    fn enable_status_led(&mut self) {
        self.status_led = true;
    }

    fn disable_status_led(&mut self) {
        self.status_led = false;
    }

    fn set_sleep_depth(&mut self, _depth: SleepDepth) {}

    fn sleep(&mut self) {}
}

/// One emulated node plus the bus plumbing in front of it.
///
/// Commands travel the same path firmware traffic does: serialized to a
/// five-byte frame, reassembled by the decoder, queued, then run to
/// completion by the node.
pub struct Session {
    node: RgbNode<RgbLed<EmulatedPwm>, CapturePort, EmulatedPower>,
    queue: BoundedEventQueue<QUEUE_DEPTH>,
    decoder: FrameDecoder,
    target: u8,
}

impl Session {
    pub fn new(address: NodeAddress) -> Self {
        let led = RgbLed::with_scale(EmulatedPwm::default(), ChannelScale::unity());
        let node = RgbNode::new(
            address,
            led,
            CapturePort::default(),
            EmulatedPower::default(),
        );

        Self {
            node,
            queue: BoundedEventQueue::new(),
            decoder: FrameDecoder::new(),
            target: address.get(),
        }
    }

    /// What the node put on the bus while powering up, plus its resting
    /// color. Printed once before the first prompt.
    pub fn startup_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        for reply in std::mem::take(&mut self.node.port_mut().sent) {
            lines.push(format!("NODE> {:?} = {}", reply.kind, reply.data));
        }
        lines.push(self.describe_led());
        lines
    }

    pub fn handle_command(&mut self, line: &str) -> Vec<String> {
        let tokens: Vec<String> = line
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();

        match tokens
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .as_slice()
        {
            ["help"] => self.help(None),
            ["help", topic] => self.help(Some(topic)),
            ["status"] => self.status(),
            ["target", spec] => self.set_target(spec),
            ["select", mode] => match select_kind(mode) {
                Some(kind) => self.dispatch(kind, 1),
                None => unknown_argument("select", mode),
            },
            ["cw"] => self.dispatch(EventKind::EncoderClockwise, 1),
            ["cw", count] => self.repeated(EventKind::EncoderClockwise, count),
            ["ccw"] => self.dispatch(EventKind::EncoderCounterClockwise, 1),
            ["ccw", count] => self.repeated(EventKind::EncoderCounterClockwise, count),
            ["press"] => self.dispatch(EventKind::EncoderPressed, 1),
            ["release"] => self.dispatch(EventKind::EncoderReleased, 1),
            ["only", "red"] => self.dispatch(EventKind::ForceOnlyRed, 1),
            ["only", "green"] => self.dispatch(EventKind::ForceOnlyGreen, 1),
            ["only", "blue"] => self.dispatch(EventKind::ForceOnlyBlue, 1),
            ["all", "off"] => self.dispatch(EventKind::AllOff, 1),
            ["all", "half"] => self.dispatch(EventKind::AllHalf, 1),
            ["all", "on"] => self.dispatch(EventKind::AllOn, 1),
            ["blink"] => self.dispatch(EventKind::Select, 1),
            ["feedback"] => self.dispatch(EventKind::ForceFeedback, 1),
            ["status-led", "on"] => self.dispatch(EventKind::EnableStatusLed, 1),
            ["status-led", "off"] => self.dispatch(EventKind::DisableStatusLed, 1),
            [] => Vec::new(),
            [command, ..] => vec![format!(
                "ERR unknown command `{command}`; type `help` for the list"
            )],
        }
    }

    fn repeated(&mut self, kind: EventKind, count: &str) -> Vec<String> {
        match count.parse::<u32>() {
            Ok(n) if (1..=100).contains(&n) => self.dispatch(kind, n),
            _ => vec![format!("ERR expected a count between 1 and 100, got `{count}`")],
        }
    }

    /// Frames the command, runs it through the decoder and queue, then lets
    /// the node process everything pending.
    fn dispatch(&mut self, kind: EventKind, count: u32) -> Vec<String> {
        let event = Event::command(kind, self.target);
        for _ in 0..count {
            for byte in encode_frame(&event) {
                if let Some(decoded) = self.decoder.push(byte) {
                    let _ = self.queue.enqueue(decoded);
                }
            }
        }

        while let Some(pending) = self.queue.dequeue() {
            self.node.process(&pending);
        }

        let mut lines = Vec::new();
        for reply in std::mem::take(&mut self.node.port_mut().sent) {
            lines.push(format!("NODE> {:?} = {}", reply.kind, reply.data));
        }
        if lines.is_empty() {
            lines.push("(no feedback)".to_string());
        }
        lines.push(self.describe_led());
        lines
    }

    fn set_target(&mut self, spec: &str) -> Vec<String> {
        if spec == "all" {
            self.target = BROADCAST_ADDRESS;
            return vec!["Commands now broadcast to every node.".to_string()];
        }
        match spec.parse::<u8>().ok().and_then(NodeAddress::new) {
            Some(address) => {
                self.target = address.get();
                vec![format!("Commands now addressed to node {}.", address.get())]
            }
            None => vec![format!(
                "ERR `{spec}` is not a node address (1-15) or `all`"
            )],
        }
    }

    fn status(&mut self) -> Vec<String> {
        let address = self.node.address().get();
        let target = if self.target == BROADCAST_ADDRESS {
            "all".to_string()
        } else {
            self.target.to_string()
        };
        let status_led = if self.node.power().status_led {
            "on"
        } else {
            "off"
        };

        vec![
            format!("node address : {address}"),
            format!("command target: {target}"),
            format!("mode          : {:?}", self.node.mode()),
            format!("status led    : {status_led}"),
            format!(
                "events lost   : {} (queue) / {} bytes (decoder)",
                self.queue.lost_events(),
                self.decoder.discarded_bytes()
            ),
            self.describe_led(),
        ]
    }

    fn describe_led(&mut self) -> String {
        let rgb = self.node.led().rgb();
        let Hsl { h, s, l } = self.node.led_mut().hsl();
        let (pr, pg, pb) = self.node.led().output().levels;
        let swatch = "   "
            .on(Color::Rgb {
                r: pr,
                g: pg,
                b: pb,
            })
            .to_string();
        format!(
            "{swatch} mode={:?} rgb=({},{},{}) hsl=({h:.2},{s:.2},{l:.2})",
            self.node.mode(),
            rgb.r,
            rgb.g,
            rgb.b,
        )
    }

    fn help(&self, topic: Option<&str>) -> Vec<String> {
        let mut lines = Vec::new();
        match topic {
            Some(target) if !target.is_empty() => {
                if let Some((_, detail)) = HELP_TOPICS
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(target))
                {
                    lines.push((*detail).to_string());
                } else {
                    lines.push(format!("No help available for `{target}`."));
                    lines.push(format!("Available topics: {}", help_topic_list()));
                }
            }
            _ => {
                lines.push("Available commands:".to_string());
                for (_, detail) in HELP_TOPICS {
                    lines.push(format!("  {detail}"));
                }
                lines.push("Type `help <topic>` for a specific command.".to_string());
            }
        }
        lines
    }
}

fn select_kind(mode: &str) -> Option<EventKind> {
    match mode {
        "red" => Some(EventKind::SelectRed),
        "green" => Some(EventKind::SelectGreen),
        "blue" => Some(EventKind::SelectBlue),
        "hue" => Some(EventKind::SelectHue),
        "saturation" => Some(EventKind::SelectSaturation),
        "intensity" => Some(EventKind::SelectIntensity),
        _ => None,
    }
}

fn unknown_argument(command: &str, argument: &str) -> Vec<String> {
    vec![format!("ERR `{argument}` is not valid for `{command}`")]
}

fn help_topic_list() -> String {
    let mut buffer = String::new();
    for (index, (name, _)) in HELP_TOPICS.iter().enumerate() {
        if index > 0 {
            buffer.push_str(", ");
        }
        buffer.push_str(name);
    }
    buffer
}
