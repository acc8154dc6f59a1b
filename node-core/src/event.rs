//! Event vocabulary shared by the bus, the queue, and the state machine.
//!
//! Every occurrence in the system is described by one [`Event`]: who raised
//! it, what happened, and a single data byte. The data byte is overloaded by
//! direction — inbound commands carry a bus address, outbound feedback
//! carries a 0–255 property value — never both at once. Sources and kinds
//! serialize to compact numeric codes for transport over the serial link.

/// Originator category for an [`Event`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EventSource {
    /// Synthesized by the state machine engine (enter/exit notifications).
    StateMachine,
    /// Received from the central controller over the bus.
    Controller,
    /// Raised by this node, i.e. outbound feedback.
    Node,
}

impl EventSource {
    /// Encodes the source into its wire code.
    #[must_use]
    pub const fn to_raw(self) -> u8 {
        match self {
            EventSource::StateMachine => 0x00,
            EventSource::Controller => 0x01,
            EventSource::Node => 0x02,
        }
    }

    /// Decodes a wire code into a source, rejecting unknown values.
    #[must_use]
    pub const fn from_raw(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(EventSource::StateMachine),
            0x01 => Some(EventSource::Controller),
            0x02 => Some(EventSource::Node),
            _ => None,
        }
    }
}

/// Discriminated event kinds understood by the node.
///
/// The `Select*` group names an adjustment mode; the `*Level` group is the
/// outbound feedback vocabulary reporting a governed property value.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EventKind {
    EnterState,
    ExitState,
    SelectRed,
    SelectGreen,
    SelectBlue,
    SelectHue,
    SelectSaturation,
    SelectIntensity,
    EncoderClockwise,
    EncoderCounterClockwise,
    EncoderPressed,
    EncoderReleased,
    ForceOnlyRed,
    ForceOnlyGreen,
    ForceOnlyBlue,
    AllOff,
    AllHalf,
    AllOn,
    Select,
    ForceFeedback,
    EnableStatusLed,
    DisableStatusLed,
    RedLevel,
    GreenLevel,
    BlueLevel,
    HueLevel,
    SaturationLevel,
    IntensityLevel,
}

impl EventKind {
    /// Encodes the kind into its wire code.
    #[must_use]
    pub const fn to_raw(self) -> u8 {
        match self {
            EventKind::EnterState => 0x00,
            EventKind::ExitState => 0x01,
            EventKind::SelectRed => 0x10,
            EventKind::SelectGreen => 0x11,
            EventKind::SelectBlue => 0x12,
            EventKind::SelectHue => 0x13,
            EventKind::SelectSaturation => 0x14,
            EventKind::SelectIntensity => 0x15,
            EventKind::EncoderClockwise => 0x20,
            EventKind::EncoderCounterClockwise => 0x21,
            EventKind::EncoderPressed => 0x22,
            EventKind::EncoderReleased => 0x23,
            EventKind::ForceOnlyRed => 0x30,
            EventKind::ForceOnlyGreen => 0x31,
            EventKind::ForceOnlyBlue => 0x32,
            EventKind::AllOff => 0x38,
            EventKind::AllHalf => 0x39,
            EventKind::AllOn => 0x3A,
            EventKind::Select => 0x40,
            EventKind::ForceFeedback => 0x41,
            EventKind::EnableStatusLed => 0x48,
            EventKind::DisableStatusLed => 0x49,
            EventKind::RedLevel => 0x50,
            EventKind::GreenLevel => 0x51,
            EventKind::BlueLevel => 0x52,
            EventKind::HueLevel => 0x53,
            EventKind::SaturationLevel => 0x54,
            EventKind::IntensityLevel => 0x55,
        }
    }

    /// Decodes a wire code into a kind, rejecting unknown values.
    #[must_use]
    pub const fn from_raw(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(EventKind::EnterState),
            0x01 => Some(EventKind::ExitState),
            0x10 => Some(EventKind::SelectRed),
            0x11 => Some(EventKind::SelectGreen),
            0x12 => Some(EventKind::SelectBlue),
            0x13 => Some(EventKind::SelectHue),
            0x14 => Some(EventKind::SelectSaturation),
            0x15 => Some(EventKind::SelectIntensity),
            0x20 => Some(EventKind::EncoderClockwise),
            0x21 => Some(EventKind::EncoderCounterClockwise),
            0x22 => Some(EventKind::EncoderPressed),
            0x23 => Some(EventKind::EncoderReleased),
            0x30 => Some(EventKind::ForceOnlyRed),
            0x31 => Some(EventKind::ForceOnlyGreen),
            0x32 => Some(EventKind::ForceOnlyBlue),
            0x38 => Some(EventKind::AllOff),
            0x39 => Some(EventKind::AllHalf),
            0x3A => Some(EventKind::AllOn),
            0x40 => Some(EventKind::Select),
            0x41 => Some(EventKind::ForceFeedback),
            0x48 => Some(EventKind::EnableStatusLed),
            0x49 => Some(EventKind::DisableStatusLed),
            0x50 => Some(EventKind::RedLevel),
            0x51 => Some(EventKind::GreenLevel),
            0x52 => Some(EventKind::BlueLevel),
            0x53 => Some(EventKind::HueLevel),
            0x54 => Some(EventKind::SaturationLevel),
            0x55 => Some(EventKind::IntensityLevel),
            _ => None,
        }
    }
}

/// Immutable description of one occurrence on the node.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Event {
    pub source: EventSource,
    pub kind: EventKind,
    /// Bus address for inbound commands, property value for outbound feedback.
    pub data: u8,
}

impl Event {
    /// Constructs an event from its parts.
    #[must_use]
    pub const fn new(source: EventSource, kind: EventKind, data: u8) -> Self {
        Self { source, kind, data }
    }

    /// Engine-synthesized event. Carries the broadcast address so every
    /// state's own filter accepts it.
    #[must_use]
    pub const fn internal(kind: EventKind) -> Self {
        Self::new(EventSource::StateMachine, kind, 0)
    }

    /// Controller command addressed to `address` (0 broadcasts).
    #[must_use]
    pub const fn command(kind: EventKind, address: u8) -> Self {
        Self::new(EventSource::Controller, kind, address)
    }

    /// Outbound feedback reporting a property `value`.
    #[must_use]
    pub const fn feedback(kind: EventKind, value: u8) -> Self {
        Self::new(EventSource::Node, kind, value)
    }
}
