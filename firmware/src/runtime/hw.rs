//! Hardware bindings for the node's seams: PWM output, feedback port,
//! address straps, and power control.

use embassy_stm32 as hal;
use embassy_stm32::gpio::{Input, Output};
use embassy_stm32::mode::Async;
use embassy_stm32::timer::simple_pwm::SimplePwmChannel;
use embassy_stm32::usart::UartTx;

use node_core::comm::{FeedbackPort, encode_frame};
use node_core::event::Event;
use node_core::led::PwmOutput;
use node_core::policy::NodeAddress;
use node_core::power::{PowerManager, SleepDepth};

/// Assembles the bus address from the four DIP switch inputs, switch 1
/// being the least significant bit. A closed switch grounds its line.
pub fn dip_address(switches: &[Input<'_>; 4]) -> Option<NodeAddress> {
    let mut bits = [false; 4];
    for (bit, switch) in bits.iter_mut().zip(switches) {
        *bit = switch.is_low();
    }
    NodeAddress::from_dip(bits)
}

/// The three timer channels driving the LED dies.
pub struct NodePwm {
    red: SimplePwmChannel<'static, hal::peripherals::TIM3>,
    green: SimplePwmChannel<'static, hal::peripherals::TIM3>,
    blue: SimplePwmChannel<'static, hal::peripherals::TIM3>,
}

impl NodePwm {
    pub fn new(
        mut red: SimplePwmChannel<'static, hal::peripherals::TIM3>,
        mut green: SimplePwmChannel<'static, hal::peripherals::TIM3>,
        mut blue: SimplePwmChannel<'static, hal::peripherals::TIM3>,
    ) -> Self {
        red.enable();
        green.enable();
        blue.enable();
        Self { red, green, blue }
    }
}

impl PwmOutput for NodePwm {
    fn set_levels(&mut self, r: u8, g: u8, b: u8) {
        self.red.set_duty_cycle_fraction(u16::from(r), 255);
        self.green.set_duty_cycle_fraction(u16::from(g), 255);
        self.blue.set_duty_cycle_fraction(u16::from(b), 255);
    }
}

/// Transmit half of the bus UART, framing feedback events on the way out.
pub struct SerialFeedbackPort {
    tx: UartTx<'static, Async>,
}

impl SerialFeedbackPort {
    pub fn new(tx: UartTx<'static, Async>) -> Self {
        Self { tx }
    }
}

impl FeedbackPort for SerialFeedbackPort {
    fn send(&mut self, event: &Event) {
        let frame = encode_frame(event);
        // A failed write drops the frame; the bus has no retry story and
        // the controller can always force-feedback.
        if self.tx.blocking_write(&frame).is_err() {
            defmt::warn!("feedback frame dropped");
        }
    }
}

/// Status indicator and sleep control behind the power seam.
pub struct StatusLedPower {
    status_led: Output<'static>,
    depth: SleepDepth,
}

impl StatusLedPower {
    pub fn new(status_led: Output<'static>) -> Self {
        Self {
            status_led,
            depth: SleepDepth::Idle,
        }
    }
}

impl PowerManager for StatusLedPower {
    fn enable_status_led(&mut self) {
        self.status_led.set_high();
    }

    fn disable_status_led(&mut self) {
        self.status_led.set_low();
    }

    fn set_sleep_depth(&mut self, depth: SleepDepth) {
        self.depth = depth;
    }

    fn sleep(&mut self) {
        // Both depths stop the core until the next interrupt; the executor
        // already idles in wfi, so deeper modes stay future work until the
        // board's wake wiring is settled.
        match self.depth {
            SleepDepth::Idle | SleepDepth::Standby => cortex_m::asm::wfi(),
        }
    }
}
