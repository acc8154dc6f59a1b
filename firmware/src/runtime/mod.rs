use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::gpio::{Input, Level, Output, OutputType, Pull, Speed};
use embassy_stm32::time::hz;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::usart::{Config as UartConfig, Uart};

use node_core::led::RgbLed;
use node_core::node::RgbNode;
use node_core::policy::{BROADCAST_REPLY_ADDRESS, NodeAddress};
use node_core::power::{PowerManager, SleepDepth};

use crate::bus::{self, EventChannel};

mod hw;
mod node_task;
mod serial_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

const BUS_UART_BAUD: u32 = 9_600;
const PWM_FREQUENCY_HZ: u32 = 1_000;

static EVENT_QUEUE: EventChannel = EventChannel::new();

embassy_stm32::bind_interrupts!(struct Irqs {
    USART2_LPUART2 => embassy_stm32::usart::InterruptHandler<hal::peripherals::USART2>;
});

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0,
        PA1,
        PA2,
        PA3,
        PA4,
        PA5,
        PA6,
        PA7,
        PB0,
        PB4,
        PB5,
        PB6,
        PB7,
        PC6,
        TIM3,
        USART2,
        DMA1_CH1,
        DMA1_CH2,
        ..
    } = hal::init(config);

    // The address straps are sampled once; changing them needs a power cycle.
    let address = {
        let switches = [
            Input::new(PB4, Pull::Up),
            Input::new(PB5, Pull::Up),
            Input::new(PB6, Pull::Up),
            Input::new(PB7, Pull::Up),
        ];
        hw::dip_address(&switches)
    }
    .unwrap_or_else(|| {
        defmt::warn!("DIP switches read as broadcast; falling back to address 1");
        NodeAddress::new(BROADCAST_REPLY_ADDRESS).expect("reply address is valid")
    });
    defmt::info!("rgb node up at bus address {}", address.get());

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BUS_UART_BAUD;
    let uart = Uart::new(USART2, PA3, PA2, Irqs, DMA1_CH1, DMA1_CH2, uart_config)
        .expect("failed to initialize bus UART");
    let (uart_tx, uart_rx) = uart.split();

    // Unused pins float otherwise and burn power in sleep.
    let _unused_pins = (
        Input::new(PA0, Pull::Up),
        Input::new(PA1, Pull::Up),
        Input::new(PA4, Pull::Up),
        Input::new(PA5, Pull::Up),
    );

    let pwm = SimplePwm::new(
        TIM3,
        Some(PwmPin::new_ch1(PA6, OutputType::PushPull)),
        Some(PwmPin::new_ch2(PA7, OutputType::PushPull)),
        Some(PwmPin::new_ch3(PB0, OutputType::PushPull)),
        None,
        hz(PWM_FREQUENCY_HZ),
        Default::default(),
    );
    let channels = pwm.split();
    let output = hw::NodePwm::new(channels.ch1, channels.ch2, channels.ch3);

    let mut power = hw::StatusLedPower::new(Output::new(PC6, Level::Low, Speed::Low));
    power.set_sleep_depth(SleepDepth::Idle);

    let node = RgbNode::new(
        address,
        RgbLed::new(output),
        hw::SerialFeedbackPort::new(uart_tx),
        power,
    );

    let producer = bus::EventProducer::new(EVENT_QUEUE.sender());
    spawner
        .spawn(serial_task::run(uart_rx, producer))
        .expect("failed to spawn serial task");
    spawner
        .spawn(node_task::run(EVENT_QUEUE.receiver(), node))
        .expect("failed to spawn node task");

    core::future::pending::<()>().await;
}
