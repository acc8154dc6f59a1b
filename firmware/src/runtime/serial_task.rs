use embassy_stm32::mode::Async;
use embassy_stm32::usart::UartRx;
use embassy_time::{Duration, Timer};

use node_core::comm::FrameDecoder;

use crate::bus::{self, EventProducer};

/// Feeds received bus bytes through the frame decoder and publishes every
/// decoded event. Garbage bytes are the decoder's problem; a full channel
/// is counted and dropped.
#[embassy_executor::task]
pub async fn run(mut rx: UartRx<'static, Async>, producer: EventProducer<'static>) -> ! {
    let mut decoder = FrameDecoder::new();
    let mut byte = [0u8; 1];

    loop {
        match rx.read(&mut byte).await {
            Ok(()) => {
                if let Some(event) = decoder.push(byte[0]) {
                    if !producer.publish(event) {
                        defmt::warn!("event queue full, {} lost so far", bus::lost_events());
                    }
                }
            }
            Err(_) => {
                defmt::warn!("bus UART read error");
                Timer::after(Duration::from_millis(5)).await;
            }
        }
    }
}
