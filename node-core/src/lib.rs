#![no_std]

// Shared logic for one node of the RGB LED bus.
//
// This crate stays portable across MCU firmware and host tooling by avoiding
// the Rust standard library and exposing the hardware seams (PWM output,
// serial port, power management) as traits the other crates implement.

pub mod color;
pub mod comm;
pub mod engine;
pub mod event;
pub mod led;
pub mod node;
pub mod policy;
pub mod power;
pub mod queue;
