//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in wordclock-core:
//!
//! - HUB75 RGB matrix panel (`DisplayDriver`)
//! - DS3231 real-time clock (`ClockSource`)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod ds3231;
pub mod hub75;
