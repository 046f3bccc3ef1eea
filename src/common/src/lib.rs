//! Types shared between the Kestrel kernel and its consumers.

#![cfg_attr(not(test), no_std)]

pub mod error;
pub mod input;

pub use error::DeviceError;
pub use input::{MouseSnapshot, MouseStatus};
