//! Architecture-specific implementations.
//!
//! Only bare-metal x86_64 is supported. Host builds compile without this
//! module so the drivers and the console can be tested in-process.

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub mod x86_64;
