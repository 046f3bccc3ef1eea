//! Input device drivers.
//!
//! Both drivers share the 8042 controller: the keyboard on IRQ1, the mouse
//! as the auxiliary device on IRQ12.

pub mod keyboard;
pub mod mouse;
pub mod ps2;

pub use keyboard::KeyboardDriver;
pub use mouse::MouseDriver;
