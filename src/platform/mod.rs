//! Platform abstraction layer
//!
//! Browser-agnostic pieces of the host loop:
//! - Input: pointer/keyboard state folded into a `TickInput`
//! - Time: fixed-step frame clock and FPS counter

pub mod input;
pub mod time;

pub use input::{InputState, Key, apply_setting_key, turn_for_x};
pub use time::{FpsCounter, FrameClock};
