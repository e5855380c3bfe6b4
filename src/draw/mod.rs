//! Drawing styles shared by layers and configuration.
//!
//! - [`Color`]: RGBA color representation with predefined color constants

pub mod color;

pub use color::Color;
pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
