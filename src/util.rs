//! Color name lookups shared by configuration and logging.

use crate::draw::{Color, color::*};

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black"
///
/// # Returns
/// - `Some(Color)` if the name matches a predefined color
/// - `None` if the name is not recognized
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

/// Maps a Color value to its human-readable name.
///
/// Uses approximate matching (threshold-based) to identify colors.
///
/// # Returns
/// A static string with the color name, or "Custom" if the color doesn't
/// match any predefined color.
pub fn color_to_name(color: &Color) -> &'static str {
    // Match colors approximately with 0.1 tolerance
    if color.r > 0.9 && color.g < 0.1 && color.b < 0.1 {
        "Red"
    } else if color.r < 0.1 && color.g > 0.9 && color.b < 0.1 {
        "Green"
    } else if color.r < 0.1 && color.g < 0.1 && color.b > 0.9 {
        "Blue"
    } else if color.r > 0.9 && color.g > 0.9 && color.b < 0.1 {
        "Yellow"
    } else if color.r > 0.9 && (0.4..=0.6).contains(&color.g) && color.b < 0.1 {
        "Orange"
    } else if color.r > 0.9 && color.g < 0.1 && color.b > 0.9 {
        "Pink"
    } else if color.r > 0.9 && color.g > 0.9 && color.b > 0.9 {
        "White"
    } else if color.r < 0.1 && color.g < 0.1 && color.b < 0.1 {
        "Black"
    } else {
        "Custom"
    }
}
