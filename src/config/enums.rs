//! Configuration enum types.

use crate::draw::{Color, color::*};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - either a named color or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// line_color = "red"
///
/// # Custom RGB color (0-255 per component)
/// line_color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: red, green, blue, yellow, orange, pink, white, black
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`] struct.
    ///
    /// Unknown color names default to red with a warning. RGB arrays are
    /// converted from 0-255 to 0.0-1.0 with full opacity.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => crate::util::name_to_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using red", name);
                RED
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgb8(*r, *g, *b),
        }
    }

    /// Returns `true` if the spec resolves without falling back.
    pub fn is_known(&self) -> bool {
        match self {
            ColorSpec::Name(name) => crate::util::name_to_color(name).is_some(),
            ColorSpec::Rgb(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_rgb_specs_resolve() {
        assert_eq!(ColorSpec::Name("Blue".into()).to_color(), BLUE);
        assert_eq!(ColorSpec::Rgb([0, 255, 0]).to_color(), GREEN);
    }

    #[test]
    fn unknown_name_falls_back_to_red() {
        let spec = ColorSpec::Name("chartreuse".into());
        assert!(!spec.is_known());
        assert_eq!(spec.to_color(), RED);
    }
}
