//! Color handling for flow-graph fill hints.
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Fill hints are authored as CSS color strings (named
//! colors such as `"palegreen"` or hex values) and exported to graph renderers
//! as `#rrggbb` hex strings, a form every Graphviz version accepts.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string such as `"#ff0000"`,
    /// `"rgb(255, 0, 0)"` or `"khaki"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use callmap_core::color::Color;
    ///
    /// let queue_fill = Color::new("palegreen").unwrap();
    /// assert_eq!(queue_fill.to_hex(), "#98fb98");
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the color as an opaque `#rrggbb` hex string.
    pub fn to_hex(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    }
}

/// CSS `lightgray`.
const LIGHT_GRAY: AlphaColor<Srgb> = AlphaColor::from_rgb8(0xd3, 0xd3, 0xd3);

impl Default for Color {
    fn default() -> Self {
        Self {
            color: DynamicColor::from_alpha_color(LIGHT_GRAY),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}
