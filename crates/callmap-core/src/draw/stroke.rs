//! Edge line styles.
//!
//! Flow edges are solid by default. Cycle edges, which point back to a node
//! already on the current routing path, are drawn dashed so they stand out
//! from the forward flow.
//!
//! | Variant | Graphviz `style` |
//! |---------|------------------|
//! | [`EdgeStyle::Solid`] | `solid` |
//! | [`EdgeStyle::Dashed`] | `dashed` |
//! | [`EdgeStyle::Dotted`] | `dotted` |

use std::{fmt, str::FromStr};

/// Line pattern of an edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line, used for cycle edges
    Dashed,
    /// Dotted line, used for synthetic fan-out edges
    Dotted,
}

impl EdgeStyle {
    /// Returns the Graphviz `style` attribute value for this edge style.
    pub fn as_dot_str(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }
}

impl FromStr for EdgeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            _ => Err(format!(
                "invalid edge style `{s}`, valid values: solid, dashed, dotted"
            )),
        }
    }
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_dot_str())
    }
}
