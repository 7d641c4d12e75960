//! Node shape hints.
//!
//! The shape is a hint for the rendering backend; the names follow the
//! Graphviz node shape vocabulary because that is the layout engine the
//! diagrams are handed to.

use std::{fmt, str::FromStr};

/// Shape hint of a flow-graph node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeShape {
    #[default]
    Box,
    Ellipse,
    Diamond,
    Octagon,
    InvHouse,
    Note,
    RArrow,
    MDiamond,
    Cylinder,
    Tab,
    Plaintext,
}

impl NodeShape {
    /// Returns the Graphviz `shape` attribute value.
    pub fn as_dot_str(&self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Ellipse => "ellipse",
            Self::Diamond => "diamond",
            Self::Octagon => "octagon",
            Self::InvHouse => "invhouse",
            Self::Note => "note",
            Self::RArrow => "rarrow",
            Self::MDiamond => "Mdiamond",
            Self::Cylinder => "cylinder",
            Self::Tab => "tab",
            Self::Plaintext => "plaintext",
        }
    }
}

impl FromStr for NodeShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" | "rect" | "rectangle" => Ok(Self::Box),
            "ellipse" | "oval" => Ok(Self::Ellipse),
            "diamond" => Ok(Self::Diamond),
            "octagon" => Ok(Self::Octagon),
            "invhouse" => Ok(Self::InvHouse),
            "note" => Ok(Self::Note),
            "rarrow" => Ok(Self::RArrow),
            "Mdiamond" | "mdiamond" => Ok(Self::MDiamond),
            "cylinder" => Ok(Self::Cylinder),
            "tab" => Ok(Self::Tab),
            "plaintext" => Ok(Self::Plaintext),
            _ => Err(format!("invalid node shape `{s}`")),
        }
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_dot_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_aliases() {
        assert_eq!("rect".parse::<NodeShape>(), Ok(NodeShape::Box));
        assert_eq!("oval".parse::<NodeShape>(), Ok(NodeShape::Ellipse));
        assert_eq!("mdiamond".parse::<NodeShape>(), Ok(NodeShape::MDiamond));
    }

    #[test]
    fn test_shape_dot_names() {
        assert_eq!(NodeShape::MDiamond.as_dot_str(), "Mdiamond");
        assert_eq!(NodeShape::InvHouse.to_string(), "invhouse");
        assert!("star".parse::<NodeShape>().is_err());
    }
}
