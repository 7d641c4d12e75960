//! Configuration types for call-flow analysis and rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every section and field is optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining analysis and style settings.
//! - [`AnalysisConfig`] - Traversal limits shared by flow diagrams and reports.
//! - [`StyleConfig`] - Graph direction, fonts and fill-color overrides.
//!
//! # Example
//!
//! ```
//! # use callmap::config::AppConfig;
//! let config: AppConfig = toml::from_str(r##"
//!     [analysis]
//!     max_depth = 6
//!
//!     [style.palette]
//!     queue = "#ccffcc"
//! "##).unwrap();
//!
//! assert_eq!(config.analysis().max_depth(), 6);
//! assert_eq!(config.style().rankdir(), "LR");
//! assert!(config.style().palette().is_ok());
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use callmap_core::{color::Color, semantic::VisualKind};

const DEFAULT_MAX_DEPTH: usize = 10;
const RANK_DIRECTIONS: &[&str] = &["LR", "RL", "TB", "BT"];

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    analysis: AnalysisConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(analysis: AnalysisConfig, style: StyleConfig) -> Self {
        Self { analysis, style }
    }

    pub fn analysis(&self) -> &AnalysisConfig {
        &self.analysis
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Check values that deserialization alone cannot validate.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.style.validate()
    }
}

/// Traversal limits.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Deepest route level that is still expanded. Routes out of a root
    /// auto-attendant are level 1.
    #[serde(default = "default_max_depth")]
    max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl AnalysisConfig {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// Visual styling configuration for exported graphs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    rankdir: String,
    font_name: String,
    node_font_size: u32,
    edge_font_size: u32,
    /// Fill-color overrides keyed by node kind, e.g. `ring_group = "skyblue"`.
    palette: BTreeMap<String, String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            rankdir: "LR".to_string(),
            font_name: "Arial".to_string(),
            node_font_size: 9,
            edge_font_size: 8,
            palette: BTreeMap::new(),
        }
    }
}

impl StyleConfig {
    /// Graphviz rank direction (`LR`, `RL`, `TB` or `BT`).
    pub fn rankdir(&self) -> &str {
        &self.rankdir
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn node_font_size(&self) -> u32 {
        self.node_font_size
    }

    pub fn edge_font_size(&self) -> u32 {
        self.edge_font_size
    }

    /// Returns the fill palette with the configured overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a palette key is not a node kind or a value is
    /// not a valid [`Color`].
    pub fn palette(&self) -> Result<Palette, String> {
        let mut overrides = HashMap::new();
        for (key, value) in &self.palette {
            let kind = key
                .parse::<VisualKind>()
                .map_err(|err| format!("Invalid palette entry in config: {err}"))?;
            let color = Color::new(value)
                .map_err(|err| format!("Invalid palette color for `{key}` in config: {err}"))?;
            overrides.insert(kind, color);
        }
        Ok(Palette { overrides })
    }

    fn validate(&self) -> Result<(), String> {
        if !RANK_DIRECTIONS.contains(&self.rankdir.as_str()) {
            return Err(format!(
                "Invalid rankdir `{}` in config, valid values: {}",
                self.rankdir,
                RANK_DIRECTIONS.join(", ")
            ));
        }
        self.palette().map(|_| ())
    }
}

/// Fill colors per node kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    overrides: HashMap<VisualKind, Color>,
}

impl Palette {
    /// Fill color for `kind`: the override if configured, else the kind's
    /// default.
    pub fn fill(&self, kind: VisualKind) -> Color {
        self.overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_fill())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.analysis().max_depth(), 10);
        assert_eq!(config.style().rankdir(), "LR");
        assert_eq!(config.style().font_name(), "Arial");
        assert_eq!(config.style().node_font_size(), 9);
        assert_eq!(config.style().edge_font_size(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = toml::from_str("[style]\nfont_name = \"Helvetica\"").unwrap();
        assert_eq!(config.style().font_name(), "Helvetica");
        assert_eq!(config.style().rankdir(), "LR");
        assert_eq!(config.analysis().max_depth(), 10);
    }

    #[test]
    fn test_palette_overrides() {
        let config: AppConfig = toml::from_str(
            r#"
            [style.palette]
            end_call = "orange"
            "#,
        )
        .unwrap();

        let palette = config.style().palette().unwrap();
        assert_eq!(palette.fill(VisualKind::EndCall).to_hex(), "#ffa500");
        assert_eq!(palette.fill(VisualKind::Queue).to_hex(), "#98fb98");
    }

    #[test]
    fn test_invalid_palette() {
        let bad_kind: AppConfig = toml::from_str("[style.palette]\nlobby = \"red\"").unwrap();
        assert!(bad_kind.validate().unwrap_err().contains("lobby"));

        let bad_color: AppConfig = toml::from_str("[style.palette]\nqueue = \"greenish\"").unwrap();
        assert!(bad_color.validate().unwrap_err().contains("queue"));
    }

    #[test]
    fn test_invalid_rankdir() {
        let config: AppConfig = toml::from_str("[style]\nrankdir = \"diagonal\"").unwrap();
        assert!(config.validate().unwrap_err().contains("rankdir"));
    }
}
