//! callmap - Call-flow diagrams and reachability reports for PBX configurations.
//!
//! Loads a configuration bundle of auto-attendants, queues, ring groups,
//! users and trunk number ranges, resolves the free-text route fields that
//! connect them, and produces one call-flow diagram per department or
//! standalone attendant plus flat reports of which users each flow reaches.

pub mod config;
pub mod export;
pub mod reach;
pub mod resolve;
pub mod structure;

mod error;

pub use callmap_core::{color, draw, identifier, model, semantic};
pub use callmap_parser::{Bundle, parse_destination};

pub use error::CallMapError;

use log::{debug, info};

use callmap_core::{model::Tables, semantic::Diagram};
use callmap_parser::number::NumberBlocks;

use config::AppConfig;
use reach::{AttendantAttribution, ReachRow};
use resolve::Directory;
use structure::FlowGroup;

/// Entry point for loading bundles and building diagrams and reports.
///
/// # Examples
///
/// ```rust
/// use callmap::{CallMap, config::AppConfig};
///
/// let source = r#"
///     [[auto_attendants]]
///     extension = "100"
///     name = "Main"
///     default = "End Call"
/// "#;
///
/// let callmap = CallMap::new(AppConfig::default());
/// let bundle = callmap.load(source).expect("Failed to load bundle");
///
/// let diagrams = callmap
///     .flow_diagrams(bundle.tables(), None)
///     .expect("Failed to build diagrams");
/// assert_eq!(diagrams[0].title(), "IVR: Main (100)");
///
/// // Or use default config
/// let callmap = CallMap::default();
/// ```
#[derive(Debug, Default)]
pub struct CallMap {
    config: AppConfig,
}

impl CallMap {
    /// Create a new instance with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Analysis limits and style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load a configuration bundle from TOML source text.
    ///
    /// Non-fatal problems, such as duplicate extensions, are returned as
    /// warnings on the bundle.
    ///
    /// # Errors
    ///
    /// Returns `CallMapError::Parse` when the source is not a valid bundle.
    pub fn load(&self, source: &str) -> Result<Bundle, CallMapError> {
        info!("Loading bundle");

        let bundle = callmap_parser::load_bundle(source)
            .map_err(|err| CallMapError::new_parse_error(err, source))?;

        let tables = bundle.tables();
        debug!(
            auto_attendants = tables.auto_attendants.len(),
            queues = tables.queues.len(),
            ring_groups = tables.ring_groups.len(),
            users = tables.users.len(),
            number_blocks = tables.number_blocks.len(),
            warnings = bundle.warnings().len();
            "Bundle loaded"
        );
        Ok(bundle)
    }

    /// Build the call-flow diagrams of all flow groups, or only of the
    /// groups matching `group`.
    ///
    /// # Errors
    ///
    /// Returns `CallMapError::Config` for an invalid style palette and
    /// `CallMapError::Selection` when `group` matches no flow group.
    pub fn flow_diagrams(
        &self,
        tables: &Tables,
        group: Option<&str>,
    ) -> Result<Vec<Diagram>, CallMapError> {
        let palette = self
            .config
            .style()
            .palette()
            .map_err(CallMapError::Config)?;
        let groups = select_groups(tables, group)?;
        let directory = Directory::new(tables);
        let max_depth = self.config.analysis().max_depth();

        let diagrams: Vec<_> = groups
            .iter()
            .map(|group| structure::flow_diagram(group, &directory, &palette, max_depth))
            .collect();

        info!(diagrams = diagrams.len(); "Built flow diagrams");
        Ok(diagrams)
    }

    /// Users reachable from every flow group, or only from the groups
    /// matching `group`.
    ///
    /// # Errors
    ///
    /// Returns `CallMapError::Selection` when `group` matches no flow group.
    pub fn reachability(
        &self,
        tables: &Tables,
        group: Option<&str>,
    ) -> Result<Vec<ReachRow>, CallMapError> {
        let groups = select_groups(tables, group)?;
        let directory = Directory::new(tables);
        let blocks = NumberBlocks::new(tables.number_blocks.clone());

        Ok(reach::reachability_report(
            &groups,
            &directory,
            &blocks,
            self.config.analysis().max_depth(),
        ))
    }

    /// Users attributed to the auto-attendants routing straight to them.
    pub fn attendants_per_user(&self, tables: &Tables) -> Vec<AttendantAttribution> {
        let directory = Directory::new(tables);
        let blocks = NumberBlocks::new(tables.number_blocks.clone());
        reach::attendants_per_user(&tables.auto_attendants, &directory, &blocks)
    }

    /// Render a diagram as Graphviz DOT text using the configured style.
    #[cfg(feature = "graphviz")]
    pub fn render_dot(&self, diagram: &Diagram) -> String {
        export::dot::render_dot(diagram, self.config.style())
    }
}

fn select_groups<'a>(
    tables: &'a Tables,
    selector: Option<&str>,
) -> Result<Vec<FlowGroup<'a>>, CallMapError> {
    let groups = structure::flow_groups(tables);
    let Some(selector) = selector else {
        return Ok(groups);
    };

    let selected: Vec<_> = groups
        .into_iter()
        .filter(|group| group.matches(selector))
        .collect();
    if selected.is_empty() {
        return Err(CallMapError::Selection(selector.to_string()));
    }
    Ok(selected)
}
