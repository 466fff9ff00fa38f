//! Tool subsystem for agent-callable capabilities.
//!
//! Each tool implements the [`Tool`] trait defined in [`traits`], which
//! requires a name, description, JSON parameter schema, and an async
//! `execute` method returning a structured [`ToolResult`].
//!
//! The Ontario registry assembled by [`ontario_tools`] covers area lookup,
//! proximity search, side-by-side comparison, and environmental statistics;
//! the store and observation providers are injected at construction time.

pub mod compare;
pub mod pick_area;
pub mod proximity;
pub mod statistics;
pub mod traits;

pub use compare::CompareAreasTool;
pub use pick_area::PickAreaTool;
pub use proximity::ProximitySearchTool;
pub use statistics::AreaStatisticsTool;
pub use traits::{Tool, ToolResult, ToolSpec};

use crate::datasets::ObservationProvider;
use crate::store::AreaStore;
use std::sync::Arc;

/// Create the Ontario tool registry (4 tools).
pub fn ontario_tools(
    store: Arc<dyn AreaStore>,
    inaturalist: Arc<dyn ObservationProvider>,
    ebird: Option<Arc<dyn ObservationProvider>>,
) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(PickAreaTool::new(store.clone())),
        Box::new(ProximitySearchTool::new(store.clone())),
        Box::new(CompareAreasTool::new(store.clone())),
        Box::new(AreaStatisticsTool::new(store, inaturalist, ebird)),
    ]
}
