//! The two query handlers the router dispatches to.
//!
//! [`OntarioAgent`] carries the Ontario tool registry and cultural-protocol
//! prompt; [`GlobalAgent`] is the general-purpose worldwide handler. Both
//! implement the [`Agent`] trait and are constructed through
//! [`create_agent`].

pub mod global;
pub mod ontario;
pub mod prompt;
pub mod traits;

pub use global::GlobalAgent;
pub use ontario::OntarioAgent;
pub use traits::{Agent, AgentInput, AgentOutput, ModelSettings};

use std::sync::Arc;

use crate::datasets::ObservationProvider;
use crate::providers::ChatModel;
use crate::routing::AgentKind;
use crate::store::AreaStore;
use crate::tools::ontario_tools;

/// Factory: build the handler for a routing decision.
pub fn create_agent(
    kind: AgentKind,
    store: Arc<dyn AreaStore>,
    inaturalist: Arc<dyn ObservationProvider>,
    ebird: Option<Arc<dyn ObservationProvider>>,
    model: Option<Arc<dyn ChatModel>>,
    settings: ModelSettings,
) -> Box<dyn Agent> {
    match kind {
        AgentKind::Ontario => Box::new(OntarioAgent::new(
            ontario_tools(store, inaturalist, ebird),
            model,
            settings,
        )),
        AgentKind::Global => Box::new(GlobalAgent::new(model, settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::INaturalistProvider;
    use crate::store::testing::MockAreaStore;

    fn build(kind: AgentKind) -> Box<dyn Agent> {
        create_agent(
            kind,
            Arc::new(MockAreaStore::empty()),
            Arc::new(INaturalistProvider::new()),
            None,
            None,
            ModelSettings::default(),
        )
    }

    #[test]
    fn factory_builds_matching_kinds() {
        assert_eq!(build(AgentKind::Ontario).kind(), AgentKind::Ontario);
        assert_eq!(build(AgentKind::Global).kind(), AgentKind::Global);
    }
}
