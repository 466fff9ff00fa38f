//! Function-level entry points for agent selection and query detection.

use tracing::info;

use super::keyword::KeywordRouter;
use super::traits::{AgentKind, MatchedBy, RouteContext, Router};

/// Classify a query (plus optional context) as Ontario-specific or not.
pub fn detect_ontario_query(query: &str, context: Option<&RouteContext>) -> bool {
    let decision = KeywordRouter::new().resolve(query, context, None);
    decision.matched_by != MatchedBy::Default
}

/// Select which agent should handle a query.
///
/// A supplied `force` wins unconditionally; otherwise an Ontario-specific
/// query goes to the Ontario handler and everything else defaults to the
/// global one.
pub fn select_agent(
    query: &str,
    context: Option<&RouteContext>,
    force: Option<AgentKind>,
) -> AgentKind {
    let decision = KeywordRouter::new().resolve(query, context, force);
    info!("selected {} agent ({:?})", decision.agent, decision.matched_by);
    decision.agent
}

/// Description for an arbitrary handler identifier.
///
/// Unrecognized identifiers map to a fixed fallback rather than an error.
pub fn describe_agent(agent: &str) -> &'static str {
    match agent.parse::<AgentKind>() {
        Ok(kind) => kind.description(),
        Err(_) => "Unknown agent",
    }
}
