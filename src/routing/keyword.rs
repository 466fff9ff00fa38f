//! Keyword-matching router over the static gazetteer.

use tracing::{debug, info};

use super::gazetteer::Gazetteer;
use super::traits::{AgentKind, MatchedBy, RouteContext, RouteMatch, Router};

/// Routes queries by gazetteer keyword match with context fallback.
///
/// Precedence: caller override, then keyword match, then conversation
/// context (previous agent, user province), then the global default. The
/// router holds no state of its own; the gazetteer is a shared immutable
/// table.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRouter;

impl KeywordRouter {
    pub fn new() -> Self {
        Self
    }
}

impl Router for KeywordRouter {
    fn resolve(
        &self,
        query: &str,
        context: Option<&RouteContext>,
        force: Option<AgentKind>,
    ) -> RouteMatch {
        if let Some(agent) = force {
            info!("forced agent selection: {agent}");
            return RouteMatch {
                agent,
                matched_by: MatchedBy::Forced,
            };
        }

        let query_lower = query.to_lowercase();
        if let Some((category, keyword)) = Gazetteer::shared().find_match(&query_lower) {
            debug!("ontario query detected - category: {category}, keyword: {keyword}");
            return RouteMatch {
                agent: AgentKind::Ontario,
                matched_by: MatchedBy::Keyword,
            };
        }

        if let Some(context) = context {
            if context.previous_agent == Some(AgentKind::Ontario) {
                debug!("ontario query detected - previous agent was ontario");
                return RouteMatch {
                    agent: AgentKind::Ontario,
                    matched_by: MatchedBy::PreviousAgent,
                };
            }

            if context.user_location_province.as_deref() == Some("Ontario") {
                debug!("ontario query detected - user location is Ontario");
                return RouteMatch {
                    agent: AgentKind::Ontario,
                    matched_by: MatchedBy::UserLocation,
                };
            }
        }

        RouteMatch {
            agent: AgentKind::Global,
            matched_by: MatchedBy::Default,
        }
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
