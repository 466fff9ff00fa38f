//! Routing types and the trait seam for resolving which agent handles a query.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The two handler identities a routing decision can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Ontario,
    Global,
}

impl AgentKind {
    pub const ALL: [AgentKind; 2] = [AgentKind::Ontario, AgentKind::Global];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Ontario => "ontario",
            AgentKind::Global => "global",
        }
    }

    /// Human-readable description of the handler.
    pub fn description(self) -> &'static str {
        match self {
            AgentKind::Ontario => {
                "Ontario Nature Watch - Specialized in Ontario provincial parks, \
                 conservation areas, and Williams Treaty First Nations territories"
            }
            AgentKind::Global => {
                "Global Nature Watch - Worldwide protected areas, biodiversity data, \
                 and environmental analytics"
            }
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names neither known handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent: {0:?} (expected \"ontario\" or \"global\")")]
pub struct UnknownAgentError(pub String);

impl FromStr for AgentKind {
    type Err = UnknownAgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ontario" => Ok(AgentKind::Ontario),
            "global" => Ok(AgentKind::Global),
            _ => Err(UnknownAgentError(s.to_string())),
        }
    }
}

/// Caller-supplied context for a routing decision.
///
/// Both fields are optional; an absent context is equivalent to the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteContext {
    /// Handler that served the previous turn of this conversation.
    pub previous_agent: Option<AgentKind>,
    /// Free-text province from the user's profile, matched against the
    /// literal "Ontario".
    pub user_location_province: Option<String>,
}

/// How a routing decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedBy {
    /// Caller forced the handler.
    Forced,
    /// A gazetteer keyword matched the query.
    Keyword,
    /// The previous turn was handled by the Ontario agent.
    PreviousAgent,
    /// The user's profile province is Ontario.
    UserLocation,
    /// Nothing matched; fell through to the global handler.
    Default,
}

/// The result of a routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMatch {
    pub agent: AgentKind,
    pub matched_by: MatchedBy,
}

/// Resolves which agent should handle a query.
///
/// Implementations are pure over their inputs (apart from diagnostic
/// logging) and safe to call concurrently without synchronization.
pub trait Router: Send + Sync {
    /// Resolve the handler for a query, with optional context and override.
    fn resolve(
        &self,
        query: &str,
        context: Option<&RouteContext>,
        force: Option<AgentKind>,
    ) -> RouteMatch;

    /// The name of this router implementation.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_kind_round_trips_through_str() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.as_str().parse::<AgentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn agent_kind_parse_is_case_insensitive() {
        assert_eq!("Ontario".parse::<AgentKind>().unwrap(), AgentKind::Ontario);
        assert_eq!("GLOBAL".parse::<AgentKind>().unwrap(), AgentKind::Global);
    }

    #[test]
    fn agent_kind_parse_rejects_unknown() {
        let err = "alberta".parse::<AgentKind>().unwrap_err();
        assert!(err.to_string().contains("alberta"));
    }

    #[test]
    fn agent_kind_serde_uses_lowercase() {
        let json = serde_json::to_string(&AgentKind::Ontario).unwrap();
        assert_eq!(json, r#""ontario""#);
        let parsed: AgentKind = serde_json::from_str(r#""global""#).unwrap();
        assert_eq!(parsed, AgentKind::Global);
    }

    #[test]
    fn route_context_default_is_empty() {
        let context = RouteContext::default();
        assert!(context.previous_agent.is_none());
        assert!(context.user_location_province.is_none());
    }
}
