//! Query routing: decides which agent handles a user query.
//!
//! The router is a pure, synchronous component: a keyword gazetteer scan
//! with conversation-context fallback, a strict force/keyword/context/default
//! precedence, and a trailing-window switch policy. Everything downstream of
//! the decision (tools, stores, APIs) belongs to the selected agent.

pub mod gazetteer;
pub mod keyword;
pub mod selector;
pub mod switch;
pub mod traits;

pub use gazetteer::Gazetteer;
pub use keyword::KeywordRouter;
pub use selector::{describe_agent, detect_ontario_query, select_agent};
pub use switch::{can_switch_agents, WORKFLOW_INDICATORS};
pub use traits::{AgentKind, MatchedBy, RouteContext, RouteMatch, Router, UnknownAgentError};
