//! Mid-conversation agent switch policy.
//!
//! A memoryless heuristic over a fixed trailing window of the conversation;
//! each call computes the answer fresh from its inputs.

use std::fmt;
use tracing::{debug, info};

use super::traits::AgentKind;

/// Phrases that signal an in-progress task with the current handler.
pub const WORKFLOW_INDICATORS: [&str; 4] =
    ["selected", "analyzing", "pulling data", "generating insights"];

/// How many trailing messages are inspected for workflow indicators.
const RECENT_WINDOW: usize = 3;

/// Decide whether switching handlers mid-conversation is allowed.
///
/// Conversations shorter than the inspection window may always switch.
/// Otherwise the switch is blocked when any of the last three messages
/// contains a workflow indicator, on the assumption that interrupting an
/// active task would lose context.
pub fn can_switch_agents<M: fmt::Display>(
    from_agent: AgentKind,
    to_agent: AgentKind,
    conversation_history: &[M],
) -> bool {
    if conversation_history.len() < RECENT_WINDOW {
        return true;
    }

    let recent = &conversation_history[conversation_history.len() - RECENT_WINDOW..];
    for message in recent {
        let text = message.to_string().to_lowercase();
        if let Some(indicator) = WORKFLOW_INDICATORS.iter().find(|i| text.contains(*i)) {
            info!("agent switching blocked - mid-workflow (indicator: {indicator:?})");
            return false;
        }
    }

    debug!("agent switching allowed: {from_agent} -> {to_agent}");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(messages: &[&str]) -> Vec<String> {
        messages.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn short_conversation_always_allows_switch() {
        let h = history(&["Hello", "Hi there"]);
        assert!(can_switch_agents(AgentKind::Global, AgentKind::Ontario, &h));
    }

    #[test]
    fn empty_history_allows_switch() {
        let h: Vec<String> = Vec::new();
        assert!(can_switch_agents(AgentKind::Ontario, AgentKind::Global, &h));
    }

    #[test]
    fn short_conversation_allows_switch_even_with_indicators() {
        let h = history(&["I've selected Algonquin Park", "analyzing that area"]);
        assert!(can_switch_agents(AgentKind::Ontario, AgentKind::Global, &h));
    }

    #[test]
    fn workflow_indicator_blocks_switch() {
        let h = history(&[
            "Show me parks in Ontario",
            "I've selected Algonquin Park",
            "Great, analyzing that area",
        ]);
        assert!(!can_switch_agents(AgentKind::Ontario, AgentKind::Global, &h));
    }

    #[test]
    fn pulling_data_blocks_switch() {
        let h = history(&["Q1", "Selected area", "Pulling data for analysis"]);
        assert!(!can_switch_agents(AgentKind::Ontario, AgentKind::Global, &h));
    }

    #[test]
    fn indicator_matching_is_case_insensitive() {
        let h = history(&["Q1", "Q2", "GENERATING INSIGHTS now"]);
        assert!(!can_switch_agents(AgentKind::Global, AgentKind::Ontario, &h));
    }

    #[test]
    fn long_conversation_without_indicators_allows_switch() {
        let h = history(&["Q1", "A1", "Q2", "A2", "New topic about different region"]);
        assert!(can_switch_agents(AgentKind::Ontario, AgentKind::Global, &h));
    }

    #[test]
    fn only_last_three_messages_are_inspected() {
        // The indicator sits outside the trailing window, so it is ignored.
        let h = history(&[
            "I've selected Algonquin Park",
            "Q2",
            "A2",
            "Q3",
            "Tell me about Brazil now",
        ]);
        assert!(can_switch_agents(AgentKind::Ontario, AgentKind::Global, &h));
    }

    #[test]
    fn same_agent_switch_is_not_special_cased() {
        let h = history(&["Q1", "A1"]);
        assert!(can_switch_agents(AgentKind::Global, AgentKind::Global, &h));
    }
}
