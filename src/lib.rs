#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::implicit_clone,
    clippy::items_after_statements,
    clippy::map_unwrap_or,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::redundant_closure_for_method_calls,
    clippy::return_self_not_must_use,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::struct_field_names,
    clippy::too_many_lines,
    clippy::uninlined_format_args,
    clippy::unnecessary_wraps,
    clippy::unused_self
)]

pub mod agents;
pub mod config;
pub mod datasets;
pub mod gateway;
pub mod providers;
pub mod routing;
pub mod sessions;
pub mod store;
pub mod tools;

pub use config::Config;
pub use routing::{
    can_switch_agents, describe_agent, detect_ontario_query, select_agent, AgentKind,
    RouteContext,
};
