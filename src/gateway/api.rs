//! REST API handlers for the gateway.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::agents::{create_agent, Agent, AgentInput};
use crate::routing::{can_switch_agents, describe_agent, AgentKind, RouteContext, Router};
use crate::sessions::{SessionStore, TranscriptEntry};

use super::AppState;

/// Parse an optional handler id from a request, rejecting unknown values.
fn parse_force(raw: Option<&str>) -> Result<Option<AgentKind>, (StatusCode, Json<serde_json::Value>)> {
    match raw {
        None => Ok(None),
        Some(value) => value.parse::<AgentKind>().map(Some).map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": e.to_string()})),
            )
        }),
    }
}

// ── Request/query types ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct RouteQuery {
    pub q: String,
    pub force: Option<String>,
    pub province: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatBody {
    pub message: String,
    pub session_id: Option<String>,
    pub force: Option<String>,
}

// ── Handlers ────────────────────────────────────────────────────

/// GET /health — liveness probe
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

/// GET /api/agents — handler ids and descriptions
pub async fn handle_agents() -> impl IntoResponse {
    let agents: Vec<serde_json::Value> = AgentKind::ALL
        .iter()
        .map(|kind| {
            json!({
                "id": kind.as_str(),
                "description": kind.description(),
            })
        })
        .collect();
    Json(json!({"agents": agents}))
}

/// GET /api/route — routing decision for a query (debugging surface)
pub async fn handle_route(
    State(state): State<AppState>,
    Query(params): Query<RouteQuery>,
) -> impl IntoResponse {
    let force = match parse_force(params.force.as_deref()) {
        Ok(force) => force,
        Err(e) => return e.into_response(),
    };

    let context = RouteContext {
        previous_agent: None,
        user_location_province: params.province.or_else(|| state.user_province.clone()),
    };
    let decision = state
        .router
        .resolve(&params.q, Some(&context), force.or(state.force_agent));

    Json(json!({
        "query": params.q,
        "agent": decision.agent,
        "matched_by": decision.matched_by,
        "description": describe_agent(decision.agent.as_str()),
    }))
    .into_response()
}

/// POST /api/chat — route a message, enforce the switch policy, run the
/// selected agent, and record the turn.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> impl IntoResponse {
    let force = match parse_force(body.force.as_deref()) {
        Ok(force) => force,
        Err(e) => return e.into_response(),
    };

    let session_id = body
        .session_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let session = match state.sessions.get(&session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => match state.sessions.create(&session_id).await {
            Ok(session) => session,
            Err(e) => return internal_error(e),
        },
        Err(e) => return internal_error(e),
    };

    let context = RouteContext {
        previous_agent: session.last_agent,
        user_location_province: state.user_province.clone(),
    };
    let decision = state
        .router
        .resolve(&body.message, Some(&context), force.or(state.force_agent));

    // A routed handler change is subject to the switch policy; a blocked
    // switch keeps the conversation on the previous handler.
    let mut agent_kind = decision.agent;
    let mut switch_blocked = false;
    if let Some(previous) = session.last_agent {
        if previous != decision.agent {
            let transcript = match state.sessions.get_transcript(&session_id, None).await {
                Ok(transcript) => transcript,
                Err(e) => return internal_error(e),
            };
            if can_switch_agents(previous, decision.agent, &transcript) {
                info!("session {session_id}: switching {previous} -> {}", decision.agent);
            } else {
                agent_kind = previous;
                switch_blocked = true;
            }
        }
    }

    let agent = create_agent(
        agent_kind,
        state.store.clone(),
        state.inaturalist.clone(),
        state.ebird.clone(),
        state.model.clone(),
        state.settings.clone(),
    );

    let output = match agent.run(&AgentInput::new(body.message.clone())).await {
        Ok(output) => output,
        Err(e) => return internal_error(e),
    };

    let record_turn = async {
        state
            .sessions
            .append_transcript(&session_id, TranscriptEntry::new("user", body.message))
            .await?;
        state
            .sessions
            .append_transcript(
                &session_id,
                TranscriptEntry::new("assistant", output.response.clone()),
            )
            .await?;
        state.sessions.set_last_agent(&session_id, agent_kind).await
    };
    if let Err(e) = record_turn.await {
        return internal_error(e);
    }

    Json(json!({
        "session_id": session_id,
        "agent": agent_kind,
        "matched_by": decision.matched_by,
        "switched": session.last_agent.is_some_and(|prev| prev != agent_kind),
        "switch_blocked": switch_blocked,
        "response": output.response,
    }))
    .into_response()
}

fn internal_error(e: anyhow::Error) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": e.to_string()})),
    )
        .into_response()
}
