//! `cook:start` and `cook:next`: live, step-by-step cooking

use super::protocol::{AgentMessage, CookNext, CookReady, CookStart, JobStatus, MessageKind, ServerEvent};
use super::sink::EventSink;
use super::{run_guarded, AppState};
use crate::agent::{Role, MANAGER, USER};
use crate::cook::{acquire_timeline, steps_from_response, CookRequest, DEFAULT_PERSONALITY};
use crate::error::{Error, Result};
use crate::session::{Advance, SessionId};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Steps included in the execution message preview
const PREVIEW_STEPS: usize = 3;

pub async fn handle_cook_start(
    state: &AppState,
    sink: &EventSink,
    request: CookStart,
    cancel: CancellationToken,
) {
    if request.prompt.trim().is_empty() || request.location_key.trim().is_empty() {
        sink.error("cook:start missing prompt/locationKey");
        return;
    }

    run_guarded("cook:start", sink, &cancel, run_cook_start(state, sink, request)).await;
}

async fn run_cook_start(state: &AppState, sink: &EventSink, request: CookStart) -> Result<()> {
    let personality = request
        .personality
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PERSONALITY.to_string());
    let cook_request = CookRequest::new(request.prompt, request.location_key, personality);

    if let Some(job_id) = &request.job_id {
        debug!("cook:start follows job {}", job_id);
    }
    debug!("cook:start plan attached: {}", request.plan.is_some());

    sink.status(JobStatus::Cooking);
    sink.message(
        AgentMessage::new(
            MANAGER,
            MessageKind::Control,
            format!(
                "EXECUTION MODE. Build a minute-by-minute timeline script for \"{}\". ZIP {}. Personality: {}.",
                cook_request.prompt, cook_request.location_key, cook_request.personality
            ),
        )
        .to(Role::Executor.display_name()),
    );

    let response = acquire_timeline(&state.invoker, &cook_request).await?;
    let steps = steps_from_response(&response);
    let preview: Vec<_> = steps.iter().take(PREVIEW_STEPS).cloned().collect();

    let prompt_text = cook_request.prompt.clone();
    let personality = cook_request.personality.clone();
    let session_id = state.sessions.create(steps, cook_request).await;
    info!("Cook session {} ready", session_id);

    let content = if response.message.is_empty() {
        format!("Alright. We're cooking \"{prompt_text}\". I'll guide you minute-by-minute.")
    } else {
        response.message
    };
    sink.message(
        AgentMessage::new(Role::Executor.display_name(), MessageKind::Execution, content)
            .to(USER)
            .with_artifact(Some(json!({
                "sessionId": session_id,
                "personality": personality,
                "timelinePreview": preview,
            }))),
    );

    sink.emit(ServerEvent::CookReady(CookReady {
        session_id: session_id.to_string(),
    }));

    // Show the first step right away; the first cook:next moves past it
    let first = match state.sessions.peek_first(&session_id).await {
        Some(step) => AgentMessage::new(
            Role::Executor.display_name(),
            MessageKind::Step,
            format!("Step 1 {}", step.describe()),
        )
        .with_artifact(Some(json!(step))),
        None => AgentMessage::new(
            Role::Executor.display_name(),
            MessageKind::Step,
            "No timeline received. Chef did not return a timeline artifact even after retry.",
        ),
    };
    sink.message(first.to(USER));

    sink.status(JobStatus::CookingLive);
    Ok(())
}

pub async fn handle_cook_next(state: &AppState, sink: &EventSink, request: CookNext) {
    let session_id = SessionId::from_string(request.session_id);
    let chef = Role::Executor.display_name();

    match state.sessions.advance(&session_id).await {
        Ok(Advance::Step(step)) => sink.message(
            AgentMessage::new(chef, MessageKind::Step, format!("Next {}", step.describe()))
                .to(USER)
                .with_artifact(Some(json!(step))),
        ),
        Ok(Advance::NoMoreSteps) => {
            sink.message(AgentMessage::new(chef, MessageKind::Step, "No more steps.").to(USER))
        }
        Err(Error::SessionNotFound(id)) => {
            debug!("cook:next for unknown session {}", id);
            sink.error("No cook session found");
        }
        Err(e) => {
            error!("cook:next failed: {}", e);
            sink.error(e.to_string());
        }
    }
}
