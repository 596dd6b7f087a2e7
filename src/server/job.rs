//! `job:start`: planner, purchasing, delivery and analyzer in sequence
//!
//! Each role's prompt embeds the previous role's artifact, so the calls run
//! strictly one after another.

use super::protocol::{AgentMessage, JobFinal, JobStart, JobStatus, MessageKind, ServerEvent};
use super::sink::EventSink;
use super::{run_guarded, AppState};
use crate::agent::{prompt, Role, MANAGER};
use crate::error::Result;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

pub async fn handle_job_start(
    state: &AppState,
    sink: &EventSink,
    request: JobStart,
    cancel: CancellationToken,
) {
    if request.prompt.trim().is_empty() || request.location_key.trim().is_empty() {
        sink.error("Missing prompt or locationKey");
        return;
    }

    run_guarded("job:start", sink, &cancel, run_job(state, sink, &request)).await;
}

async fn run_job(state: &AppState, sink: &EventSink, request: &JobStart) -> Result<()> {
    let prompt_text = request.prompt.as_str();
    let location = request.location_key.as_str();

    info!("Starting job for \"{}\" ({})", prompt_text, location);
    sink.status(JobStatus::Running);

    // Manager -> Chef (plan)
    sink.status(JobStatus::Planning);
    delegate(
        sink,
        Role::Planner,
        format!(
            "We need a full plan for \"{prompt_text}\". ZIP {location}. Provide steps, timeline, risks, and a shopping list."
        ),
    );
    let chef = state
        .invoker
        .invoke(Role::Planner, &prompt::plan_task(prompt_text, location))
        .await?;
    reply(sink, Role::Planner, MessageKind::Message, &chef.message, &chef.artifact);

    // Purchasing
    sink.status(JobStatus::Purchasing);
    delegate(
        sink,
        Role::Purchasing,
        format!(
            "Build a purchase order near ZIP {location} using the chef artifact. Include substitutes + notes."
        ),
    );
    let purchasing = state
        .invoker
        .invoke(
            Role::Purchasing,
            &prompt::purchasing_task(location, &chef.artifact_or_empty()),
        )
        .await?;
    reply(
        sink,
        Role::Purchasing,
        MessageKind::Message,
        &purchasing.message,
        &purchasing.artifact,
    );

    // Delivery
    sink.status(JobStatus::Delivery);
    delegate(
        sink,
        Role::Delivery,
        format!(
            "Create a delivery plan for ZIP {location}. Estimate ETA and list stops. Respect cold items."
        ),
    );
    let delivery = state
        .invoker
        .invoke(
            Role::Delivery,
            &prompt::delivery_task(location, &purchasing.artifact_or_empty()),
        )
        .await?;
    reply(
        sink,
        Role::Delivery,
        MessageKind::Message,
        &delivery.message,
        &delivery.artifact,
    );

    // Analyzer (forced convergence)
    sink.status(JobStatus::Analyzing);
    sink.message(
        AgentMessage::new(
            Role::Analyzer.display_name(),
            MessageKind::Analysis,
            "Reviewing run and producing a convergence-grade build prompt...",
        )
        .to(MANAGER),
    );
    let analyzer = state
        .invoker
        .invoke(
            Role::Analyzer,
            &prompt::analyzer_task(
                &chef.artifact_or_empty(),
                &purchasing.artifact_or_empty(),
                &delivery.artifact_or_empty(),
            ),
        )
        .await?;
    reply(
        sink,
        Role::Analyzer,
        MessageKind::Analysis,
        &analyzer.message,
        &analyzer.artifact,
    );

    let job_id = format!("job-{}", Uuid::new_v4());
    let analyzer_summary = analyzer
        .artifact
        .unwrap_or(Value::String(analyzer.message));

    sink.emit(ServerEvent::JobFinal(JobFinal {
        job_id: job_id.clone(),
        prompt: request.prompt.clone(),
        location_key: request.location_key.clone(),
        chef: chef.artifact,
        purchasing: purchasing.artifact,
        delivery: delivery.artifact,
        analyzer: analyzer_summary,
    }));
    sink.status(JobStatus::Done);

    info!("Job {} finished", job_id);
    Ok(())
}

fn delegate(sink: &EventSink, role: Role, content: String) {
    sink.message(
        AgentMessage::new(MANAGER, MessageKind::Delegation, content).to(role.display_name()),
    );
}

fn reply(
    sink: &EventSink,
    role: Role,
    kind: MessageKind,
    content: &str,
    artifact: &Option<Value>,
) {
    sink.message(
        AgentMessage::new(role.display_name(), kind, content)
            .to(MANAGER)
            .with_artifact(artifact.clone()),
    );
}
