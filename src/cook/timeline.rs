//! Time-coded cooking steps and their conversion from model artifacts

use crate::agent::RoleResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::warn;

/// One time-boxed instruction of a cook session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineStep {
    #[serde(rename = "t_start_sec")]
    pub start_offset_seconds: f64,
    #[serde(rename = "t_end_sec")]
    pub end_offset_seconds: f64,
    pub instruction: String,
    #[serde(default)]
    pub critical: bool,
    #[serde(default, rename = "voiceCue")]
    pub voice_cue: bool,
}

impl TimelineStep {
    pub fn new(start: f64, end: f64, instruction: impl Into<String>) -> Self {
        Self {
            start_offset_seconds: start,
            end_offset_seconds: end,
            instruction: instruction.into(),
            critical: false,
            voice_cue: false,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.start_offset_seconds.is_finite()
            && self.end_offset_seconds.is_finite()
            && self.start_offset_seconds < self.end_offset_seconds
    }

    /// `(0s–90s): instruction`
    pub fn describe(&self) -> String {
        format!(
            "({}s–{}s): {}",
            self.start_offset_seconds, self.end_offset_seconds, self.instruction
        )
    }
}

/// The raw `artifact.timeline` array, if the artifact has one
fn raw_timeline(response: &RoleResponse) -> Option<&Vec<Value>> {
    response.artifact.as_ref()?.get("timeline")?.as_array()
}

/// Whether `response` carries at least one step [`steps_from_response`] would keep
pub fn has_timeline(response: &RoleResponse) -> bool {
    raw_timeline(response).is_some_and(|raw| {
        raw.iter().any(|value| {
            serde_json::from_value::<TimelineStep>(value.clone())
                .is_ok_and(|step| step.is_well_formed())
        })
    })
}

/// Typed steps from `artifact.timeline`.
///
/// Elements that do not deserialize or whose start is not before their end
/// are dropped. The rest are stably sorted by start offset.
pub fn steps_from_response(response: &RoleResponse) -> Vec<TimelineStep> {
    let Some(raw) = raw_timeline(response) else {
        return Vec::new();
    };

    let mut steps: Vec<TimelineStep> = raw
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            match serde_json::from_value::<TimelineStep>(value.clone()) {
                Ok(step) if step.is_well_formed() => Some(step),
                Ok(step) => {
                    warn!(
                        "Dropping timeline step {}: start {} is not before end {}",
                        index, step.start_offset_seconds, step.end_offset_seconds
                    );
                    None
                }
                Err(e) => {
                    warn!("Dropping timeline step {}: {}", index, e);
                    None
                }
            }
        })
        .collect();

    steps.sort_by(|a, b| {
        a.start_offset_seconds
            .partial_cmp(&b.start_offset_seconds)
            .unwrap_or(Ordering::Equal)
    });
    steps
}
